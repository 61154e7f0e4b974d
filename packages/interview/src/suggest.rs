// ABOUTME: Suggested-answer selection with tolerant parsing and canned fallbacks
// ABOUTME: Turns whatever shape the collaborator returned into a bounded, never-empty option list

use serde_json::Value;
use specloom_core::{normalize_answer, AreaId, Language};
use tracing::warn;

const MAX_SUBSTANTIVE: usize = 5;

/// Build the option list shown with a question.
///
/// Collaborators return suggestions as a JSON array, a JSON-encoded string,
/// a delimited text block, or not at all; all shapes are tolerated and a
/// malformed payload falls back to canned options rather than surfacing an
/// error. The result always ends with the two meta-options and is never
/// empty: at most 5 substantive entries plus the 2 meta-options.
pub fn select_options(
    raw: Option<&Value>,
    question_text: &str,
    area: Option<AreaId>,
    language: Language,
) -> Vec<String> {
    let mut options = Vec::new();
    let mut seen = Vec::new();

    for candidate in parse_candidates(raw) {
        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            continue;
        }
        let normalized = normalize_answer(trimmed);
        if normalized.is_empty() || seen.contains(&normalized) {
            continue;
        }
        seen.push(normalized);
        options.push(trimmed.to_string());
        if options.len() == MAX_SUBSTANTIVE {
            break;
        }
    }

    if options.is_empty() {
        if raw.is_some() {
            warn!("No usable suggestions in collaborator payload, using canned options");
        }
        options = canned_options(question_text, area, language);
    }

    options.extend(meta_options(language));
    options
}

/// Pull candidate strings out of whatever the collaborator sent.
fn parse_candidates(raw: Option<&Value>) -> Vec<String> {
    match raw {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Object(obj) => obj
                    .get("text")
                    .or_else(|| obj.get("label"))
                    .and_then(Value::as_str)
                    .map(str::to_string),
                _ => None,
            })
            .collect(),
        Some(Value::String(text)) => {
            // A JSON-encoded array first, then a delimited free-text block.
            if let Ok(parsed) = serde_json::from_str::<Vec<String>>(text) {
                return parsed;
            }
            split_free_text(text)
        }
        Some(_) => Vec::new(),
    }
}

/// Split a free-text block on newlines and semicolons, shedding bullet and
/// numbering prefixes.
fn split_free_text(text: &str) -> Vec<String> {
    text.split(['\n', ';', '؛'])
        .map(strip_list_prefix)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_list_prefix(line: &str) -> &str {
    let line = line.trim();
    let without_marker = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .or_else(|| line.strip_prefix("• "))
        .unwrap_or(line);

    // "1. option" / "2) option" numbering; bare leading digits stay.
    let digits = without_marker
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .count();
    if digits > 0 {
        if let Some(rest) = without_marker[digits..].strip_prefix(['.', ')']) {
            return rest.trim();
        }
    }
    without_marker.trim()
}

/// Canned fallback options, keyed first by keywords in the question and then
/// by the area being pursued.
fn canned_options(question_text: &str, area: Option<AreaId>, language: Language) -> Vec<String> {
    let question = question_text.to_lowercase();

    let metric_question = ["success metric", "kpi", "measure success", "مقياس", "مؤشر"]
        .iter()
        .any(|kw| question.contains(kw));
    if metric_question {
        return match language {
            Language::En => vec![
                "Reduce task time by half".to_string(),
                "Reach 1,000 active users in 6 months".to_string(),
                "Cut error rate below 1%".to_string(),
            ],
            Language::Ar => vec![
                "تقليل وقت إنجاز المهمة إلى النصف".to_string(),
                "الوصول إلى ١٠٠٠ مستخدم نشط خلال ٦ أشهر".to_string(),
                "خفض نسبة الأخطاء إلى أقل من ١٪".to_string(),
            ],
        };
    }

    match (area.unwrap_or(AreaId::Discovery), language) {
        (AreaId::Discovery, Language::En) => vec![
            "The current process is manual and slow".to_string(),
            "Information is scattered across tools".to_string(),
            "Mistakes are found too late".to_string(),
        ],
        (AreaId::Discovery, Language::Ar) => vec![
            "العملية الحالية يدوية وبطيئة".to_string(),
            "المعلومات مبعثرة بين عدة أدوات".to_string(),
            "الأخطاء تُكتشف متأخراً".to_string(),
        ],
        (AreaId::Scope, Language::En) => vec![
            "A web application only, for now".to_string(),
            "Replace one existing workflow end to end".to_string(),
            "Start with a pilot for one team".to_string(),
        ],
        (AreaId::Scope, Language::Ar) => vec![
            "تطبيق ويب فقط في المرحلة الأولى".to_string(),
            "استبدال سير عمل واحد قائم بالكامل".to_string(),
            "البدء بتجربة لفريق واحد".to_string(),
        ],
        (AreaId::Users, Language::En) => vec![
            "Internal staff".to_string(),
            "External customers".to_string(),
            "Both staff and customers".to_string(),
        ],
        (AreaId::Users, Language::Ar) => vec![
            "الموظفون الداخليون".to_string(),
            "العملاء الخارجيون".to_string(),
            "الموظفون والعملاء معاً".to_string(),
        ],
        (AreaId::Features, Language::En) => vec![
            "Dashboards and reports".to_string(),
            "Notifications and reminders".to_string(),
            "Search across all records".to_string(),
        ],
        (AreaId::Features, Language::Ar) => vec![
            "لوحات متابعة وتقارير".to_string(),
            "إشعارات وتذكيرات".to_string(),
            "بحث في كل السجلات".to_string(),
        ],
        (AreaId::Constraints, Language::En) => vec![
            "Must launch within three months".to_string(),
            "Limited budget".to_string(),
            "Data must stay in-country".to_string(),
        ],
        (AreaId::Constraints, Language::Ar) => vec![
            "الإطلاق خلال ثلاثة أشهر".to_string(),
            "ميزانية محدودة".to_string(),
            "يجب بقاء البيانات داخل البلد".to_string(),
        ],
    }
}

/// The two constant meta-options appended to every candidate set.
fn meta_options(language: Language) -> [String; 2] {
    match language {
        Language::En => [
            "Skip this question".to_string(),
            "Not sure, simplify the question".to_string(),
        ],
        Language::Ar => [
            "تخطَّ هذا السؤال".to_string(),
            "لست متأكداً، بسّط السؤال".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn select(raw: Option<Value>) -> Vec<String> {
        select_options(
            raw.as_ref(),
            "What problem are you solving?",
            Some(AreaId::Discovery),
            Language::En,
        )
    }

    #[test]
    fn passes_through_a_clean_list() {
        let options = select(Some(json!(["Slow approvals", "Lost paperwork"])));
        assert_eq!(options[0], "Slow approvals");
        assert_eq!(options[1], "Lost paperwork");
        assert_eq!(options.len(), 4);
    }

    #[test]
    fn parses_json_encoded_string() {
        let options = select(Some(json!("[\"Option A\", \"Option B\"]")));
        assert_eq!(options[0], "Option A");
        assert_eq!(options[1], "Option B");
    }

    #[test]
    fn parses_delimited_text_block() {
        let options = select(Some(json!("- First choice\n2. Second choice; Third choice")));
        assert_eq!(options[0], "First choice");
        assert_eq!(options[1], "Second choice");
        assert_eq!(options[2], "Third choice");
    }

    #[test]
    fn bare_leading_digits_are_kept() {
        let options = select(Some(json!("2024 launch target\n500 users")));
        assert_eq!(options[0], "2024 launch target");
        assert_eq!(options[1], "500 users");
    }

    #[test]
    fn parses_objects_with_text_field() {
        let options = select(Some(json!([{"text": "From object"}, {"label": "From label"}])));
        assert_eq!(options[0], "From object");
        assert_eq!(options[1], "From label");
    }

    #[test]
    fn dedups_by_normalized_form_keeping_first() {
        let options = select(Some(json!(["Fast search", "  fast SEARCH! ", "Reports"])));
        assert_eq!(options[0], "Fast search");
        assert_eq!(options[1], "Reports");
        assert_eq!(options.len(), 4);
    }

    #[test]
    fn caps_substantive_options_at_five() {
        let options = select(Some(json!(["a", "b", "c", "d", "e", "f", "g"])));
        assert_eq!(options.len(), 7);
        assert_eq!(options[4], "e");
        assert_eq!(options[5], "Skip this question");
    }

    #[test]
    fn malformed_payloads_fall_back_to_canned_options() {
        for raw in [None, Some(json!("")), Some(json!(42)), Some(json!({"a": 1}))] {
            let options = select(raw);
            assert!(options.len() >= 3, "got {:?}", options);
            assert!(options.len() <= 7);
            assert_eq!(options[options.len() - 2], "Skip this question");
            assert_eq!(options[options.len() - 1], "Not sure, simplify the question");
        }
    }

    #[test]
    fn metric_questions_get_metric_fallbacks() {
        let options = select_options(
            None,
            "What is your main success metric?",
            Some(AreaId::Features),
            Language::En,
        );
        assert!(options[0].contains("task time"));
    }

    #[test]
    fn arabic_sessions_get_arabic_options() {
        let options = select_options(None, "ما المشكلة؟", Some(AreaId::Users), Language::Ar);
        assert_eq!(options[0], "الموظفون الداخليون");
        assert_eq!(options[options.len() - 2], "تخطَّ هذا السؤال");
    }

    #[test]
    fn meta_options_always_close_the_list() {
        let options = select(Some(json!(["Only one"])));
        assert_eq!(options.len(), 3);
        assert_eq!(options[1], "Skip this question");
    }
}
