// ABOUTME: Prompt builders for the turn-generation and SRS-generation collaborators
// ABOUTME: Produces bilingual prompts that request structured JSON replies

use specloom_core::{AreaId, Language, Summary};

use crate::error::{AgentError, AgentResult};
use crate::traits::TurnRequest;

/// System prompt for turn generation.
pub fn turn_system_prompt(language: Language) -> String {
    let language_line = match language {
        Language::En => "Ask your questions in English.",
        Language::Ar => "Ask your questions in Arabic.",
    };
    format!(
        "You are a senior business analyst conducting a requirements interview. \
         You track five fixed coverage areas: discovery, scope, users, features, constraints. \
         Ask exactly one question per turn, never repeat a question you already asked, \
         and only record facts the user actually stated. {}",
        language_line
    )
}

/// Build the turn-generation prompt from the running state and the new answer.
pub fn turn_prompt(request: &TurnRequest) -> AgentResult<String> {
    let summary_json = serde_json::to_string_pretty(&request.prior_summary)
        .map_err(|e| AgentError::Parse(e.to_string()))?;
    let coverage_json = serde_json::to_string_pretty(&request.prior_coverage)
        .map_err(|e| AgentError::Parse(e.to_string()))?;

    Ok(format!(
        r#"Current structured summary per area:
{summary_json}

Current coverage estimates per area (0-100):
{coverage_json}

The user just answered:
{answer}

Update the interview state:
1. Extract genuinely NEW requirement facts from the answer and assign each to one area. Do not restate facts already in the summary. If a new fact contradicts a recorded one, include it with "flag": "contradiction"; if it is too vague to act on, include it with "flag": "vague".
2. Re-estimate coverage (0-100) for every area.
3. Ask the single most valuable next question, focused on the least-covered area.
4. Propose 3-5 short example answers the user could pick from.
5. Set "done" to true only when every area is covered well enough to draft an SRS.

Respond with JSON only:
{{
  "question_text": "...",
  "summary_delta": {{"discovery": ["..."], "scope": [], "users": [], "features": [], "constraints": []}},
  "coverage": {{"discovery": 0, "scope": 0, "users": 0, "features": 0, "constraints": 0}},
  "suggested_answers": ["...", "..."],
  "done": false
}}
"#,
        summary_json = summary_json,
        coverage_json = coverage_json,
        answer = request.new_answer,
    ))
}

/// System prompt for SRS generation.
pub fn srs_system_prompt(language: Language) -> String {
    let language_line = match language {
        Language::En => "Write the document in English.",
        Language::Ar => "Write the document in Arabic.",
    };
    format!(
        "You are a senior business analyst writing a software requirements \
         specification from interview notes. Be precise and do not invent \
         requirements that were not captured. {}",
        language_line
    )
}

/// Build the SRS-generation prompt from the finalized summary.
pub fn srs_prompt(summary: &Summary, language: Language) -> AgentResult<String> {
    let mut notes = String::new();
    for area in AreaId::ALL {
        notes.push_str(&format!("## {}\n", area.as_str()));
        match summary.get(&area) {
            Some(items) if !items.is_empty() => {
                for item in items {
                    notes.push_str(&format!("- {}\n", item.text));
                }
            }
            _ => notes.push_str("- (nothing captured)\n"),
        }
        notes.push('\n');
    }

    let language_line = match language {
        Language::En => "Produce the document in English.",
        Language::Ar => "Produce the document in Arabic.",
    };

    Ok(format!(
        r#"Interview notes, grouped by coverage area:

{notes}
Write a complete SRS draft from these notes: introduction, scope, user classes, functional requirements, and constraints/non-functional requirements. {language_line}

Respond with JSON only:
{{
  "title": "...",
  "sections": [
    {{"heading": "...", "body": "..."}}
  ]
}}
"#,
        notes = notes,
        language_line = language_line,
    ))
}
