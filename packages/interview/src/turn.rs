// ABOUTME: Turn processor wrapping the turn-generation collaborator
// ABOUTME: Applies the anti-repetition rule and degrades collaborator failures into a retryable soft-fail

use specloom_agent::{TurnAgent, TurnReply, TurnRequest};
use specloom_core::{normalize_answer, InterviewState, Language};
use tracing::warn;

/// Result of one collaborator round.
///
/// On a soft-failed turn the reply carries only the fallback question and
/// the caller must leave state, coverage, and `last_answer` untouched so
/// the same answer can be retried.
#[derive(Debug)]
pub struct ProcessedTurn {
    pub reply: TurnReply,
    pub soft_failed: bool,
}

/// Fixed first question opening a fresh interview.
pub fn opening_question(language: Language) -> &'static str {
    match language {
        Language::En => {
            "Let's start from the beginning: what problem are you trying to solve, \
             and what happens today without this system?"
        }
        Language::Ar => {
            "لنبدأ من البداية: ما المشكلة التي تحاول حلها، وماذا يحدث اليوم بدون هذا النظام؟"
        }
    }
}

/// Fallback question returned when the collaborator call fails.
pub fn fallback_question(language: Language) -> &'static str {
    match language {
        Language::En => {
            "I couldn't process that just now. Could you add one more detail \
             about your project, or rephrase your last point?"
        }
        Language::Ar => {
            "تعذّرت معالجة إجابتك الآن. هل يمكنك إضافة تفصيل آخر عن مشروعك، أو إعادة صياغة نقطتك الأخيرة؟"
        }
    }
}

/// Substitute prompt used when the collaborator repeats its own question.
pub fn repeat_nudge(language: Language) -> &'static str {
    match language {
        Language::En => {
            "We already covered that question. Tell me one new fact about your \
             project instead, anything we haven't recorded yet."
        }
        Language::Ar => {
            "سبق أن غطّينا هذا السؤال. أخبرني بمعلومة جديدة واحدة عن مشروعك، أي شيء لم نسجّله بعد."
        }
    }
}

/// Run one collaborator round for the given state and answer.
///
/// A failing call soft-fails the turn: the deterministic fallback question
/// comes back with an empty delta and empty coverage, so nothing the caller
/// applies from it can mutate state.
pub async fn process(
    agent: &dyn TurnAgent,
    state: &InterviewState,
    new_answer: &str,
    language: Language,
) -> ProcessedTurn {
    let request = TurnRequest {
        prior_summary: state.summary.clone(),
        prior_coverage: state.coverage.clone(),
        new_answer: new_answer.to_string(),
        language,
    };

    let mut reply = match agent.next_turn(request).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!(
                "Turn collaborator failed for project {}, soft-failing the turn: {}",
                state.project_id, e
            );
            return ProcessedTurn {
                reply: TurnReply::question_only(fallback_question(language)),
                soft_failed: true,
            };
        }
    };

    // Never echo the same question twice in a row.
    if let Some(last) = &state.last_question {
        if normalize_answer(&reply.question_text) == normalize_answer(last) {
            reply.question_text = repeat_nudge(language).to_string();
        }
    }

    ProcessedTurn {
        reply,
        soft_failed: false,
    }
}
