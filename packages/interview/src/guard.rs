// ABOUTME: Early duplicate filter for incoming answers
// ABOUTME: Rejects exact repeats of the previous answer or of recorded items before any collaborator call

use specloom_core::{normalize_answer, AreaId, InterviewState};

use crate::error::{InterviewError, Result};

/// Check a raw answer against the session before spending a collaborator
/// call on it. Returns the normalized form on success.
///
/// This filter is intentionally shallow: exact normalized equality only.
/// Semantic contradiction detection belongs to the turn collaborator, which
/// can flag delta items instead.
pub fn check_answer(
    state: &InterviewState,
    raw_answer: &str,
    active_area: Option<AreaId>,
) -> Result<String> {
    let normalized = normalize_answer(raw_answer);
    if normalized.is_empty() {
        return Err(InterviewError::EmptyAnswer);
    }

    if let Some(last) = &state.last_answer {
        if normalize_answer(last) == normalized {
            return Err(InterviewError::DuplicateAnswer);
        }
    }

    if let Some(area) = active_area {
        let repeat = state
            .items(area)
            .iter()
            .any(|item| normalize_answer(&item.text) == normalized);
        if repeat {
            return Err(InterviewError::DuplicateAnswer);
        }
    }

    Ok(normalized)
}
