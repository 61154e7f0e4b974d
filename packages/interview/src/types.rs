// ABOUTME: Boundary types returned by the interview engine
// ABOUTME: Defines the per-turn outcome and the review sheet shapes

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use specloom_core::{AreaId, SummaryDelta};

use crate::coverage::CoverageReport;

/// What the caller receives after one processed turn.
#[derive(Debug, Serialize)]
pub struct TurnOutcome {
    pub question_text: String,
    pub coverage: CoverageReport,
    /// Collaborator's termination verdict, authoritative over the local
    /// coverage heuristics.
    pub done: bool,
    pub suggested_answers: Vec<String>,
    /// Items actually inserted this turn, for "what's new" highlighting.
    pub new_items: SummaryDelta,
}

/// Per-area editable view of the summary, seeded for Review/Finalize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSheet {
    pub areas: BTreeMap<AreaId, Vec<String>>,
}

/// Edited per-area content submitted from review. Each listed area's
/// recorded items are replaced wholesale; unlisted areas are left alone.
pub type EditedSummary = BTreeMap<AreaId, Vec<String>>;
