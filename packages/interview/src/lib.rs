// ABOUTME: Specloom interview library - the requirements interview orchestration engine
// ABOUTME: Provides the turn pipeline components and the engine boundary surface

pub mod coverage;
pub mod engine;
pub mod error;
pub mod guard;
pub mod merge;
pub mod suggest;
pub mod turn;
pub mod types;

pub use coverage::{CoverageReport, AREA_READY_THRESHOLD, REVIEW_THRESHOLD};
pub use engine::InterviewEngine;
pub use error::{InterviewError, Result};
pub use types::{EditedSummary, ReviewSheet, TurnOutcome};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::coverage::CoverageReport;
    pub use crate::engine::InterviewEngine;
    pub use crate::error::{InterviewError, Result};
    pub use crate::types::{EditedSummary, ReviewSheet, TurnOutcome};
    pub use specloom_core::{AreaId, InterviewState, Language, SummaryItem};
}
