// ABOUTME: Error types for the interview engine
// ABOUTME: Defines all error variants for turn processing, persistence, and finalization

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InterviewError {
    #[error("Answer is empty after normalization")]
    EmptyAnswer,

    #[error("Answer repeats an already recorded fact")]
    DuplicateAnswer,

    #[error("No active interview for project: {0}")]
    NotActive(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] specloom_storage::StorageError),

    #[error("SRS generation failed: {0}")]
    FinalizeFailed(#[from] specloom_agent::AgentError),
}

pub type Result<T> = std::result::Result<T, InterviewError>;
