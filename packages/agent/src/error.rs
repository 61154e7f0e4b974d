// ABOUTME: Error types for collaborator agent calls
// ABOUTME: Defines all failure variants for turn-generation and SRS-generation requests

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("No API key configured")]
    NoApiKey,

    #[error("Invalid response format")]
    InvalidResponse,
}

pub type AgentResult<T> = std::result::Result<T, AgentError>;
