// ABOUTME: Error types for the storage package
// ABOUTME: Defines all error variants for draft and transcript persistence

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Remote store request failed: {0}")]
    Remote(#[from] reqwest::Error),

    #[error("Remote store returned status {0}")]
    RemoteStatus(reqwest::StatusCode),
}

pub type Result<T> = std::result::Result<T, StorageError>;
