// ABOUTME: Specloom storage library - draft persistence and reconciliation
// ABOUTME: Provides the draft store trait, sqlite and HTTP stores, the reconciling manager, and the transcript sink

pub mod error;
pub mod http;
pub mod manager;
pub mod sqlite;
pub mod store;
pub mod transcript;

pub use error::{Result, StorageError};
pub use http::HttpDraftStore;
pub use manager::DraftManager;
pub use sqlite::SqliteDraftStore;
pub use store::DraftStore;
pub use transcript::{MessageRole, SqliteTranscript, TranscriptMessage, TranscriptSink};
