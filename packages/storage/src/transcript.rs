// ABOUTME: Chat transcript store for interview audit history
// ABOUTME: Appends ordered user/assistant messages per project with optional JSON metadata

use async_trait::async_trait;
use nanoid::nanoid;
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use tracing::error;

use crate::error::{Result, StorageError};

/// Author of a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One recorded transcript message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptMessage {
    pub id: String,
    pub project_id: String,
    pub message_order: i32,
    pub role: MessageRole,
    pub content: String,
    pub metadata: Option<serde_json::Value>,
    pub created_at: String,
}

/// Append-only audit trail of interview turns.
#[async_trait]
pub trait TranscriptSink: Send + Sync {
    async fn append(
        &self,
        project_id: &str,
        role: MessageRole,
        content: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<TranscriptMessage>;
}

/// Sqlite-backed transcript store.
pub struct SqliteTranscript {
    pool: SqlitePool,
}

impl SqliteTranscript {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the transcript table if it does not exist yet.
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS interview_transcript (
                id TEXT PRIMARY KEY,
                project_id TEXT NOT NULL,
                message_order INTEGER NOT NULL,
                role TEXT NOT NULL,
                content TEXT NOT NULL,
                metadata TEXT,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to initialize interview_transcript schema: {}", e);
            StorageError::Database(e)
        })?;

        Ok(())
    }

    /// Full message history for a project, oldest first.
    pub async fn history(&self, project_id: &str) -> Result<Vec<TranscriptMessage>> {
        let rows = sqlx::query(
            r#"
            SELECT id, project_id, message_order, role, content, metadata, created_at
            FROM interview_transcript
            WHERE project_id = ?
            ORDER BY message_order ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to load transcript for project {}: {}", project_id, e);
            StorageError::Database(e)
        })?;

        let messages = rows
            .into_iter()
            .map(|row| TranscriptMessage {
                id: row.get("id"),
                project_id: row.get("project_id"),
                message_order: row.get("message_order"),
                role: row.get("role"),
                content: row.get("content"),
                metadata: row
                    .get::<Option<String>, _>("metadata")
                    .and_then(|s| serde_json::from_str(&s).ok()),
                created_at: row.get("created_at"),
            })
            .collect();

        Ok(messages)
    }
}

#[async_trait]
impl TranscriptSink for SqliteTranscript {
    async fn append(
        &self,
        project_id: &str,
        role: MessageRole,
        content: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<TranscriptMessage> {
        let id = nanoid!(12);

        let message_order: i32 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(message_order), -1) + 1 FROM interview_transcript WHERE project_id = ?",
        )
        .bind(project_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to get next message order: {}", e);
            StorageError::Database(e)
        })?;

        let metadata_json = metadata
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let created_at = chrono::Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO interview_transcript (
                id, project_id, message_order, role, content, metadata, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(project_id)
        .bind(message_order)
        .bind(role)
        .bind(content)
        .bind(&metadata_json)
        .bind(&created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to append transcript message: {}", e);
            StorageError::Database(e)
        })?;

        Ok(TranscriptMessage {
            id,
            project_id: project_id.to_string(),
            message_order,
            role,
            content: content.to_string(),
            metadata,
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn transcript() -> SqliteTranscript {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        let transcript = SqliteTranscript::new(pool);
        transcript.init_schema().await.unwrap();
        transcript
    }

    #[tokio::test]
    async fn messages_are_ordered_per_project() {
        let transcript = transcript().await;

        transcript
            .append("p1", MessageRole::Assistant, "What problem?", None)
            .await
            .unwrap();
        transcript
            .append("p1", MessageRole::User, "Manual approvals", None)
            .await
            .unwrap();
        transcript
            .append("p2", MessageRole::Assistant, "Other project", None)
            .await
            .unwrap();

        let history = transcript.history("p1").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].message_order, 0);
        assert_eq!(history[0].role, MessageRole::Assistant);
        assert_eq!(history[1].message_order, 1);
        assert_eq!(history[1].content, "Manual approvals");
    }

    #[tokio::test]
    async fn metadata_roundtrips_as_json() {
        let transcript = transcript().await;

        transcript
            .append(
                "p1",
                MessageRole::User,
                "answer",
                Some(json!({"stage": "discovery", "average": 12.0})),
            )
            .await
            .unwrap();

        let history = transcript.history("p1").await.unwrap();
        let metadata = history[0].metadata.as_ref().unwrap();
        assert_eq!(metadata["stage"], "discovery");
    }
}
