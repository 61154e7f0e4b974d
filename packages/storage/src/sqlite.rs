// ABOUTME: Sqlite-backed local draft cache
// ABOUTME: Stores one serialized draft row per project, treating unparseable payloads as absent

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use specloom_core::DraftRecord;
use tracing::{error, warn};

use crate::error::{Result, StorageError};
use crate::store::DraftStore;

/// Local draft cache on the embedded sqlite database.
pub struct SqliteDraftStore {
    pool: SqlitePool,
}

impl SqliteDraftStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the drafts table if it does not exist yet. Safe to call on
    /// every startup.
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS interview_drafts (
                project_id TEXT PRIMARY KEY,
                payload TEXT NOT NULL,
                saved_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to initialize interview_drafts schema: {}", e);
            StorageError::Database(e)
        })?;

        Ok(())
    }
}

#[async_trait]
impl DraftStore for SqliteDraftStore {
    async fn load(&self, project_id: &str) -> Result<Option<DraftRecord>> {
        let row = sqlx::query("SELECT payload FROM interview_drafts WHERE project_id = ?")
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to load draft for project {}: {}", project_id, e);
                StorageError::Database(e)
            })?;

        let Some(row) = row else {
            return Ok(None);
        };

        let payload: String = row.get("payload");
        match serde_json::from_str::<DraftRecord>(&payload) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                // A corrupt cached payload is recoverable: the remote copy
                // (or a fresh interview) takes over.
                warn!(
                    "Unparseable local draft for project {}, treating as absent: {}",
                    project_id, e
                );
                Ok(None)
            }
        }
    }

    async fn save(&self, project_id: &str, record: &DraftRecord) -> Result<()> {
        let payload = serde_json::to_string(record)?;
        let saved_at = record.saved_at.to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO interview_drafts (project_id, payload, saved_at)
            VALUES (?, ?, ?)
            ON CONFLICT(project_id) DO UPDATE SET
                payload = excluded.payload,
                saved_at = excluded.saved_at
            "#,
        )
        .bind(project_id)
        .bind(&payload)
        .bind(&saved_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to save draft for project {}: {}", project_id, e);
            StorageError::Database(e)
        })?;

        Ok(())
    }

    async fn clear(&self, project_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM interview_drafts WHERE project_id = ?")
            .bind(project_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to clear draft for project {}: {}", project_id, e);
                StorageError::Database(e)
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use specloom_core::InterviewState;

    async fn store() -> SqliteDraftStore {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        let store = SqliteDraftStore::new(pool);
        store.init_schema().await.unwrap();
        store
    }

    fn record(project_id: &str) -> DraftRecord {
        DraftRecord {
            state: InterviewState::new(project_id),
            saved_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn save_load_clear_roundtrip() {
        let store = store().await;
        assert!(store.load("p1").await.unwrap().is_none());

        store.save("p1", &record("p1")).await.unwrap();
        let loaded = store.load("p1").await.unwrap().unwrap();
        assert_eq!(loaded.state.project_id, "p1");

        store.clear("p1").await.unwrap();
        assert!(store.load("p1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_replaces_prior_draft() {
        let store = store().await;
        store.save("p1", &record("p1")).await.unwrap();

        let mut newer = record("p1");
        newer
            .state
            .last_answer
            .replace("second write".to_string());
        store.save("p1", &newer).await.unwrap();

        let loaded = store.load("p1").await.unwrap().unwrap();
        assert_eq!(loaded.state.last_answer.as_deref(), Some("second write"));
    }

    #[tokio::test]
    async fn drafts_survive_reopening_the_database_file() {
        use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

        let dir = tempfile::tempdir().unwrap();
        let options = SqliteConnectOptions::new()
            .filename(dir.path().join("drafts.db"))
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(options.clone())
            .await
            .unwrap();
        let store = SqliteDraftStore::new(pool.clone());
        store.init_schema().await.unwrap();
        store.save("p1", &record("p1")).await.unwrap();
        pool.close().await;

        // A fresh pool over the same file sees the draft.
        let pool = SqlitePoolOptions::new().connect_with(options).await.unwrap();
        let store = SqliteDraftStore::new(pool);
        store.init_schema().await.unwrap();
        assert!(store.load("p1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn unparseable_payload_loads_as_absent() {
        let store = store().await;
        sqlx::query(
            "INSERT INTO interview_drafts (project_id, payload, saved_at) VALUES (?, ?, ?)",
        )
        .bind("p1")
        .bind("{not valid json")
        .bind(Utc::now().to_rfc3339())
        .execute(&store.pool)
        .await
        .unwrap();

        assert!(store.load("p1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn clearing_absent_draft_is_ok() {
        let store = store().await;
        store.clear("missing").await.unwrap();
    }
}
