// ABOUTME: HTTP-backed remote draft store
// ABOUTME: Talks to the backend draft endpoint, mapping 404 to an absent draft

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use specloom_core::DraftRecord;
use tracing::error;

use crate::error::{Result, StorageError};
use crate::store::DraftStore;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Remote draft store behind `GET/POST/DELETE {base}/projects/{id}/interview-draft`.
pub struct HttpDraftStore {
    client: Client,
    base_url: String,
}

impl HttpDraftStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn draft_url(&self, project_id: &str) -> String {
        format!("{}/projects/{}/interview-draft", self.base_url, project_id)
    }
}

#[async_trait]
impl DraftStore for HttpDraftStore {
    async fn load(&self, project_id: &str) -> Result<Option<DraftRecord>> {
        let response = self.client.get(self.draft_url(project_id)).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            error!(
                "Remote draft load for project {} returned {}",
                project_id,
                response.status()
            );
            return Err(StorageError::RemoteStatus(response.status()));
        }

        let record = response.json::<DraftRecord>().await?;
        Ok(Some(record))
    }

    async fn save(&self, project_id: &str, record: &DraftRecord) -> Result<()> {
        let response = self
            .client
            .post(self.draft_url(project_id))
            .json(record)
            .send()
            .await?;

        if !response.status().is_success() {
            error!(
                "Remote draft save for project {} returned {}",
                project_id,
                response.status()
            );
            return Err(StorageError::RemoteStatus(response.status()));
        }

        Ok(())
    }

    async fn clear(&self, project_id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.draft_url(project_id))
            .send()
            .await?;

        // Deleting an absent draft is as cleared as it gets.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        if !response.status().is_success() {
            error!(
                "Remote draft clear for project {} returned {}",
                project_id,
                response.status()
            );
            return Err(StorageError::RemoteStatus(response.status()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use specloom_core::InterviewState;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn record(project_id: &str) -> DraftRecord {
        DraftRecord {
            state: InterviewState::new(project_id),
            saved_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn load_maps_404_to_absent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/p1/interview-draft"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let store = HttpDraftStore::new(server.uri());
        assert!(store.load("p1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn load_parses_remote_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/p1/interview-draft"))
            .respond_with(ResponseTemplate::new(200).set_body_json(record("p1")))
            .mount(&server)
            .await;

        let store = HttpDraftStore::new(server.uri());
        let loaded = store.load("p1").await.unwrap().unwrap();
        assert_eq!(loaded.state.project_id, "p1");
    }

    #[tokio::test]
    async fn save_posts_and_surfaces_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/projects/p1/interview-draft"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let store = HttpDraftStore::new(server.uri());
        let result = store.save("p1", &record("p1")).await;
        assert!(matches!(result, Err(StorageError::RemoteStatus(_))));
    }

    #[tokio::test]
    async fn clear_tolerates_missing_remote_draft() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/projects/p1/interview-draft"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let store = HttpDraftStore::new(server.uri());
        store.clear("p1").await.unwrap();
    }
}
