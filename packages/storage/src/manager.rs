// ABOUTME: Reconciling draft manager over the local cache and the remote store
// ABOUTME: Writes local synchronously, replicates remotely best-effort, and reconciles by recency on load

use std::sync::Arc;

use chrono::Utc;
use specloom_core::{DraftRecord, InterviewState};
use tracing::{info, warn};

use crate::error::Result;
use crate::store::DraftStore;

/// Composes the local cache and the optional remote store into one draft
/// persistence surface.
///
/// Saves stamp `saved_at`, complete on the local store before returning, and
/// replicate to the remote store without blocking the turn. Loads read both
/// stores, keep the newer copy, and write it back to the losing store so the
/// two converge.
pub struct DraftManager {
    local: Arc<dyn DraftStore>,
    remote: Option<Arc<dyn DraftStore>>,
}

impl DraftManager {
    pub fn new(local: Arc<dyn DraftStore>, remote: Option<Arc<dyn DraftStore>>) -> Self {
        Self { local, remote }
    }

    /// Persist the state. The local write must succeed; the remote write is
    /// fire-and-forget. Returns the stamped record so the caller can carry
    /// the new `saved_at` forward.
    pub async fn save(&self, state: &InterviewState) -> Result<DraftRecord> {
        let saved_at = Utc::now();
        let mut state = state.clone();
        state.saved_at = Some(saved_at);

        let record = DraftRecord { state, saved_at };
        let project_id = record.state.project_id.clone();

        self.local.save(&project_id, &record).await?;

        if let Some(remote) = &self.remote {
            let remote = Arc::clone(remote);
            let record = record.clone();
            tokio::spawn(async move {
                if let Err(e) = remote.save(&record.state.project_id, &record).await {
                    // Local-only is an acceptable degraded state.
                    warn!(
                        "Remote draft save failed for project {}: {}",
                        record.state.project_id, e
                    );
                }
            });
        }

        Ok(record)
    }

    /// Load the draft for a project, reconciling the two stores by recency.
    ///
    /// A store that fails to read is treated as having no draft. When both
    /// stores hold a copy, the strictly newer `saved_at` wins and the remote
    /// copy wins ties; the winner is written back to the losing store.
    pub async fn load(&self, project_id: &str) -> Option<DraftRecord> {
        let local = match self.local.load(project_id).await {
            Ok(record) => record,
            Err(e) => {
                warn!("Local draft load failed for project {}: {}", project_id, e);
                None
            }
        };

        let remote = match &self.remote {
            Some(store) => match store.load(project_id).await {
                Ok(record) => record,
                Err(e) => {
                    warn!("Remote draft load failed for project {}: {}", project_id, e);
                    None
                }
            },
            None => None,
        };

        match (local, remote) {
            (None, None) => None,
            (Some(local), None) => Some(local),
            (None, Some(remote)) => {
                self.backfill(&*self.local, project_id, &remote).await;
                Some(remote)
            }
            (Some(local), Some(remote)) => {
                if local.saved_at > remote.saved_at {
                    info!(
                        "Local draft is newer for project {}, backfilling remote",
                        project_id
                    );
                    if let Some(store) = &self.remote {
                        self.backfill(&**store, project_id, &local).await;
                    }
                    Some(local)
                } else {
                    self.backfill(&*self.local, project_id, &remote).await;
                    Some(remote)
                }
            }
        }
    }

    /// Clear the draft from both stores. The local clear must succeed; a
    /// failed remote clear is logged and left to eventual consistency.
    pub async fn clear(&self, project_id: &str) -> Result<()> {
        self.local.clear(project_id).await?;

        if let Some(remote) = &self.remote {
            if let Err(e) = remote.clear(project_id).await {
                warn!(
                    "Remote draft clear failed for project {}: {}",
                    project_id, e
                );
            }
        }

        Ok(())
    }

    async fn backfill(&self, store: &dyn DraftStore, project_id: &str, record: &DraftRecord) {
        if let Err(e) = store.save(project_id, record).await {
            warn!("Draft backfill failed for project {}: {}", project_id, e);
        }
    }
}
