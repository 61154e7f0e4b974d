// ABOUTME: Draft store contract shared by the local cache and the remote store
// ABOUTME: Load, save, and clear persisted interview drafts keyed by project id

use async_trait::async_trait;
use specloom_core::DraftRecord;

use crate::error::Result;

/// A store holding at most one draft per project.
///
/// Two implementations exist with different availability guarantees: the
/// sqlite local cache and the remote HTTP store. The reconciling manager
/// treats them uniformly through this trait.
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Load the draft for a project, `None` when the store has none.
    async fn load(&self, project_id: &str) -> Result<Option<DraftRecord>>;

    /// Save the draft for a project, replacing any prior copy.
    async fn save(&self, project_id: &str, record: &DraftRecord) -> Result<()>;

    /// Remove the draft for a project. Clearing an absent draft is not an
    /// error.
    async fn clear(&self, project_id: &str) -> Result<()>;
}
