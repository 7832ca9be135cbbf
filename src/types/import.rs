use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A leaf node of an external bookmark tree (browser JSON export shape).
/// `date_added` is microseconds since the UNIX epoch in that format; a leaf
/// without one falls back to the import time rather than the epoch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportLeaf {
    pub uri: String,
    #[serde(default)]
    pub title: String,
    pub icon_uri: Option<String>,
    pub date_added: Option<i64>,
}

/// Lifecycle notifications emitted while an import runs. Hosts subscribe via
/// [`ImportObserver`](crate::services::import_transformer::ImportObserver).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ImportEvent {
    ImportStarted { job_id: Uuid },
    ImportProgress { job_id: Uuid, created: u64 },
    ImportFinished { job_id: Uuid, created: u64, skipped: u64 },
    ImportFailed { job_id: Uuid, error: String },
}

/// A tree node the walk could not interpret as a leaf or a folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedNode {
    /// Node title, when one was present.
    pub title: Option<String>,
    pub reason: String,
}

/// Outcome of one import run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub job_id: Uuid,
    /// Bookmarks committed to the store.
    pub created: u64,
    /// Malformed nodes skipped with a recorded warning.
    pub skipped: Vec<SkippedNode>,
    /// True when the walk stopped early because the host cancelled it.
    /// Bookmarks committed before the cancel stay committed.
    pub cancelled: bool,
}
