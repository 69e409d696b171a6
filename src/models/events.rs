use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one background refresh cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshComplete {
    pub app_count: usize,
    /// False when the cycle fell back to cached data.
    pub from_remote: bool,
    pub duration_ms: u64,
    pub completed_at: DateTime<Utc>,
}
