use serde::Serialize;

use crate::models::AppRecord;
use crate::utils::{FetchFailure, SyncError};

/// Error kinds the list screen renders distinct messages for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum UiError {
    Network,
    Server,
    Storage,
    Unknown(String),
}

impl From<&SyncError> for UiError {
    fn from(err: &SyncError) -> Self {
        match err {
            SyncError::NoDataAvailable(FetchFailure::Transport(_)) => UiError::Network,
            SyncError::NoDataAvailable(FetchFailure::Upstream(_))
            | SyncError::NoDataAvailable(FetchFailure::EmptyUpstream) => UiError::Server,
            SyncError::NoDataAvailable(FetchFailure::Other(msg)) => UiError::Unknown(msg.clone()),
            SyncError::Store(_) => UiError::Storage,
        }
    }
}

/// Snapshot of everything the list and detail screens render.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub apps: Vec<AppRecord>,
    pub filtered_apps: Vec<AppRecord>,
    pub selected_app: Option<AppRecord>,
    pub is_loading: bool,
    pub is_refreshing: bool,
    pub search_query: String,
    pub show_favorites_only: bool,
    pub error: Option<UiError>,
    /// Last successful load was served from the offline cache.
    pub stale: bool,
}

impl ViewState {
    pub fn find(&self, id: u64) -> Option<&AppRecord> {
        self.apps.iter().find(|a| a.id == id)
    }
}
