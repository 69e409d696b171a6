use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{0}")]
    Custom(String),
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Why the remote catalogue could not be used for a sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum FetchFailure {
    /// Remote answered successfully but with no records.
    EmptyUpstream,
    /// Connectivity, DNS or timeout problem.
    Transport(String),
    /// Remote answered with an error status or an undecodable payload.
    Upstream(String),
    Other(String),
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchFailure::EmptyUpstream => write!(f, "remote catalogue was empty"),
            FetchFailure::Transport(msg) => write!(f, "transport failure: {}", msg),
            FetchFailure::Upstream(msg) => write!(f, "upstream failure: {}", msg),
            FetchFailure::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl AppError {
    /// Classify an error reported by a remote source.
    pub fn fetch_failure(&self) -> FetchFailure {
        let msg = self.to_string();
        match self {
            AppError::Network(e) if e.is_status() || e.is_decode() => FetchFailure::Upstream(msg),
            AppError::Network(_) | AppError::Transport(_) | AppError::Io(_) => {
                FetchFailure::Transport(msg)
            }
            AppError::Upstream(_) | AppError::Json(_) => FetchFailure::Upstream(msg),
            _ => FetchFailure::Other(msg),
        }
    }
}

/// Failures surfaced by the sync repository.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("No data available ({0})")]
    NoDataAvailable(FetchFailure),

    #[error("Store failure: {0}")]
    Store(#[source] AppError),
}
