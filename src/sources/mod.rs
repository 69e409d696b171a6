pub mod aptoide;
pub mod sqlite_cache;

use async_trait::async_trait;

use crate::models::{AppRecord, FavoritePolicy};
use crate::utils::AppResult;

pub use aptoide::AptoideSource;
pub use sqlite_cache::SqliteCache;

/// Fetches the full current catalogue. No pagination, no partial results.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    async fn fetch_all(&self) -> AppResult<Vec<AppRecord>>;
}

/// Durable store of the last known-good catalogue plus favorite flags.
///
/// `replace_all` and `set_favorite` must be mutually exclusive.
#[async_trait]
pub trait LocalCache: Send + Sync {
    async fn read_all(&self) -> AppResult<Vec<AppRecord>>;

    async fn read_favorites(&self) -> AppResult<Vec<AppRecord>>;

    /// Atomic clear-then-insert. Readers never see a mix of old and new rows.
    async fn replace_all(&self, records: &[AppRecord], policy: FavoritePolicy) -> AppResult<()>;

    /// Unknown ids are a no-op success.
    async fn set_favorite(&self, id: u64, is_favorite: bool) -> AppResult<()>;
}
