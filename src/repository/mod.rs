use std::sync::Arc;

use crate::models::{AppRecord, FavoritePolicy};
use crate::sources::{LocalCache, RemoteSource};
use crate::utils::{FetchFailure, SyncError};

/// Where the records of a successful sync came from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataOrigin {
    Remote,
    /// Stale cached copy served because the remote could not be used.
    Cache(FetchFailure),
}

#[derive(Debug, Clone)]
pub struct SyncReport {
    pub apps: Vec<AppRecord>,
    pub origin: DataOrigin,
}

impl SyncReport {
    pub fn is_stale(&self) -> bool {
        matches!(self.origin, DataOrigin::Cache(_))
    }
}

/// Offline-first access to the app catalogue.
///
/// Every `sync` tries the remote first. A non-empty answer fully replaces the
/// cache; an empty answer or a remote failure falls back to whatever the
/// cache holds. Store failures always propagate.
pub struct SyncRepository {
    remote: Arc<dyn RemoteSource>,
    cache: Arc<dyn LocalCache>,
    favorite_policy: FavoritePolicy,
}

impl SyncRepository {
    pub fn new(remote: Arc<dyn RemoteSource>, cache: Arc<dyn LocalCache>) -> Self {
        Self {
            remote,
            cache,
            favorite_policy: FavoritePolicy::default(),
        }
    }

    pub fn with_favorite_policy(mut self, policy: FavoritePolicy) -> Self {
        self.favorite_policy = policy;
        self
    }

    pub fn favorite_policy(&self) -> FavoritePolicy {
        self.favorite_policy
    }

    /// Fetch, cache and return the current catalogue, with its origin.
    pub async fn sync(&self) -> Result<SyncReport, SyncError> {
        let failure = match self.remote.fetch_all().await {
            Ok(records) if !records.is_empty() => {
                self.cache_apps(&records).await?;
                // Read back so merged favorite flags reach the caller.
                let apps = self.get_cached_apps().await?;
                log::info!("Sync: cached {} apps from remote", apps.len());
                return Ok(SyncReport {
                    apps,
                    origin: DataOrigin::Remote,
                });
            }
            Ok(_) => FetchFailure::EmptyUpstream,
            Err(e) => e.fetch_failure(),
        };

        let cached = self.get_cached_apps().await?;
        if cached.is_empty() {
            log::warn!("Sync: no data available ({})", failure);
            return Err(SyncError::NoDataAvailable(failure));
        }

        log::warn!("Sync: serving {} cached apps ({})", cached.len(), failure);
        Ok(SyncReport {
            apps: cached,
            origin: DataOrigin::Cache(failure),
        })
    }

    pub async fn get_apps(&self) -> Result<Vec<AppRecord>, SyncError> {
        self.sync().await.map(|report| report.apps)
    }

    /// Cache-only read; never touches the network.
    pub async fn get_cached_apps(&self) -> Result<Vec<AppRecord>, SyncError> {
        self.cache.read_all().await.map_err(store_failure)
    }

    pub async fn get_favorites(&self) -> Result<Vec<AppRecord>, SyncError> {
        self.cache.read_favorites().await.map_err(store_failure)
    }

    pub async fn cache_apps(&self, records: &[AppRecord]) -> Result<(), SyncError> {
        self.cache
            .replace_all(records, self.favorite_policy)
            .await
            .map_err(store_failure)
    }

    /// No-op when `id` is not cached.
    pub async fn toggle_favorite(&self, id: u64, is_favorite: bool) -> Result<(), SyncError> {
        self.cache
            .set_favorite(id, is_favorite)
            .await
            .map_err(store_failure)
    }
}

fn store_failure(e: crate::utils::AppError) -> SyncError {
    log::warn!("Cache operation failed: {}", e);
    SyncError::Store(e)
}
