use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, Notify};

use crate::db::Database;
use crate::models::{AppRecord, FavoritePolicy};
use crate::sources::{LocalCache, RemoteSource, SqliteCache};
use crate::utils::{AppError, AppResult};

/// Record with a developer name, the fields the search filter looks at.
pub fn app(id: u64, name: &str, developer: &str) -> AppRecord {
    let mut record = AppRecord::new(id, name, format!("com.{}.app{}", developer.to_lowercase().replace(' ', ""), id));
    record.developer_name = Some(developer.to_string());
    record
}

pub fn memory_cache() -> SqliteCache {
    SqliteCache::new(Arc::new(AsyncMutex::new(
        Database::open_in_memory().expect("in-memory database"),
    )))
}

#[derive(Clone)]
pub enum StubResponse {
    Apps(Vec<AppRecord>),
    Transport,
    Upstream,
}

/// Remote that answers with a scripted response and counts calls.
pub struct StubRemote {
    response: Mutex<StubResponse>,
    calls: Mutex<usize>,
}

impl StubRemote {
    pub fn new(response: StubResponse) -> Arc<Self> {
        Arc::new(Self {
            response: Mutex::new(response),
            calls: Mutex::new(0),
        })
    }

    pub fn set(&self, response: StubResponse) {
        *self.response.lock().unwrap() = response;
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl RemoteSource for StubRemote {
    async fn fetch_all(&self) -> AppResult<Vec<AppRecord>> {
        *self.calls.lock().unwrap() += 1;
        match self.response.lock().unwrap().clone() {
            StubResponse::Apps(apps) => Ok(apps),
            StubResponse::Transport => Err(AppError::Transport("dns lookup failed".into())),
            StubResponse::Upstream => Err(AppError::Upstream("status 500".into())),
        }
    }
}

/// Remote whose next responses are released one by one by the test.
pub struct GatedRemote {
    responses: Mutex<Vec<(Arc<Notify>, Vec<AppRecord>)>>,
}

impl GatedRemote {
    /// Responses are handed out in call order.
    pub fn new(responses: Vec<(Arc<Notify>, Vec<AppRecord>)>) -> Arc<Self> {
        let mut responses = responses;
        responses.reverse();
        Arc::new(Self {
            responses: Mutex::new(responses),
        })
    }
}

#[async_trait]
impl RemoteSource for GatedRemote {
    async fn fetch_all(&self) -> AppResult<Vec<AppRecord>> {
        let next = self.responses.lock().unwrap().pop();
        match next {
            Some((gate, apps)) => {
                gate.notified().await;
                Ok(apps)
            }
            None => Err(AppError::Transport("no scripted response".into())),
        }
    }
}

/// Cache where every operation fails.
pub struct FailingCache;

#[async_trait]
impl LocalCache for FailingCache {
    async fn read_all(&self) -> AppResult<Vec<AppRecord>> {
        Err(AppError::Custom("disk I/O error".into()))
    }

    async fn read_favorites(&self) -> AppResult<Vec<AppRecord>> {
        Err(AppError::Custom("disk I/O error".into()))
    }

    async fn replace_all(&self, _records: &[AppRecord], _policy: FavoritePolicy) -> AppResult<()> {
        Err(AppError::Custom("disk I/O error".into()))
    }

    async fn set_favorite(&self, _id: u64, _is_favorite: bool) -> AppResult<()> {
        Err(AppError::Custom("disk I/O error".into()))
    }
}

/// Wraps a real cache; `set_favorite` waits for `release` and can be told to fail.
pub struct GatedFavoriteCache {
    pub inner: SqliteCache,
    pub release: Arc<Notify>,
    pub fail: bool,
}

impl GatedFavoriteCache {
    pub fn new(inner: SqliteCache, fail: bool) -> Arc<Self> {
        Arc::new(Self {
            inner,
            release: Arc::new(Notify::new()),
            fail,
        })
    }
}

#[async_trait]
impl LocalCache for GatedFavoriteCache {
    async fn read_all(&self) -> AppResult<Vec<AppRecord>> {
        self.inner.read_all().await
    }

    async fn read_favorites(&self) -> AppResult<Vec<AppRecord>> {
        self.inner.read_favorites().await
    }

    async fn replace_all(&self, records: &[AppRecord], policy: FavoritePolicy) -> AppResult<()> {
        self.inner.replace_all(records, policy).await
    }

    async fn set_favorite(&self, id: u64, is_favorite: bool) -> AppResult<()> {
        self.release.notified().await;
        if self.fail {
            return Err(AppError::Custom("database is locked".into()));
        }
        self.inner.set_favorite(id, is_favorite).await
    }
}

/// Wraps a real cache and fails every operation while `failing` is set.
pub struct FlakyCache {
    inner: SqliteCache,
    failing: std::sync::atomic::AtomicBool,
}

impl FlakyCache {
    pub fn new(inner: SqliteCache) -> Arc<Self> {
        Arc::new(Self {
            inner,
            failing: std::sync::atomic::AtomicBool::new(false),
        })
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing
            .store(failing, std::sync::atomic::Ordering::SeqCst);
    }

    fn check(&self) -> AppResult<()> {
        if self.failing.load(std::sync::atomic::Ordering::SeqCst) {
            Err(AppError::Custom("database disk image is malformed".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl LocalCache for FlakyCache {
    async fn read_all(&self) -> AppResult<Vec<AppRecord>> {
        self.check()?;
        self.inner.read_all().await
    }

    async fn read_favorites(&self) -> AppResult<Vec<AppRecord>> {
        self.check()?;
        self.inner.read_favorites().await
    }

    async fn replace_all(&self, records: &[AppRecord], policy: FavoritePolicy) -> AppResult<()> {
        self.check()?;
        self.inner.replace_all(records, policy).await
    }

    async fn set_favorite(&self, id: u64, is_favorite: bool) -> AppResult<()> {
        self.check()?;
        self.inner.set_favorite(id, is_favorite).await
    }
}

/// Wraps a real cache; once armed, the next `read_all` reads, signals `reached`,
/// then waits for `release` before answering (with an error if armed to fail).
pub struct GatedReadCache {
    pub inner: SqliteCache,
    pub reached: Arc<Notify>,
    pub release: Arc<Notify>,
    armed: Mutex<Option<bool>>,
}

impl GatedReadCache {
    pub fn new(inner: SqliteCache) -> Arc<Self> {
        Arc::new(Self {
            inner,
            reached: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
            armed: Mutex::new(None),
        })
    }

    pub fn arm(&self, fail: bool) {
        *self.armed.lock().unwrap() = Some(fail);
    }
}

#[async_trait]
impl LocalCache for GatedReadCache {
    async fn read_all(&self) -> AppResult<Vec<AppRecord>> {
        let apps = self.inner.read_all().await?;
        let armed = self.armed.lock().unwrap().take();
        if let Some(fail) = armed {
            self.reached.notify_one();
            self.release.notified().await;
            if fail {
                return Err(AppError::Custom("disk I/O error".into()));
            }
        }
        Ok(apps)
    }

    async fn read_favorites(&self) -> AppResult<Vec<AppRecord>> {
        self.inner.read_favorites().await
    }

    async fn replace_all(&self, records: &[AppRecord], policy: FavoritePolicy) -> AppResult<()> {
        self.inner.replace_all(records, policy).await
    }

    async fn set_favorite(&self, id: u64, is_favorite: bool) -> AppResult<()> {
        self.inner.set_favorite(id, is_favorite).await
    }
}
