use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::LocalCache;
use crate::db::Database;
use crate::models::{AppRecord, FavoritePolicy};
use crate::utils::AppResult;

/// `LocalCache` backed by the app database. The database mutex serializes
/// full replaces against single-flag updates.
#[derive(Clone)]
pub struct SqliteCache {
    db: Arc<Mutex<Database>>,
}

impl SqliteCache {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LocalCache for SqliteCache {
    async fn read_all(&self) -> AppResult<Vec<AppRecord>> {
        let db = self.db.lock().await;
        db.get_all_apps()
    }

    async fn read_favorites(&self) -> AppResult<Vec<AppRecord>> {
        let db = self.db.lock().await;
        db.get_favorite_apps()
    }

    async fn replace_all(&self, records: &[AppRecord], policy: FavoritePolicy) -> AppResult<()> {
        let db = self.db.lock().await;
        let stored = db.replace_all_apps(records, policy)?;
        log::debug!("Cache replaced with {} apps", stored);
        Ok(())
    }

    async fn set_favorite(&self, id: u64, is_favorite: bool) -> AppResult<()> {
        let db = self.db.lock().await;
        if !db.set_favorite(id, is_favorite)? {
            log::debug!("Favorite update for unknown app {} ignored", id);
        }
        Ok(())
    }
}
