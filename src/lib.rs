pub mod db;
pub mod models;
pub mod repository;
pub mod scheduler;
pub mod sources;
pub mod state;
pub mod utils;

#[cfg(test)]
mod test_support;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use db::Database;
use models::SyncSettings;
use repository::SyncRepository;
use scheduler::Notifier;
use sources::{AptoideSource, SqliteCache};
use state::ViewStateController;
use utils::{http_client, AppResult};

/// Install the `env_logger` backend. `RUST_LOG` wins over the `info` default.
/// Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// `<data dir>/appshelf/apps.db`, falling back to the working directory.
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("appshelf")
        .join("apps.db")
}

/// Explicitly constructed process-wide dependencies.
pub struct AppContext {
    pub db: Arc<Mutex<Database>>,
    pub settings: SyncSettings,
    pub repository: Arc<SyncRepository>,
    pub controller: Arc<ViewStateController>,
}

impl AppContext {
    /// Open (or create) the database at `db_path` and wire the sync layer
    /// against the configured catalogue.
    pub fn open(db_path: &Path) -> AppResult<Self> {
        let database = Database::new(db_path)?;
        let settings = database.load_settings();
        log::info!("Opened app cache at {}", db_path.display());

        let client = http_client::create_http_client(&settings)?;
        let remote = AptoideSource::new(client, &settings.catalogue_url)?;
        let db = Arc::new(Mutex::new(database));
        let repository = Arc::new(
            SyncRepository::new(Arc::new(remote), Arc::new(SqliteCache::new(db.clone())))
                .with_favorite_policy(settings.favorite_policy),
        );
        let controller = Arc::new(ViewStateController::new(repository.clone()));

        Ok(Self {
            db,
            settings,
            repository,
            controller,
        })
    }

    /// Start the periodic background refresh. Must be called inside a tokio runtime.
    pub fn start_background_refresh(&self, notifier: Arc<dyn Notifier>) -> JoinHandle<()> {
        scheduler::start_periodic_refresh(self.repository.clone(), self.db.clone(), notifier)
    }
}
