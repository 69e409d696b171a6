use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::db::Database;
use crate::models::{RefreshComplete, SyncSettings};
use crate::repository::SyncRepository;
use crate::utils::{AppResult, SyncError};

pub const NOTIFICATION_TITLE: &str = "App catalogue";
pub const NOTIFICATION_BODY: &str = "New apps are available!";

/// Surfaces a user-visible alert after a background refresh.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, body: &str) -> AppResult<()>;
}

/// Notifier that only writes to the log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, body: &str) -> AppResult<()> {
        log::info!("Notification: {}: {}", title, body);
        Ok(())
    }
}

/// Run one refresh: sync the catalogue and notify when fresh data arrived.
pub async fn run_refresh_cycle(
    repository: &SyncRepository,
    notifier: &dyn Notifier,
    settings: &SyncSettings,
) -> Result<RefreshComplete, SyncError> {
    let start = std::time::Instant::now();
    let report = repository.sync().await?;
    let from_remote = !report.is_stale();

    if from_remote && settings.notify_on_refresh {
        match notifier.notify(NOTIFICATION_TITLE, NOTIFICATION_BODY) {
            Ok(_) => log::info!("Sent refresh notification ({} apps)", report.apps.len()),
            Err(e) => log::warn!("Failed to send notification: {}", e),
        }
    }

    Ok(RefreshComplete {
        app_count: report.apps.len(),
        from_remote,
        duration_ms: start.elapsed().as_millis() as u64,
        completed_at: chrono::Utc::now(),
    })
}

fn interval_from(settings: &SyncSettings) -> Duration {
    Duration::from_secs(u64::from(settings.refresh_interval_minutes.max(1)) * 60)
}

/// Spawn the periodic background refresh. Settings are re-read after every
/// cycle so interval changes apply without a restart.
pub fn start_periodic_refresh(
    repository: Arc<SyncRepository>,
    db: Arc<Mutex<Database>>,
    notifier: Arc<dyn Notifier>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut settings = db.lock().await.load_settings();
        let mut interval = interval_from(&settings);

        loop {
            tokio::time::sleep(interval).await;

            log::info!("Running periodic refresh...");
            match run_refresh_cycle(&repository, notifier.as_ref(), &settings).await {
                Ok(done) => log::info!(
                    "Periodic refresh finished: {} apps ({}) in {}ms",
                    done.app_count,
                    if done.from_remote { "remote" } else { "cache" },
                    done.duration_ms
                ),
                Err(e) => log::warn!("Periodic refresh failed: {}", e),
            }

            settings = db.lock().await.load_settings();
            let next = interval_from(&settings);
            if next != interval {
                log::info!(
                    "Refresh interval changed: {} min -> {} min",
                    interval.as_secs() / 60,
                    next.as_secs() / 60
                );
                interval = next;
            }
        }
    })
}
