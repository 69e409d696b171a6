use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;

use super::filter::filter_apps;
use super::view_state::{UiError, ViewState};
use crate::models::AppRecord;
use crate::repository::SyncRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchMode {
    Initial,
    Refresh,
}

#[derive(Debug, Clone, Copy)]
struct PendingFavorite {
    value: bool,
    token: u64,
    /// Generation current when the write landed. Loads of that generation or
    /// older may have read the cache before it, so they still get the overlay.
    persisted_at: Option<u64>,
}

impl PendingFavorite {
    fn covers(&self, generation: u64) -> bool {
        self.persisted_at.map_or(true, |at| generation <= at)
    }
}

struct Inner {
    view: ViewState,
    /// Bumped by every load/refresh; completions of older generations are dropped.
    generation: u64,
    /// Optimistic favorite flips, by app id, kept until no load can predate them.
    pending_favorites: HashMap<u64, PendingFavorite>,
    next_token: u64,
}

impl Inner {
    /// Overlay flips onto records read by a load of `generation`.
    fn apply_pending(&self, apps: &mut [AppRecord], generation: u64) {
        for app in apps.iter_mut() {
            if let Some(pending) = self.pending_favorites.get(&app.id) {
                if pending.covers(generation) {
                    app.is_favorite = pending.value;
                }
            }
        }
    }

    /// Drop persisted flips that every load from `generation` on already sees.
    fn prune_pending(&mut self, generation: u64) {
        self.pending_favorites.retain(|_, p| p.covers(generation));
    }

    fn recompute(&mut self) {
        let view = &mut self.view;
        view.filtered_apps = filter_apps(&view.apps, &view.search_query, view.show_favorites_only);
        if let Some(id) = view.selected_app.as_ref().map(|a| a.id) {
            view.selected_app = view.apps.iter().find(|a| a.id == id).cloned();
        }
    }
}

/// Single owner of the app list view state.
///
/// Every mutation goes through one mutex and is published to watchers as a
/// full snapshot. The mutex is never held across an await.
pub struct ViewStateController {
    repository: Arc<SyncRepository>,
    inner: Mutex<Inner>,
    tx: watch::Sender<ViewState>,
}

impl ViewStateController {
    pub fn new(repository: Arc<SyncRepository>) -> Self {
        let (tx, _rx) = watch::channel(ViewState::default());
        Self {
            repository,
            inner: Mutex::new(Inner {
                view: ViewState::default(),
                generation: 0,
                pending_favorites: HashMap::new(),
                next_token: 0,
            }),
            tx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> ViewState {
        self.tx.borrow().clone()
    }

    fn update<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> R {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let result = f(&mut *inner);
        inner.recompute();
        let view = &inner.view;
        self.tx.send_if_modified(|published| {
            if *published == *view {
                false
            } else {
                *published = view.clone();
                true
            }
        });
        result
    }

    /// First load: shows the loading indicator and clears any previous error.
    pub async fn load(&self) {
        self.fetch(FetchMode::Initial).await
    }

    /// Pull-to-refresh: keeps the current list visible while fetching.
    pub async fn refresh(&self) {
        self.fetch(FetchMode::Refresh).await
    }

    pub async fn retry(&self) {
        self.load().await
    }

    async fn fetch(&self, mode: FetchMode) {
        let generation = self.update(|inner| {
            inner.generation += 1;
            match mode {
                FetchMode::Initial => inner.view.is_loading = true,
                FetchMode::Refresh => inner.view.is_refreshing = true,
            }
            inner.view.error = None;
            inner.generation
        });

        let result = self.repository.sync().await;

        self.update(|inner| {
            if inner.generation != generation {
                log::debug!(
                    "Discarding {:?} result of generation {} (current {})",
                    mode,
                    generation,
                    inner.generation
                );
                return;
            }
            inner.view.is_loading = false;
            inner.view.is_refreshing = false;
            match result {
                Ok(report) => {
                    let stale = report.is_stale();
                    let mut apps = report.apps;
                    inner.apply_pending(&mut apps, generation);
                    inner.prune_pending(generation);
                    inner.view.apps = apps;
                    inner.view.stale = stale;
                    inner.view.error = None;
                }
                Err(e) => {
                    log::warn!("Loading apps failed ({:?}): {}", mode, e);
                    inner.view.error = Some(UiError::from(&e));
                }
            }
        });
    }

    /// Offline fast path: show the cached catalogue until a load finishes.
    pub async fn restore_from_cache(&self) {
        let generation = self.update(|inner| inner.generation);
        let cached = self.repository.get_cached_apps().await;

        self.update(|inner| {
            if inner.generation != generation {
                log::debug!("Discarding cache restore superseded by a newer load");
                return;
            }
            match cached {
                Ok(mut apps) => {
                    if inner.view.apps.is_empty() && !apps.is_empty() {
                        inner.apply_pending(&mut apps, generation);
                        log::info!("Restored {} apps from cache", apps.len());
                        inner.view.apps = apps;
                        inner.view.stale = true;
                    }
                }
                Err(e) => {
                    log::warn!("Restoring apps from cache failed: {}", e);
                    inner.view.error = Some(UiError::from(&e));
                }
            }
        });
    }

    pub fn set_search_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.update(|inner| inner.view.search_query = query);
    }

    pub fn set_favorites_only(&self, favorites_only: bool) {
        self.update(|inner| inner.view.show_favorites_only = favorites_only);
    }

    pub fn toggle_favorites_filter(&self) {
        self.update(|inner| inner.view.show_favorites_only = !inner.view.show_favorites_only);
    }

    pub fn select_app(&self, id: u64) {
        self.update(|inner| inner.view.selected_app = inner.view.find(id).cloned());
    }

    pub fn clear_selection(&self) {
        self.update(|inner| inner.view.selected_app = None);
    }

    pub fn clear_error(&self) {
        self.update(|inner| inner.view.error = None);
    }

    /// Flip the favorite flag in state right away, then persist it.
    ///
    /// If persisting fails and no newer toggle of the same app happened in the
    /// meantime, the flip is rolled back and a storage error is shown.
    pub async fn toggle_favorite(&self, id: u64) {
        let flipped = self.update(|inner| {
            let app = match inner.view.apps.iter_mut().find(|a| a.id == id) {
                Some(app) => app,
                None => return None,
            };
            app.is_favorite = !app.is_favorite;
            let value = app.is_favorite;
            inner.next_token += 1;
            let token = inner.next_token;
            inner
                .pending_favorites
                .insert(id, PendingFavorite { value, token, persisted_at: None });
            Some((value, token))
        });

        let Some((value, token)) = flipped else {
            log::debug!("Favorite toggle for unknown app {} ignored", id);
            return;
        };

        let result = self.repository.toggle_favorite(id, value).await;

        self.update(|inner| {
            let is_latest = inner
                .pending_favorites
                .get(&id)
                .is_some_and(|p| p.token == token);
            if is_latest {
                if result.is_ok() {
                    let generation = inner.generation;
                    if let Some(pending) = inner.pending_favorites.get_mut(&id) {
                        pending.persisted_at = Some(generation);
                    }
                } else {
                    inner.pending_favorites.remove(&id);
                }
            }

            if let Err(e) = result {
                log::warn!("Persisting favorite for app {} failed: {}", id, e);
                if is_latest {
                    if let Some(app) = inner.view.apps.iter_mut().find(|a| a.id == id) {
                        if app.is_favorite == value {
                            app.is_favorite = !value;
                            log::info!("Rolled back favorite flag of app {}", id);
                        }
                    }
                }
                inner.view.error = Some(UiError::from(&e));
            }
        });
    }
}
