use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::api::{FetchError, MenuSource};
use crate::models::MenuItem;

use super::{MenuStore, PersistenceError, StoreError, TARGET_VERSION};

/// Where the items in a snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOrigin {
    /// Local store was already populated; no network access happened.
    Cache,
    /// Fetched just now; persistence runs in the background.
    Remote,
    /// Fetch failed; whatever the local store holds (usually nothing).
    Stale,
}

/// The initial menu shown at screen mount.
#[derive(Debug)]
pub struct MenuSnapshot {
    pub items: Vec<MenuItem>,
    pub origin: SnapshotOrigin,
    /// Set when `origin` is `Stale`.
    pub fetch_error: Option<FetchError>,
    /// Set when `origin` is `Remote`.
    pub persistence: Option<PersistenceTask>,
}

/// Background write of a freshly fetched menu into the local store.
#[derive(Debug)]
pub struct PersistenceTask {
    handle: JoinHandle<Result<usize, PersistenceError>>,
}

impl PersistenceTask {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the write to finish. Returns the number of rows stored.
    pub async fn wait(self) -> Result<usize, PersistenceError> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) => Err(PersistenceError(StoreError::Task(e))),
        }
    }
}

/// Decides whether the local store is ready and fills it from the remote
/// source when it is not.
pub struct CacheLoader {
    store: MenuStore,
    source: Arc<dyn MenuSource>,
}

impl CacheLoader {
    pub fn new(store: MenuStore, source: Arc<dyn MenuSource>) -> Self {
        Self { store, source }
    }

    /// Produce the initial menu snapshot.
    ///
    /// A ready store is read directly. Otherwise the remote menu is fetched
    /// once and returned straight away while a spawned task writes it to the
    /// store and advances the version marker. A failed fetch is not an
    /// error: the snapshot carries the store's current rows and the cause.
    /// An empty menu counts as a failed fetch, so the store stays unready
    /// and the next launch tries again. Only failures reading the store
    /// itself are returned as `Err`.
    pub async fn ensure_menu_loaded(&self) -> Result<MenuSnapshot, StoreError> {
        let version = self.store.version().await?;
        if version >= TARGET_VERSION {
            let items = self.store.all_items().await?;
            debug!(version, items = items.len(), "Serving menu from local store");
            return Ok(MenuSnapshot {
                items,
                origin: SnapshotOrigin::Cache,
                fetch_error: None,
                persistence: None,
            });
        }

        info!(version, target = TARGET_VERSION, "Menu cache not ready, fetching");
        let fetched = self.source.fetch_menu().await.and_then(|items| {
            if items.is_empty() {
                Err(FetchError::InvalidResponse(
                    "Menu document has no dishes".to_string(),
                ))
            } else {
                Ok(items)
            }
        });

        match fetched {
            Ok(items) => {
                let persistence = self.spawn_persist(items.clone());
                Ok(MenuSnapshot {
                    items,
                    origin: SnapshotOrigin::Remote,
                    fetch_error: None,
                    persistence: Some(persistence),
                })
            }
            Err(e) => {
                warn!(error = %e, "Menu fetch failed, serving local rows");
                let items = self.store.all_items().await?;
                Ok(MenuSnapshot {
                    items,
                    origin: SnapshotOrigin::Stale,
                    fetch_error: Some(e),
                    persistence: None,
                })
            }
        }
    }

    fn spawn_persist(&self, items: Vec<MenuItem>) -> PersistenceTask {
        let store = self.store.clone();
        let handle = tokio::spawn(async move {
            match store.replace_all(items).await {
                Ok(rows) => {
                    info!(rows, version = TARGET_VERSION, "Menu cache populated");
                    Ok(rows)
                }
                Err(e) => {
                    error!(error = %e, "Failed to persist menu, next launch will fetch again");
                    Err(PersistenceError(e))
                }
            }
        });
        PersistenceTask { handle }
    }
}
