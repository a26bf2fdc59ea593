//! Cache-backed catalog loader.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{CachePolicy, CatalogStore, LocalCatalog, StoreError};
use crate::catalog::{Catalog, CatalogLoader};
use crate::liveness::{Liveness, LivenessProbe};
use crate::metrics;

/// Source of the current time.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Everything a spawned operation needs; cloned into each task.
#[derive(Clone)]
struct Core {
    store: Arc<dyn CatalogStore>,
    clock: Clock,
    purge_on_retrieve_failure: bool,
}

/// Saves, loads and validates the cached catalog on top of a [`CatalogStore`].
///
/// The loader holds no cache state of its own. Completions of the spawned
/// forms (`save_with`, `load_with`, `spawn_validate_cache`) are suppressed
/// once the loader is dropped, and so are any store operations they have
/// not issued yet.
pub struct LocalCatalogLoader {
    core: Core,
    liveness: Liveness,
}

impl LocalCatalogLoader {
    /// Create a loader using the system clock.
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            core: Core {
                store,
                clock: Arc::new(Utc::now),
                purge_on_retrieve_failure: false,
            },
            liveness: Liveness::new(),
        }
    }

    /// Replace the clock used to timestamp saves and check expiry.
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.core.clock = Arc::new(clock);
        self
    }

    /// Delete the cached catalog when `load` fails to read it.
    pub fn with_purge_on_retrieve_failure(mut self, purge: bool) -> Self {
        self.core.purge_on_retrieve_failure = purge;
        self
    }

    /// Replace the cached catalog, timestamped with the current clock.
    ///
    /// The existing entry is deleted first. If that fails the error is
    /// returned and nothing is inserted.
    pub async fn save(&self, catalog: &Catalog) -> Result<(), StoreError> {
        self.core.save(&LocalCatalog::from(catalog), None).await
    }

    /// Load the cached catalog.
    ///
    /// Returns [`Catalog::empty`] when nothing is cached or the cached entry
    /// has expired. An expired entry is left in place.
    pub async fn load(&self) -> Result<Catalog, StoreError> {
        self.core.load(None).await
    }

    /// Delete the cached catalog if it is expired or unreadable.
    ///
    /// Never reports an outcome.
    pub async fn validate_cache(&self) {
        self.core.validate(None).await
    }

    /// Save in a background task and hand the result to `completion`.
    pub fn save_with<F>(&self, catalog: &Catalog, completion: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<(), StoreError>) + Send + 'static,
    {
        let core = self.core.clone();
        let probe = self.liveness.probe();
        let local = LocalCatalog::from(catalog);

        tokio::spawn(async move {
            let result = core.save(&local, Some(&probe)).await;
            if !probe.deliver(|| completion(result)) {
                debug!("Local loader dropped, discarding save result");
            }
        })
    }

    /// Load in a background task and hand the result to `completion`.
    pub fn load_with<F>(&self, completion: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<Catalog, StoreError>) + Send + 'static,
    {
        let core = self.core.clone();
        let probe = self.liveness.probe();

        tokio::spawn(async move {
            let result = core.load(Some(&probe)).await;
            if !probe.deliver(|| completion(result)) {
                debug!("Local loader dropped, discarding load result");
            }
        })
    }

    /// Run [`validate_cache`](Self::validate_cache) in a background task.
    pub fn spawn_validate_cache(&self) -> JoinHandle<()> {
        let core = self.core.clone();
        let probe = self.liveness.probe();

        tokio::spawn(async move { core.validate(Some(&probe)).await })
    }
}

#[async_trait]
impl CatalogLoader for LocalCatalogLoader {
    type Error = StoreError;

    async fn load(&self) -> Result<Catalog, StoreError> {
        LocalCatalogLoader::load(self).await
    }
}

/// Whether a follow-up store operation may still be issued.
fn still_owned(probe: Option<&LivenessProbe>) -> bool {
    probe.map_or(true, LivenessProbe::is_alive)
}

impl Core {
    async fn save(
        &self,
        catalog: &LocalCatalog,
        probe: Option<&LivenessProbe>,
    ) -> Result<(), StoreError> {
        if let Err(e) = self.store.delete_cached_catalog().await {
            warn!("Failed to delete cached catalog before save: {}", e);
            metrics::CACHE_SAVES.with_label_values(&["delete_error"]).inc();
            return Err(e);
        }

        if !still_owned(probe) {
            debug!("Local loader dropped after delete, skipping insert");
            return Ok(());
        }

        let timestamp = (self.clock)();
        match self.store.insert(catalog, timestamp).await {
            Ok(()) => {
                debug!(
                    "Cached catalog page {} with {} movies at {}",
                    catalog.page,
                    catalog.movies.len(),
                    timestamp
                );
                metrics::CACHE_SAVES.with_label_values(&["success"]).inc();
                Ok(())
            }
            Err(e) => {
                warn!("Failed to insert catalog into cache: {}", e);
                metrics::CACHE_SAVES.with_label_values(&["insert_error"]).inc();
                Err(e)
            }
        }
    }

    async fn load(&self, probe: Option<&LivenessProbe>) -> Result<Catalog, StoreError> {
        let cached = match self.store.retrieve().await {
            Ok(cached) => cached,
            Err(e) => {
                warn!("Failed to read cached catalog: {}", e);
                metrics::CACHE_LOADS.with_label_values(&["error"]).inc();
                if self.purge_on_retrieve_failure && still_owned(probe) {
                    self.purge("unreadable").await;
                }
                return Err(e);
            }
        };

        let Some(cached) = cached else {
            debug!("Catalog cache is empty");
            metrics::CACHE_LOADS.with_label_values(&["miss"]).inc();
            return Ok(Catalog::empty());
        };

        if !CachePolicy::is_valid(cached.timestamp, (self.clock)()) {
            debug!("Cached catalog from {} has expired", cached.timestamp);
            metrics::CACHE_LOADS.with_label_values(&["expired"]).inc();
            return Ok(Catalog::empty());
        }

        debug!(
            "Catalog cache hit: page {} with {} movies",
            cached.catalog.page,
            cached.catalog.movies.len()
        );
        metrics::CACHE_LOADS.with_label_values(&["hit"]).inc();
        Ok(cached.catalog.into())
    }

    async fn validate(&self, probe: Option<&LivenessProbe>) {
        let reason = match self.store.retrieve().await {
            Err(e) => {
                warn!("Cached catalog is unreadable: {}", e);
                "unreadable"
            }
            Ok(None) => {
                metrics::CACHE_VALIDATIONS.with_label_values(&["empty"]).inc();
                return;
            }
            Ok(Some(cached)) if CachePolicy::is_valid(cached.timestamp, (self.clock)()) => {
                metrics::CACHE_VALIDATIONS.with_label_values(&["kept"]).inc();
                return;
            }
            Ok(Some(cached)) => {
                debug!("Cached catalog from {} has expired", cached.timestamp);
                "expired"
            }
        };

        if !still_owned(probe) {
            debug!("Local loader dropped, skipping cache purge");
            return;
        }

        metrics::CACHE_VALIDATIONS.with_label_values(&[reason]).inc();
        self.purge(reason).await;
    }

    /// Best-effort delete; the outcome is only logged.
    async fn purge(&self, reason: &str) {
        match self.store.delete_cached_catalog().await {
            Ok(()) => info!("Purged {} catalog cache", reason),
            Err(e) => warn!("Failed to purge {} catalog cache: {}", reason, e),
        }
    }
}
