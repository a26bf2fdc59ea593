//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the transport and store
//! traits, so both loaders can be exercised without network or disk.
//!
//! # Example
//!
//! ```rust,ignore
//! use tmdb_catalog_core::testing::{fixtures, MockCatalogStore, StoreMessage};
//! use tmdb_catalog_core::LocalCatalogLoader;
//!
//! let store = MockCatalogStore::new();
//! let loader = LocalCatalogLoader::new(Arc::new(store.clone()));
//!
//! loader.save(&fixtures::catalog(3)).await?;
//! assert_eq!(store.messages().await[0], StoreMessage::Delete);
//! ```

mod mock_catalog_store;
mod mock_http_client;

pub use mock_catalog_store::{MockCatalogStore, StoreMessage};
pub use mock_http_client::MockHttpClient;

use std::sync::Arc;
use tokio::sync::watch;

/// Holds operations in flight while paused and counts how many are waiting.
#[derive(Debug, Clone)]
struct Gate {
    paused: Arc<watch::Sender<bool>>,
    pending: Arc<watch::Sender<usize>>,
}

impl Gate {
    fn new() -> Self {
        Self {
            paused: Arc::new(watch::channel(false).0),
            pending: Arc::new(watch::channel(0).0),
        }
    }

    fn pause(&self) {
        self.paused.send_replace(true);
    }

    fn resume(&self) {
        self.paused.send_replace(false);
    }

    /// Wait here until the gate is open.
    async fn pass(&self) {
        self.pending.send_modify(|n| *n += 1);
        let _ = self.paused.subscribe().wait_for(|paused| !*paused).await;
        self.pending.send_modify(|n| *n -= 1);
    }

    async fn wait_for_pending(&self, count: usize) {
        let _ = self.pending.subscribe().wait_for(|n| *n >= count).await;
    }
}

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::{Catalog, Movie};
    use crate::local::LocalCatalog;

    /// Create a test movie with reasonable defaults.
    pub fn movie(id: i64) -> Movie {
        Movie::new(id, format!("Movie {}", id), format!("/poster-{}.jpg", id))
    }

    /// Create a first catalog page holding `movies` movies.
    pub fn catalog(movies: u32) -> Catalog {
        Catalog::new(1, 42, (1..=i64::from(movies)).map(movie).collect())
    }

    /// Same as [`catalog`], in its cached representation.
    pub fn local_catalog(movies: u32) -> LocalCatalog {
        LocalCatalog::from(&catalog(movies))
    }

    /// Encode a catalog the way the TMDB API returns it.
    pub fn catalog_json(catalog: &Catalog) -> Vec<u8> {
        let results: Vec<serde_json::Value> = catalog
            .movies
            .iter()
            .map(|m| {
                serde_json::json!({
                    "id": m.id,
                    "title": m.title,
                    "poster_path": m.poster_path,
                    "adult": false,
                    "vote_average": 7.5,
                })
            })
            .collect();

        serde_json::json!({
            "page": catalog.page,
            "total_pages": catalog.total_pages,
            "total_results": catalog.movies.len(),
            "results": results,
        })
        .to_string()
        .into_bytes()
    }
}
