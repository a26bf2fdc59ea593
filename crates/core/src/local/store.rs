//! The store contract every cache backend implements.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use super::{CachedCatalog, LocalCatalog};

/// Errors raised by a [`CatalogStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data exists but cannot be read back as a cached catalog.
    #[error("Corrupted cache: {0}")]
    Corrupted(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// The store can no longer accept operations.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Single-slot persistence for the cached catalog.
///
/// Operations on one instance execute in the order they were submitted.
/// `insert` replaces any existing record atomically: a concurrent `retrieve`
/// sees either the old record or the new one.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Remove the cached catalog. Succeeds when nothing is cached.
    async fn delete_cached_catalog(&self) -> Result<(), StoreError>;

    /// Replace the cached catalog.
    async fn insert(
        &self,
        catalog: &LocalCatalog,
        timestamp: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Read the cached catalog, `None` when nothing is cached.
    async fn retrieve(&self) -> Result<Option<CachedCatalog>, StoreError>;
}
