//! Single-slot local cache for the catalog.

mod file_store;
mod loader;
mod policy;
mod sqlite_store;
mod store;
mod types;

pub use file_store::*;
pub use loader::*;
pub use policy::*;
pub use sqlite_store::*;
pub use store::*;
pub use types::*;

use std::sync::Arc;

use crate::config::{CacheConfig, StoreBackend};

/// Factory function to create a catalog store from config.
///
/// The file backend spawns its worker, so this must run inside a tokio
/// runtime.
pub fn create_catalog_store(config: &CacheConfig) -> Result<Arc<dyn CatalogStore>, StoreError> {
    match config.backend {
        StoreBackend::File => Ok(Arc::new(FileCatalogStore::spawn(config.path.clone()))),
        StoreBackend::Sqlite => Ok(Arc::new(SqliteCatalogStore::new(&config.path)?)),
    }
}

/// Create a [`LocalCatalogLoader`] with the store and options from config.
pub fn create_local_loader(config: &CacheConfig) -> Result<LocalCatalogLoader, StoreError> {
    let store = create_catalog_store(config)?;
    Ok(LocalCatalogLoader::new(store)
        .with_purge_on_retrieve_failure(config.purge_on_retrieve_failure))
}
