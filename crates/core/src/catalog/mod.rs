//! Domain model for a page of the movie catalog.
//!
//! Both the remote pipeline and the local cache produce these types; the
//! wire and cache representations live in their own modules.

mod types;

pub use types::*;

use async_trait::async_trait;

/// Something that can produce a catalog without further input.
///
/// The application shell depends on this trait instead of a concrete
/// loader, so the cache-backed loader can be swapped for a fake in UI tests.
#[async_trait]
pub trait CatalogLoader: Send + Sync {
    /// Error produced when no catalog could be loaded.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the catalog.
    async fn load(&self) -> Result<Catalog, Self::Error>;
}
