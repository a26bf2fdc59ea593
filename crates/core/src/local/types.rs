//! Cache-local representation of the catalog.
//!
//! Stores only ever see these types. Keeping them apart from the domain
//! types lets the persisted schema stay stable when the domain model grows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Movie};

/// Catalog page as held by a store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LocalCatalog {
    pub page: i64,
    pub total_pages: i64,
    pub movies: Vec<LocalMovie>,
}

/// Movie as held by a store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LocalMovie {
    pub id: i64,
    pub title: String,
    pub poster_path: String,
}

/// The single record a store holds: a catalog and when it was cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedCatalog {
    pub catalog: LocalCatalog,
    pub timestamp: DateTime<Utc>,
}

impl CachedCatalog {
    /// Create a cached record.
    pub fn new(catalog: LocalCatalog, timestamp: DateTime<Utc>) -> Self {
        Self { catalog, timestamp }
    }
}

impl From<&Movie> for LocalMovie {
    fn from(m: &Movie) -> Self {
        Self {
            id: m.id,
            title: m.title.clone(),
            poster_path: m.poster_path.clone(),
        }
    }
}

impl From<&Catalog> for LocalCatalog {
    fn from(c: &Catalog) -> Self {
        Self {
            page: c.page,
            total_pages: c.total_pages,
            movies: c.movies.iter().map(LocalMovie::from).collect(),
        }
    }
}

impl From<LocalMovie> for Movie {
    fn from(m: LocalMovie) -> Self {
        Self {
            id: m.id,
            title: m.title,
            poster_path: m.poster_path,
        }
    }
}

impl From<LocalCatalog> for Catalog {
    fn from(c: LocalCatalog) -> Self {
        Self {
            page: c.page,
            total_pages: c.total_pages,
            movies: c.movies.into_iter().map(Movie::from).collect(),
        }
    }
}
