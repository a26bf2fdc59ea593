//! Decoding of TMDB catalog responses.

use serde::Deserialize;

use super::DecodeError;
use crate::catalog::{Catalog, Movie};

/// The only status code accepted as a catalog response.
pub const SUCCESS_STATUS: u16 = 200;

/// Catalog page as returned by the API.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RemoteCatalog {
    pub page: i64,
    pub total_pages: i64,
    pub results: Vec<RemoteMovie>,
}

/// Movie entry as returned by the API.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RemoteMovie {
    pub id: i64,
    pub title: String,
    pub poster_path: String,
}

/// Decode a response body, accepting only status 200.
///
/// Any other status fails with [`DecodeError::UnexpectedStatus`] without
/// looking at the body.
pub fn decode(body: &[u8], status: u16) -> Result<RemoteCatalog, DecodeError> {
    if status != SUCCESS_STATUS {
        return Err(DecodeError::UnexpectedStatus(status));
    }

    Ok(serde_json::from_slice(body)?)
}

impl From<RemoteMovie> for Movie {
    fn from(m: RemoteMovie) -> Self {
        Self {
            id: m.id,
            title: m.title,
            poster_path: m.poster_path,
        }
    }
}

impl From<RemoteCatalog> for Catalog {
    fn from(c: RemoteCatalog) -> Self {
        Self {
            page: c.page,
            total_pages: c.total_pages,
            movies: c.results.into_iter().map(Movie::from).collect(),
        }
    }
}
