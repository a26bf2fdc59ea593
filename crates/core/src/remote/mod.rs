//! Remote catalog pipeline.
//!
//! Fetches a catalog page from the TMDB API, validates the status code,
//! decodes the body and maps every failure to a [`RemoteError`].

mod client;
mod decoder;
mod loader;
mod request;

pub use client::{HttpClient, HttpResponse, ReqwestHttpClient};
pub use decoder::{decode, RemoteCatalog, RemoteMovie, SUCCESS_STATUS};
pub use loader::RemoteCatalogLoader;
pub use request::{TmdbRequestBuilder, DEFAULT_BASE_URL};

use thiserror::Error;

/// Errors raised while building a request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestBuilderError {
    /// Base URL is empty or cannot serve as a base for endpoints.
    #[error("Invalid or missing base URL: {0}")]
    InvalidOrMissingBaseUrl(String),

    /// API key is empty.
    #[error("API key is required")]
    MissingApiKey,

    /// Endpoint cannot be joined into a valid URL.
    #[error("Malformed endpoint: {0:?}")]
    MalformedUrl(String),
}

/// Errors raised by an [`HttpClient`] when no response was obtained.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be constructed.
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] RequestBuilderError),

    /// HTTP request failed (network, TLS, timeout, body read).
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Transport produced no usable response.
    #[error("No response: {0}")]
    NoResponse(String),
}

/// Errors raised while decoding a response.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Status code was not 200; the body was not inspected.
    #[error("Unexpected status code: {0}")]
    UnexpectedStatus(u16),

    /// Body did not match the catalog schema.
    #[error("Malformed catalog payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Errors returned by [`RemoteCatalogLoader::load`].
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Transport failed or returned no data.
    #[error("Connectivity error: {0}")]
    Connectivity(#[from] TransportError),

    /// Non-200 status, or a 200 with an undecodable payload.
    #[error("Invalid data: {0}")]
    InvalidData(#[from] DecodeError),
}

impl RemoteError {
    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RemoteError::Connectivity(_) => "connectivity",
            RemoteError::InvalidData(_) => "invalid_data",
        }
    }
}
