//! HTTP transport used by the remote loader.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use tracing::debug;

use super::{TmdbRequestBuilder, TransportError};
use crate::config::RemoteConfig;

/// Status code and body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a response.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Transport capability: issue a GET and return status plus body.
///
/// Implementations must not retry. Any failure to obtain a response is a
/// [`TransportError`]; every obtained response, whatever its status, is `Ok`.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// GET the given endpoint.
    async fn get(&self, endpoint: &str) -> Result<HttpResponse, TransportError>;
}

/// [`HttpClient`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
    requests: TmdbRequestBuilder,
}

impl ReqwestHttpClient {
    /// Create a client from an existing `reqwest` client and request builder.
    pub fn new(client: Client, requests: TmdbRequestBuilder) -> Self {
        Self { client, requests }
    }

    /// Create a client from remote configuration.
    pub fn from_config(config: &RemoteConfig) -> Result<Self, TransportError> {
        let requests = TmdbRequestBuilder::new(&config.base_url, &config.api_key)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_secs)))
            .build()?;

        Ok(Self::new(client, requests))
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, endpoint: &str) -> Result<HttpResponse, TransportError> {
        let request = self.requests.build(endpoint, Method::GET)?;

        debug!("GET {}", request.url().path());

        let response = self.client.execute(request).await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        debug!("Response: status={}, bytes={}", status, body.len());

        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::RequestBuilderError;

    #[test]
    fn test_from_config_rejects_missing_api_key() {
        let config = RemoteConfig {
            base_url: "https://api.themoviedb.org/3".to_string(),
            api_key: String::new(),
            timeout_secs: 30,
        };

        let result = ReqwestHttpClient::from_config(&config);
        assert!(matches!(
            result,
            Err(TransportError::InvalidRequest(RequestBuilderError::MissingApiKey))
        ));
    }

    #[tokio::test]
    async fn test_malformed_endpoint_is_transport_error() {
        let requests = TmdbRequestBuilder::new("http://127.0.0.1:9", "key").unwrap();
        let client = ReqwestHttpClient::new(Client::new(), requests);

        let result = client.get("/leading/slash").await;
        assert!(matches!(
            result,
            Err(TransportError::InvalidRequest(RequestBuilderError::MalformedUrl(_)))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        // Bind an ephemeral port and release it, so nothing is listening there.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let base_url = format!("http://127.0.0.1:{}", port);
        let requests = TmdbRequestBuilder::new(&base_url, "key").unwrap();
        let client = ReqwestHttpClient::new(
            Client::builder()
                .timeout(Duration::from_secs(2))
                .build()
                .unwrap(),
            requests,
        );

        let result = client.get("movie/popular").await;
        assert!(matches!(result, Err(TransportError::HttpError(_))));
    }
}
