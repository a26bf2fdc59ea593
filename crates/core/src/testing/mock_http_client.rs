//! Mock HTTP transport for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::Gate;
use crate::remote::{HttpClient, HttpResponse, TransportError};

/// Mock implementation of the HttpClient trait.
///
/// Provides controllable behavior for testing:
/// - Return scripted responses or transport errors, in order
/// - Track requested endpoints for assertions
/// - Hold requests in flight with [`pause`](Self::pause)
///
/// A request with nothing scripted fails with [`TransportError::NoResponse`].
#[derive(Debug, Clone)]
pub struct MockHttpClient {
    /// Scripted outcomes, consumed front to back.
    outcomes: Arc<RwLock<VecDeque<Result<HttpResponse, TransportError>>>>,
    /// Requested endpoints.
    requests: Arc<RwLock<Vec<String>>>,
    gate: Gate,
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHttpClient {
    /// Create a new mock client with nothing scripted.
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(RwLock::new(VecDeque::new())),
            requests: Arc::new(RwLock::new(Vec::new())),
            gate: Gate::new(),
        }
    }

    /// Queue a response.
    pub async fn push_response(&self, response: HttpResponse) {
        self.outcomes.write().await.push_back(Ok(response));
    }

    /// Queue a transport failure.
    pub async fn push_error(&self, error: TransportError) {
        self.outcomes.write().await.push_back(Err(error));
    }

    /// Get all requested endpoints.
    pub async fn requested_endpoints(&self) -> Vec<String> {
        self.requests.read().await.clone()
    }

    /// Hold subsequent requests until [`resume`](Self::resume).
    pub fn pause(&self) {
        self.gate.pause();
    }

    /// Release held requests.
    pub fn resume(&self) {
        self.gate.resume();
    }

    /// Wait until at least `count` requests are being held.
    pub async fn wait_for_pending(&self, count: usize) {
        self.gate.wait_for_pending(count).await;
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, endpoint: &str) -> Result<HttpResponse, TransportError> {
        self.requests.write().await.push(endpoint.to_string());
        self.gate.pass().await;

        self.outcomes
            .write()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::NoResponse("nothing scripted".to_string())))
    }
}
