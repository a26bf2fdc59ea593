//! Common test utilities for integration tests.
//!
//! Provides an in-process TMDB fixture server so the real `reqwest`
//! transport can be exercised without network access.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use tmdb_catalog_core::Catalog;

/// Re-export fixtures for test convenience
pub use tmdb_catalog_core::testing::fixtures;

/// API key the fixture server accepts.
pub const API_KEY: &str = "test-api-key";

/// Install a log subscriber honoring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Clone)]
struct ServerState {
    popular: Arc<Vec<u8>>,
    requests: Arc<AtomicUsize>,
}

/// Fake TMDB API listening on a random local port.
///
/// Routes:
/// - `GET /3/movie/popular`: the configured catalog, or 401 on a wrong key
/// - `GET /3/movie/broken`: 200 with a non-JSON body
/// - anything else: 404 with an empty body
pub struct FixtureServer {
    pub addr: SocketAddr,
    requests: Arc<AtomicUsize>,
    handle: JoinHandle<()>,
}

impl FixtureServer {
    /// Start a server that serves `catalog` as the popular movies page.
    pub async fn start(catalog: &Catalog) -> Self {
        let requests = Arc::new(AtomicUsize::new(0));
        let state = ServerState {
            popular: Arc::new(fixtures::catalog_json(catalog)),
            requests: Arc::clone(&requests),
        };

        let app = Router::new()
            .route("/3/movie/popular", get(popular))
            .route("/3/movie/broken", get(broken))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fixture server");
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            requests,
            handle,
        }
    }

    /// Base URL to configure the client with.
    pub fn base_url(&self) -> String {
        format!("http://{}/3", self.addr)
    }

    /// Number of requests that reached a known route.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl Drop for FixtureServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn popular(
    State(state): State<ServerState>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    state.requests.fetch_add(1, Ordering::SeqCst);

    if params.get("api_key").map(String::as_str) != Some(API_KEY) {
        return (StatusCode::UNAUTHORIZED, r#"{"status_code":7}"#.as_bytes().to_vec()).into_response();
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        state.popular.as_ref().clone(),
    )
        .into_response()
}

async fn broken(State(state): State<ServerState>) -> impl IntoResponse {
    state.requests.fetch_add(1, Ordering::SeqCst);
    (StatusCode::OK, "<html>maintenance</html>")
}
