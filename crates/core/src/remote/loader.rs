//! Loader that fetches and decodes a catalog page.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{decode, HttpClient, RemoteError};
use crate::catalog::Catalog;
use crate::liveness::Liveness;
use crate::metrics;

/// Fetches catalog pages through an [`HttpClient`].
///
/// Not `Clone`: the loader owns the liveness token that gates completions
/// of [`load_with`](Self::load_with).
pub struct RemoteCatalogLoader {
    client: Arc<dyn HttpClient>,
    liveness: Liveness,
}

impl RemoteCatalogLoader {
    /// Create a loader on top of the given transport.
    pub fn new(client: Arc<dyn HttpClient>) -> Self {
        Self {
            client,
            liveness: Liveness::new(),
        }
    }

    /// Load the catalog page at `endpoint`.
    ///
    /// Dropping the returned future abandons the request.
    pub async fn load(&self, endpoint: &str) -> Result<Catalog, RemoteError> {
        fetch(self.client.as_ref(), endpoint).await
    }

    /// Load in a background task and hand the result to `completion`.
    ///
    /// `completion` runs at most once. It does not run if this loader is
    /// dropped before the transport returns.
    pub fn load_with<F>(&self, endpoint: &str, completion: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<Catalog, RemoteError>) + Send + 'static,
    {
        let client = Arc::clone(&self.client);
        let probe = self.liveness.probe();
        let endpoint = endpoint.to_string();

        tokio::spawn(async move {
            let result = fetch(client.as_ref(), &endpoint).await;
            if !probe.deliver(|| completion(result)) {
                debug!("Remote loader dropped, discarding result for {}", endpoint);
            }
        })
    }
}

async fn fetch(client: &dyn HttpClient, endpoint: &str) -> Result<Catalog, RemoteError> {
    let timer = metrics::REMOTE_LOAD_DURATION.start_timer();
    let result = fetch_inner(client, endpoint).await;
    timer.observe_duration();

    match &result {
        Ok(catalog) => {
            debug!(
                "Loaded catalog page {}/{} with {} movies",
                catalog.page,
                catalog.total_pages,
                catalog.movies.len()
            );
            metrics::REMOTE_LOADS.with_label_values(&["success"]).inc();
        }
        Err(e) => {
            warn!("Remote catalog load failed for {}: {}", endpoint, e);
            metrics::REMOTE_LOADS.with_label_values(&[e.kind()]).inc();
        }
    }

    result
}

async fn fetch_inner(client: &dyn HttpClient, endpoint: &str) -> Result<Catalog, RemoteError> {
    let response = client.get(endpoint).await?;
    let remote = decode(&response.body, response.status)?;
    Ok(remote.into())
}
