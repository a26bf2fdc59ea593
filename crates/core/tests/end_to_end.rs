//! End-to-end tests: real HTTP transport against a local fixture server,
//! feeding the local cache.

mod common;

use std::net::TcpListener;
use std::sync::Arc;

use tempfile::TempDir;

use tmdb_catalog_core::{
    create_local_loader, load_config_from_str, validate_config, CacheConfig, Catalog,
    DecodeError, RemoteCatalogLoader, RemoteError, ReqwestHttpClient, StoreBackend,
};

use common::{fixtures, init_tracing, FixtureServer, API_KEY};

fn remote_loader(base_url: &str, api_key: &str) -> RemoteCatalogLoader {
    let toml = format!(
        r#"
[remote]
base_url = "{}"
api_key = "{}"
timeout_secs = 5
"#,
        base_url, api_key
    );
    let config = load_config_from_str(&toml).unwrap();
    validate_config(&config).unwrap();

    let client = ReqwestHttpClient::from_config(&config.remote).unwrap();
    RemoteCatalogLoader::new(Arc::new(client))
}

#[tokio::test]
async fn test_remote_load_delivers_catalog() {
    init_tracing();
    let expected = fixtures::catalog(3);
    let server = FixtureServer::start(&expected).await;
    let loader = remote_loader(&server.base_url(), API_KEY);

    let catalog = loader.load("movie/popular").await.unwrap();

    assert_eq!(catalog, expected);
    assert_eq!(server.request_count(), 1);
}

#[tokio::test]
async fn test_remote_load_404_is_invalid_data() {
    init_tracing();
    let server = FixtureServer::start(&fixtures::catalog(1)).await;
    let loader = remote_loader(&server.base_url(), API_KEY);

    let result = loader.load("movie/unknown").await;

    assert!(matches!(
        result,
        Err(RemoteError::InvalidData(DecodeError::UnexpectedStatus(404)))
    ));
}

#[tokio::test]
async fn test_remote_load_wrong_key_is_invalid_data() {
    init_tracing();
    let server = FixtureServer::start(&fixtures::catalog(1)).await;
    let loader = remote_loader(&server.base_url(), "wrong-key");

    let result = loader.load("movie/popular").await;

    assert!(matches!(
        result,
        Err(RemoteError::InvalidData(DecodeError::UnexpectedStatus(401)))
    ));
}

#[tokio::test]
async fn test_remote_load_non_json_is_invalid_data() {
    init_tracing();
    let server = FixtureServer::start(&fixtures::catalog(1)).await;
    let loader = remote_loader(&server.base_url(), API_KEY);

    let result = loader.load("movie/broken").await;

    assert!(matches!(
        result,
        Err(RemoteError::InvalidData(DecodeError::Malformed(_)))
    ));
}

#[tokio::test]
async fn test_remote_load_without_server_is_connectivity() {
    init_tracing();
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let loader = remote_loader(&format!("http://127.0.0.1:{}/3", port), API_KEY);

    let result = loader.load("movie/popular").await;

    assert!(matches!(result, Err(RemoteError::Connectivity(_))));
}

#[tokio::test]
async fn test_remote_catalog_survives_restart_through_cache() {
    init_tracing();
    let expected = fixtures::catalog(6);
    let server = FixtureServer::start(&expected).await;
    let temp_dir = TempDir::new().unwrap();

    for (backend, file) in [
        (StoreBackend::File, "catalog.json"),
        (StoreBackend::Sqlite, "catalog.db"),
    ] {
        let cache = CacheConfig {
            backend,
            path: temp_dir.path().join(file),
            purge_on_retrieve_failure: false,
        };

        let remote = remote_loader(&server.base_url(), API_KEY);
        let catalog = remote.load("movie/popular").await.unwrap();
        create_local_loader(&cache).unwrap().save(&catalog).await.unwrap();

        // A new loader over a new store instance stands in for a restart.
        let offline = create_local_loader(&cache).unwrap().load().await.unwrap();
        assert_eq!(offline, expected, "backend {:?}", backend);
        assert_ne!(offline, Catalog::empty());
    }
}

#[tokio::test]
async fn test_remote_load_with_delivers_through_real_transport() {
    init_tracing();
    let expected = fixtures::catalog(2);
    let server = FixtureServer::start(&expected).await;
    let loader = remote_loader(&server.base_url(), API_KEY);

    let (tx, rx) = tokio::sync::oneshot::channel();
    loader.load_with("movie/popular", move |result| {
        let _ = tx.send(result);
    });

    assert_eq!(rx.await.unwrap().unwrap(), expected);
}
