pub mod catalog;
pub mod config;
pub mod liveness;
pub mod local;
pub mod metrics;
pub mod remote;
pub mod testing;

pub use catalog::{Catalog, CatalogLoader, Movie};
pub use config::{
    load_config, load_config_from_str, validate_config, CacheConfig, Config, ConfigError,
    RemoteConfig, SanitizedConfig, StoreBackend,
};
pub use liveness::{Liveness, LivenessProbe};
pub use local::{
    create_catalog_store, create_local_loader, CachePolicy, CachedCatalog, CatalogStore,
    FileCatalogStore, LocalCatalog, LocalCatalogLoader, LocalMovie, SqliteCatalogStore,
    StoreError,
};
pub use remote::{
    DecodeError, HttpClient, HttpResponse, RemoteCatalogLoader, RemoteError, ReqwestHttpClient,
    RequestBuilderError, TmdbRequestBuilder, TransportError,
};
