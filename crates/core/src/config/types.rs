use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::remote::DEFAULT_BASE_URL;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub remote: RemoteConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// TMDB API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoteConfig {
    /// API base URL (default: "https://api.themoviedb.org/3")
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// TMDB API key
    pub api_key: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u32 {
    30
}

/// Local catalog cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Cache file (JSON) or database (SQLite) path
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,
    /// Delete the cache when loading it fails
    #[serde(default)]
    pub purge_on_retrieve_failure: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: default_cache_path(),
            purge_on_retrieve_failure: false,
        }
    }
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("catalog-cache.json")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    File,
    Sqlite,
}

/// Sanitized config for logging (API key redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub remote: SanitizedRemoteConfig,
    pub cache: CacheConfig,
}

/// Sanitized remote config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedRemoteConfig {
    pub base_url: String,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            remote: SanitizedRemoteConfig {
                base_url: config.remote.base_url.clone(),
                api_key_configured: !config.remote.api_key.is_empty(),
                timeout_secs: config.remote.timeout_secs,
            },
            cache: config.cache.clone(),
        }
    }
}
