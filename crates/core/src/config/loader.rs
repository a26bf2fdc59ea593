use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;
use tracing::debug;

use super::{types::Config, ConfigError, SanitizedConfig};

/// Prefix of environment variables that override file settings.
///
/// Nested keys are separated by a double underscore, e.g.
/// `TMDB_CATALOG_REMOTE__API_KEY`.
pub const ENV_PREFIX: &str = "TMDB_CATALOG_";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    debug!(
        "Loaded configuration from {}: {:?}",
        path.display(),
        SanitizedConfig::from(&config)
    );

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreBackend;
    use figment::Jail;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[remote]
api_key = "secret"

[cache]
backend = "sqlite"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.remote.api_key, "secret");
        assert_eq!(config.cache.backend, StoreBackend::Sqlite);
    }

    #[test]
    fn test_load_config_from_str_missing_remote() {
        let toml = r#"
[cache]
path = "catalog.json"
"#;
        let result = load_config_from_str(toml);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[remote]
api_key = "from-file"
timeout_secs = 10

[cache]
path = "/tmp/catalog.json"
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.remote.api_key, "from-file");
        assert_eq!(config.remote.timeout_secs, 10);
        assert_eq!(config.cache.path.to_string_lossy(), "/tmp/catalog.json");
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
[remote]
api_key = "from-file"

[cache]
purge_on_retrieve_failure = false
"#,
            )?;
            jail.set_env("TMDB_CATALOG_REMOTE__API_KEY", "from-env");
            jail.set_env("TMDB_CATALOG_CACHE__PURGE_ON_RETRIEVE_FAILURE", "true");

            let config = load_config(Path::new("config.toml")).map_err(|e| e.to_string())?;
            assert_eq!(config.remote.api_key, "from-env");
            assert!(config.cache.purge_on_retrieve_failure);
            Ok(())
        });
    }
}
