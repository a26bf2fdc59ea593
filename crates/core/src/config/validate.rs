use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - API key is not empty
/// - Request timeout is not 0
/// - Cache path is not empty
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Remote validation
    if config.remote.api_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "remote.api_key cannot be empty".to_string(),
        ));
    }

    if config.remote.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "remote.timeout_secs cannot be 0".to_string(),
        ));
    }

    // Cache validation
    if config.cache.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "cache.path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CacheConfig, RemoteConfig};
    use std::path::PathBuf;

    fn valid_config() -> Config {
        Config {
            remote: RemoteConfig {
                base_url: "https://api.themoviedb.org/3".to_string(),
                api_key: "secret".to_string(),
                timeout_secs: 30,
            },
            cache: CacheConfig::default(),
        }
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_empty_api_key_fails() {
        let mut config = valid_config();
        config.remote.api_key = "  ".to_string();
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_zero_timeout_fails() {
        let mut config = valid_config();
        config.remote.timeout_secs = 0;
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_empty_cache_path_fails() {
        let mut config = valid_config();
        config.cache.path = PathBuf::new();
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
