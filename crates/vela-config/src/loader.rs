//! Configuration loader with layered sources.

use crate::AppConfig;
use config::{Config, ConfigError, Environment, File};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use vela_core::VelaError;

/// Configuration loader with runtime refresh support.
#[derive(Clone)]
pub struct ConfigLoader {
    config: Arc<RwLock<AppConfig>>,
    config_dir: String,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Local overrides (not committed)
    /// 4. Environment variables with `VELA_` prefix
    pub fn new(config_dir: impl Into<String>) -> Result<Self, VelaError> {
        let config_dir = config_dir.into();
        let config = Self::load_config(&config_dir)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_dir,
        })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, VelaError> {
        Self::new("./config")
    }

    /// Returns the current configuration.
    pub async fn get(&self) -> AppConfig {
        self.config.read().await.clone()
    }

    /// Reloads the configuration from disk.
    pub async fn reload(&self) -> Result<(), VelaError> {
        let new_config = Self::load_config(&self.config_dir)?;
        let mut config = self.config.write().await;
        *config = new_config;
        info!("Configuration reloaded successfully");
        Ok(())
    }

    /// Loads configuration from the specified directory.
    fn load_config(config_dir: &str) -> Result<AppConfig, VelaError> {
        // Load .env file if present
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment =
            std::env::var("VELA_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        // 1. Load default configuration
        let default_path = format!("{}/default.toml", config_dir);
        if Path::new(&default_path).exists() {
            debug!("Loading default config from: {}", default_path);
            builder = builder.add_source(File::with_name(&default_path).required(false));
        }

        // 2. Load environment-specific configuration
        let env_path = format!("{}/{}.toml", config_dir, environment);
        if Path::new(&env_path).exists() {
            debug!("Loading environment config from: {}", env_path);
            builder = builder.add_source(File::with_name(&env_path).required(false));
        }

        // 3. Load local overrides (not committed to version control)
        let local_path = format!("{}/local.toml", config_dir);
        if Path::new(&local_path).exists() {
            debug!("Loading local config from: {}", local_path);
            builder = builder.add_source(File::with_name(&local_path).required(false));
        }

        // 4. Override with environment variables (VELA_ prefix)
        builder = builder.add_source(
            Environment::with_prefix("VELA")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_error_to_vela_error)?;

        let app_config: AppConfig = config
            .try_deserialize()
            .map_err(config_error_to_vela_error)?;

        Self::validate_config(&app_config)?;

        Ok(app_config)
    }

    /// Validates the configuration.
    fn validate_config(config: &AppConfig) -> Result<(), VelaError> {
        if config.cache.enabled && config.cache.capacity == 0 {
            return Err(VelaError::configuration(
                "Cache capacity must be greater than zero",
            ));
        }

        if config.redis.enabled && config.redis.url.is_empty() {
            return Err(VelaError::configuration(
                "Redis URL is required when Redis is enabled",
            ));
        }

        Ok(())
    }

    /// Gets a specific configuration value by key path.
    pub async fn get_value<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let config = self.config.read().await;
        let json = serde_json::to_value(&*config).ok()?;

        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }

        serde_json::from_value(current.clone()).ok()
    }
}

fn config_error_to_vela_error(err: ConfigError) -> VelaError {
    VelaError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CacheConfig, RedisConfig};

    #[tokio::test]
    async fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.app.name, "vela");
        assert!(config.cache.enabled);
        assert!(!config.redis.enabled);
    }

    #[tokio::test]
    async fn test_loads_defaults_without_config_files() {
        let loader = ConfigLoader::new("./no-such-config-dir").unwrap();
        let config = loader.get().await;
        assert_eq!(config.cache.ttl_secs, 35);

        let ttl: Option<u64> = loader.get_value("cache.ttl_secs").await;
        assert_eq!(ttl, Some(35));
        let missing: Option<u64> = loader.get_value("cache.no_such_key").await;
        assert_eq!(missing, None);
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let config = AppConfig {
            cache: CacheConfig {
                capacity: 0,
                ..CacheConfig::default()
            },
            ..AppConfig::default()
        };
        let result = ConfigLoader::validate_config(&config);
        assert!(matches!(result, Err(VelaError::Configuration(_))));
    }

    #[test]
    fn test_validate_rejects_enabled_redis_without_url() {
        let config = AppConfig {
            redis: RedisConfig {
                enabled: true,
                url: String::new(),
                ..RedisConfig::default()
            },
            ..AppConfig::default()
        };
        let result = ConfigLoader::validate_config(&config);
        assert!(matches!(result, Err(VelaError::Configuration(_))));
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(ConfigLoader::validate_config(&AppConfig::default()).is_ok());
    }
}
