//! Layered settings: optional TOML file, then `QUERYKIT__*` environment overrides.

use config::{Config, Environment, File};
use querykit_cache::CacheConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// File loaded when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "querykit.toml";

/// Prefix for environment overrides, e.g. `QUERYKIT__CACHE__PREFIX=shop:api`.
pub const ENV_PREFIX: &str = "QUERYKIT";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryKitConfig {
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
}

/// Cache backend selection plus the backend-independent settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSettings {
    /// `local` or `redis`
    #[serde(default = "default_cache_backend")]
    pub backend: String,
    #[serde(flatten)]
    pub config: CacheConfig,
}

fn default_cache_backend() -> String {
    "local".into()
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: default_cache_backend(),
            config: CacheConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Limit applied when a request does not send one
    #[serde(default = "default_limit")]
    pub default_limit: u64,
    /// Upper bound for requested limits
    #[serde(default = "default_max_limit")]
    pub max_limit: u64,
}

fn default_limit() -> u64 {
    50
}

fn default_max_limit() -> u64 {
    1000
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

impl PaginationConfig {
    /// Resolve a requested limit: absent or unparsable values use the
    /// default, larger values are capped at the maximum.
    pub fn effective_limit(&self, requested: Option<&str>) -> u64 {
        requested
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(self.default_limit)
            .min(self.max_limit)
    }
}

impl QueryKitConfig {
    /// Load settings from `path` (or [`DEFAULT_CONFIG_FILE`]) when the file
    /// exists, apply environment overrides and validate the result.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut builder = Config::builder();
        if path.exists() {
            tracing::debug!(path = %path.display(), "loading config file");
            builder = builder.add_source(File::from(path));
        }
        // Environment variable overrides, e.g., QUERYKIT__PAGINATION__MAX_LIMIT=200
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .separator("__"),
        );

        let merged: QueryKitConfig = builder.build()?.try_deserialize()?;
        merged.validate()?;
        Ok(merged)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let backend = self.cache.backend.to_ascii_lowercase();
        if !["local", "redis"].contains(&backend.as_str()) {
            return Err(ConfigError::invalid("cache.backend must be one of local, redis"));
        }
        if self.cache.config.prefix.is_empty() {
            return Err(ConfigError::invalid("cache.prefix must not be empty"));
        }
        if self.cache.config.pool_size == 0 {
            return Err(ConfigError::invalid("cache.pool_size must be > 0"));
        }

        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(ConfigError::invalid(format!(
                "logging.level must be one of {valid_levels:?}"
            )));
        }

        if self.pagination.default_limit == 0 || self.pagination.max_limit == 0 {
            return Err(ConfigError::invalid("pagination limits must be > 0"));
        }
        if self.pagination.default_limit > self.pagination.max_limit {
            return Err(ConfigError::invalid(
                "pagination.default_limit must be <= pagination.max_limit",
            ));
        }
        Ok(())
    }
}
