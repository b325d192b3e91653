//! Configuration for querykit services.
//!
//! Two layers are offered:
//! - [`env`]: one-off typed reads of environment variables with fallbacks
//! - [`QueryKitConfig`]: a structured settings tree loaded from an optional
//!   TOML file with `QUERYKIT__SECTION__KEY` environment overrides

pub mod env;
pub mod error;
pub mod settings;

pub use env::{get_bool, get_date, get_duration, get_int, get_string, load_dotenv};
pub use error::ConfigError;
pub use settings::{
    CacheSettings, DEFAULT_CONFIG_FILE, ENV_PREFIX, LoggingConfig, PaginationConfig,
    QueryKitConfig,
};
