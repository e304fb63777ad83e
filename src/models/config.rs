use serde::Deserialize;
use thiserror::Error;
use validator::Validate;

use crate::domain::types::{RetentionWindow, TypeConstraintError};

/// Prefix of environment variables overriding configuration keys.
pub const ENV_PREFIX: &str = "SHELF_WATCH";

/// Configuration file looked up when none is given explicitly.
pub const DEFAULT_CONFIG_PATH: &str = "config/default";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
    #[error("invalid configuration: {0}")]
    Constraint(#[from] TypeConstraintError),
}

/// Application configuration.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AppConfig {
    /// Path of the SQLite database file.
    #[validate(length(min = 1))]
    pub database_url: String,
    /// Number of most recent runs kept after each scrape.
    #[validate(range(min = 1))]
    pub retention: usize,
    /// Whether a scrape with fewer than two runs still writes a comparison log row.
    pub log_degenerate_comparisons: bool,
    /// CSV export read by `run` when `--source` is not given.
    #[validate(length(min = 1))]
    pub source_path: String,
}

impl AppConfig {
    /// Loads defaults, then the optional file at `path`, then `SHELF_WATCH_*`
    /// environment variables, and validates the result.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .set_default("database_url", "scrape_data.db")?
            .set_default("retention", 10_i64)?
            .set_default("log_degenerate_comparisons", true)?
            .set_default("source_path", "products.csv")?
            .add_source(config::File::with_name(path.unwrap_or(DEFAULT_CONFIG_PATH)).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let app_config: AppConfig = settings.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    pub fn retention_window(&self) -> Result<RetentionWindow, TypeConstraintError> {
        RetentionWindow::new(self.retention)
    }
}
