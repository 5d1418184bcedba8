pub mod app_config;
pub mod config;
pub mod menu;
pub mod stations;

pub use app_config::{AppConfig, Environment, PeriodStrategy};
pub use config::{load_app_config, load_app_config_from_env};
pub use menu::{meal_rank, normalize_date, utc_timestamp, Meal, MenuDocument, MenuItem, MenuStation};
pub use stations::{load_station_overrides, StationOverride, StationOverrides};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read stations file {path}: {source}")]
    StationsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse stations file: {0}")]
    StationsFileParse(#[from] serde_yaml::Error),

    #[error("stations validation failed: {0}")]
    Validation(String),
}
