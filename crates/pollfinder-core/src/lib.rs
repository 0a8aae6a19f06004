pub mod app_config;
pub mod config;
pub mod location_types;
pub mod types;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, LogConfig};
pub use config::{
    load_app_config_from_env, load_location_types_from_env,
    load_log_config_from_env,
};
pub use location_types::{LocationType, LocationTypeKey, LocationTypes};
pub use types::{FetchStatus, LocationRecord, Point, Precinct};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read location types file {path}: {source}")]
    LocationTypesIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse location types file {path}: {source}")]
    LocationTypesParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}
