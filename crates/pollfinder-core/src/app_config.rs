use std::path::PathBuf;

use crate::location_types::LocationTypes;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// The logging subset of the configuration. Needs no credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub env: Environment,
    pub log_level: String,
}

#[derive(Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub airtable_api_url: String,
    pub airtable_base_id: String,
    pub locations_table: String,
    pub airtable_token: String,
    pub paginate: bool,
    pub sort_by_tribal_land: bool,
    pub track_precinct_error: bool,
    pub location_types_path: Option<PathBuf>,
    pub location_types: LocationTypes,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub max_pages: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("airtable_api_url", &self.airtable_api_url)
            .field("airtable_base_id", &self.airtable_base_id)
            .field("locations_table", &self.locations_table)
            .field("airtable_token", &"[redacted]")
            .field("paginate", &self.paginate)
            .field("sort_by_tribal_land", &self.sort_by_tribal_land)
            .field("track_precinct_error", &self.track_precinct_error)
            .field("location_types_path", &self.location_types_path)
            .field("location_types", &self.location_types)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("max_pages", &self.max_pages)
            .finish()
    }
}
