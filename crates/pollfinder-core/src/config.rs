use std::path::{Path, PathBuf};

use crate::app_config::{AppConfig, Environment, LogConfig};
use crate::location_types::LocationTypes;
use crate::ConfigError;

pub const DEFAULT_AIRTABLE_API_URL: &str = "https://api.airtable.com/v0";
pub const DEFAULT_AIRTABLE_BASE_ID: &str = "appT1HFWoS3zL6giD";

/// Load application configuration from environment variables already in the process.
///
/// Does NOT load `.env` files; binaries call `dotenvy::dotenv()` first.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Load the logging settings alone from the process environment.
///
/// Does not load `.env` files and does not require the Airtable credentials.
///
/// # Errors
///
/// Returns `ConfigError` if `POLLFINDER_ENV` is not a known environment.
pub fn load_log_config_from_env() -> Result<LogConfig, ConfigError> {
    build_log_config(&|key: &str| std::env::var(key))
}

/// Load the location-type table alone from the process environment.
///
/// Reads `POLLFINDER_LOCATION_TYPES_PATH` and `POLLFINDER_RAW_TYPE_KEYS`;
/// does not load `.env` files and does not require the Airtable credentials.
///
/// # Errors
///
/// Returns `ConfigError` if the types file cannot be read or parsed, or the
/// raw-keys flag is not a boolean.
pub fn load_location_types_from_env() -> Result<LocationTypes, ConfigError> {
    build_location_types(&|key: &str| std::env::var(key)).map(|(_, types)| types)
}

fn build_log_config<F>(lookup: &F) -> Result<LogConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let env = parse_environment(
        &lookup("POLLFINDER_ENV").unwrap_or_else(|_| "development".to_string()),
    )?;
    let log_level = lookup("POLLFINDER_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    Ok(LogConfig { env, log_level })
}

/// The types table and the path it came from, if any.
fn build_location_types<F>(lookup: &F) -> Result<(Option<PathBuf>, LocationTypes), ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let raw_type_keys = parse_bool(
        "POLLFINDER_RAW_TYPE_KEYS",
        &lookup("POLLFINDER_RAW_TYPE_KEYS").unwrap_or_else(|_| "false".to_string()),
    )?;

    let path = lookup("POLLFINDER_LOCATION_TYPES_PATH")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from);
    let types = match &path {
        Some(path) => load_location_types(path)?,
        None => LocationTypes::default(),
    }
    .with_raw_keys(raw_type_keys);

    Ok((path, types))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_flag = |var: &str, default: &str| -> Result<bool, ConfigError> {
        parse_bool(var, &or_default(var, default))
    };

    let airtable_token = require("POLLFINDER_AIRTABLE_TOKEN")?;
    let locations_table = require("POLLFINDER_LOCATIONS_TABLE")?;

    let LogConfig { env, log_level } = build_log_config(&lookup)?;
    let airtable_api_url = or_default("POLLFINDER_AIRTABLE_API_URL", DEFAULT_AIRTABLE_API_URL);
    let airtable_base_id = or_default("POLLFINDER_AIRTABLE_BASE_ID", DEFAULT_AIRTABLE_BASE_ID);

    let paginate = parse_flag("POLLFINDER_PAGINATE", "true")?;
    let sort_by_tribal_land = parse_flag("POLLFINDER_SORT_TRIBAL_LAND", "false")?;
    let track_precinct_error = parse_flag("POLLFINDER_TRACK_PRECINCT_ERROR", "true")?;
    let (location_types_path, location_types) = build_location_types(&lookup)?;

    let request_timeout_secs = parse_u64("POLLFINDER_REQUEST_TIMEOUT_SECS", "30")?;
    let max_retries = parse_u32("POLLFINDER_MAX_RETRIES", "3")?;
    let retry_backoff_base_ms = parse_u64("POLLFINDER_RETRY_BACKOFF_BASE_MS", "500")?;
    let max_pages = parse_usize("POLLFINDER_MAX_PAGES", "100")?;
    if max_pages == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "POLLFINDER_MAX_PAGES".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        log_level,
        airtable_api_url,
        airtable_base_id,
        locations_table,
        airtable_token,
        paginate,
        sort_by_tribal_land,
        track_precinct_error,
        location_types_path,
        location_types,
        request_timeout_secs,
        max_retries,
        retry_backoff_base_ms,
        max_pages,
    })
}

/// Read a YAML key → label table from disk.
fn load_location_types(path: &Path) -> Result<LocationTypes, ConfigError> {
    let display = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::LocationTypesIo {
        path: display.clone(),
        source: e,
    })?;
    LocationTypes::from_yaml_str(&raw).map_err(|e| ConfigError::LocationTypesParse {
        path: display,
        source: e,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "POLLFINDER_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
