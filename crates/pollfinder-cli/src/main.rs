mod lookup;

use clap::{Parser, Subcommand};
use pollfinder_core::{Environment, LogConfig};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pollfinder-cli")]
#[command(about = "Find voting locations for an electoral precinct")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the voting locations serving a precinct
    Lookup {
        /// County name as stored in the locations table (e.g., Maricopa)
        #[arg(long)]
        county: String,
        /// Precinct number within the county
        #[arg(long)]
        precinct: String,
        /// Location type to list (e.g., drop-boxes)
        #[arg(long = "type", default_value = "polling-places")]
        location_type: String,
        /// Latitude of the selected map point
        #[arg(long, requires = "lng", allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Longitude of the selected map point
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lng: Option<f64>,
        /// Print the store state as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the configured location types
    Types,
}

/// Output knobs for the log formatter that depend on the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LogStyle {
    ansi: bool,
    target: bool,
}

/// ANSI colour off in production; module targets only in development.
fn log_style(env: &Environment) -> LogStyle {
    LogStyle {
        ansi: !matches!(env, Environment::Production),
        target: matches!(env, Environment::Development),
    }
}

fn init_tracing(log: &LogConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log.log_level.clone()))?;
    let style = log_style(&log.env);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(style.ansi)
        .with_target(style.target)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(env = %log.env, "logging initialised");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&pollfinder_core::load_log_config_from_env()?)?;

    match cli.command {
        Commands::Lookup {
            county,
            precinct,
            location_type,
            lat,
            lng,
            json,
        } => {
            let config = pollfinder_core::load_app_config_from_env()?;
            let point = lat
                .zip(lng)
                .map(|(lat, lng)| pollfinder_core::Point { lat, lng });
            let request = lookup::LookupRequest {
                precinct: pollfinder_core::Precinct::new(county, precinct),
                location_type,
                point,
                json,
            };
            lookup::run_lookup(&config, request).await?;
        }
        Commands::Types => {
            let types = pollfinder_core::load_location_types_from_env()?;
            print!("{}", lookup::render_types(&types));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
