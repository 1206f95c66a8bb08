//! Metric admission checker
//!
//! Runs a single metric through the same normalization and validation the
//! ingestion API applies, using the configured service catalog.
//!
//! # CLI Commands
//!
//! - `check` - Validate one metric name and its dimensions
//! - `check-config` - Validate configuration file
//!
//! # Configuration
//!
//! Read from `--config`, else the `MONAPI_CONFIG` environment variable, else
//! the built-in defaults.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use monapi_validation::{
    config::Config, metrics, Error, MetricValidator, Result, ValidationError,
};
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(name = "monapi-validate")]
#[command(version)]
#[command(about = "Check metric names and dimensions against the service catalog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file (overrides MONAPI_CONFIG env var)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a metric
    Check {
        /// Metric name
        #[arg(short, long)]
        name: String,

        /// Service the metric is submitted for
        #[arg(short, long)]
        service: Option<String>,

        /// Dimension as key=value, may be repeated
        #[arg(short, long = "dimension", value_parser = parse_dimension)]
        dimensions: Vec<(String, String)>,
    },

    /// Validate configuration file
    CheckConfig,
}

fn parse_dimension(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::from_file_with_env(path)?,
        None => Config::load()?,
    };
    config.validate()?;
    Ok(config)
}

fn check(
    config: &Config,
    name: &str,
    service: Option<&str>,
    dimensions: Vec<(String, String)>,
) -> Result<()> {
    let validator = MetricValidator::from_config(&config.catalog)?;
    let raw_dimensions = dimensions.into_iter().map(|(k, v)| (Some(k), Some(v)));

    let metric = validator.admit(Some(name), Some(raw_dimensions), service)?;
    debug!(name = %metric.name, dimensions = metric.dimensions.len(), "Metric admitted");

    println!("accepted: {}", metric.name);
    for (key, value) in &metric.dimensions {
        println!("  {}={}", key, value);
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        },
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.monitoring.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    if config.monitoring.metrics_enabled {
        metrics::init();
    }

    match cli.command {
        Commands::CheckConfig => {
            info!(
                services = config.catalog.services.len(),
                "Configuration is valid"
            );
            println!("configuration ok");
            ExitCode::SUCCESS
        },
        Commands::Check {
            name,
            service,
            dimensions,
        } => match check(&config, &name, service.as_deref(), dimensions) {
            Ok(()) => ExitCode::SUCCESS,
            Err(Error::Validation(e)) => {
                report_rejection(&e);
                ExitCode::FAILURE
            },
            Err(e) => {
                warn!("Check failed: {}", e);
                eprintln!("error ({}): {}", e.status_code(), e);
                ExitCode::FAILURE
            },
        },
    }
}

fn report_rejection(e: &ValidationError) {
    let status = Error::from(e.clone()).status_code();
    println!("rejected ({}): {}", status, e);
}
