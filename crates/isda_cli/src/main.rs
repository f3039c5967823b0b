//! isda - Command Line CDS Pricing under the ISDA Standard Model
//!
//! # Commands
//!
//! - `isda price -c cds.toml` - Value both legs, PV and par spread
//! - `isda sensitivity -c cds.toml` - Bucketed credit curve sensitivities
//!
//! # Configuration
//!
//! Pricer settings come from, in order of precedence: command-line flags,
//! the `ISDA_LOG_LEVEL` / `ISDA_ACCRUAL_FORMULA` environment variables, the
//! `[pricer]` table of the TOML file, then defaults. `RUST_LOG` overrides
//! the log filter entirely.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;

use commands::OutputFormat;
use config::{build_config, CliArgs};
pub use error::{CliError, Result};

/// ISDA standard model CDS pricer
#[derive(Parser, Debug)]
#[command(name = "isda")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path (TOML format)
    #[arg(short, long, global = true, value_name = "FILE", env = "ISDA_CONFIG", default_value = "cds.toml")]
    config: PathBuf,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Accrual-on-default formula (legacy, corrected)
    #[arg(long, global = true)]
    formula: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Price the configured CDS
    Price {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Bucketed sensitivities to each credit curve node
    Sensitivity {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

fn init_tracing(level: LevelFilter) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::default().add_directive(level.into())),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !cli.config.exists() {
        return Err(CliError::FileNotFound(cli.config.display().to_string()));
    }

    let args = CliArgs {
        config_file: cli.config,
        log_level: cli.log_level,
        formula: cli.formula,
    };
    let config = build_config(&args)?;

    init_tracing(config.pricer.log_level);
    info!(
        config = %args.config_file.display(),
        formula = %config.pricer.accrual_formula,
        log_level = %config.pricer.log_level,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Price { format } => commands::price::run(&config, format),
        Commands::Sensitivity { format } => commands::sensitivity::run(&config, format),
    }
}
