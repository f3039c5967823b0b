//! CLI error type

use isda_core::market_data::MarketDataError;
use isda_core::types::PricingError;
use isda_models::instruments::InstrumentError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the `isda` binary
#[derive(Debug, Error)]
pub enum CliError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Curve error: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Trade error: {0}")]
    Instrument(#[from] InstrumentError),

    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Result alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
