//! CLI configuration management
//!
//! A TOML file describes the market (yield and credit curves), the trade and
//! the pricer. Environment variables and command-line flags override the
//! pricer settings.

use isda_core::market_data::curves::IsdaCompliantCurve;
use isda_core::market_data::MarketDataError;
use isda_models::instruments::credit::{AccrualOnDefaultFormula, CdsAnalytic, CdsAnalyticBuilder};
use isda_models::instruments::InstrumentError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;

/// Environment variable overriding the log level
pub const ENV_LOG_LEVEL: &str = "ISDA_LOG_LEVEL";

/// Environment variable overriding the accrual-on-default formula
pub const ENV_ACCRUAL_FORMULA: &str = "ISDA_ACCRUAL_FORMULA";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: off, error, warn, info, debug, trace")]
    InvalidLogLevel(String),

    #[error("Invalid accrual-on-default formula: {0}. Must be one of: legacy, corrected")]
    InvalidFormula(String),

    #[error("Configuration file error: {0}")]
    FileError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

fn parse_formula(s: &str) -> Result<AccrualOnDefaultFormula, ConfigError> {
    AccrualOnDefaultFormula::from_str(s).map_err(|_| ConfigError::InvalidFormula(s.to_string()))
}

/// Level names are matched case-insensitively; `off` silences logging.
fn parse_log_level(s: &str) -> Result<LevelFilter, ConfigError> {
    LevelFilter::from_str(s.trim()).map_err(|_| ConfigError::InvalidLogLevel(s.to_string()))
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LevelFilter, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_log_level(&s).map_err(serde::de::Error::custom)
}

fn deserialize_formula<'de, D>(deserializer: D) -> Result<AccrualOnDefaultFormula, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_formula(&s).map_err(serde::de::Error::custom)
}

/// `[pricer]` section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PricerConfig {
    /// Accrual-on-default formula
    #[serde(deserialize_with = "deserialize_formula")]
    pub accrual_formula: AccrualOnDefaultFormula,
    /// Most verbose level written to stderr
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LevelFilter,
}

impl Default for PricerConfig {
    fn default() -> Self {
        Self {
            accrual_formula: AccrualOnDefaultFormula::default(),
            log_level: LevelFilter::WARN,
        }
    }
}

/// `[yield_curve]` and `[credit_curve]` sections: knot times and zero rates
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurveConfig {
    /// Knot times in years, strictly increasing
    pub times: Vec<f64>,
    /// Zero rate (or zero hazard rate) at each knot
    pub rates: Vec<f64>,
}

impl CurveConfig {
    /// Build the curve
    pub fn build(&self) -> Result<IsdaCompliantCurve, MarketDataError> {
        IsdaCompliantCurve::new(&self.times, &self.rates)
    }
}

/// `[trade]` section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TradeConfig {
    /// Tenor in years
    pub tenor: f64,
    /// Premium payments per year
    pub payments_per_year: u32,
    /// Recovery rate
    pub recovery_rate: f64,
    /// Contractual spread as a fraction (0.01 = 100bp)
    pub coupon: f64,
    /// Valuation time in years
    pub valuation_time: f64,
    /// Start of the first accrual period in years
    pub accrual_start: f64,
    /// Pay accrued premium on default
    pub pay_accrued_on_default: bool,
    /// Protection starts at the beginning of the day
    pub protection_from_start_of_day: bool,
}

impl Default for TradeConfig {
    fn default() -> Self {
        Self {
            tenor: 5.0,
            payments_per_year: 4,
            recovery_rate: 0.4,
            coupon: 0.01,
            valuation_time: 0.0,
            accrual_start: 0.0,
            pay_accrued_on_default: true,
            protection_from_start_of_day: true,
        }
    }
}

impl TradeConfig {
    /// Build the analytic CDS
    pub fn build(&self) -> Result<CdsAnalytic, InstrumentError> {
        CdsAnalyticBuilder::new(self.tenor)
            .payments_per_year(self.payments_per_year)
            .recovery_rate(self.recovery_rate)
            .valuation_time(self.valuation_time)
            .accrual_start(self.accrual_start)
            .pay_accrued_on_default(self.pay_accrued_on_default)
            .protection_from_start_of_day(self.protection_from_start_of_day)
            .build()
    }
}

/// Complete CLI configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CliConfig {
    /// Pricer settings
    #[serde(default)]
    pub pricer: PricerConfig,
    /// Discount curve
    pub yield_curve: CurveConfig,
    /// Credit (hazard rate) curve
    pub credit_curve: CurveConfig,
    /// Trade description
    #[serde(default)]
    pub trade: TradeConfig,
}

impl CliConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.pricer.log_level = parse_log_level(&level)?;
        }
        if let Some(formula) = lookup(ENV_ACCRUAL_FORMULA) {
            self.pricer.accrual_formula = parse_formula(&formula)?;
        }
        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(level) = &cli.log_level {
            self.pricer.log_level = parse_log_level(level)?;
        }
        if let Some(formula) = &cli.formula {
            self.pricer.accrual_formula = parse_formula(formula)?;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, curve) in [("yield_curve", &self.yield_curve), ("credit_curve", &self.credit_curve)] {
            if curve.times.is_empty() {
                return Err(ConfigError::Invalid(format!("{} has no knots", name)));
            }
            if curve.times.len() != curve.rates.len() {
                return Err(ConfigError::Invalid(format!(
                    "{} has {} times but {} rates",
                    name,
                    curve.times.len(),
                    curve.rates.len()
                )));
            }
        }
        if !self.trade.coupon.is_finite() {
            return Err(ConfigError::Invalid(format!("trade coupon {} is not finite", self.trade.coupon)));
        }
        Ok(())
    }
}

/// CLI arguments relevant to configuration
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path
    pub config_file: PathBuf,
    /// Log level override
    pub log_level: Option<String>,
    /// Accrual-on-default formula override
    pub formula: Option<String>,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
pub fn build_config(cli: &CliArgs) -> Result<CliConfig, ConfigError> {
    let mut config = CliConfig::from_file(&cli.config_file)?;
    config.apply_env()?;
    config.merge_with_cli(cli)?;
    config.validate()?;
    Ok(config)
}
