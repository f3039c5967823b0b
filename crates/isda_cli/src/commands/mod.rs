//! CLI command implementations
//!
//! Each submodule implements a specific CLI command. Commands split into an
//! `evaluate` step producing a serialisable report and a `run` step printing it.

pub mod price;
pub mod sensitivity;

use clap::ValueEnum;
use isda_core::market_data::curves::IsdaCompliantCurve;
use isda_models::instruments::credit::{AnalyticCdsPricer, CdsAnalytic};
use tracing::debug;

use crate::config::CliConfig;
use crate::Result;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Everything a command needs to price the configured trade
pub struct Market {
    pub pricer: AnalyticCdsPricer,
    pub cds: CdsAnalytic,
    pub yield_curve: IsdaCompliantCurve,
    pub credit_curve: IsdaCompliantCurve,
}

impl Market {
    /// Build curves, trade and pricer from the configuration
    pub fn from_config(config: &CliConfig) -> Result<Self> {
        let yield_curve = config.yield_curve.build()?;
        let credit_curve = config.credit_curve.build()?;
        let cds = config.trade.build()?;
        let pricer = AnalyticCdsPricer::with_formula(config.pricer.accrual_formula);
        debug!(
            formula = %pricer.formula(),
            payments = cds.num_payments(),
            protection_start = cds.protection_start(),
            protection_end = cds.protection_end(),
            "Market loaded"
        );
        Ok(Self {
            pricer,
            cds,
            yield_curve,
            credit_curve,
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::config::CliConfig;

    pub fn config() -> CliConfig {
        CliConfig::from_toml_str(
            r#"
[yield_curve]
times = [1.0]
rates = [0.02]

[credit_curve]
times = [0.5, 1.0, 3.0, 5.0, 7.0]
rates = [0.03, 0.03, 0.03, 0.03, 0.03]

[trade]
tenor = 5.0
coupon = 0.01
"#,
        )
        .unwrap()
    }
}
