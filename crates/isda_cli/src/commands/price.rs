//! Price command implementation
//!
//! Values the configured CDS: both legs, clean and dirty PV at the trade
//! coupon, and the par spread.

use serde::Serialize;
use tracing::info;

use super::{Market, OutputFormat};
use crate::config::CliConfig;
use crate::Result;

/// Result of the price command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceReport {
    pub formula: String,
    pub coupon: f64,
    pub protection_leg: f64,
    pub rpv01_clean: f64,
    pub rpv01_dirty: f64,
    pub accrued_premium: f64,
    pub pv_clean: f64,
    pub pv_dirty: f64,
    pub par_spread: f64,
    pub par_spread_bp: f64,
}

/// Price the configured trade
pub fn evaluate(config: &CliConfig) -> Result<PriceReport> {
    let market = Market::from_config(config)?;
    let coupon = config.trade.coupon;
    let result = market
        .pricer
        .price(&market.cds, &market.yield_curve, &market.credit_curve, coupon);

    Ok(PriceReport {
        formula: market.pricer.formula().to_string(),
        coupon,
        protection_leg: result.protection_leg,
        rpv01_clean: result.rpv01_clean,
        rpv01_dirty: result.rpv01_dirty,
        accrued_premium: result.accrued_premium,
        pv_clean: result.pv_clean,
        pv_dirty: result.pv_dirty,
        par_spread: result.par_spread,
        par_spread_bp: result.par_spread * 1e4,
    })
}

/// Run the price command
pub fn run(config: &CliConfig, format: OutputFormat) -> Result<()> {
    info!("Pricing CDS...");
    let report = evaluate(config)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => {
            let rows = [
                ("Formula", report.formula.clone()),
                ("Coupon (bp)", format!("{:.4}", report.coupon * 1e4)),
                ("Protection leg", format!("{:.10}", report.protection_leg)),
                ("RPV01 clean", format!("{:.10}", report.rpv01_clean)),
                ("RPV01 dirty", format!("{:.10}", report.rpv01_dirty)),
                ("Accrued premium", format!("{:.10}", report.accrued_premium)),
                ("PV clean", format!("{:.10}", report.pv_clean)),
                ("PV dirty", format!("{:.10}", report.pv_dirty)),
                ("Par spread (bp)", format!("{:.6}", report.par_spread_bp)),
            ];
            println!("┌──────────────────┬──────────────────┐");
            println!("│ {:<16} │ {:>16} │", "Quantity", "Value");
            println!("├──────────────────┼──────────────────┤");
            for (name, value) in rows {
                println!("│ {:<16} │ {:>16} │", name, value);
            }
            println!("└──────────────────┴──────────────────┘");
        }
    }

    info!("Pricing complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support;
    use approx::assert_relative_eq;

    #[test]
    fn test_evaluate_reference_trade() {
        let report = evaluate(&test_support::config()).unwrap();
        assert_eq!(report.formula, "legacy");
        assert_relative_eq!(report.par_spread, 0.01779807098420855, max_relative = 1e-9);
        assert_relative_eq!(report.par_spread_bp, report.par_spread * 1e4);
        assert_relative_eq!(
            report.pv_clean,
            report.protection_leg - 0.01 * report.rpv01_clean,
            max_relative = 1e-14
        );
    }

    #[test]
    fn test_evaluate_corrected_formula() {
        let mut config = test_support::config();
        config.pricer.accrual_formula = "corrected".parse().unwrap();
        let report = evaluate(&config).unwrap();
        assert_eq!(report.formula, "corrected");
        // The corrected formula restarts elapsed time at every knot, so it
        // sees the credit curve's extra knots
        assert_relative_eq!(report.par_spread, 0.01779911282604974, max_relative = 1e-9);
    }

    #[test]
    fn test_invalid_trade_surfaces_error() {
        let mut config = test_support::config();
        config.trade.recovery_rate = 1.5;
        assert!(matches!(evaluate(&config), Err(crate::CliError::Instrument(_))));
    }

    #[test]
    fn test_report_serialises() {
        let report = evaluate(&test_support::config()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["formula"], "legacy");
        assert!(json["par_spread"].as_f64().unwrap() > 0.0);
    }
}
