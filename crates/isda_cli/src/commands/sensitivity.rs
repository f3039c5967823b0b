//! Sensitivity command implementation
//!
//! Reports the bucketed sensitivities of the clean PV (at the trade coupon)
//! and of the par spread to each credit curve node.

use isda_core::market_data::curves::CreditCurve;
use serde::Serialize;
use tracing::info;

use super::{Market, OutputFormat};
use crate::config::CliConfig;
use crate::Result;

/// Sensitivities to a single credit curve node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSensitivity {
    pub node: usize,
    pub time: f64,
    pub pv: f64,
    pub par_spread: f64,
}

/// Result of the sensitivity command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityReport {
    pub formula: String,
    pub coupon: f64,
    pub nodes: Vec<NodeSensitivity>,
}

/// Compute bucketed sensitivities for the configured trade
pub fn evaluate(config: &CliConfig) -> Result<SensitivityReport> {
    let market = Market::from_config(config)?;
    let coupon = config.trade.coupon;
    let (cds, yc, cc) = (&market.cds, &market.yield_curve, &market.credit_curve);

    let pv = market.pricer.pv_credit_sensitivities(cds, yc, cc, coupon)?;
    let spread = market.pricer.par_spread_credit_sensitivities(cds, yc, cc)?;

    let nodes = pv
        .into_iter()
        .zip(spread)
        .enumerate()
        .map(|(node, (pv, par_spread))| NodeSensitivity {
            node,
            time: cc.time_at_index(node),
            pv,
            par_spread,
        })
        .collect();

    Ok(SensitivityReport {
        formula: market.pricer.formula().to_string(),
        coupon,
        nodes,
    })
}

/// Run the sensitivity command
pub fn run(config: &CliConfig, format: OutputFormat) -> Result<()> {
    info!("Computing credit curve sensitivities...");
    let report = evaluate(config)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => {
            println!("┌──────┬──────────┬──────────────────┬──────────────────┐");
            println!("│ {:>4} │ {:>8} │ {:>16} │ {:>16} │", "Node", "Time", "dPV/dh", "dS/dh");
            println!("├──────┼──────────┼──────────────────┼──────────────────┤");
            for n in &report.nodes {
                println!(
                    "│ {:>4} │ {:>8.4} │ {:>16.10} │ {:>16.10} │",
                    n.node, n.time, n.pv, n.par_spread
                );
            }
            println!("└──────┴──────────┴──────────────────┴──────────────────┘");
        }
    }

    info!("Sensitivities complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support;

    #[test]
    fn test_one_row_per_node() {
        let report = evaluate(&test_support::config()).unwrap();
        assert_eq!(report.nodes.len(), 5);
        let times: Vec<f64> = report.nodes.iter().map(|n| n.time).collect();
        assert_eq!(times, vec![0.5, 1.0, 3.0, 5.0, 7.0]);
    }

    #[test]
    fn test_sensitivity_signs() {
        // Below par, more hazard makes bought protection more valuable
        let report = evaluate(&test_support::config()).unwrap();
        for n in &report.nodes[..4] {
            assert!(n.pv > 0.0, "node {} pv sensitivity {}", n.node, n.pv);
            assert!(n.par_spread > 0.0, "node {} spread sensitivity {}", n.node, n.par_spread);
        }
    }
}
