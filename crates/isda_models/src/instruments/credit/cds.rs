//! Analytic description of a single CDS.
//!
//! [`CdsAnalytic`] expresses a CDS as seen from one valuation time: every
//! date is already converted to a year fraction from "today", so the pricer
//! never touches calendars or day counts.

use crate::instruments::InstrumentError;

/// One premium payment period, all times in years from today.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CdsPeriod {
    /// Start of accrual.
    pub acc_start: f64,
    /// End of accrual.
    pub acc_end: f64,
    /// Day-count fraction of the period, the premium paid per unit spread.
    pub accrual_fraction: f64,
    /// Time the premium is paid.
    pub payment_time: f64,
    /// Time at which survival is sampled for this period's premium.
    pub credit_observation_time: f64,
}

impl CdsPeriod {
    fn validate(&self, index: usize) -> Result<(), InstrumentError> {
        let fields = [
            self.acc_start,
            self.acc_end,
            self.accrual_fraction,
            self.payment_time,
            self.credit_observation_time,
        ];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(InstrumentError::InvalidPeriod {
                index,
                message: "non-finite time or fraction".to_string(),
            });
        }
        if self.acc_end <= self.acc_start {
            return Err(InstrumentError::InvalidPeriod {
                index,
                message: format!("accrual end {} is not after start {}", self.acc_end, self.acc_start),
            });
        }
        if self.accrual_fraction < 0.0 {
            return Err(InstrumentError::InvalidPeriod {
                index,
                message: format!("negative accrual fraction {}", self.accrual_fraction),
            });
        }
        Ok(())
    }
}

/// Raw field set accepted by [`CdsAnalytic::new`].
///
/// Use this when the schedule comes from an external date-generation layer;
/// [`CdsAnalyticBuilder`](super::CdsAnalyticBuilder) covers regular schedules.
#[derive(Debug, Clone, PartialEq)]
pub struct CdsAnalyticParts {
    /// Valuation (cash settlement) time, the point PVs are quoted at.
    pub valuation_time: f64,
    /// Start of protection.
    pub protection_start: f64,
    /// End of protection.
    pub protection_end: f64,
    /// Step-in time.
    pub step_in: f64,
    /// Loss given default, `1 - recovery`.
    pub lgd: f64,
    /// Accrued premium per unit spread, subtracted for clean prices.
    pub accrued_premium_per_unit_spread: f64,
    /// Whether accrued premium is paid on default.
    pub pay_accrued_on_default: bool,
    /// Whether protection starts at the beginning of the day.
    pub protection_from_start_of_day: bool,
    /// Length of one curve day in years.
    pub curve_one_day: f64,
    /// Premium payment periods, in order.
    pub periods: Vec<CdsPeriod>,
}

/// Immutable analytic description of a CDS.
///
/// # Examples
///
/// ```
/// use isda_models::instruments::credit::{CdsAnalytic, CdsAnalyticParts, CdsPeriod};
///
/// let cds = CdsAnalytic::new(CdsAnalyticParts {
///     valuation_time: 0.0,
///     protection_start: 0.0,
///     protection_end: 1.0,
///     step_in: 0.0,
///     lgd: 0.6,
///     accrued_premium_per_unit_spread: 0.0,
///     pay_accrued_on_default: false,
///     protection_from_start_of_day: false,
///     curve_one_day: 1.0 / 365.0,
///     periods: vec![CdsPeriod {
///         acc_start: 0.0,
///         acc_end: 1.0,
///         accrual_fraction: 1.0,
///         payment_time: 1.0,
///         credit_observation_time: 1.0,
///     }],
/// })
/// .unwrap();
/// assert_eq!(cds.num_payments(), 1);
/// assert!((cds.recovery_rate() - 0.4).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CdsAnalytic {
    valuation_time: f64,
    protection_start: f64,
    protection_end: f64,
    step_in: f64,
    lgd: f64,
    accrued_premium_per_unit_spread: f64,
    pay_accrued_on_default: bool,
    protection_from_start_of_day: bool,
    curve_one_day: f64,
    periods: Vec<CdsPeriod>,
}

impl CdsAnalytic {
    /// Validate `parts` and build the description.
    ///
    /// # Errors
    ///
    /// - [`InstrumentError::EmptySchedule`] if there are no periods
    /// - [`InstrumentError::InvalidPeriod`] for a malformed period
    /// - [`InstrumentError::MismatchedPeriods`] if periods overlap
    /// - [`InstrumentError::InvalidRecoveryRate`] if `lgd` is outside `[0, 1]`
    /// - [`InstrumentError::InvalidProtection`] for an empty protection window
    pub fn new(parts: CdsAnalyticParts) -> Result<Self, InstrumentError> {
        if parts.periods.is_empty() {
            return Err(InstrumentError::EmptySchedule);
        }
        for (index, period) in parts.periods.iter().enumerate() {
            period.validate(index)?;
        }
        for (index, w) in parts.periods.windows(2).enumerate() {
            if w[1].acc_start < w[0].acc_end {
                return Err(InstrumentError::MismatchedPeriods {
                    index: index + 1,
                    start: w[1].acc_start,
                    previous_end: w[0].acc_end,
                });
            }
        }

        if !(0.0..=1.0).contains(&parts.lgd) {
            return Err(InstrumentError::InvalidRecoveryRate {
                recovery: 1.0 - parts.lgd,
            });
        }

        let (start, end) = (parts.protection_start, parts.protection_end);
        if !start.is_finite() || !end.is_finite() || end <= start {
            return Err(InstrumentError::InvalidProtection { start, end });
        }

        Ok(Self {
            valuation_time: parts.valuation_time,
            protection_start: parts.protection_start,
            protection_end: parts.protection_end,
            step_in: parts.step_in,
            lgd: parts.lgd,
            accrued_premium_per_unit_spread: parts.accrued_premium_per_unit_spread,
            pay_accrued_on_default: parts.pay_accrued_on_default,
            protection_from_start_of_day: parts.protection_from_start_of_day,
            curve_one_day: parts.curve_one_day,
            periods: parts.periods,
        })
    }

    /// Valuation time.
    #[inline]
    pub fn valuation_time(&self) -> f64 {
        self.valuation_time
    }

    /// Start of protection.
    #[inline]
    pub fn protection_start(&self) -> f64 {
        self.protection_start
    }

    /// End of protection.
    #[inline]
    pub fn protection_end(&self) -> f64 {
        self.protection_end
    }

    /// Step-in time.
    #[inline]
    pub fn step_in(&self) -> f64 {
        self.step_in
    }

    /// Loss given default.
    #[inline]
    pub fn lgd(&self) -> f64 {
        self.lgd
    }

    /// Recovery rate, `1 - lgd`.
    #[inline]
    pub fn recovery_rate(&self) -> f64 {
        1.0 - self.lgd
    }

    /// Accrued premium per unit spread.
    #[inline]
    pub fn accrued_premium_per_unit_spread(&self) -> f64 {
        self.accrued_premium_per_unit_spread
    }

    /// Accrued premium for a given fractional spread.
    #[inline]
    pub fn accrued_premium(&self, fractional_spread: f64) -> f64 {
        self.accrued_premium_per_unit_spread * fractional_spread
    }

    /// Whether accrued premium is paid on default.
    #[inline]
    pub fn pay_accrued_on_default(&self) -> bool {
        self.pay_accrued_on_default
    }

    /// Whether protection starts at the beginning of the day.
    #[inline]
    pub fn protection_from_start_of_day(&self) -> bool {
        self.protection_from_start_of_day
    }

    /// Length of one curve day in years.
    #[inline]
    pub fn curve_one_day(&self) -> f64 {
        self.curve_one_day
    }

    /// Premium payment periods.
    #[inline]
    pub fn periods(&self) -> &[CdsPeriod] {
        &self.periods
    }

    /// Number of premium payments.
    #[inline]
    pub fn num_payments(&self) -> usize {
        self.periods.len()
    }

    /// Copy of this CDS with a different recovery rate.
    pub fn with_recovery_rate(&self, recovery: f64) -> Result<Self, InstrumentError> {
        if !(0.0..=1.0).contains(&recovery) {
            return Err(InstrumentError::InvalidRecoveryRate { recovery });
        }
        Ok(Self {
            lgd: 1.0 - recovery,
            ..self.clone()
        })
    }
}
