//! Builder for regular CDS schedules in year-fraction time.

use super::cds::{CdsAnalytic, CdsAnalyticParts, CdsPeriod};
use crate::instruments::InstrumentError;

/// One curve day, in years.
pub const CURVE_ONE_DAY: f64 = 1.0 / 365.0;

/// Accrual fractions are ACT/360 on an ACT/365 time axis.
const ACCRUAL_DAY_COUNT_RATIO: f64 = 365.0 / 360.0;

/// Builds a [`CdsAnalytic`] with a regular payment schedule.
///
/// Accrual periods run from `accrual_start` in steps of `1 / payments_per_year`.
/// When protection starts at the beginning of the day, the last accrual period
/// is extended by one curve day, survival is observed one day before each
/// accrual end, and the protection window is shifted back by one day.
///
/// # Examples
///
/// ```
/// use isda_models::instruments::credit::CdsAnalyticBuilder;
///
/// let cds = CdsAnalyticBuilder::new(1.0)
///     .payments_per_year(2)
///     .recovery_rate(0.25)
///     .protection_from_start_of_day(false)
///     .build()
///     .unwrap();
///
/// assert_eq!(cds.num_payments(), 2);
/// assert_eq!(cds.periods()[1].acc_end, 1.0);
/// assert_eq!(cds.protection_end(), 1.0);
/// assert_eq!(cds.lgd(), 0.75);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CdsAnalyticBuilder {
    tenor: f64,
    payments_per_year: u32,
    recovery_rate: f64,
    valuation_time: f64,
    accrual_start: f64,
    step_in_offset: f64,
    pay_accrued_on_default: bool,
    protection_from_start_of_day: bool,
}

impl CdsAnalyticBuilder {
    /// Start a builder for a CDS of the given tenor in years.
    ///
    /// Defaults: quarterly payments, 40% recovery, valuation and accrual
    /// start at 0, step-in one curve day after valuation, accrued paid on
    /// default, protection from the start of the day.
    pub fn new(tenor: f64) -> Self {
        Self {
            tenor,
            payments_per_year: 4,
            recovery_rate: 0.4,
            valuation_time: 0.0,
            accrual_start: 0.0,
            step_in_offset: CURVE_ONE_DAY,
            pay_accrued_on_default: true,
            protection_from_start_of_day: true,
        }
    }

    /// Number of premium payments per year.
    pub fn payments_per_year(mut self, payments_per_year: u32) -> Self {
        self.payments_per_year = payments_per_year;
        self
    }

    /// Recovery rate in `[0, 1]`.
    pub fn recovery_rate(mut self, recovery_rate: f64) -> Self {
        self.recovery_rate = recovery_rate;
        self
    }

    /// Valuation time.
    pub fn valuation_time(mut self, valuation_time: f64) -> Self {
        self.valuation_time = valuation_time;
        self
    }

    /// Start of the first accrual period.
    pub fn accrual_start(mut self, accrual_start: f64) -> Self {
        self.accrual_start = accrual_start;
        self
    }

    /// Step-in time as an offset from valuation.
    pub fn step_in_offset(mut self, step_in_offset: f64) -> Self {
        self.step_in_offset = step_in_offset;
        self
    }

    /// Pay accrued premium on default.
    pub fn pay_accrued_on_default(mut self, pay: bool) -> Self {
        self.pay_accrued_on_default = pay;
        self
    }

    /// Protection starts at the beginning of the day.
    pub fn protection_from_start_of_day(mut self, from_start: bool) -> Self {
        self.protection_from_start_of_day = from_start;
        self
    }

    /// Generate the schedule and validate the result.
    ///
    /// # Errors
    ///
    /// [`InstrumentError::InvalidTenor`] if the tenor is not a positive whole
    /// number of payment periods, otherwise any error of [`CdsAnalytic::new`].
    pub fn build(&self) -> Result<CdsAnalytic, InstrumentError> {
        let invalid_tenor = InstrumentError::InvalidTenor {
            tenor: self.tenor,
            payments_per_year: self.payments_per_year,
        };
        if self.payments_per_year == 0 || !self.tenor.is_finite() || self.tenor <= 0.0 {
            return Err(invalid_tenor);
        }
        let freq = f64::from(self.payments_per_year);
        let exact = self.tenor * freq;
        let n = exact.round();
        if (exact - n).abs() > 1e-9 || n < 1.0 {
            return Err(invalid_tenor);
        }
        let n = n as usize;

        if !(0.0..=1.0).contains(&self.recovery_rate) {
            return Err(InstrumentError::InvalidRecoveryRate {
                recovery: self.recovery_rate,
            });
        }

        let one_day = CURVE_ONE_DAY;
        let from_start = self.protection_from_start_of_day;
        let offset = if from_start { one_day } else { 0.0 };

        let periods: Vec<CdsPeriod> = (0..n)
            .map(|i| {
                let acc_start = self.accrual_start + i as f64 / freq;
                let payment_time = self.accrual_start + (i + 1) as f64 / freq;
                let acc_end = if i == n - 1 && from_start {
                    payment_time + one_day
                } else {
                    payment_time
                };
                CdsPeriod {
                    acc_start,
                    acc_end,
                    accrual_fraction: (acc_end - acc_start) * ACCRUAL_DAY_COUNT_RATIO,
                    payment_time,
                    credit_observation_time: acc_end - offset,
                }
            })
            .collect();

        let step_in = self.valuation_time + self.step_in_offset;
        let first_start = self.accrual_start;
        let last_end = periods[n - 1].acc_end;
        let accrued = if first_start < step_in {
            (step_in - first_start) * ACCRUAL_DAY_COUNT_RATIO
        } else {
            0.0
        };

        CdsAnalytic::new(CdsAnalyticParts {
            valuation_time: self.valuation_time,
            protection_start: step_in.max(first_start) - offset,
            protection_end: last_end - offset,
            step_in,
            lgd: 1.0 - self.recovery_rate,
            accrued_premium_per_unit_spread: accrued,
            pay_accrued_on_default: self.pay_accrued_on_default,
            protection_from_start_of_day: from_start,
            curve_one_day: one_day,
            periods,
        })
    }
}
