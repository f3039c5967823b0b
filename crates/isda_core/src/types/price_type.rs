//! Clean or dirty price convention.

use super::PricingError;
use std::fmt;
use std::str::FromStr;

/// Selects whether accrued premium is subtracted from the premium leg.
///
/// - `Clean`: excludes the premium accrued since the last coupon date
/// - `Dirty`: includes it
///
/// # Examples
///
/// ```
/// use isda_core::types::PriceType;
///
/// let pt: PriceType = "dirty".parse().unwrap();
/// assert_eq!(pt, PriceType::Dirty);
/// assert_eq!(PriceType::default(), PriceType::Clean);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PriceType {
    /// Price excluding accrued premium.
    #[default]
    Clean,
    /// Price including accrued premium.
    Dirty,
}

impl fmt::Display for PriceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceType::Clean => write!(f, "clean"),
            PriceType::Dirty => write!(f, "dirty"),
        }
    }
}

impl FromStr for PriceType {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "clean" => Ok(PriceType::Clean),
            "dirty" => Ok(PriceType::Dirty),
            other => Err(PricingError::InvalidInput(format!(
                "Unknown price type: {}. Supported: clean, dirty",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("CLEAN".parse::<PriceType>().unwrap(), PriceType::Clean);
        assert_eq!("Dirty".parse::<PriceType>().unwrap(), PriceType::Dirty);
        assert!("mid".parse::<PriceType>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for pt in [PriceType::Clean, PriceType::Dirty] {
            assert_eq!(pt.to_string().parse::<PriceType>().unwrap(), pt);
        }
    }
}
