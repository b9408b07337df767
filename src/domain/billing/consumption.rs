//! Validated consumption quantity

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::domain::{DomainError, DomainResult};

/// Largest consumption accepted for a single bill.
pub const MAX_CONSUMPTION: i64 = 1_000_000_000;

/// Decimal places accepted for quantities, rates and fees.
pub const MAX_FRACTION_DIGITS: u32 = 4;

/// Finite, non-negative number of consumed units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Consumption(Decimal);

impl Consumption {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> DomainResult<Self> {
        if value < Decimal::ZERO {
            return Err(DomainError::InvalidInput(format!(
                "consumption must not be negative (got {})",
                value
            )));
        }
        if value > Decimal::from(MAX_CONSUMPTION) {
            return Err(DomainError::InvalidInput(format!(
                "consumption must not exceed {} units",
                MAX_CONSUMPTION
            )));
        }
        let value = value.normalize();
        if value.scale() > MAX_FRACTION_DIGITS {
            return Err(DomainError::InvalidInput(format!(
                "consumption may have at most {} decimal places",
                MAX_FRACTION_DIGITS
            )));
        }
        // normalize() keeps the sign of -0
        if value.is_zero() {
            return Ok(Self::ZERO);
        }
        Ok(Self(value))
    }

    /// Parses user-submitted text such as `"250"`, `" 12.5 "` or `"1e3"`.
    pub fn parse(input: &str) -> DomainResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidInput(
                "consumption is required".to_string(),
            ));
        }

        let value = parse_exact(trimmed).ok_or_else(|| {
            DomainError::InvalidInput(format!("'{}' is not a number", trimmed))
        })?;

        Self::new(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

/// Largest scale a `Decimal` can hold without rounding.
const DECIMAL_MAX_SCALE: i64 = 28;

/// Plain or scientific notation, refusing anything `Decimal` would have to
/// round to represent.
fn parse_exact(input: &str) -> Option<Decimal> {
    if let Ok(value) = Decimal::from_str_exact(input) {
        return Some(value);
    }
    let (mantissa, exponent) = input.split_once(|c| c == 'e' || c == 'E')?;
    let mantissa = Decimal::from_str_exact(mantissa).ok()?;
    let exponent: i64 = exponent.parse().ok()?;
    if i64::from(mantissa.scale()) - exponent > DECIMAL_MAX_SCALE {
        return None;
    }
    Decimal::from_scientific(input).ok()
}

impl FromStr for Consumption {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Consumption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_integers_and_decimals() {
        assert_eq!(Consumption::parse("250").unwrap().value(), Decimal::from(250));
        assert_eq!(
            Consumption::parse(" 12.5 ").unwrap().value(),
            Decimal::new(125, 1)
        );
    }

    #[test]
    fn parses_scientific_notation() {
        assert_eq!(Consumption::parse("1e3").unwrap().value(), Decimal::from(1000));
    }

    #[test]
    fn zero_is_valid() {
        let zero = Consumption::parse("0").unwrap();
        assert!(zero.is_zero());
        assert_eq!(Consumption::parse("-0").unwrap(), Consumption::ZERO);
    }

    #[test]
    fn trailing_zeros_do_not_count_as_precision() {
        let value = Consumption::parse("100.000000").unwrap();
        assert_eq!(value.value(), Decimal::from(100));
        assert_eq!(value.to_string(), "100");
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(
            Consumption::parse("   "),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_non_numeric_input() {
        for input in ["abc", "NaN", "inf", "-inf", "12kWh", "1,5"] {
            assert!(
                matches!(Consumption::parse(input), Err(DomainError::InvalidInput(_))),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_negative_input() {
        let err = Consumption::parse("-5").unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidInput("consumption must not be negative (got -5)".into())
        );
    }

    #[test]
    fn rejects_values_above_limit() {
        assert!(Consumption::new(Decimal::from(MAX_CONSUMPTION)).is_ok());
        assert!(Consumption::new(Decimal::from(MAX_CONSUMPTION + 1)).is_err());
    }

    #[test]
    fn rejects_excess_precision() {
        assert!(Consumption::parse("1.2345").is_ok());
        assert!(Consumption::parse("1.23456").is_err());
    }

    #[test]
    fn rejects_precision_beyond_decimal_range_instead_of_rounding() {
        for input in [
            "100.00000000000000000000000000001",
            "0.000000000000000000000000000001",
            "1.00000000000000000000000000000001e2",
            "1e-30",
        ] {
            assert!(
                matches!(Consumption::parse(input), Err(DomainError::InvalidInput(_))),
                "{input} should be rejected"
            );
        }
    }
}
