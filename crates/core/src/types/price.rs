//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// The input string is not a decimal number.
    #[error("price is not a valid number")]
    NotANumber,
    /// The amount is zero or negative.
    #[error("price must be greater than zero")]
    NotPositive,
}

/// A unit price in the store's single currency.
///
/// Prices are decimal amounts (never floats) and are always strictly
/// positive. Persisted as their canonical string form, so `parse` must
/// accept everything `to_string` produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a `Price` from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::NotPositive` if the amount is zero or negative.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }
        Ok(Self(amount))
    }

    /// Parse a `Price` from a decimal string such as `"9.99"`.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::NotANumber` if the string is not a decimal,
    /// or `PriceError::NotPositive` if the amount is zero or negative.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let amount: Decimal = s.trim().parse().map_err(|_| PriceError::NotANumber)?;
        Self::new(amount)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Total for `quantity` units at this price.
    #[must_use]
    pub fn total(&self, quantity: i64) -> Decimal {
        self.0 * Decimal::from(quantity)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let p = Price::parse("9.99").expect("should parse");
        assert_eq!(p.to_string(), "9.99");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(Price::parse("abc"), Err(PriceError::NotANumber)));
        assert!(matches!(Price::parse(""), Err(PriceError::NotANumber)));
    }

    #[test]
    fn test_rejects_non_positive() {
        assert!(matches!(Price::parse("0"), Err(PriceError::NotPositive)));
        assert!(matches!(Price::parse("-1.50"), Err(PriceError::NotPositive)));
    }

    #[test]
    fn test_round_trips_through_display() {
        let p = Price::parse("12.30").expect("should parse");
        let again = Price::parse(&p.to_string()).expect("display form should parse");
        assert_eq!(p, again);
    }

    #[test]
    fn test_total_keeps_decimal_precision() {
        let p = Price::parse("9.99").expect("should parse");
        assert_eq!(p.total(3).to_string(), "29.97");
    }
}
