//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are entered as free-form decimal text in the product forms and
//! persisted as JSON numbers in the remote store. `rust_decimal` keeps the
//! value exact in memory; the `serde::float` adapter matches the number
//! representation the store uses at rest.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`] from form input.
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// The input string is empty.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a decimal number.
    #[error("price must be a number: {0:?}")]
    NotANumber(String),
}

/// A product price.
///
/// Always a finite decimal once constructed; non-numeric form input is
/// rejected before any store call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Parse a price from user-entered decimal text.
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Empty`] for blank input and
    /// [`PriceError::NotANumber`] for anything that does not parse as a
    /// decimal.
    pub fn parse(input: &str) -> Result<Self, PriceError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }

        trimmed
            .parse::<Decimal>()
            .map(Self)
            .map_err(|_| PriceError::NotANumber(trimmed.to_owned()))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer() {
        let price = Price::parse("150000").unwrap();
        assert_eq!(price.amount(), Decimal::from(150_000));
    }

    #[test]
    fn test_parse_decimal() {
        let price = Price::parse("19.99").unwrap();
        assert_eq!(price.to_string(), "19.99");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let price = Price::parse("  42 ").unwrap();
        assert_eq!(price.amount(), Decimal::from(42));
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Price::parse(""), Err(PriceError::Empty)));
        assert!(matches!(Price::parse("   "), Err(PriceError::Empty)));
    }

    #[test]
    fn test_parse_not_a_number() {
        assert!(matches!(
            Price::parse("abc"),
            Err(PriceError::NotANumber(_))
        ));
        assert!(matches!(
            Price::parse("12,50 VND"),
            Err(PriceError::NotANumber(_))
        ));
    }

    #[test]
    fn test_serializes_as_json_number() {
        let price = Price::parse("150000").unwrap();
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "150000.0");

        let parsed: Price = serde_json::from_str("150000").unwrap();
        assert_eq!(parsed, price);
    }
}
