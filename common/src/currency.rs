//! Currency codes and directed currency pairs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque currency code.
///
/// Codes are compared exactly as given: `"usd"` and `"USD"` are different
/// currencies and no format validation is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    /// Create a new currency from code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Get the currency code.
    pub fn code(&self) -> &str {
        &self.0
    }

    pub fn usd() -> Self {
        Self::new("USD")
    }

    pub fn eur() -> Self {
        Self::new("EUR")
    }

    pub fn gbp() -> Self {
        Self::new("GBP")
    }

    pub fn cad() -> Self {
        Self::new("CAD")
    }

    pub fn jpy() -> Self {
        Self::new("JPY")
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Currency {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Currency {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for Currency {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An ordered currency pair.
///
/// A rate recorded against `base/quote` means one unit of `base` buys
/// `rate` units of `quote`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CurrencyPair {
    /// Currency being converted from.
    pub base: Currency,
    /// Currency being converted to.
    pub quote: Currency,
}

impl CurrencyPair {
    /// Create a new currency pair.
    pub fn new(base: impl Into<Currency>, quote: impl Into<Currency>) -> Self {
        Self {
            base: base.into(),
            quote: quote.into(),
        }
    }

    /// Get the inverse pair.
    pub fn inverse(&self) -> Self {
        Self {
            base: self.quote.clone(),
            quote: self.base.clone(),
        }
    }

    /// Whether both legs name the same currency.
    pub fn is_self_pair(&self) -> bool {
        self.base == self.quote
    }

    /// Whether `currency` is either endpoint of the pair.
    pub fn touches(&self, currency: &Currency) -> bool {
        &self.base == currency || &self.quote == currency
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_is_case_sensitive() {
        assert_ne!(Currency::new("usd"), Currency::usd());
        assert_eq!(Currency::new("usd").code(), "usd");
    }

    #[test]
    fn test_pair_inverse() {
        let pair = CurrencyPair::new("USD", "CAD");
        let inverse = pair.inverse();

        assert_eq!(inverse.base, Currency::cad());
        assert_eq!(inverse.quote, Currency::usd());
        assert_eq!(inverse.inverse(), pair);
    }

    #[test]
    fn test_pair_display_and_touches() {
        let pair = CurrencyPair::new("USD", "EUR");

        assert_eq!(pair.to_string(), "USD/EUR");
        assert!(pair.touches(&Currency::eur()));
        assert!(!pair.touches(&Currency::gbp()));
        assert!(!pair.is_self_pair());
        assert!(CurrencyPair::new("USD", "USD").is_self_pair());
    }

    #[test]
    fn test_currency_serializes_as_plain_string() {
        let json = serde_json::to_string(&Currency::usd()).unwrap();
        assert_eq!(json, "\"USD\"");
    }
}
