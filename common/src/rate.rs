//! Rate quotes as supplied by feeds and configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::currency::{Currency, CurrencyPair};
use crate::error::ParseQuoteError;

/// A single directed exchange rate: one unit of `pair.base` buys `rate`
/// units of `pair.quote`.
///
/// Values are carried as given. Zero, negative and non-finite rates are not
/// rejected here; callers treat them as "no rate" by convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateQuote {
    /// The directed pair.
    pub pair: CurrencyPair,
    /// Units of quote currency per unit of base currency.
    pub rate: f64,
}

impl RateQuote {
    /// Create a new quote.
    pub fn new(base: impl Into<Currency>, quote: impl Into<Currency>, rate: f64) -> Self {
        Self {
            pair: CurrencyPair::new(base, quote),
            rate,
        }
    }

    /// Base currency of the quote.
    pub fn base(&self) -> &Currency {
        &self.pair.base
    }

    /// Quote currency of the quote.
    pub fn quote(&self) -> &Currency {
        &self.pair.quote
    }
}

impl fmt::Display for RateQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.pair, self.rate)
    }
}

impl<B, Q> From<(B, Q, f64)> for RateQuote
where
    B: Into<Currency>,
    Q: Into<Currency>,
{
    fn from((base, quote, rate): (B, Q, f64)) -> Self {
        Self::new(base, quote, rate)
    }
}

impl FromStr for RateQuote {
    type Err = ParseQuoteError;

    /// Parse `BASE/QUOTE=RATE`. Surrounding whitespace on each token is
    /// ignored; the codes themselves are kept verbatim.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (pair, rate) = s
            .split_once('=')
            .ok_or_else(|| ParseQuoteError::MissingRate(s.to_string()))?;

        let (base, quote) = pair
            .split_once('/')
            .ok_or_else(|| ParseQuoteError::MissingSeparator(pair.to_string()))?;

        let (base, quote) = (base.trim(), quote.trim());
        if base.is_empty() || quote.is_empty() {
            return Err(ParseQuoteError::EmptyCurrency(s.to_string()));
        }

        let rate_str = rate.trim();
        let rate = rate_str
            .parse::<f64>()
            .map_err(|e| ParseQuoteError::InvalidRate {
                value: rate_str.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self::new(base, quote, rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quote() {
        let quote: RateQuote = "USD/CAD=1.34".parse().unwrap();

        assert_eq!(quote.pair, CurrencyPair::new("USD", "CAD"));
        assert_eq!(quote.rate, 1.34);
    }

    #[test]
    fn test_parse_quote_trims_tokens() {
        let quote: RateQuote = " CAD / GBP = 0.58 ".parse().unwrap();

        assert_eq!(quote.base(), &Currency::cad());
        assert_eq!(quote.quote(), &Currency::gbp());
        assert_eq!(quote.rate, 0.58);
    }

    #[test]
    fn test_parse_quote_errors() {
        assert!(matches!(
            "USD/CAD".parse::<RateQuote>(),
            Err(ParseQuoteError::MissingRate(_))
        ));
        assert!(matches!(
            "USDCAD=1.3".parse::<RateQuote>(),
            Err(ParseQuoteError::MissingSeparator(_))
        ));
        assert!(matches!(
            "/CAD=1.3".parse::<RateQuote>(),
            Err(ParseQuoteError::EmptyCurrency(_))
        ));
        assert!(matches!(
            "USD/CAD=abc".parse::<RateQuote>(),
            Err(ParseQuoteError::InvalidRate { .. })
        ));
    }

    #[test]
    fn test_parse_keeps_non_positive_rates() {
        let quote: RateQuote = "USD/CAD=-2".parse().unwrap();
        assert_eq!(quote.rate, -2.0);
    }

    #[test]
    fn test_from_tuple_and_display() {
        let quote = RateQuote::from(("USD", "EUR", 0.86));
        assert_eq!(quote.to_string(), "USD/EUR=0.86");
    }
}
