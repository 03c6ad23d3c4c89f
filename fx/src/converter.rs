//! The conversion interface exposed to hosts.

use ratemesh_common::{Currency, RateQuote};

use crate::error::FxResult;
use crate::registry::RateRegistry;

/// Operations a host uses to configure rates and request conversions.
pub trait CurrencyConverter: Send + Sync {
    /// Drop every configured rate.
    fn clear_configuration(&self);

    /// Insert or overwrite the given rates.
    fn update_configuration(&self, rates: Vec<RateQuote>);

    /// Convert `amount` from one currency code to another.
    fn convert(&self, from: &str, to: &str, amount: f64) -> FxResult<f64>;
}

impl CurrencyConverter for RateRegistry {
    fn clear_configuration(&self) {
        self.clear();
    }

    fn update_configuration(&self, rates: Vec<RateQuote>) {
        self.update(rates);
    }

    fn convert(&self, from: &str, to: &str, amount: f64) -> FxResult<f64> {
        RateRegistry::convert(self, &Currency::new(from), &Currency::new(to), amount)
    }
}

/// Converter double that returns amounts unchanged.
///
/// Fails with `NoConversionRate` unless both currencies appear in the
/// configured rates; no path search takes place.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockCurrencyConverter {
    rates: dashmap::DashMap<ratemesh_common::CurrencyPair, f64>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockCurrencyConverter {
    pub fn new() -> Self {
        Self {
            rates: dashmap::DashMap::new(),
        }
    }

    fn knows(&self, currency: &Currency) -> bool {
        self.rates.iter().any(|entry| entry.key().touches(currency))
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Default for MockCurrencyConverter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl CurrencyConverter for MockCurrencyConverter {
    fn clear_configuration(&self) {
        self.rates.clear();
    }

    fn update_configuration(&self, rates: Vec<RateQuote>) {
        for quote in rates {
            self.rates.insert(quote.pair, quote.rate);
        }
    }

    fn convert(&self, from: &str, to: &str, amount: f64) -> FxResult<f64> {
        let (from, to) = (Currency::new(from), Currency::new(to));
        if self.knows(&from) && self.knows(&to) {
            Ok(amount)
        } else {
            Err(crate::error::FxError::NoConversionRate { from, to })
        }
    }
}
