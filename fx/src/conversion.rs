//! Conversion paths and completed conversion records.

use chrono::{DateTime, Utc};
use ratemesh_common::{Currency, CurrencyPair};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One resolved step of a conversion path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionLeg {
    /// Direction the leg is travelled in.
    pub pair: CurrencyPair,
    /// The recorded rate that resolved this leg.
    pub rate: f64,
    /// True when the rate was recorded for `pair.inverse()` and is divided
    /// rather than multiplied.
    pub inverted: bool,
}

impl ConversionLeg {
    /// Leg resolved from a rate recorded in the travel direction.
    pub fn direct(pair: CurrencyPair, rate: f64) -> Self {
        Self {
            pair,
            rate,
            inverted: false,
        }
    }

    /// Leg resolved from the rate recorded for the reverse direction.
    pub fn inverse(pair: CurrencyPair, rate: f64) -> Self {
        Self {
            pair,
            rate,
            inverted: true,
        }
    }

    /// Apply this leg to a running conversion factor.
    pub fn apply(&self, factor: f64) -> f64 {
        if self.inverted {
            factor / self.rate
        } else {
            factor * self.rate
        }
    }
}

/// A resolved conversion path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionPath {
    /// Currencies visited, source first.
    pub currencies: Vec<Currency>,
    /// Resolved legs, one per consecutive currency pair.
    pub legs: Vec<ConversionLeg>,
}

impl ConversionPath {
    /// Create a path from its currencies and resolved legs.
    pub fn new(currencies: Vec<Currency>, legs: Vec<ConversionLeg>) -> Self {
        Self { currencies, legs }
    }

    /// Number of conversions along the path.
    pub fn hops(&self) -> usize {
        self.legs.len()
    }

    /// Composite factor: product of all legs, applied in order.
    pub fn factor(&self) -> f64 {
        self.legs.iter().fold(1.0, |factor, leg| leg.apply(factor))
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }
}

/// Represents a completed currency conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversion {
    /// Unique conversion ID.
    pub id: Uuid,
    /// Source currency.
    pub from: Currency,
    /// Target currency.
    pub to: Currency,
    /// Input amount, in `from` units.
    pub amount: f64,
    /// Output amount, in `to` units.
    pub output: f64,
    /// Composite rate applied.
    pub rate: f64,
    /// Path used to reach `to`.
    pub path: ConversionPath,
    /// When the conversion was executed.
    pub executed_at: DateTime<Utc>,
}

impl Conversion {
    /// Create a new conversion record from a resolved path.
    pub fn new(from: Currency, to: Currency, amount: f64, path: ConversionPath) -> Self {
        let rate = path.factor();
        Self {
            id: Uuid::now_v7(),
            from,
            to,
            amount,
            output: amount * rate,
            rate,
            path,
            executed_at: Utc::now(),
        }
    }

    /// Same-currency conversion that passes the amount through unchanged.
    pub fn identity(currency: Currency, amount: f64) -> Self {
        Self::new(
            currency.clone(),
            currency.clone(),
            amount,
            ConversionPath::new(vec![currency], Vec::new()),
        )
    }

    /// Get the currency pair.
    pub fn pair(&self) -> CurrencyPair {
        CurrencyPair::new(self.from.clone(), self.to.clone())
    }
}
