//! Rate source trait and implementations.

use async_trait::async_trait;
use parking_lot::RwLock;
use ratemesh_common::RateQuote;

use crate::error::FxResult;

/// Trait for pricing feeds that supply rate updates to a registry.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Get the source name.
    fn name(&self) -> &str;

    /// Fetch the next batch of quotes.
    async fn fetch_rates(&self) -> FxResult<Vec<RateQuote>>;
}

/// Source that serves a fixed, replaceable batch of quotes.
pub struct StaticRateSource {
    name: String,
    quotes: RwLock<Vec<RateQuote>>,
}

impl StaticRateSource {
    /// Create a new static source.
    pub fn new(name: impl Into<String>, quotes: Vec<RateQuote>) -> Self {
        Self {
            name: name.into(),
            quotes: RwLock::new(quotes),
        }
    }

    /// Replace the batch served by subsequent fetches.
    pub fn set_quotes(&self, quotes: Vec<RateQuote>) {
        *self.quotes.write() = quotes;
    }

    /// Number of quotes currently served.
    pub fn len(&self) -> usize {
        self.quotes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.read().is_empty()
    }
}

#[async_trait]
impl RateSource for StaticRateSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_rates(&self) -> FxResult<Vec<RateQuote>> {
        Ok(self.quotes.read().clone())
    }
}
