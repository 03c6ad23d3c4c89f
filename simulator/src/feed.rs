//! Simulated pricing feeds.

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratemesh_common::RateQuote;
use ratemesh_fx::{FxError, FxResult, RateSource};

/// A feed that republishes a set of base quotes with random jitter and an
/// optional outage probability.
pub struct SimulatedFeed {
    name: String,
    base: Vec<RateQuote>,
    /// Maximum relative move per fetch, e.g. 0.01 for +/-1%.
    jitter: f64,
    /// Probability in [0, 1] that a fetch fails.
    failure_rate: f64,
    rng: Mutex<StdRng>,
}

impl SimulatedFeed {
    /// Create a new feed.
    pub fn new(name: impl Into<String>, base: Vec<RateQuote>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };

        Self {
            name: name.into(),
            base,
            jitter: 0.0,
            failure_rate: 0.0,
            rng: Mutex::new(rng),
        }
    }

    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter.abs();
        self
    }

    /// Non-finite rates disable outages.
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        self.failure_rate = if rate.is_finite() { rate.clamp(0.0, 1.0) } else { 0.0 };
        self
    }
}

#[async_trait]
impl RateSource for SimulatedFeed {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_rates(&self) -> FxResult<Vec<RateQuote>> {
        let mut rng = self.rng.lock();

        if rng.gen_bool(self.failure_rate) {
            return Err(FxError::ProviderError(format!("{} outage", self.name)));
        }

        let quotes = self
            .base
            .iter()
            .map(|quote| {
                let drift = if self.jitter > 0.0 {
                    1.0 + rng.gen_range(-self.jitter..=self.jitter)
                } else {
                    1.0
                };
                RateQuote {
                    pair: quote.pair.clone(),
                    rate: quote.rate * drift,
                }
            })
            .collect();

        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_jitter_stays_in_bounds() {
        let feed = SimulatedFeed::new("feed-0", vec![RateQuote::new("USD", "EUR", 1.0)], Some(7))
            .with_jitter(0.05);

        for _ in 0..100 {
            let quotes = feed.fetch_rates().await.unwrap();
            assert!((quotes[0].rate - 1.0).abs() <= 0.05 + 1e-12);
        }
    }

    #[tokio::test]
    async fn test_without_jitter_rates_are_unchanged() {
        let feed = SimulatedFeed::new("feed-0", vec![RateQuote::new("USD", "CAD", 1.34)], None);

        let quotes = feed.fetch_rates().await.unwrap();
        assert_eq!(quotes, vec![RateQuote::new("USD", "CAD", 1.34)]);
    }

    #[tokio::test]
    async fn test_outage() {
        let feed = SimulatedFeed::new("feed-0", vec![], Some(1)).with_failure_rate(1.0);

        assert!(matches!(
            feed.fetch_rates().await,
            Err(FxError::ProviderError(_))
        ));
    }

    #[tokio::test]
    async fn test_non_finite_failure_rate_disables_outages() {
        for rate in [f64::NAN, f64::INFINITY] {
            let feed = SimulatedFeed::new("feed-0", vec![RateQuote::new("USD", "EUR", 0.86)], Some(3))
                .with_failure_rate(rate);

            assert_eq!(feed.fetch_rates().await.unwrap().len(), 1);
        }
    }
}
