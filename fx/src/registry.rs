//! Shared rate registry and path-based converter.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use ratemesh_common::{Currency, CurrencyPair, RateQuote};
use tracing::{debug, info, instrument, warn};

use crate::config::{FxConfig, SelfConversion};
use crate::conversion::{Conversion, ConversionLeg, ConversionPath};
use crate::error::{FxError, FxResult};
use crate::graph::RateGraph;
use crate::provider::RateSource;

/// Thread-safe table of directed exchange rates that answers conversions by
/// searching for the fewest-hop path between two currencies.
///
/// Individual reads and writes are atomic per pair. A conversion is not a
/// snapshot: the path is searched over the pairs present when it starts,
/// while each leg's rate is read from the live table. Concurrent updates
/// or clears can therefore surface as `NoConversionPath` or
/// `NoConversionRate`, never as a torn value.
pub struct RateRegistry {
    rates: DashMap<CurrencyPair, f64>,
    config: FxConfig,
    updates_applied: AtomicU64,
    clears: AtomicU64,
    last_updated: RwLock<Option<DateTime<Utc>>>,
}

impl RateRegistry {
    /// Create an empty registry with default configuration.
    pub fn new() -> Self {
        Self::with_config(FxConfig::default())
    }

    /// Create an empty registry with custom configuration.
    pub fn with_config(config: FxConfig) -> Self {
        Self {
            rates: DashMap::new(),
            config,
            updates_applied: AtomicU64::new(0),
            clears: AtomicU64::new(0),
            last_updated: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &FxConfig {
        &self.config
    }

    /// Remove every recorded rate.
    pub fn clear(&self) {
        self.rates.clear();
        self.clears.fetch_add(1, Ordering::Relaxed);
        debug!("Rate table cleared");
    }

    /// Insert or overwrite each quote's exact pair, in order. The reverse
    /// pair is never touched. Returns the number of entries written.
    pub fn update<I, Q>(&self, quotes: I) -> usize
    where
        I: IntoIterator<Item = Q>,
        Q: Into<RateQuote>,
    {
        let mut applied = 0;
        for quote in quotes {
            let quote = quote.into();
            self.rates.insert(quote.pair, quote.rate);
            applied += 1;
        }

        if applied > 0 {
            self.updates_applied.fetch_add(applied as u64, Ordering::Relaxed);
            *self.last_updated.write() = Some(Utc::now());
        }

        debug!(applied, "Rate update applied");
        applied
    }

    /// Record a single rate.
    pub fn set_rate(&self, base: impl Into<Currency>, quote: impl Into<Currency>, rate: f64) {
        self.update([RateQuote::new(base, quote, rate)]);
    }

    /// Rate recorded for exactly this pair. Inverses are not derived.
    pub fn get_rate(&self, pair: &CurrencyPair) -> Option<f64> {
        self.rates.get(pair).map(|entry| *entry)
    }

    /// Remove one recorded pair, returning its rate.
    pub fn remove_rate(&self, pair: &CurrencyPair) -> Option<f64> {
        self.rates.remove(pair).map(|(_, rate)| rate)
    }

    /// Number of recorded pairs.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Copy of every recorded pair and its rate, sorted by pair.
    pub fn pairs(&self) -> Vec<(CurrencyPair, f64)> {
        let mut pairs: Vec<_> = self
            .rates
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        pairs
    }

    /// Every currency that appears in a recorded pair, sorted.
    pub fn currencies(&self) -> Vec<Currency> {
        let keys = self.snapshot_keys();
        let graph = RateGraph::new(&keys);

        let mut currencies: Vec<Currency> = graph.vertices().iter().map(|c| (*c).clone()).collect();
        currencies.sort();
        currencies
    }

    /// Fewest-hop path between two currencies over the pairs currently
    /// recorded, treating every pair as traversable in both directions.
    pub fn find_path(&self, from: &Currency, to: &Currency) -> Option<Vec<Currency>> {
        let keys = self.snapshot_keys();
        RateGraph::new(&keys).shortest_path(from, to)
    }

    /// Convert `amount` of `from` into `to`.
    pub fn convert(&self, from: &Currency, to: &Currency, amount: f64) -> FxResult<f64> {
        self.convert_detailed(from, to, amount)
            .map(|conversion| conversion.output)
    }

    /// Convert `amount` of `from` into `to`, returning the full record.
    #[instrument(skip(self), fields(from = %from, to = %to))]
    pub fn convert_detailed(
        &self,
        from: &Currency,
        to: &Currency,
        amount: f64,
    ) -> FxResult<Conversion> {
        if from == to && self.config.self_conversion == SelfConversion::Identity {
            return Ok(Conversion::identity(from.clone(), amount));
        }

        // A single-vertex path means no conversion happened.
        let currencies = self
            .find_path(from, to)
            .filter(|path| path.len() >= 2)
            .ok_or_else(|| FxError::no_path(from, to))?;

        let hops = currencies.len() - 1;
        if let Some(max_hops) = self.config.max_hops {
            if hops > max_hops {
                debug!(hops, max_hops, "Shortest path exceeds hop limit");
                return Err(FxError::no_path(from, to));
            }
        }

        let legs = self.resolve_legs(&currencies)?;
        let conversion = Conversion::new(
            from.clone(),
            to.clone(),
            amount,
            ConversionPath::new(currencies, legs),
        );

        debug!(
            conversion_id = %conversion.id,
            hops,
            rate = conversion.rate,
            "Conversion completed"
        );

        Ok(conversion)
    }

    /// Fetch one batch from `source` and apply it as an update.
    ///
    /// The table is left untouched if the source fails.
    #[instrument(skip(self, source), fields(source = source.name()))]
    pub async fn refresh_from(&self, source: &dyn RateSource) -> FxResult<usize> {
        let quotes = source.fetch_rates().await.map_err(|e| {
            warn!(error = %e, "Rate source failed");
            match e {
                FxError::ProviderError(_) => e,
                other => FxError::ProviderError(other.to_string()),
            }
        })?;

        let applied = self.update(quotes);
        info!(applied, "Refreshed rates from source");

        Ok(applied)
    }

    /// Get registry statistics.
    pub fn stats(&self) -> RegistryStats {
        let keys = self.snapshot_keys();

        RegistryStats {
            pairs: keys.len(),
            currencies: RateGraph::new(&keys).vertices().len(),
            updates_applied: self.updates_applied.load(Ordering::Relaxed),
            clears: self.clears.load(Ordering::Relaxed),
            last_updated: *self.last_updated.read(),
        }
    }

    /// Resolve each consecutive step against the live table: the forward
    /// entry is multiplied, otherwise the reverse entry is divided. A stored
    /// zero counts as no rate for that direction.
    fn resolve_legs(&self, path: &[Currency]) -> FxResult<Vec<ConversionLeg>> {
        path.windows(2)
            .map(|step| {
                let pair = CurrencyPair::new(step[0].clone(), step[1].clone());

                if let Some(rate) = self.usable_rate(&pair) {
                    Ok(ConversionLeg::direct(pair, rate))
                } else if let Some(rate) = self.usable_rate(&pair.inverse()) {
                    Ok(ConversionLeg::inverse(pair, rate))
                } else {
                    warn!(pair = %pair, "Path step has no rate in either direction");
                    Err(FxError::no_rate(&pair.base, &pair.quote))
                }
            })
            .collect()
    }

    fn usable_rate(&self, pair: &CurrencyPair) -> Option<f64> {
        self.get_rate(pair).filter(|rate| *rate != 0.0)
    }

    fn snapshot_keys(&self) -> Vec<CurrencyPair> {
        self.rates.iter().map(|entry| entry.key().clone()).collect()
    }
}

impl Default for RateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry statistics.
#[derive(Debug, Clone)]
pub struct RegistryStats {
    pub pairs: usize,
    pub currencies: usize,
    /// Entries written since creation, overwrites included.
    pub updates_applied: u64,
    pub clears: u64,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Registry handle shared between the components of a host.
pub type SharedRateRegistry = Arc<RateRegistry>;
