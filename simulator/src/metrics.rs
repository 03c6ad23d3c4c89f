//! Simulation metrics.

use std::collections::VecDeque;

use ratemesh_fx::FxError;

/// Simulation metrics.
#[derive(Debug, Clone)]
pub struct SimulationMetrics {
    /// Conversions attempted.
    pub total_conversions: u64,
    /// Conversions that produced an amount.
    pub successful_conversions: u64,
    /// Conversions that found no path.
    pub no_path_failures: u64,
    /// Conversions that lost a rate mid-resolution.
    pub no_rate_failures: u64,
    /// Feed refreshes applied.
    pub refreshes: u64,
    /// Rate entries written by feeds.
    pub rates_applied: u64,
    /// Feed fetches that failed.
    pub feed_failures: u64,
    /// Latency samples (microseconds).
    latency_samples: VecDeque<u64>,
    /// Maximum samples to keep.
    max_samples: usize,
}

impl SimulationMetrics {
    /// Create new metrics.
    pub fn new() -> Self {
        Self {
            total_conversions: 0,
            successful_conversions: 0,
            no_path_failures: 0,
            no_rate_failures: 0,
            refreshes: 0,
            rates_applied: 0,
            feed_failures: 0,
            latency_samples: VecDeque::with_capacity(10000),
            max_samples: 10000,
        }
    }

    /// Record a successful conversion.
    pub fn record_success(&mut self, latency_us: u64) {
        self.total_conversions += 1;
        self.successful_conversions += 1;

        if self.latency_samples.len() >= self.max_samples {
            self.latency_samples.pop_front();
        }
        self.latency_samples.push_back(latency_us);
    }

    /// Record a failed conversion.
    pub fn record_failure(&mut self, error: &FxError) {
        self.total_conversions += 1;
        match error {
            FxError::NoConversionPath { .. } => self.no_path_failures += 1,
            FxError::NoConversionRate { .. } => self.no_rate_failures += 1,
            FxError::ProviderError(_) => {}
        }
    }

    /// Record a feed refresh.
    pub fn record_refresh(&mut self, applied: usize) {
        self.refreshes += 1;
        self.rates_applied += applied as u64;
    }

    /// Record a failed feed fetch.
    pub fn record_feed_failure(&mut self) {
        self.feed_failures += 1;
    }

    /// Get average latency in microseconds.
    pub fn average_latency_us(&self) -> u64 {
        if self.latency_samples.is_empty() {
            return 0;
        }

        let sum: u64 = self.latency_samples.iter().sum();
        sum / self.latency_samples.len() as u64
    }

    /// Get p50 latency.
    pub fn p50_latency_us(&self) -> u64 {
        self.percentile_latency(50)
    }

    /// Get p99 latency.
    pub fn p99_latency_us(&self) -> u64 {
        self.percentile_latency(99)
    }

    fn percentile_latency(&self, percentile: usize) -> u64 {
        if self.latency_samples.is_empty() {
            return 0;
        }

        let mut sorted: Vec<_> = self.latency_samples.iter().copied().collect();
        sorted.sort_unstable();

        let idx = (sorted.len() * percentile / 100).min(sorted.len() - 1);
        sorted[idx]
    }

    /// Get success rate.
    pub fn success_rate(&self) -> f64 {
        if self.total_conversions == 0 {
            return 0.0;
        }

        self.successful_conversions as f64 / self.total_conversions as f64
    }

    /// Get throughput (conversions per second).
    pub fn throughput(&self, duration_secs: f64) -> f64 {
        if duration_secs <= 0.0 {
            return 0.0;
        }

        self.total_conversions as f64 / duration_secs
    }
}

impl Default for SimulationMetrics {
    fn default() -> Self {
        Self::new()
    }
}
