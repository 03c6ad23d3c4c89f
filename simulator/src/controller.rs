//! Simulation controller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use ratemesh_common::{Currency, RateQuote};
use ratemesh_fx::{CurrencyConverter, SharedRateRegistry};

use crate::feed::SimulatedFeed;
use crate::metrics::SimulationMetrics;
use crate::scenario::{Scenario, ScenarioStep};

/// Settings for a continuous load run.
#[derive(Debug, Clone)]
pub struct LoadProfile {
    /// Concurrent feed tasks.
    pub feeds: usize,
    /// Concurrent conversion tasks.
    pub readers: usize,
    /// Delay between refreshes of one feed.
    pub feed_interval: Duration,
    /// Relative jitter applied by feeds.
    pub jitter: f64,
    /// Probability that a feed fetch fails.
    pub feed_failure_rate: f64,
}

impl Default for LoadProfile {
    fn default() -> Self {
        Self {
            feeds: 2,
            readers: 4,
            feed_interval: Duration::from_millis(100),
            jitter: 0.01,
            feed_failure_rate: 0.0,
        }
    }
}

/// Drives scenarios and load runs against one shared registry.
pub struct SimulationController {
    /// Registry under test.
    registry: SharedRateRegistry,
    /// Rates loaded at initialization and republished by feeds.
    seed_quotes: Vec<RateQuote>,
    /// Random seed for reproducibility.
    seed: Option<u64>,
    /// Simulation metrics.
    metrics: Arc<Mutex<SimulationMetrics>>,
    /// Running flag.
    running: Arc<AtomicBool>,
}

impl SimulationController {
    /// Create a new simulation controller.
    pub fn new(registry: SharedRateRegistry, seed_quotes: Vec<RateQuote>, seed: Option<u64>) -> Self {
        Self {
            registry,
            seed_quotes,
            seed,
            metrics: Arc::new(Mutex::new(SimulationMetrics::new())),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Reset the registry to the seed rates.
    pub fn initialize(&self) {
        self.registry.clear_configuration();
        self.registry.update_configuration(self.seed_quotes.clone());

        info!(
            pairs = self.registry.len(),
            currencies = self.registry.currencies().len(),
            "Registry seeded"
        );
    }

    /// Run a scenario, failing on the first unmet expectation.
    pub async fn run_scenario(&self, scenario: &Scenario) -> anyhow::Result<()> {
        info!("Running scenario: {} - {}", scenario.name, scenario.description);

        self.running.store(true, Ordering::SeqCst);

        for (idx, step) in scenario.steps.iter().enumerate() {
            if !self.running.load(Ordering::SeqCst) {
                break;
            }

            if let Err(e) = self.execute_step(step).await {
                self.running.store(false, Ordering::SeqCst);
                return Err(anyhow::anyhow!("Step {} failed: {}", idx + 1, e));
            }
        }

        self.running.store(false, Ordering::SeqCst);
        info!(steps = scenario.steps.len(), "Scenario passed");

        Ok(())
    }

    /// Run feeds and readers concurrently until `duration` elapses, or
    /// until Ctrl+C when no duration is given.
    pub async fn run(&self, profile: LoadProfile, duration: Option<Duration>) -> anyhow::Result<()> {
        info!(
            feeds = profile.feeds,
            readers = profile.readers,
            "Running simulation in continuous mode"
        );

        self.running.store(true, Ordering::SeqCst);
        let mut handles = Vec::with_capacity(profile.feeds + profile.readers);

        for idx in 0..profile.feeds {
            let feed = SimulatedFeed::new(
                format!("feed-{}", idx),
                self.seed_quotes.clone(),
                self.task_seed(idx),
            )
            .with_jitter(profile.jitter)
            .with_failure_rate(profile.feed_failure_rate);

            let registry = self.registry.clone();
            let metrics = self.metrics.clone();
            let running = self.running.clone();
            let interval = profile.feed_interval;

            handles.push(tokio::spawn(async move {
                while running.load(Ordering::Relaxed) {
                    match registry.refresh_from(&feed).await {
                        Ok(applied) => {
                            metrics.lock().record_refresh(applied);
                        }
                        Err(e) => {
                            debug!(error = %e, "Feed refresh failed");
                            metrics.lock().record_feed_failure();
                        }
                    }
                    tokio::time::sleep(interval).await;
                }
            }));
        }

        for idx in 0..profile.readers {
            let registry = self.registry.clone();
            let metrics = self.metrics.clone();
            let running = self.running.clone();
            let mut rng = match self.task_seed(profile.feeds + idx) {
                Some(s) => StdRng::seed_from_u64(s),
                None => StdRng::from_entropy(),
            };

            handles.push(tokio::spawn(async move {
                while running.load(Ordering::Relaxed) {
                    let currencies = registry.currencies();
                    let pick = currencies
                        .choose(&mut rng)
                        .cloned()
                        .zip(currencies.choose(&mut rng).cloned());

                    if let Some((from, to)) = pick {
                        Self::timed_convert(&registry, &metrics, &from, &to);
                    }

                    tokio::task::yield_now().await;
                }
            }));
        }

        let start = Instant::now();
        match duration {
            Some(d) => tokio::time::sleep(d).await,
            None => tokio::signal::ctrl_c().await?,
        }

        self.running.store(false, Ordering::SeqCst);
        for handle in handles {
            handle.await?;
        }

        let elapsed = start.elapsed().as_secs_f64();
        let metrics = self.get_metrics();
        info!(
            elapsed_secs = elapsed,
            throughput = metrics.throughput(elapsed),
            "Load run finished"
        );

        Ok(())
    }

    /// Execute a single scenario step.
    async fn execute_step(&self, step: &ScenarioStep) -> Result<(), String> {
        match step {
            ScenarioStep::Clear => {
                info!("Clearing rates");
                self.registry.clear_configuration();
            }
            ScenarioStep::Update { rates } => {
                info!(count = rates.len(), "Updating rates");
                self.registry.update_configuration(rates.clone());
            }
            ScenarioStep::Convert {
                from,
                to,
                amount,
                expect,
            } => {
                let result = CurrencyConverter::convert(self.registry.as_ref(), from, to, *amount);

                match &result {
                    Ok(value) => {
                        self.metrics.lock().record_success(0);
                        info!("Converted {} {} -> {} {}", amount, from, value, to);
                    }
                    Err(e) => {
                        self.metrics.lock().record_failure(e);
                        info!("Conversion {} -> {} failed: {}", from, to, e);
                    }
                }

                expect.check(&result).map_err(|e| {
                    warn!(from = %from, to = %to, "Expectation not met: {}", e);
                    e
                })?;
            }
            ScenarioStep::Wait { millis } => {
                tokio::time::sleep(Duration::from_millis(*millis)).await;
            }
        }

        Ok(())
    }

    fn timed_convert(
        registry: &SharedRateRegistry,
        metrics: &Mutex<SimulationMetrics>,
        from: &Currency,
        to: &Currency,
    ) {
        let started = Instant::now();
        let result = registry.convert(from, to, 1_000.0);
        let latency_us = started.elapsed().as_micros() as u64;

        let mut metrics = metrics.lock();
        match result {
            Ok(_) => metrics.record_success(latency_us),
            Err(e) => metrics.record_failure(&e),
        }
    }

    fn task_seed(&self, idx: usize) -> Option<u64> {
        self.seed.map(|s| s.wrapping_add(idx as u64))
    }

    /// Get simulation metrics.
    pub fn get_metrics(&self) -> SimulationMetrics {
        self.metrics.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::default_quotes;
    use ratemesh_fx::RateRegistry;

    fn controller() -> SimulationController {
        let registry = Arc::new(RateRegistry::new());
        SimulationController::new(registry, default_quotes(), Some(42))
    }

    #[tokio::test]
    async fn test_builtin_scenarios_pass() {
        let controller = controller();

        for name in ["cross-rates", "reset", "self-conversion"] {
            let scenario = Scenario::load(name).unwrap();
            controller.run_scenario(&scenario).await.unwrap();
        }

        let metrics = controller.get_metrics();
        assert!(metrics.successful_conversions >= 4);
        assert!(metrics.no_path_failures >= 5);
    }

    #[tokio::test]
    async fn test_bundled_data_files() {
        let data = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let quotes = crate::seed::load_quotes(&data.join("rates.txt")).unwrap();
        let controller = SimulationController::new(Arc::new(RateRegistry::new()), quotes, None);
        controller.initialize();

        let scenario = Scenario::from_file(&data.join("chf-bridge.json")).unwrap();
        controller.run_scenario(&scenario).await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_expectation_stops_scenario() {
        let controller = controller();
        let scenario = Scenario {
            name: "broken".to_string(),
            description: "expects a path that does not exist".to_string(),
            steps: vec![
                ScenarioStep::Clear,
                ScenarioStep::Convert {
                    from: "USD".to_string(),
                    to: "EUR".to_string(),
                    amount: 1.0,
                    expect: crate::scenario::Expectation::amount(0.86),
                },
            ],
        };

        let err = controller.run_scenario(&scenario).await.unwrap_err();
        assert!(err.to_string().starts_with("Step 2 failed"));
    }

    #[tokio::test]
    async fn test_load_run() {
        let controller = controller();
        controller.initialize();

        let profile = LoadProfile {
            feeds: 2,
            readers: 2,
            feed_interval: Duration::from_millis(5),
            ..Default::default()
        };

        controller
            .run(profile, Some(Duration::from_millis(100)))
            .await
            .unwrap();

        let metrics = controller.get_metrics();
        assert!(metrics.refreshes > 0);
        assert!(metrics.total_conversions > 0);
        assert_eq!(metrics.no_rate_failures, 0);
    }
}
