//! RateMesh Simulator
//!
//! Host that seeds a shared rate registry, then either replays scripted
//! scenarios or runs concurrent pricing feeds and converters against it.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ratemesh_fx::{FxConfig, RateRegistry};

mod controller;
mod feed;
mod metrics;
mod scenario;
mod seed;

use controller::{LoadProfile, SimulationController};
use scenario::Scenario;

/// RateMesh Simulator CLI
#[derive(Parser, Debug)]
#[command(name = "simulator")]
#[command(about = "RateMesh feed and load simulation environment")]
struct Args {
    /// Seed rates file (BASE/QUOTE=RATE per line, or a .json array)
    #[arg(short, long)]
    rates: Option<PathBuf>,

    /// Scenario to run (built-in name or .json file)
    #[arg(short, long)]
    scenario: Option<String>,

    /// Number of concurrent feed tasks
    #[arg(long, default_value = "2")]
    feeds: usize,

    /// Number of concurrent converter tasks
    #[arg(long, default_value = "4")]
    readers: usize,

    /// Milliseconds between refreshes of each feed
    #[arg(long, default_value = "100")]
    feed_interval_ms: u64,

    /// Maximum relative rate move per refresh
    #[arg(long, default_value = "0.01")]
    jitter: f64,

    /// Probability that a feed fetch fails
    #[arg(long, default_value = "0.0")]
    feed_failure_rate: f64,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Run duration in seconds (0 = infinite)
    #[arg(long, default_value = "0")]
    duration: u64,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,
}

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
    );

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.json);

    info!("Starting RateMesh Simulator");

    let config = FxConfig::from_env();
    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    let quotes = match &args.rates {
        Some(path) => seed::load_quotes(path)?,
        None => seed::default_quotes(),
    };
    info!(quotes = quotes.len(), "Seed rates loaded");

    let registry = Arc::new(RateRegistry::with_config(config));
    let controller = SimulationController::new(registry.clone(), quotes, args.seed);
    controller.initialize();

    if let Some(scenario_name) = &args.scenario {
        let scenario = Scenario::load(scenario_name)?;
        controller.run_scenario(&scenario).await?;
    } else {
        info!("Press Ctrl+C to stop");

        let profile = LoadProfile {
            feeds: args.feeds,
            readers: args.readers,
            feed_interval: Duration::from_millis(args.feed_interval_ms),
            jitter: args.jitter,
            feed_failure_rate: args.feed_failure_rate,
        };

        let duration = if args.duration > 0 {
            Some(Duration::from_secs(args.duration))
        } else {
            None
        };

        controller.run(profile, duration).await?;
    }

    let metrics = controller.get_metrics();
    let stats = registry.stats();
    info!("Simulation complete");
    info!("Total conversions: {}", metrics.total_conversions);
    info!("Successful: {}", metrics.successful_conversions);
    info!("No path: {}", metrics.no_path_failures);
    info!("No rate: {}", metrics.no_rate_failures);
    info!("Success rate: {:.2}%", metrics.success_rate() * 100.0);
    info!("Feed refreshes: {} ({} rates, {} failures)", metrics.refreshes, metrics.rates_applied, metrics.feed_failures);
    info!("Latency avg/p50/p99: {}/{}/{}us", metrics.average_latency_us(), metrics.p50_latency_us(), metrics.p99_latency_us());
    info!("Registry: {} pairs across {} currencies", stats.pairs, stats.currencies);

    Ok(())
}
