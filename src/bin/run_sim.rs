//! Run a single default simulation from the command line
//!
//! Prints the default count, realized default rate, and wall-clock time
//! of the engine call. The engine itself does no I/O or timing.

use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;

use credit_sim::simulation::{
    entropy_seed, SimulationConfig, SimulationEngine, DEFAULT_HAZARD_RATE, DEFAULT_HORIZON_YEARS,
    DEFAULT_POPULATION,
};

#[derive(Debug, Parser)]
#[command(about = "Monte Carlo credit default simulation")]
struct Args {
    /// Number of loans in the portfolio
    #[arg(long, default_value_t = DEFAULT_POPULATION)]
    loans: u64,

    /// Annual hazard rate (default intensity)
    #[arg(long, default_value_t = DEFAULT_HAZARD_RATE)]
    hazard_rate: f64,

    /// Time horizon in years
    #[arg(long, default_value_t = DEFAULT_HORIZON_YEARS)]
    horizon_years: f64,

    /// Seed for reproducible runs (default: OS entropy)
    #[arg(long)]
    seed: Option<u64>,

    /// Worker thread count (default: all cores)
    #[arg(long)]
    threads: Option<usize>,

    /// JSON config file; takes precedence over the individual flags
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to build worker pool")?;
    }

    let config = match &args.config {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open config file {}", path.display()))?;
            serde_json::from_reader(file)
                .with_context(|| format!("failed to parse config file {}", path.display()))?
        }
        None => SimulationConfig {
            hazard_rate: args.hazard_rate,
            horizon_years: args.horizon_years,
            population: args.loans,
        },
    };

    let engine = SimulationEngine::new(config)?;
    let seed = match args.seed {
        Some(seed) => seed,
        None => entropy_seed()?,
    };

    println!(
        "Starting simulation for {} loans (PD = {:.8}, seed = {})...",
        engine.config().population,
        engine.probability_of_default(),
        seed
    );

    let start = Instant::now();
    let result = engine.run(seed);
    let elapsed = start.elapsed();

    println!(
        "Results: {} defaults / {} total ({:.4}% realized rate).",
        result.default_count,
        result.population,
        result.default_rate() * 100.0
    );
    println!(
        "Time Taken: {:?} ({:.1}M draws/sec)",
        elapsed,
        result.population as f64 / elapsed.as_secs_f64() / 1e6
    );

    Ok(())
}
