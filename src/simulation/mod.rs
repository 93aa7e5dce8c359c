//! Monte Carlo engine for portfolio default simulations

mod config;
mod engine;
mod result;

pub use config::SimulationConfig;
pub use engine::{default_probability, entropy_seed, SimulationEngine, CHUNK_LOANS};
pub use result::SimulationResult;

// ============================================================================
// Default Simulation Parameters
// ============================================================================
// Baseline assumptions for the reference portfolio.
// - The hazard rate is the instantaneous annual default intensity
// - The horizon is measured in years from the valuation date

/// Default annual hazard rate (5%)
pub const DEFAULT_HAZARD_RATE: f64 = 0.05;

/// Default time horizon in years
pub const DEFAULT_HORIZON_YEARS: f64 = 1.0;

/// Default portfolio size (10 million loans)
pub const DEFAULT_POPULATION: u64 = 10_000_000;
