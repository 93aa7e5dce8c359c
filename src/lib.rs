//! High-performance Monte Carlo simulator for credit default counts
//!
//! Models each loan's time to default as exponential with a constant
//! hazard rate and counts how many of a large homogeneous portfolio
//! default within a fixed horizon. The portfolio is partitioned into
//! chunks with independent random streams, so runs are reproducible for
//! a given seed and scale across worker threads.

pub mod error;
pub mod scenario;
pub mod simulation;

pub use error::SimulationError;
pub use simulation::{SimulationConfig, SimulationEngine, SimulationResult};
