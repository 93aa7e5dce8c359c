//! Simulation output

use serde::{Deserialize, Serialize};

/// Outcome of one simulation run
///
/// Immutable once produced. The count is bounded by the population and,
/// across repeated runs, binomially distributed with the run's per-loan
/// default probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Number of loans that defaulted within the horizon
    pub default_count: u64,

    /// Number of loans simulated
    pub population: u64,
}

impl SimulationResult {
    /// Realized default rate for the run
    pub fn default_rate(&self) -> f64 {
        if self.population == 0 {
            return 0.0;
        }
        self.default_count as f64 / self.population as f64
    }
}
