//! Simulation configuration and parameter validation

use serde::{Deserialize, Serialize};

use super::{DEFAULT_HAZARD_RATE, DEFAULT_HORIZON_YEARS, DEFAULT_POPULATION};
use crate::error::SimulationError;

/// Parameters for a single simulation run
///
/// All fields apply to the whole portfolio: every loan shares the same
/// hazard rate and horizon, so the per-loan default probability is
/// computed once per run, not per trial.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Instantaneous annual default intensity (must be > 0)
    #[serde(default = "default_hazard_rate")]
    pub hazard_rate: f64,

    /// Time horizon in years (must be > 0)
    #[serde(default = "default_horizon_years")]
    pub horizon_years: f64,

    /// Number of independent loans to simulate (must be > 0)
    #[serde(default = "default_population")]
    pub population: u64,
}

fn default_hazard_rate() -> f64 { DEFAULT_HAZARD_RATE }
fn default_horizon_years() -> f64 { DEFAULT_HORIZON_YEARS }
fn default_population() -> u64 { DEFAULT_POPULATION }

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            hazard_rate: DEFAULT_HAZARD_RATE,
            horizon_years: DEFAULT_HORIZON_YEARS,
            population: DEFAULT_POPULATION,
        }
    }
}

impl SimulationConfig {
    /// Create a validated configuration
    pub fn new(
        hazard_rate: f64,
        horizon_years: f64,
        population: u64,
    ) -> Result<Self, SimulationError> {
        let config = Self {
            hazard_rate,
            horizon_years,
            population,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every field against its domain
    ///
    /// NaN and infinite rates are rejected along with non-positive ones.
    /// A population of zero is rejected rather than treated as an empty
    /// run.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !self.hazard_rate.is_finite() || self.hazard_rate <= 0.0 {
            return Err(SimulationError::InvalidParameter {
                name: "hazard_rate",
                value: self.hazard_rate.to_string(),
                requirement: "must be finite and > 0",
            });
        }
        if !self.horizon_years.is_finite() || self.horizon_years <= 0.0 {
            return Err(SimulationError::InvalidParameter {
                name: "horizon_years",
                value: self.horizon_years.to_string(),
                requirement: "must be finite and > 0",
            });
        }
        if self.population == 0 {
            return Err(SimulationError::InvalidParameter {
                name: "population",
                value: self.population.to_string(),
                requirement: "must be > 0",
            });
        }
        Ok(())
    }
}
