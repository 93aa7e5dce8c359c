//! Scenario loading from CSV
//!
//! A scenario file has one row per run:
//! `name,hazard_rate,horizon_years,population`
//! The population column may be omitted, in which case the default
//! portfolio size is used.

use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::simulation::{SimulationConfig, DEFAULT_POPULATION};

/// One named parameter set in a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub hazard_rate: f64,
    pub horizon_years: f64,
    #[serde(default = "default_population")]
    pub population: u64,
}

fn default_population() -> u64 {
    DEFAULT_POPULATION
}

impl Scenario {
    /// Engine configuration for this scenario
    pub fn to_config(&self) -> SimulationConfig {
        SimulationConfig {
            hazard_rate: self.hazard_rate,
            horizon_years: self.horizon_years,
            population: self.population,
        }
    }
}

/// Load scenarios from a CSV file
pub fn load_scenarios<P: AsRef<Path>>(path: P) -> Result<Vec<Scenario>, Box<dyn Error>> {
    let file = File::open(path)?;
    load_scenarios_from_reader(file)
}

/// Load scenarios from any reader
pub fn load_scenarios_from_reader<R: Read>(reader: R) -> Result<Vec<Scenario>, Box<dyn Error>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut scenarios = Vec::new();

    for record in csv_reader.deserialize() {
        let scenario: Scenario = record?;
        scenarios.push(scenario);
    }

    Ok(scenarios)
}

/// Built-in stress grid used when no scenario file is supplied
///
/// Sweeps hazard rates around the 5% baseline across one-, three-, and
/// five-year horizons.
pub fn default_scenarios() -> Vec<Scenario> {
    let hazard_rates = [0.01, 0.03, 0.05, 0.08, 0.12];
    let horizons = [1.0, 3.0, 5.0];

    let mut scenarios = Vec::with_capacity(hazard_rates.len() * horizons.len());
    for &hazard_rate in &hazard_rates {
        for &horizon_years in &horizons {
            scenarios.push(Scenario {
                name: format!("h{:.0}bp_{:.0}y", hazard_rate * 10_000.0, horizon_years),
                hazard_rate,
                horizon_years,
                population: DEFAULT_POPULATION,
            });
        }
    }

    scenarios
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_reader() {
        let csv = "name,hazard_rate,horizon_years,population\n\
                   base,0.05,1.0,10000000\n\
                   stressed,0.12,3.0,5000000\n";
        let scenarios = load_scenarios_from_reader(csv.as_bytes()).expect("parse");

        assert_eq!(scenarios.len(), 2);
        assert_eq!(scenarios[0].name, "base");
        assert_eq!(scenarios[0].population, 10_000_000);
        assert_eq!(scenarios[1].hazard_rate, 0.12);
        assert_eq!(scenarios[1].horizon_years, 3.0);
        assert_eq!(scenarios[1].population, 5_000_000);
    }

    #[test]
    fn test_missing_population_column_uses_default() {
        let csv = "name,hazard_rate,horizon_years\n\
                   base,0.05,1.0\n";
        let scenarios = load_scenarios_from_reader(csv.as_bytes()).expect("parse");

        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].population, DEFAULT_POPULATION);
    }

    #[test]
    fn test_malformed_row_is_an_error() {
        let csv = "name,hazard_rate,horizon_years,population\n\
                   base,not_a_number,1.0,1000\n";
        assert!(load_scenarios_from_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_default_scenarios_are_valid() {
        let scenarios = default_scenarios();
        assert_eq!(scenarios.len(), 15);
        for scenario in &scenarios {
            assert!(
                scenario.to_config().validate().is_ok(),
                "scenario `{}` failed validation",
                scenario.name
            );
        }
    }

    #[test]
    fn test_default_scenario_names_are_unique() {
        let scenarios = default_scenarios();
        let mut names: Vec<&str> = scenarios.iter().map(|s| s.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), scenarios.len());
    }
}
