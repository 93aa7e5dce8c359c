//! Scenario definitions and batch loading

mod loader;

pub use loader::{default_scenarios, load_scenarios, load_scenarios_from_reader, Scenario};
