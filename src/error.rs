//! Error taxonomy for the simulation engine

use thiserror::Error;

/// Errors surfaced by the simulation engine
///
/// All variants are fatal to the call that produced them; the engine
/// never returns a partial count alongside an error.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// A configuration field is outside its valid domain
    #[error("invalid parameter `{name}`: {value} ({requirement})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        requirement: &'static str,
    },

    /// The OS entropy source failed while deriving a seed
    #[error("random source failure: {0}")]
    RandomSource(String),

    /// The run was aborted before all chunks completed
    #[error("simulation cancelled before completion")]
    Cancelled,
}
