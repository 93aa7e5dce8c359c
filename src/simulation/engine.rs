//! Chunked Monte Carlo engine
//!
//! The portfolio is partitioned into fixed-size chunks. Each chunk owns
//! a private `Pcg64` stream derived from the base seed and the chunk
//! index, so the default count for a given seed is identical whether the
//! chunks run sequentially or across any number of rayon workers.

use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info};
use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Pcg64;
use rayon::prelude::*;

use super::{SimulationConfig, SimulationResult};
use crate::error::SimulationError;

/// Loans per worker chunk
///
/// Fixed rather than derived from the thread count so the chunk-to-seed
/// mapping (and therefore the count) does not change with the pool size.
pub const CHUNK_LOANS: u64 = 65_536;

/// Probability that one loan defaults within `horizon_years`
///
/// Exponential time-to-default CDF: `1 - exp(-hazard_rate * horizon_years)`.
/// Invariant across the portfolio, so callers evaluate it once per run.
pub fn default_probability(hazard_rate: f64, horizon_years: f64) -> f64 {
    1.0 - (-hazard_rate * horizon_years).exp()
}

/// Draw a 64-bit seed from the OS entropy source
pub fn entropy_seed() -> Result<u64, SimulationError> {
    let mut bytes = [0u8; 8];
    rand::rngs::OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| SimulationError::RandomSource(e.to_string()))?;
    Ok(u64::from_le_bytes(bytes))
}

/// Monte Carlo engine for one validated configuration
///
/// Pure compute: no I/O and no timing. Callers that want wall-clock cost
/// measure around the `run` call.
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    config: SimulationConfig,
    pd: f64,
}

impl SimulationEngine {
    /// Validate the configuration and precompute the per-loan default
    /// probability
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let pd = default_probability(config.hazard_rate, config.horizon_years);
        Ok(Self { config, pd })
    }

    /// Per-loan default probability for this configuration
    pub fn probability_of_default(&self) -> f64 {
        self.pd
    }

    /// Configuration this engine was built from
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run the simulation across all available rayon workers
    pub fn run(&self, seed: u64) -> SimulationResult {
        info!(
            "starting simulation: population={} hazard_rate={} horizon_years={} seed={}",
            self.config.population, self.config.hazard_rate, self.config.horizon_years, seed
        );
        debug!(
            "partitioned into {} chunks of up to {} loans",
            self.chunk_count(),
            CHUNK_LOANS
        );

        let default_count = (0..self.chunk_count())
            .into_par_iter()
            .map(|chunk| self.run_chunk(seed, chunk))
            .sum();

        SimulationResult {
            default_count,
            population: self.config.population,
        }
    }

    /// Run every chunk on the calling thread
    ///
    /// Chunk seeds match `run`, so both entry points produce the same
    /// count for the same seed.
    pub fn run_sequential(&self, seed: u64) -> SimulationResult {
        let default_count = (0..self.chunk_count())
            .map(|chunk| self.run_chunk(seed, chunk))
            .sum();

        SimulationResult {
            default_count,
            population: self.config.population,
        }
    }

    /// Run with an external stop signal, checked once per chunk
    ///
    /// An aborted run returns `Cancelled` rather than a partial count: a
    /// sum over a subset of chunks is not an estimate for the configured
    /// portfolio.
    pub fn run_with_cancel(
        &self,
        seed: u64,
        cancel: &AtomicBool,
    ) -> Result<SimulationResult, SimulationError> {
        let counts: Vec<Option<u64>> = (0..self.chunk_count())
            .into_par_iter()
            .map(|chunk| {
                if cancel.load(Ordering::Relaxed) {
                    return None;
                }
                Some(self.run_chunk(seed, chunk))
            })
            .collect();

        let mut default_count = 0u64;
        for count in counts {
            match count {
                Some(c) => default_count += c,
                None => return Err(SimulationError::Cancelled),
            }
        }

        Ok(SimulationResult {
            default_count,
            population: self.config.population,
        })
    }

    fn chunk_count(&self) -> u64 {
        self.config.population.div_ceil(CHUNK_LOANS)
    }

    /// Draw one chunk's worth of trials and count the defaults
    fn run_chunk(&self, seed: u64, chunk: u64) -> u64 {
        let first = chunk * CHUNK_LOANS;
        let len = CHUNK_LOANS.min(self.config.population - first);

        let mut rng = Pcg64::seed_from_u64(chunk_seed(seed, chunk));
        let mut defaults = 0u64;
        for _ in 0..len {
            let roll: f64 = rng.gen();
            if roll < self.pd {
                defaults += 1;
            }
        }
        defaults
    }
}

/// SplitMix64 mix of the base seed and chunk index
///
/// Adjacent chunk indices map to decorrelated stream seeds, keeping the
/// per-chunk generators statistically independent.
fn chunk_seed(base: u64, chunk: u64) -> u64 {
    let mut z = base.wrapping_add(chunk.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn engine(hazard_rate: f64, horizon_years: f64, population: u64) -> SimulationEngine {
        let config = SimulationConfig::new(hazard_rate, horizon_years, population)
            .expect("valid test config");
        SimulationEngine::new(config).expect("valid test engine")
    }

    #[test]
    fn test_default_probability_reference_value() {
        // 1 - exp(-0.05 * 1.0)
        assert_relative_eq!(default_probability(0.05, 1.0), 0.04877058, epsilon = 1e-7);
    }

    #[test]
    fn test_default_probability_zero_hazard() {
        assert_eq!(default_probability(0.0, 1.0), 0.0);
        assert_eq!(default_probability(0.0, 30.0), 0.0);
    }

    #[test]
    fn test_default_probability_compounds_over_horizon() {
        // Survival is multiplicative: S(2) = S(1)^2
        let one_year = default_probability(0.05, 1.0);
        let two_years = default_probability(0.05, 2.0);
        assert!(two_years > one_year);
        assert_relative_eq!(
            1.0 - two_years,
            (1.0 - one_year) * (1.0 - one_year),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        assert!(SimulationEngine::new(SimulationConfig {
            hazard_rate: 0.0,
            ..Default::default()
        })
        .is_err());
        assert!(SimulationEngine::new(SimulationConfig {
            horizon_years: -1.0,
            ..Default::default()
        })
        .is_err());
        assert!(SimulationEngine::new(SimulationConfig {
            population: 0,
            ..Default::default()
        })
        .is_err());
    }

    #[test]
    fn test_count_bounded_by_population() {
        let result = engine(0.5, 1.0, 200_000).run(7);
        assert_eq!(result.population, 200_000);
        assert!(result.default_count <= result.population);
    }

    #[test]
    fn test_same_seed_reproduces_count() {
        let sim = engine(0.05, 1.0, 1_000_000);
        assert_eq!(sim.run(42).default_count, sim.run(42).default_count);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sim = engine(0.05, 1.0, 1_000_000);
        assert_eq!(
            sim.run(99).default_count,
            sim.run_sequential(99).default_count
        );
    }

    #[test]
    fn test_partial_final_chunk() {
        // Population that is not a multiple of the chunk size still
        // simulates every loan exactly once
        let sim = engine(1.0, 50.0, CHUNK_LOANS + 10);
        let result = sim.run_sequential(5);
        assert_eq!(result.population, CHUNK_LOANS + 10);
        // PD at hazard 1.0 over 50 years is ~1, so nearly every loan defaults
        assert!(result.default_count > CHUNK_LOANS);
    }

    #[test]
    fn test_small_population_single_chunk() {
        let result = engine(0.05, 1.0, 10).run(3);
        assert_eq!(result.population, 10);
        assert!(result.default_count <= 10);
    }

    #[test]
    fn test_zero_probability_counts_nothing() {
        // Counting kernel with the threshold forced to 0: every roll
        // lands in [0, 1) and survives
        let config = SimulationConfig::new(0.05, 1.0, 100_000).unwrap();
        let sim = SimulationEngine { config, pd: 0.0 };
        assert_eq!(sim.run(123).default_count, 0);
    }

    #[test]
    fn test_certain_probability_defaults_everyone() {
        let config = SimulationConfig::new(0.05, 1.0, 100_000).unwrap();
        let sim = SimulationEngine { config, pd: 1.0 };
        assert_eq!(sim.run(123).default_count, 100_000);
    }

    #[test]
    fn test_count_within_five_sigma_of_binomial_mean() {
        // population 10M, hazard 5%, 1 year: mean ~ 487,706, sigma ~ 681
        let sim = engine(0.05, 1.0, 10_000_000);
        let result = sim.run(20_260_806);

        let n = result.population as f64;
        let pd = sim.probability_of_default();
        let mean = n * pd;
        let sigma = (n * pd * (1.0 - pd)).sqrt();
        let diff = (result.default_count as f64 - mean).abs();
        assert!(
            diff < 5.0 * sigma,
            "count {} deviates {:.0} from mean {:.0} (sigma {:.0})",
            result.default_count,
            diff,
            mean,
            sigma
        );
    }

    #[test]
    fn test_cancel_before_start() {
        let sim = engine(0.05, 1.0, 1_000_000);
        let cancel = AtomicBool::new(true);
        assert!(matches!(
            sim.run_with_cancel(1, &cancel),
            Err(SimulationError::Cancelled)
        ));
    }

    #[test]
    fn test_uncancelled_run_matches_plain_run() {
        let sim = engine(0.05, 1.0, 500_000);
        let cancel = AtomicBool::new(false);
        let result = sim.run_with_cancel(5, &cancel).expect("not cancelled");
        assert_eq!(result.default_count, sim.run(5).default_count);
    }

    #[test]
    fn test_chunk_seeds_are_distinct() {
        let s0 = chunk_seed(42, 0);
        let s1 = chunk_seed(42, 1);
        let s2 = chunk_seed(43, 0);
        assert_ne!(s0, s1);
        assert_ne!(s0, s2);
    }

    #[test]
    fn test_entropy_seed_available() {
        assert!(entropy_seed().is_ok());
    }
}
