//! Monte Carlo simulation engine
//!
//! Runs N independent trials over a set of risk factors. In each trial every
//! factor draws an occurrence probability from its probability distribution
//! and, if a fresh uniform draw realizes the event, accrues a weighted impact
//! draw into the trial total and the factor's contribution series.
//!
//! Factors are sampled independently; the correlation matrix declared on
//! [`crate::factor::RiskScenario`] is not consulted.
//!
//! ## Reproducibility
//!
//! Trials are partitioned into fixed-size chunks. Each chunk owns a sub-stream
//! RNG seeded deterministically from the master seed and the chunk index, and
//! chunk outputs are concatenated in chunk order before any tail metric is
//! computed. A fixed seed therefore produces bit-identical loss vectors
//! regardless of how rayon schedules the chunks.

use crate::error::{Result, RiskError};
use crate::factor::RiskFactor;
use crate::metrics::{DistributionMoments, RiskMetrics, RiskMetricsCalculator};
use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Default number of trials per run
    pub num_simulations: usize,

    /// Confidence level for the headline VaR (e.g., 0.95)
    pub confidence_level: f64,

    /// Master seed for reproducible runs (None = entropy-seeded)
    pub seed: Option<u64>,

    /// Trials per parallel chunk
    pub chunk_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            num_simulations: 10_000,
            confidence_level: 0.95,
            seed: None,
            chunk_size: 1024,
        }
    }
}

/// Result of one engine invocation, immutable thereafter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloResult {
    /// Scenario the run was tagged with
    pub scenario_id: String,

    /// Number of trials executed
    pub num_simulations: usize,

    /// Confidence level the run was configured with
    pub confidence_level: f64,

    /// Raw per-trial total losses, in trial order
    pub simulation_data: Vec<f64>,

    /// Percentile table at {5, 10, 25, 50, 75, 90, 95, 99}
    pub percentiles: BTreeMap<u32, f64>,

    /// Tail-risk metrics
    pub metrics: RiskMetrics,

    /// Distribution moments of the loss vector
    pub moments: DistributionMoments,

    /// Each factor's mean contribution normalized by overall mean loss
    pub risk_contributions: HashMap<String, f64>,

    /// Timestamp of the run
    pub timestamp: DateTime<Utc>,
}

/// Per-chunk simulation output, merged by concatenation
struct ChunkOutput {
    losses: Vec<f64>,
    factor_sums: Vec<f64>,
}

/// Monte Carlo simulation engine
pub struct MonteCarloEngine {
    config: EngineConfig,
}

impl MonteCarloEngine {
    /// Create an engine with the given configuration
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the configured number of trials over `factors`
    pub fn run(&self, scenario_id: &str, factors: &[RiskFactor]) -> Result<MonteCarloResult> {
        self.run_with(
            scenario_id,
            factors,
            self.config.num_simulations,
            self.config.confidence_level,
        )
    }

    /// Run `num_simulations` trials at an explicit confidence level
    pub fn run_with(
        &self,
        scenario_id: &str,
        factors: &[RiskFactor],
        num_simulations: usize,
        confidence_level: f64,
    ) -> Result<MonteCarloResult> {
        if num_simulations == 0 {
            return Err(RiskError::ZeroSimulations);
        }
        if confidence_level <= 0.0 || confidence_level >= 1.0 {
            return Err(RiskError::InvalidConfidenceLevel(confidence_level));
        }
        if factors.is_empty() {
            return Err(RiskError::EmptyScenario);
        }

        debug!(
            scenario_id,
            num_simulations,
            num_factors = factors.len(),
            "running monte carlo simulation"
        );

        let master_seed = self
            .config
            .seed
            .unwrap_or_else(|| rand::rngs::StdRng::from_entropy().gen());

        let chunk_size = self.config.chunk_size.max(1);
        let num_chunks = (num_simulations + chunk_size - 1) / chunk_size;

        let chunks: Vec<ChunkOutput> = (0..num_chunks)
            .into_par_iter()
            .map(|chunk_index| {
                let offset = chunk_index * chunk_size;
                let trials = chunk_size.min(num_simulations - offset);
                let seed = chunk_seed(master_seed, chunk_index);
                simulate_chunk(factors, trials, seed)
            })
            .collect();

        // Merge: losses by concatenation in chunk order, factor sums by
        // elementwise addition (the per-factor mean is associative).
        let mut losses = Vec::with_capacity(num_simulations);
        let mut factor_sums = vec![0.0; factors.len()];
        for chunk in chunks {
            losses.extend(chunk.losses);
            for (total, part) in factor_sums.iter_mut().zip(chunk.factor_sums) {
                *total += part;
            }
        }

        let mut sorted = losses.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

        let metrics = RiskMetricsCalculator::tail_metrics(&sorted);
        let moments = RiskMetricsCalculator::moments(&sorted);

        let factor_means: Vec<(String, f64)> = factors
            .iter()
            .zip(&factor_sums)
            .map(|(f, sum)| (f.id.clone(), sum / num_simulations as f64))
            .collect();
        let risk_contributions =
            RiskMetricsCalculator::risk_contributions(&factor_means, moments.mean);

        info!(
            scenario_id,
            var_95 = metrics.var_95,
            mean_loss = moments.mean,
            probability_of_loss = metrics.probability_of_loss,
            "simulation complete"
        );

        Ok(MonteCarloResult {
            scenario_id: scenario_id.to_string(),
            num_simulations,
            confidence_level,
            simulation_data: losses,
            percentiles: RiskMetricsCalculator::percentile_table(&sorted),
            metrics,
            moments,
            risk_contributions,
            timestamp: Utc::now(),
        })
    }
}

impl Default for MonteCarloEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Derive a chunk's sub-stream seed from the master seed (splitmix increment)
fn chunk_seed(master_seed: u64, chunk_index: usize) -> u64 {
    master_seed.wrapping_add((chunk_index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Simulate one chunk of trials with its own RNG sub-stream
fn simulate_chunk(factors: &[RiskFactor], trials: usize, seed: u64) -> ChunkOutput {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut losses = Vec::with_capacity(trials);
    let mut factor_sums = vec![0.0; factors.len()];

    for _ in 0..trials {
        let mut total = 0.0;

        for (k, factor) in factors.iter().enumerate() {
            let p = factor.probability.sample(&mut rng).clamp(0.0, 1.0);
            if rng.gen::<f64>() < p {
                let loss = factor.impact.sample(&mut rng) * factor.weight;
                total += loss;
                factor_sums[k] += loss;
            }
        }

        losses.push(total);
    }

    ChunkOutput {
        losses,
        factor_sums,
    }
}
