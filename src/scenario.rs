//! Scenario variation and sensitivity analysis
//!
//! Re-parameterizes a base scenario along named variations (per-factor
//! probability and impact multipliers) and re-runs the engine for each,
//! enabling what-if analysis. The base scenario's factors are deep-copied per
//! variation; the canonical factors are never mutated.

use crate::engine::{MonteCarloEngine, MonteCarloResult};
use crate::error::Result;
use crate::factor::{RiskFactor, RiskScenario};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

fn one() -> f64 {
    1.0
}

/// Multipliers applied to a single factor's distributions
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FactorAdjustment {
    /// Multiplier on probability-distribution magnitude parameters
    #[serde(default = "one")]
    pub probability_multiplier: f64,

    /// Multiplier on impact-distribution magnitude parameters
    #[serde(default = "one")]
    pub impact_multiplier: f64,
}

impl Default for FactorAdjustment {
    fn default() -> Self {
        Self {
            probability_multiplier: 1.0,
            impact_multiplier: 1.0,
        }
    }
}

/// One named what-if variation over a subset of factor ids
///
/// Factors not referenced by a variation are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioVariation {
    /// Factor id to adjustment
    pub adjustments: HashMap<String, FactorAdjustment>,
}

impl ScenarioVariation {
    /// Variation applying the same adjustment to every factor in a scenario
    pub fn uniform(
        factor_ids: impl IntoIterator<Item = impl Into<String>>,
        adjustment: FactorAdjustment,
    ) -> Self {
        Self {
            adjustments: factor_ids
                .into_iter()
                .map(|id| (id.into(), adjustment))
                .collect(),
        }
    }

    fn apply(&self, factors: &[RiskFactor]) -> Vec<RiskFactor> {
        factors
            .iter()
            .map(|f| match self.adjustments.get(&f.id) {
                Some(adj) => RiskFactor {
                    id: f.id.clone(),
                    category: f.category,
                    probability: f.probability.scaled(adj.probability_multiplier),
                    impact: f.impact.scaled(adj.impact_multiplier),
                    weight: f.weight,
                    dependencies: f.dependencies.clone(),
                },
                None => f.clone(),
            })
            .collect()
    }
}

/// Sensitivity analysis over scenario variations
pub struct ScenarioAnalyzer<'a> {
    engine: &'a MonteCarloEngine,
}

impl<'a> ScenarioAnalyzer<'a> {
    pub fn new(engine: &'a MonteCarloEngine) -> Self {
        Self { engine }
    }

    /// Run the engine once per variation of the base scenario
    ///
    /// Each result is tagged `{base_id}_variation_{n}` with n counting from 0
    /// in variation order.
    pub fn vary(
        &self,
        base: &RiskScenario,
        variations: &[ScenarioVariation],
        num_simulations: usize,
    ) -> Result<Vec<MonteCarloResult>> {
        variations
            .iter()
            .enumerate()
            .map(|(n, variation)| {
                let scenario_id = format!("{}_variation_{}", base.id, n);
                debug!(
                    scenario_id,
                    adjusted_factors = variation.adjustments.len(),
                    "running scenario variation"
                );

                let factors = variation.apply(&base.factors);
                self.engine.run_with(
                    &scenario_id,
                    &factors,
                    num_simulations,
                    self.engine.config().confidence_level,
                )
            })
            .collect()
    }
}
