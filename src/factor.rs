//! Risk factor and scenario definitions
//!
//! A risk factor is an immutable template describing one named source of
//! potential loss: an occurrence probability distribution, a conditional
//! impact distribution, a dampening weight, and informational dependency
//! tags. Scenarios are named collections of factors over a time horizon.

use crate::distribution::DistributionSpec;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Business category of a risk factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Regulatory,
    Operational,
    Financial,
    Reputational,
    Strategic,
    Technology,
    Legal,
}

impl RiskCategory {
    /// Parse a category name, degrading to `Regulatory` for unknown strings
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "regulatory" => Self::Regulatory,
            "operational" => Self::Operational,
            "financial" => Self::Financial,
            "reputational" => Self::Reputational,
            "strategic" => Self::Strategic,
            "technology" => Self::Technology,
            "legal" => Self::Legal,
            _ => Self::Regulatory,
        }
    }

    /// Human-readable category name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Regulatory => "regulatory",
            Self::Operational => "operational",
            Self::Financial => "financial",
            Self::Reputational => "reputational",
            Self::Strategic => "strategic",
            Self::Technology => "technology",
            Self::Legal => "legal",
        }
    }
}

/// A single named source of potential loss
///
/// Created at registry-load time and never mutated. Simulation runs operate
/// on copies whose distribution parameters may have been rescaled by the
/// contextual adjuster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    /// Factor identifier (e.g., "gdpr_data_breach")
    pub id: String,

    /// Business category
    pub category: RiskCategory,

    /// Probability of occurrence per trial, drawn fresh each trial
    pub probability: DistributionSpec,

    /// Monetary impact conditional on occurrence
    pub impact: DistributionSpec,

    /// Dampening weight in [0, 1] applied to realized impact
    pub weight: f64,

    /// Ids of related factors. Informational only; sampling treats all
    /// factors as independent.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl RiskFactor {
    /// Theoretical worst single-trial loss for this factor
    ///
    /// Largest impact parameter times weight; used to normalize the overall
    /// risk score against a worst-case ceiling.
    pub fn max_weighted_impact(&self) -> f64 {
        self.impact.upper_bound() * self.weight
    }
}

/// A named, ordered collection of risk factors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskScenario {
    /// Scenario identifier
    pub id: String,

    /// Factors simulated in this scenario
    pub factors: Vec<RiskFactor>,

    /// Time horizon in days
    pub time_horizon_days: u32,

    /// Pairwise factor correlations. Declared for forward compatibility but
    /// not consulted by the engine: all factors are sampled independently.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_matrix: Option<DMatrix<f64>>,
}

impl RiskScenario {
    /// Create a scenario over the default one-year horizon
    pub fn new(id: impl Into<String>, factors: Vec<RiskFactor>) -> Self {
        Self {
            id: id.into(),
            factors,
            time_horizon_days: 365,
            correlation_matrix: None,
        }
    }

    /// Sum of theoretical worst-case weighted impacts across all factors
    pub fn max_theoretical_loss(&self) -> f64 {
        self.factors.iter().map(RiskFactor::max_weighted_impact).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breach_factor() -> RiskFactor {
        RiskFactor {
            id: "gdpr_data_breach".to_string(),
            category: RiskCategory::Regulatory,
            probability: DistributionSpec::Beta {
                alpha: 2.0,
                beta: 8.0,
                scale: 0.1,
            },
            impact: DistributionSpec::Triangular {
                left: 50_000.0,
                mode: 500_000.0,
                right: 20_000_000.0,
            },
            weight: 0.9,
            dependencies: vec![],
        }
    }

    #[test]
    fn test_category_from_name_fallback() {
        assert_eq!(RiskCategory::from_name("technology"), RiskCategory::Technology);
        assert_eq!(RiskCategory::from_name("LEGAL"), RiskCategory::Legal);
        assert_eq!(RiskCategory::from_name("astrology"), RiskCategory::Regulatory);
    }

    #[test]
    fn test_max_weighted_impact() {
        let factor = breach_factor();
        assert!((factor.max_weighted_impact() - 20_000_000.0 * 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_scenario_theoretical_loss_sums_factors() {
        let scenario = RiskScenario::new("test", vec![breach_factor(), breach_factor()]);
        assert!((scenario.max_theoretical_loss() - 2.0 * 18_000_000.0).abs() < 1e-6);
        assert_eq!(scenario.time_horizon_days, 365);
    }

    #[test]
    fn test_factor_yaml_round_trip() {
        let yaml = r#"
id: pci_cardholder_breach
category: technology
probability:
  kind: beta
  alpha: 2.0
  beta: 6.0
  scale: 0.15
impact:
  kind: uniform
  low: 5000.0
  high: 500000.0
weight: 0.8
"#;

        let factor: RiskFactor = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(factor.category, RiskCategory::Technology);
        assert!(factor.dependencies.is_empty());
        assert_eq!(
            factor.impact,
            DistributionSpec::Uniform {
                low: 5000.0,
                high: 500_000.0
            }
        );
    }
}
