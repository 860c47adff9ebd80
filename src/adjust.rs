//! Contextual adjustment of risk factors
//!
//! Rescales a factor's distribution parameters to the organization being
//! assessed: mature compliance programs see lower incident probabilities,
//! while larger and wealthier organizations face proportionally larger
//! absolute losses. Adjustment is copy-on-adjust and never mutates the
//! registry's canonical factors.

use crate::factor::RiskFactor;
use serde::{Deserialize, Serialize};

/// Organization size bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrgSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl OrgSize {
    /// Multiplier applied to impact parameters
    pub fn impact_multiplier(&self) -> f64 {
        match self {
            Self::Small => 0.5,
            Self::Medium => 1.0,
            Self::Large => 2.0,
        }
    }
}

/// Compliance program maturity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceMaturity {
    Low,
    #[default]
    Medium,
    High,
}

impl ComplianceMaturity {
    /// Multiplier applied to occurrence-probability parameters
    pub fn probability_multiplier(&self) -> f64 {
        match self {
            Self::Low => 1.5,
            Self::Medium => 1.0,
            Self::High => 0.7,
        }
    }
}

/// Organizational context for an assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationContext {
    /// Organization name
    pub name: String,

    /// Size bucket
    #[serde(default)]
    pub size: OrgSize,

    /// Annual revenue in USD
    pub annual_revenue: f64,

    /// Compliance program maturity
    #[serde(default)]
    pub compliance_maturity: ComplianceMaturity,
}

impl OrganizationContext {
    /// Revenue-based impact scaling, capped at 10x
    ///
    /// `min(revenue / 10M, 10)`; non-positive revenue scales to zero, which
    /// the assessment surfaces through a reduced confidence score.
    pub fn revenue_multiplier(&self) -> f64 {
        (self.annual_revenue / 10_000_000.0).clamp(0.0, 10.0)
    }
}

/// Pure, non-cumulative factor rescaling
pub struct ContextualAdjuster;

impl ContextualAdjuster {
    /// Return adjusted copies of `factors` for the given organization
    ///
    /// Probability parameters are scaled by the maturity multiplier (for Beta
    /// probabilities this moves only the `scale` parameter). Impact
    /// parameters are scaled by size multiplier times capped revenue
    /// multiplier. The inputs are left untouched.
    pub fn adjust(factors: &[RiskFactor], org: &OrganizationContext) -> Vec<RiskFactor> {
        let probability_factor = org.compliance_maturity.probability_multiplier();
        let impact_factor = org.size.impact_multiplier() * org.revenue_multiplier();

        factors
            .iter()
            .map(|f| RiskFactor {
                id: f.id.clone(),
                category: f.category,
                probability: f.probability.scaled(probability_factor),
                impact: f.impact.scaled(impact_factor),
                weight: f.weight,
                dependencies: f.dependencies.clone(),
            })
            .collect()
    }
}
