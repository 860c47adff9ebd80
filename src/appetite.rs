//! Risk appetite derivation
//!
//! Derives tolerance thresholds from financial constraints. Pure arithmetic,
//! independent of simulation: the output is a policy reference consumed
//! alongside assessment results, never fed back into the engine.

use crate::adjust::OrganizationContext;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Share of annual revenue used when no explicit budget is given
const DEFAULT_BUDGET_REVENUE_SHARE: f64 = 0.02;

/// GDPR administrative fine ceiling: 4% of revenue or the statutory cap
const GDPR_REVENUE_SHARE: f64 = 0.04;
const GDPR_STATUTORY_CAP: f64 = 20_000_000.0;

/// Annual statutory caps for the other supported regulations
const HIPAA_ANNUAL_CAP: f64 = 1_500_000.0;
const SOX_STATUTORY_CAP: f64 = 5_000_000.0;
const PCI_DSS_ANNUAL_CAP: f64 = 1_200_000.0;

/// Caller-supplied financial constraints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinancialConstraints {
    /// Explicit annual risk budget; defaults to 2% of annual revenue
    #[serde(default)]
    pub max_annual_risk_budget: Option<f64>,
}

/// Tiered loss-tolerance thresholds as fractions of the risk budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskToleranceLevels {
    /// 10% of budget
    pub minimal: f64,

    /// 25% of budget
    pub low: f64,

    /// 50% of budget
    pub moderate: f64,

    /// 100% of budget
    pub full: f64,
}

/// Derived risk appetite thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAppetite {
    /// Annual risk budget in USD
    pub risk_budget: f64,

    /// Largest acceptable single loss (50% of budget)
    pub maximum_single_loss: f64,

    /// Acceptable aggregate annual loss (equals the budget)
    pub maximum_annual_aggregate: f64,

    /// Four-tier tolerance thresholds
    pub risk_tolerance_levels: RiskToleranceLevels,

    /// Statutory fine ceilings per supported regulation
    pub regulatory_ceilings: HashMap<String, f64>,
}

/// Derives appetite thresholds from financial constraints
pub struct RiskAppetiteCalculator;

impl RiskAppetiteCalculator {
    /// Compute appetite thresholds for an organization
    pub fn compute(org: &OrganizationContext, constraints: &FinancialConstraints) -> RiskAppetite {
        let revenue = org.annual_revenue.max(0.0);
        let risk_budget = constraints
            .max_annual_risk_budget
            .unwrap_or(revenue * DEFAULT_BUDGET_REVENUE_SHARE)
            .max(0.0);

        let mut regulatory_ceilings = HashMap::new();
        regulatory_ceilings.insert(
            "gdpr".to_string(),
            (revenue * GDPR_REVENUE_SHARE).min(GDPR_STATUTORY_CAP),
        );
        regulatory_ceilings.insert("hipaa".to_string(), HIPAA_ANNUAL_CAP);
        regulatory_ceilings.insert("sox".to_string(), SOX_STATUTORY_CAP);
        regulatory_ceilings.insert("pci_dss".to_string(), PCI_DSS_ANNUAL_CAP);

        RiskAppetite {
            risk_budget,
            maximum_single_loss: 0.5 * risk_budget,
            maximum_annual_aggregate: risk_budget,
            risk_tolerance_levels: RiskToleranceLevels {
                minimal: 0.10 * risk_budget,
                low: 0.25 * risk_budget,
                moderate: 0.50 * risk_budget,
                full: risk_budget,
            },
            regulatory_ceilings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjust::{ComplianceMaturity, OrgSize};

    fn org(revenue: f64) -> OrganizationContext {
        OrganizationContext {
            name: "Acme".to_string(),
            size: OrgSize::Medium,
            annual_revenue: revenue,
            compliance_maturity: ComplianceMaturity::Medium,
        }
    }

    #[test]
    fn test_default_budget_from_revenue() {
        let appetite =
            RiskAppetiteCalculator::compute(&org(10_000_000.0), &FinancialConstraints::default());

        assert_eq!(appetite.risk_budget, 200_000.0);
        assert_eq!(appetite.maximum_single_loss, 100_000.0);
        assert_eq!(appetite.maximum_annual_aggregate, 200_000.0);
    }

    #[test]
    fn test_explicit_budget_overrides_revenue() {
        let constraints = FinancialConstraints {
            max_annual_risk_budget: Some(1_000_000.0),
        };
        let appetite = RiskAppetiteCalculator::compute(&org(10_000_000.0), &constraints);

        assert_eq!(appetite.risk_budget, 1_000_000.0);
        assert_eq!(appetite.maximum_single_loss, 500_000.0);
    }

    #[test]
    fn test_tolerance_tiers() {
        let appetite =
            RiskAppetiteCalculator::compute(&org(10_000_000.0), &FinancialConstraints::default());
        let tiers = &appetite.risk_tolerance_levels;

        assert_eq!(tiers.minimal, 20_000.0);
        assert_eq!(tiers.low, 50_000.0);
        assert_eq!(tiers.moderate, 100_000.0);
        assert_eq!(tiers.full, 200_000.0);
    }

    #[test]
    fn test_gdpr_ceiling_capped_by_statute() {
        // 4% of 100M = 4M, below the 20M cap
        let appetite =
            RiskAppetiteCalculator::compute(&org(100_000_000.0), &FinancialConstraints::default());
        assert_eq!(appetite.regulatory_ceilings["gdpr"], 4_000_000.0);

        // 4% of 1B = 40M, capped at 20M
        let appetite = RiskAppetiteCalculator::compute(
            &org(1_000_000_000.0),
            &FinancialConstraints::default(),
        );
        assert_eq!(appetite.regulatory_ceilings["gdpr"], 20_000_000.0);
    }

    #[test]
    fn test_negative_revenue_degrades_to_zero_budget() {
        let appetite =
            RiskAppetiteCalculator::compute(&org(-5.0), &FinancialConstraints::default());

        assert_eq!(appetite.risk_budget, 0.0);
        assert_eq!(appetite.maximum_single_loss, 0.0);
        assert_eq!(appetite.regulatory_ceilings["gdpr"], 0.0);
    }
}
