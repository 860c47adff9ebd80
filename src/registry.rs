//! Risk factor catalog and scenario templates
//!
//! The registry holds the canonical set of risk factors with
//! literature-plausible distribution parameters, plus named scenario
//! templates mapping regulations to curated factor subsets. It is constructed
//! explicitly and passed by reference; there are no ambient singletons.
//! Catalogs can also be loaded from YAML or JSON documents.

use crate::distribution::DistributionSpec;
use crate::error::{Result, RiskError};
use crate::factor::{RiskCategory, RiskFactor, RiskScenario};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Catalog document shape for YAML/JSON loading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorCatalog {
    /// Factor definitions
    pub factors: Vec<RiskFactor>,

    /// Scenario templates: scenario id to member factor ids
    #[serde(default)]
    pub scenarios: HashMap<String, Vec<String>>,
}

/// Catalog of named risk factors and scenario templates
pub struct RiskFactorRegistry {
    factors: HashMap<String, RiskFactor>,
    scenarios: HashMap<String, Vec<String>>,
}

impl RiskFactorRegistry {
    /// Create a registry from an explicit catalog
    pub fn new(catalog: FactorCatalog) -> Self {
        let factors = catalog
            .factors
            .into_iter()
            .map(|f| (f.id.clone(), f))
            .collect();

        Self {
            factors,
            scenarios: catalog.scenarios,
        }
    }

    /// Load a catalog from a YAML document
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let catalog: FactorCatalog =
            serde_yaml::from_str(yaml).map_err(|e| RiskError::CatalogParse(e.to_string()))?;
        Ok(Self::new(catalog))
    }

    /// Load a catalog from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let catalog: FactorCatalog =
            serde_json::from_str(json).map_err(|e| RiskError::CatalogParse(e.to_string()))?;
        Ok(Self::new(catalog))
    }

    /// Built-in catalog covering GDPR, HIPAA, SOX and PCI DSS
    pub fn builtin() -> Self {
        Self::new(builtin_catalog())
    }

    /// Look up a factor by id
    ///
    /// Missing ids are a caller programming error, not degradable input.
    pub fn get_factor(&self, id: &str) -> Result<&RiskFactor> {
        self.factors
            .get(id)
            .ok_or_else(|| RiskError::UnknownFactor(id.to_string()))
    }

    /// Materialize a named scenario template
    pub fn get_scenario(&self, id: &str) -> Result<RiskScenario> {
        let member_ids = self
            .scenarios
            .get(id)
            .ok_or_else(|| RiskError::UnknownScenario(id.to_string()))?;

        let factors = member_ids
            .iter()
            .map(|fid| self.get_factor(fid).cloned())
            .collect::<Result<Vec<_>>>()?;

        Ok(RiskScenario::new(id, factors))
    }

    /// Whether a regulation name maps to a curated scenario template
    pub fn is_known_regulation(&self, regulation: &str) -> bool {
        self.scenarios.contains_key(&regulation_key(regulation))
    }

    /// Build a scenario for a regulation name
    ///
    /// The name is case-folded and normalized (e.g., "PCI-DSS" and "pci dss"
    /// both match). Unmatched names fall back to the minimal generic scenario
    /// rather than failing; a catalog without a generic template yields an
    /// empty fallback, which only custom factors can populate. Custom
    /// factors, if given, are appended to the curated set.
    pub fn build_scenario_for_regulation(
        &self,
        regulation: &str,
        custom_factors: Option<Vec<RiskFactor>>,
    ) -> RiskScenario {
        static NO_MEMBERS: Vec<String> = Vec::new();

        let key = regulation_key(regulation);
        let (id, member_ids) = match self.scenarios.get(&key) {
            Some(ids) => (key, ids),
            None => (
                GENERIC_SCENARIO.to_string(),
                self.scenarios.get(GENERIC_SCENARIO).unwrap_or(&NO_MEMBERS),
            ),
        };

        let mut factors: Vec<RiskFactor> = member_ids
            .iter()
            .filter_map(|fid| self.factors.get(fid).cloned())
            .collect();

        if let Some(custom) = custom_factors {
            factors.extend(custom);
        }

        RiskScenario::new(id, factors)
    }

    /// All registered factor ids
    pub fn factor_ids(&self) -> Vec<&str> {
        self.factors.keys().map(String::as_str).collect()
    }
}

impl Default for RiskFactorRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

const GENERIC_SCENARIO: &str = "generic";

/// Normalize a regulation name to a scenario key
fn regulation_key(regulation: &str) -> String {
    regulation
        .trim()
        .to_lowercase()
        .replace([' ', '-'], "_")
        .replace("__", "_")
}

fn factor(
    id: &str,
    category: RiskCategory,
    probability: DistributionSpec,
    impact: DistributionSpec,
    weight: f64,
    dependencies: &[&str],
) -> RiskFactor {
    RiskFactor {
        id: id.to_string(),
        category,
        probability,
        impact,
        weight,
        dependencies: dependencies.iter().map(|d| d.to_string()).collect(),
    }
}

/// Seed catalog with literature-plausible parameters
///
/// Probabilities are low-rate Betas; impacts span statutory minimum, likely
/// and maximum penalty levels (Triangular) or heavy-tailed remediation cost
/// models (Exponential/Gamma).
fn builtin_catalog() -> FactorCatalog {
    use DistributionSpec::{Beta, Exponential, Gamma, Triangular, Uniform};
    use RiskCategory::*;

    let factors = vec![
        factor(
            "gdpr_data_breach",
            Regulatory,
            Beta { alpha: 2.0, beta: 8.0, scale: 0.1 },
            Triangular { left: 50_000.0, mode: 500_000.0, right: 20_000_000.0 },
            0.9,
            &["gdpr_vendor_oversight_gap"],
        ),
        factor(
            "gdpr_consent_violation",
            Legal,
            Beta { alpha: 3.0, beta: 12.0, scale: 0.2 },
            Uniform { low: 10_000.0, high: 2_000_000.0 },
            0.7,
            &[],
        ),
        factor(
            "gdpr_vendor_oversight_gap",
            Operational,
            Beta { alpha: 3.0, beta: 10.0, scale: 0.25 },
            Exponential { scale: 400_000.0 },
            0.6,
            &[],
        ),
        factor(
            "hipaa_phi_breach",
            Regulatory,
            Beta { alpha: 2.0, beta: 9.0, scale: 0.12 },
            Triangular { left: 25_000.0, mode: 250_000.0, right: 1_500_000.0 },
            0.85,
            &["hipaa_access_control_gap"],
        ),
        factor(
            "hipaa_access_control_gap",
            Technology,
            Beta { alpha: 3.0, beta: 10.0, scale: 0.2 },
            Gamma { shape: 2.0, scale: 60_000.0 },
            0.6,
            &[],
        ),
        factor(
            "sox_reporting_misstatement",
            Financial,
            Beta { alpha: 2.0, beta: 12.0, scale: 0.1 },
            Triangular { left: 100_000.0, mode: 1_000_000.0, right: 5_000_000.0 },
            0.9,
            &["sox_control_deficiency"],
        ),
        factor(
            "sox_control_deficiency",
            Operational,
            Beta { alpha: 3.0, beta: 9.0, scale: 0.25 },
            Uniform { low: 50_000.0, high: 1_500_000.0 },
            0.7,
            &[],
        ),
        factor(
            "pci_cardholder_breach",
            Technology,
            Beta { alpha: 2.0, beta: 7.0, scale: 0.15 },
            Triangular { left: 20_000.0, mode: 200_000.0, right: 2_000_000.0 },
            0.85,
            &[],
        ),
        factor(
            "pci_noncompliance_fine",
            Regulatory,
            Beta { alpha: 3.0, beta: 10.0, scale: 0.3 },
            Uniform { low: 5_000.0, high: 100_000.0 },
            0.5,
            &[],
        ),
        factor(
            "generic_compliance_gap",
            Operational,
            Beta { alpha: 2.0, beta: 10.0, scale: 0.15 },
            Triangular { left: 10_000.0, mode: 100_000.0, right: 1_000_000.0 },
            0.6,
            &[],
        ),
        factor(
            "reputational_fallout",
            Reputational,
            Beta { alpha: 2.0, beta: 8.0, scale: 0.1 },
            Exponential { scale: 500_000.0 },
            0.5,
            &[],
        ),
    ];

    let mut scenarios = HashMap::new();
    scenarios.insert(
        "gdpr".to_string(),
        vec![
            "gdpr_data_breach".to_string(),
            "gdpr_consent_violation".to_string(),
            "gdpr_vendor_oversight_gap".to_string(),
            "reputational_fallout".to_string(),
        ],
    );
    scenarios.insert(
        "hipaa".to_string(),
        vec![
            "hipaa_phi_breach".to_string(),
            "hipaa_access_control_gap".to_string(),
            "reputational_fallout".to_string(),
        ],
    );
    scenarios.insert(
        "sox".to_string(),
        vec![
            "sox_reporting_misstatement".to_string(),
            "sox_control_deficiency".to_string(),
        ],
    );
    scenarios.insert(
        "pci_dss".to_string(),
        vec![
            "pci_cardholder_breach".to_string(),
            "pci_noncompliance_fine".to_string(),
        ],
    );
    scenarios.insert(
        GENERIC_SCENARIO.to_string(),
        vec![
            "generic_compliance_gap".to_string(),
            "reputational_fallout".to_string(),
        ],
    );

    FactorCatalog { factors, scenarios }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_factor_known_and_unknown() {
        let registry = RiskFactorRegistry::builtin();

        let factor = registry.get_factor("gdpr_data_breach").unwrap();
        assert_eq!(factor.category, RiskCategory::Regulatory);
        assert_eq!(factor.weight, 0.9);

        let err = registry.get_factor("nonexistent").unwrap_err();
        assert!(matches!(err, RiskError::UnknownFactor(_)));
    }

    #[test]
    fn test_get_scenario() {
        let registry = RiskFactorRegistry::builtin();

        let scenario = registry.get_scenario("gdpr").unwrap();
        assert_eq!(scenario.id, "gdpr");
        assert_eq!(scenario.factors.len(), 4);
        assert!(scenario.correlation_matrix.is_none());

        let err = registry.get_scenario("brexit").unwrap_err();
        assert!(matches!(err, RiskError::UnknownScenario(_)));
    }

    #[test]
    fn test_regulation_name_folding() {
        let registry = RiskFactorRegistry::builtin();

        for name in ["GDPR", "gdpr", "  Gdpr "] {
            let scenario = registry.build_scenario_for_regulation(name, None);
            assert_eq!(scenario.id, "gdpr");
        }

        for name in ["PCI DSS", "PCI-DSS", "pci_dss"] {
            let scenario = registry.build_scenario_for_regulation(name, None);
            assert_eq!(scenario.id, "pci_dss");
        }
    }

    #[test]
    fn test_unknown_regulation_falls_back_to_generic() {
        let registry = RiskFactorRegistry::builtin();

        let scenario = registry.build_scenario_for_regulation("basel_iv", None);
        assert_eq!(scenario.id, "generic");
        assert!(!scenario.factors.is_empty());
        assert!(!registry.is_known_regulation("basel_iv"));
        assert!(registry.is_known_regulation("HIPAA"));
    }

    #[test]
    fn test_custom_factors_appended() {
        let registry = RiskFactorRegistry::builtin();
        let custom = registry.get_factor("reputational_fallout").unwrap().clone();

        let scenario = registry.build_scenario_for_regulation("sox", Some(vec![custom]));
        assert_eq!(scenario.factors.len(), 3);
        assert_eq!(scenario.factors[2].id, "reputational_fallout");
    }

    #[test]
    fn test_catalog_from_yaml() {
        let yaml = r#"
factors:
  - id: custom_breach
    category: technology
    probability:
      kind: beta
      alpha: 2.0
      beta: 8.0
      scale: 0.1
    impact:
      kind: triangular
      left: 1000.0
      mode: 10000.0
      right: 100000.0
    weight: 0.8
scenarios:
  custom:
    - custom_breach
"#;

        let registry = RiskFactorRegistry::from_yaml(yaml).unwrap();
        let scenario = registry.get_scenario("custom").unwrap();
        assert_eq!(scenario.factors.len(), 1);
        assert_eq!(scenario.factors[0].id, "custom_breach");
    }

    #[test]
    fn test_catalog_parse_error() {
        let result = RiskFactorRegistry::from_yaml("factors: {not: [a list");
        assert!(matches!(result, Err(RiskError::CatalogParse(_))));
    }
}
