//! # compliance-risk: Monte Carlo Engine for Compliance Loss Risk
//!
//! This library quantifies financial loss risk arising from regulatory and
//! compliance failures using stochastic simulation. Named risk factors (an
//! occurrence probability distribution plus a conditional monetary impact
//! distribution) are simulated over many independent trials to estimate the
//! aggregate loss distribution and derive decision-relevant statistics:
//! Value at Risk, Expected Shortfall, and per-factor risk contributions.
//!
//! ## Core Components
//!
//! - **RiskFactorRegistry**: catalog of risk factors and regulation scenarios
//! - **ContextualAdjuster**: rescales factors to the organization's profile
//! - **MonteCarloEngine**: seeded, parallel trial simulation
//! - **RiskMetricsCalculator**: percentiles, VaR/ES, moments, contributions
//! - **ScenarioAnalyzer**: what-if variations over a base scenario
//! - **RiskAppetiteCalculator**: tolerance thresholds from financial constraints
//!
//! ## Example Usage
//!
//! ```rust
//! use compliance_risk::{
//!     calculate_compliance_risk, AssessmentRequest, ComplianceMaturity, OrgSize,
//!     OrganizationContext, RiskFactorRegistry,
//! };
//!
//! let registry = RiskFactorRegistry::builtin();
//!
//! let mut request = AssessmentRequest::new(
//!     OrganizationContext {
//!         name: "Acme Health".to_string(),
//!         size: OrgSize::Medium,
//!         annual_revenue: 10_000_000.0,
//!         compliance_maturity: ComplianceMaturity::High,
//!     },
//!     "GDPR",
//! );
//! request.num_simulations = 2_000;
//! request.seed = Some(42);
//!
//! let assessment = calculate_compliance_risk(&registry, &request).unwrap();
//!
//! assert!(assessment.overall_risk_score >= 0.0);
//! assert!(assessment.overall_risk_score <= 100.0);
//! ```

mod adjust;
mod appetite;
mod assessment;
mod distribution;
mod engine;
mod error;
mod factor;
mod metrics;
mod registry;
mod scenario;

pub use adjust::{ComplianceMaturity, ContextualAdjuster, OrgSize, OrganizationContext};
pub use appetite::{
    FinancialConstraints, RiskAppetite, RiskAppetiteCalculator, RiskToleranceLevels,
};
pub use assessment::{calculate_compliance_risk, AssessmentRequest, RiskAssessment};
pub use distribution::DistributionSpec;
pub use engine::{EngineConfig, MonteCarloEngine, MonteCarloResult};
pub use error::{Result, RiskError};
pub use factor::{RiskCategory, RiskFactor, RiskScenario};
pub use metrics::{DistributionMoments, RiskLevel, RiskMetrics, RiskMetricsCalculator};
pub use registry::{FactorCatalog, RiskFactorRegistry};
pub use scenario::{FactorAdjustment, ScenarioAnalyzer, ScenarioVariation};
