//! End-to-end compliance risk assessment
//!
//! Wires the registry, contextual adjuster, Monte Carlo engine and metrics
//! calculator into the single public entry point
//! [`calculate_compliance_risk`], and derives the decision-support outputs
//! (recommendations, mitigation strategies, confidence score) from the
//! simulation results.

use crate::adjust::{ContextualAdjuster, OrganizationContext};
use crate::engine::{EngineConfig, MonteCarloEngine, MonteCarloResult};
use crate::error::Result;
use crate::factor::{RiskCategory, RiskFactor};
use crate::metrics::{RiskLevel, RiskMetricsCalculator};
use crate::registry::RiskFactorRegistry;
use crate::scenario::{ScenarioAnalyzer, ScenarioVariation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

fn default_num_simulations() -> usize {
    10_000
}

fn default_confidence_level() -> f64 {
    0.95
}

/// Input contract of the assessment entry point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRequest {
    /// Organization being assessed
    pub organization: OrganizationContext,

    /// Regulation name (e.g., "GDPR"); case-folded against the registry
    pub regulation: String,

    /// Explicit scenario template to use instead of the regulation mapping.
    /// Unlike the regulation name, a missing scenario id is a hard error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario_id: Option<String>,

    /// Extra factors appended to the curated scenario
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_factors: Option<Vec<RiskFactor>>,

    /// Number of trials
    #[serde(default = "default_num_simulations")]
    pub num_simulations: usize,

    /// Confidence level for the headline VaR
    #[serde(default = "default_confidence_level")]
    pub confidence_level: f64,

    /// What-if variations to run after the base simulation
    #[serde(default)]
    pub variations: Vec<ScenarioVariation>,

    /// Master seed for reproducible assessments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl AssessmentRequest {
    /// Request with engine defaults (10,000 trials at 95% confidence)
    pub fn new(organization: OrganizationContext, regulation: impl Into<String>) -> Self {
        Self {
            organization,
            regulation: regulation.into(),
            scenario_id: None,
            custom_factors: None,
            num_simulations: default_num_simulations(),
            confidence_level: default_confidence_level(),
            variations: Vec::new(),
            seed: None,
        }
    }
}

/// Top-level assessment output, JSON-serializable for the external
/// orchestrator (enums as strings, timestamps as ISO-8601)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Assessment identifier
    pub assessment_id: String,

    /// Generation timestamp
    pub assessment_date: DateTime<Utc>,

    /// Organization the assessment was run for
    pub organization: OrganizationContext,

    /// Regulation name as requested
    pub regulation: String,

    /// VaR95 normalized against the theoretical maximum impact, in [0, 100]
    pub overall_risk_score: f64,

    /// Six-tier classification of the overall score
    pub risk_level: RiskLevel,

    /// Contextually adjusted factors the simulation ran on
    pub risk_factors: Vec<RiskFactor>,

    /// Base simulation result, followed by one result per variation
    pub results: Vec<MonteCarloResult>,

    /// Generated recommendations, ordered by urgency
    pub recommendations: Vec<String>,

    /// Mitigation strategies for the dominant risk categories
    pub mitigation_strategies: Vec<String>,

    /// Input-data completeness in [0, 1]; degraded inputs lower it
    pub confidence_score: f64,
}

/// Run a full compliance risk assessment
///
/// Control flow: registry scenario lookup, contextual adjustment, Monte Carlo
/// simulation, metric reduction, then optional scenario variations. Degraded
/// inputs (unknown regulation, non-positive revenue, low trial counts) do not
/// fail the assessment; they lower its confidence score.
pub fn calculate_compliance_risk(
    registry: &RiskFactorRegistry,
    request: &AssessmentRequest,
) -> Result<RiskAssessment> {
    let scenario = match &request.scenario_id {
        Some(id) => registry.get_scenario(id)?,
        None => registry
            .build_scenario_for_regulation(&request.regulation, request.custom_factors.clone()),
    };

    let adjusted = ContextualAdjuster::adjust(&scenario.factors, &request.organization);

    let engine = MonteCarloEngine::new(EngineConfig {
        num_simulations: request.num_simulations,
        confidence_level: request.confidence_level,
        seed: request.seed,
        ..Default::default()
    });

    let base_result = engine.run(&scenario.id, &adjusted)?;

    let overall_risk_score =
        RiskMetricsCalculator::overall_score(base_result.metrics.var_95, &adjusted);
    let risk_level = RiskMetricsCalculator::risk_level(overall_risk_score);

    let recommendations = generate_recommendations(risk_level, &base_result);
    let mitigation_strategies = mitigation_strategies(&base_result, &adjusted);
    let confidence_score = confidence_score(registry, request);

    let mut results = vec![base_result];
    if !request.variations.is_empty() {
        let adjusted_scenario = crate::factor::RiskScenario::new(scenario.id.clone(), adjusted.clone());
        let analyzer = ScenarioAnalyzer::new(&engine);
        results.extend(analyzer.vary(
            &adjusted_scenario,
            &request.variations,
            request.num_simulations,
        )?);
    }

    info!(
        regulation = %request.regulation,
        scenario_id = %scenario.id,
        overall_risk_score,
        confidence_score,
        "assessment complete"
    );

    Ok(RiskAssessment {
        assessment_id: format!("assessment_{}", Utc::now().timestamp_millis()),
        assessment_date: Utc::now(),
        organization: request.organization.clone(),
        regulation: request.regulation.clone(),
        overall_risk_score,
        risk_level,
        risk_factors: adjusted,
        results,
        recommendations,
        mitigation_strategies,
        confidence_score,
    })
}

/// Confidence in the assessment inputs, starting from 1.0 with explicit
/// deductions for each degraded condition
fn confidence_score(registry: &RiskFactorRegistry, request: &AssessmentRequest) -> f64 {
    let mut score: f64 = 1.0;

    if request.scenario_id.is_none() && !registry.is_known_regulation(&request.regulation) {
        score -= 0.15;
    }
    if request.organization.annual_revenue <= 0.0 {
        score -= 0.10;
    }
    if request.num_simulations < 1_000 {
        score -= 0.05;
    }

    score.clamp(0.0, 1.0)
}

fn generate_recommendations(level: RiskLevel, result: &MonteCarloResult) -> Vec<String> {
    let mut recommendations = Vec::new();

    match level {
        RiskLevel::Critical | RiskLevel::VeryHigh => {
            recommendations.push(
                "Escalate to the board risk committee; exposure exceeds acceptable bounds"
                    .to_string(),
            );
            recommendations.push(
                "Commission an immediate compliance audit of the highest-contributing factors"
                    .to_string(),
            );
        }
        RiskLevel::High | RiskLevel::Medium => {
            recommendations.push(
                "Prioritize remediation of the top risk contributors in the next planning cycle"
                    .to_string(),
            );
            recommendations
                .push("Review insurance coverage against the simulated tail losses".to_string());
        }
        RiskLevel::Low | RiskLevel::VeryLow => {
            recommendations
                .push("Maintain current controls; re-assess on the regular cadence".to_string());
        }
    }

    if let Some((top_factor, share)) = result
        .risk_contributions
        .iter()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
    {
        if *share > 0.0 {
            recommendations.push(format!(
                "Factor '{}' drives {:.0}% of expected loss; target it first",
                top_factor,
                share * 100.0
            ));
        }
    }

    recommendations
}

/// One strategy per distinct category among factors contributing above an
/// equal-share threshold
fn mitigation_strategies(result: &MonteCarloResult, factors: &[RiskFactor]) -> Vec<String> {
    let threshold = 1.0 / factors.len().max(1) as f64;
    let mut categories: Vec<RiskCategory> = Vec::new();

    for factor in factors {
        let share = result
            .risk_contributions
            .get(&factor.id)
            .copied()
            .unwrap_or(0.0);
        if share >= threshold && !categories.contains(&factor.category) {
            categories.push(factor.category);
        }
    }

    categories
        .into_iter()
        .map(|category| {
            let strategy = match category {
                RiskCategory::Regulatory => {
                    "Strengthen regulatory-change monitoring and filing controls"
                }
                RiskCategory::Operational => {
                    "Harden operational runbooks and vendor oversight processes"
                }
                RiskCategory::Financial => {
                    "Tighten financial reporting controls and reconciliation frequency"
                }
                RiskCategory::Reputational => {
                    "Prepare incident communication plans and disclosure templates"
                }
                RiskCategory::Strategic => {
                    "Re-evaluate strategic initiatives against compliance constraints"
                }
                RiskCategory::Technology => {
                    "Invest in access controls, encryption and breach detection"
                }
                RiskCategory::Legal => {
                    "Expand legal review of consent flows and contractual obligations"
                }
            };
            strategy.to_string()
        })
        .collect()
}
