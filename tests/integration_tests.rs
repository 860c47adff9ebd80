//! Integration tests for the compliance risk engine
//!
//! These tests verify end-to-end functionality: catalog loading, contextual
//! adjustment, simulation, metric invariants, scenario analysis and the
//! assessment entry point.

use compliance_risk::{
    calculate_compliance_risk, AssessmentRequest, ComplianceMaturity, ContextualAdjuster,
    DistributionSpec, EngineConfig, FactorAdjustment, FinancialConstraints, MonteCarloEngine,
    OrgSize, OrganizationContext, RiskAppetiteCalculator, RiskCategory, RiskFactor,
    RiskFactorRegistry, RiskScenario, ScenarioAnalyzer, ScenarioVariation,
};

fn gdpr_breach_factor(probability_scale: f64) -> RiskFactor {
    RiskFactor {
        id: "gdpr_data_breach".to_string(),
        category: RiskCategory::Regulatory,
        probability: DistributionSpec::Beta {
            alpha: 2.0,
            beta: 8.0,
            scale: probability_scale,
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

fn acme(maturity: ComplianceMaturity) -> OrganizationContext {
    OrganizationContext {
        name: "Acme Health".to_string(),
        size: OrgSize::Medium,
        annual_revenue: 10_000_000.0,
        compliance_maturity: maturity,
    }
}

fn seeded_engine(seed: u64) -> MonteCarloEngine {
    MonteCarloEngine::new(EngineConfig {
        seed: Some(seed),
        ..Default::default()
    })
}

#[test]
fn test_single_breach_factor_loss_frequency() {
    // Beta(2, 8) has mean 0.2; scaled by 0.1 the expected per-trial
    // occurrence probability is ~0.02.
    let engine = seeded_engine(42);
    let result = engine
        .run_with("gdpr", &[gdpr_breach_factor(0.1)], 100_000, 0.95)
        .unwrap();

    assert!(result.metrics.probability_of_loss > 0.01);
    assert!(result.metrics.probability_of_loss < 0.04);

    // Losses, when they occur, stay within the weight-scaled triangular support
    let max_loss = result
        .simulation_data
        .iter()
        .cloned()
        .fold(f64::MIN, f64::max);
    assert!(max_loss <= 20_000_000.0 * 0.9);
    assert!(result.metrics.var_99 > 0.0);
    assert!(result.metrics.var_99 <= 20_000_000.0 * 0.9);
}

#[test]
fn test_single_breach_factor_var_within_support() {
    // Unscaled Beta(2, 8): ~20% of trials realize a loss, so the 95th
    // percentile lands inside the weight-scaled triangular support.
    let engine = seeded_engine(42);
    let result = engine
        .run_with("gdpr", &[gdpr_breach_factor(1.0)], 100_000, 0.95)
        .unwrap();

    assert!(result.metrics.probability_of_loss > 0.15);
    assert!(result.metrics.probability_of_loss < 0.25);

    assert!(result.metrics.var_95 >= 50_000.0 * 0.9);
    assert!(result.metrics.var_95 <= 20_000_000.0 * 0.9);
    assert!(result.metrics.es_95 >= result.metrics.var_95);
    assert!(result.metrics.es_99 >= result.metrics.var_99);
}

#[test]
fn test_adjuster_then_engine_pipeline() {
    let registry = RiskFactorRegistry::builtin();
    let scenario = registry.build_scenario_for_regulation("gdpr", None);

    let lax = ContextualAdjuster::adjust(&scenario.factors, &acme(ComplianceMaturity::Low));
    let strict = ContextualAdjuster::adjust(&scenario.factors, &acme(ComplianceMaturity::High));

    let engine = seeded_engine(7);
    let lax_result = engine.run("gdpr_lax", &lax).unwrap();
    let strict_result = engine.run("gdpr_strict", &strict).unwrap();

    // Lower incident probability must show up as fewer loss trials
    assert!(
        strict_result.metrics.probability_of_loss < lax_result.metrics.probability_of_loss
    );
}

#[test]
fn test_scenario_analysis_kill_switch_variation() {
    let registry = RiskFactorRegistry::builtin();
    let base = registry.build_scenario_for_regulation("sox", None);

    let engine = seeded_engine(21);
    let analyzer = ScenarioAnalyzer::new(&engine);

    let kill_all = ScenarioVariation::uniform(
        base.factors.iter().map(|f| f.id.clone()),
        FactorAdjustment {
            probability_multiplier: 0.0,
            impact_multiplier: 1.0,
        },
    );

    let results = analyzer.vary(&base, &[kill_all], 10_000).unwrap();

    assert_eq!(results[0].scenario_id, "sox_variation_0");
    assert_eq!(results[0].metrics.probability_of_loss, 0.0);
    assert_eq!(results[0].metrics.var_95, 0.0);
    assert_eq!(results[0].metrics.es_99, 0.0);
}

#[test]
fn test_full_assessment_with_custom_catalog() {
    let yaml = r#"
factors:
  - id: licensing_lapse
    category: legal
    probability:
      kind: beta
      alpha: 2.0
      beta: 6.0
      scale: 0.3
    impact:
      kind: uniform
      low: 20000.0
      high: 400000.0
    weight: 0.8
scenarios:
  licensing:
    - licensing_lapse
"#;

    let registry = RiskFactorRegistry::from_yaml(yaml).unwrap();

    let mut request = AssessmentRequest::new(acme(ComplianceMaturity::Medium), "licensing");
    request.scenario_id = Some("licensing".to_string());
    request.num_simulations = 20_000;
    request.seed = Some(5);

    let assessment = calculate_compliance_risk(&registry, &request).unwrap();

    assert_eq!(assessment.results[0].scenario_id, "licensing");
    assert!(assessment.overall_risk_score > 0.0);
    assert!(assessment.overall_risk_score <= 100.0);

    let contributions: f64 = assessment.results[0].risk_contributions.values().sum();
    assert!((contributions - 1.0).abs() < 1e-6);
}

#[test]
fn test_assessment_json_contract() {
    let registry = RiskFactorRegistry::builtin();
    let mut request = AssessmentRequest::new(acme(ComplianceMaturity::Medium), "HIPAA");
    request.num_simulations = 2_000;
    request.seed = Some(9);

    let assessment = calculate_compliance_risk(&registry, &request).unwrap();
    let json = serde_json::to_value(&assessment).unwrap();

    // Enums serialize as strings, timestamps as ISO-8601
    assert!(json["risk_level"].is_string());
    assert_eq!(json["organization"]["size"].as_str().unwrap(), "medium");
    assert!(json["assessment_date"].as_str().unwrap().contains('T'));
    assert_eq!(json["results"][0]["num_simulations"], 2_000);
}

#[test]
fn test_risk_appetite_reference_values() {
    let appetite = RiskAppetiteCalculator::compute(
        &acme(ComplianceMaturity::Medium),
        &FinancialConstraints::default(),
    );

    // revenue 10M, default 2% budget
    assert_eq!(appetite.risk_budget, 200_000.0);
    assert_eq!(appetite.maximum_single_loss, 100_000.0);
    assert_eq!(appetite.maximum_annual_aggregate, 200_000.0);
    assert_eq!(appetite.risk_tolerance_levels.minimal, 20_000.0);
    assert_eq!(appetite.regulatory_ceilings["gdpr"], 400_000.0);
}

#[test]
fn test_correlation_matrix_is_declared_but_inert() {
    let mut scenario = RiskScenario::new("test", vec![gdpr_breach_factor(0.5)]);
    scenario.correlation_matrix = Some(nalgebra::DMatrix::identity(1, 1));

    let engine = seeded_engine(3);
    let with_matrix = engine.run(&scenario.id, &scenario.factors).unwrap();

    scenario.correlation_matrix = None;
    let without_matrix = engine.run(&scenario.id, &scenario.factors).unwrap();

    assert_eq!(with_matrix.simulation_data, without_matrix.simulation_data);
}
