//! Risk metric reduction
//!
//! Reduces a simulated loss vector into percentiles, Value at Risk, Expected
//! Shortfall, distribution moments and normalized per-factor risk
//! contributions, and maps scores onto the six-tier risk level scale.
//!
//! Quantiles use the empirical percentile of the full sorted loss vector;
//! `ES_p` is the mean of trials at or beyond `VaR_p`, degenerating to `VaR_p`
//! when the tail set is empty. Zero-division conditions resolve to 0, never
//! to an error.

use crate::factor::RiskFactor;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::{BTreeMap, HashMap};

/// Percentile levels reported in every simulation result
pub const REPORTED_PERCENTILES: [u32; 8] = [5, 10, 25, 50, 75, 90, 95, 99];

/// Six-tier risk classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
    Critical,
}

/// Tail-risk metrics of a simulated loss distribution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub var_95: f64,
    pub var_99: f64,
    pub es_95: f64,
    pub es_99: f64,

    /// Fraction of trials with a strictly positive loss
    pub probability_of_loss: f64,
}

/// Moments of a simulated loss distribution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionMoments {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub skewness: f64,

    /// Excess kurtosis (normal distribution = 0)
    pub kurtosis: f64,
}

/// Statistical reduction over simulated loss vectors
pub struct RiskMetricsCalculator;

impl RiskMetricsCalculator {
    /// Empirical percentile of an ascending-sorted vector
    pub fn percentile(sorted: &[f64], p: f64) -> f64 {
        if sorted.is_empty() {
            return 0.0;
        }
        let index = (p * (sorted.len() - 1) as f64).ceil() as usize;
        sorted[index.min(sorted.len() - 1)]
    }

    /// Percentile table at the standard reporting levels
    pub fn percentile_table(sorted: &[f64]) -> BTreeMap<u32, f64> {
        REPORTED_PERCENTILES
            .iter()
            .map(|&p| (p, Self::percentile(sorted, p as f64 / 100.0)))
            .collect()
    }

    /// VaR at the given confidence level: the loss not exceeded in
    /// `confidence` of trials
    pub fn value_at_risk(sorted: &[f64], confidence: f64) -> f64 {
        Self::percentile(sorted, confidence)
    }

    /// Expected Shortfall: mean loss among trials at or beyond the VaR
    /// threshold. An empty tail degenerates to the VaR itself.
    pub fn expected_shortfall(sorted: &[f64], var: f64) -> f64 {
        let tail: Vec<f64> = sorted.iter().copied().filter(|&l| l >= var).collect();
        if tail.is_empty() {
            var
        } else {
            tail.iter().sum::<f64>() / tail.len() as f64
        }
    }

    /// Tail metrics at the 95% and 99% levels plus probability of loss
    pub fn tail_metrics(sorted: &[f64]) -> RiskMetrics {
        let var_95 = Self::value_at_risk(sorted, 0.95);
        let var_99 = Self::value_at_risk(sorted, 0.99);

        let loss_trials = sorted.iter().filter(|&&l| l > 0.0).count();
        let probability_of_loss = if sorted.is_empty() {
            0.0
        } else {
            loss_trials as f64 / sorted.len() as f64
        };

        RiskMetrics {
            var_95,
            var_99,
            es_95: Self::expected_shortfall(sorted, var_95),
            es_99: Self::expected_shortfall(sorted, var_99),
            probability_of_loss,
        }
    }

    /// Distribution moments from an ascending-sorted vector
    pub fn moments(sorted: &[f64]) -> DistributionMoments {
        if sorted.is_empty() {
            return DistributionMoments {
                mean: 0.0,
                median: 0.0,
                std_dev: 0.0,
                skewness: 0.0,
                kurtosis: 0.0,
            };
        }

        let n = sorted.len();
        let mean = Statistics::mean(sorted);
        let median = Self::percentile(sorted, 0.5);
        let std_dev = if n > 1 { Statistics::std_dev(sorted) } else { 0.0 };

        let (skewness, kurtosis) = if std_dev > 0.0 {
            let m3 = sorted.iter().map(|x| (x - mean).powi(3)).sum::<f64>() / n as f64;
            let m4 = sorted.iter().map(|x| (x - mean).powi(4)).sum::<f64>() / n as f64;
            (m3 / std_dev.powi(3), m4 / std_dev.powi(4) - 3.0)
        } else {
            (0.0, 0.0)
        };

        DistributionMoments {
            mean,
            median,
            std_dev,
            skewness,
            kurtosis,
        }
    }

    /// Normalize each factor's mean per-trial contribution by the overall
    /// mean loss. All contributions are 0 when the mean loss is 0.
    pub fn risk_contributions(
        factor_means: &[(String, f64)],
        mean_loss: f64,
    ) -> HashMap<String, f64> {
        factor_means
            .iter()
            .map(|(id, factor_mean)| {
                let share = if mean_loss > 0.0 {
                    factor_mean / mean_loss
                } else {
                    0.0
                };
                (id.clone(), share)
            })
            .collect()
    }

    /// Normalize VaR95 against the theoretical worst single-trial loss
    /// (sum of largest weighted impact parameters), capped to [0, 100]
    pub fn overall_score(var_95: f64, factors: &[RiskFactor]) -> f64 {
        let ceiling: f64 = factors.iter().map(RiskFactor::max_weighted_impact).sum();
        if ceiling <= 0.0 {
            return 0.0;
        }
        (var_95 / ceiling * 100.0).clamp(0.0, 100.0)
    }

    /// Map a 0-100 score onto the six-tier scale
    pub fn risk_level(score: f64) -> RiskLevel {
        if score < 10.0 {
            RiskLevel::VeryLow
        } else if score < 25.0 {
            RiskLevel::Low
        } else if score < 50.0 {
            RiskLevel::Medium
        } else if score < 75.0 {
            RiskLevel::High
        } else if score < 90.0 {
            RiskLevel::VeryHigh
        } else {
            RiskLevel::Critical
        }
    }
}
