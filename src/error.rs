//! Error types for the compliance risk engine

use thiserror::Error;

/// Errors that can occur during risk assessment
///
/// Only truly missing named references and invalid engine parameters are hard
/// failures. Degraded business inputs (unknown distribution names, unknown
/// regulations, missing organizational fields) substitute documented defaults
/// instead and are reflected in the assessment's confidence score.
#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Unknown risk factor: {0}")]
    UnknownFactor(String),

    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    #[error("Invalid confidence level: {0} (must be between 0 and 1)")]
    InvalidConfidenceLevel(f64),

    #[error("Number of simulations must be positive")]
    ZeroSimulations,

    #[error("Scenario contains no risk factors")]
    EmptyScenario,

    #[error("Failed to parse factor catalog: {0}")]
    CatalogParse(String),
}

pub type Result<T> = std::result::Result<T, RiskError>;
