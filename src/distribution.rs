//! Probability distribution specifications and sampling
//!
//! Risk factors describe their occurrence probability and monetary impact as
//! named distributions with typed parameters. Sampling is stateless aside from
//! the caller-provided RNG, so trials are reproducible given a seed.

use rand::Rng;
use rand_distr::{Beta, Distribution, Exp, Gamma, Normal, Triangular, Uniform};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A probability distribution with typed parameters
///
/// Closed set of supported distributions. Catalog entries that name an
/// unsupported distribution are mapped to `Normal` at construction time via
/// [`DistributionSpec::from_name`] rather than failing at sample time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DistributionSpec {
    Normal { mean: f64, std: f64 },

    /// Beta sample in [0, 1], multiplied by `scale`
    Beta { alpha: f64, beta: f64, scale: f64 },

    Triangular { left: f64, mode: f64, right: f64 },

    Uniform { low: f64, high: f64 },

    Exponential { scale: f64 },

    Gamma { shape: f64, scale: f64 },
}

impl DistributionSpec {
    /// Build a spec from a distribution name and a parameter map
    ///
    /// Name matching is case-insensitive. Missing parameters take documented
    /// defaults; an unknown name degrades to `normal` with `mean`/`std`
    /// defaults of 0/1 instead of raising.
    pub fn from_name(name: &str, params: &HashMap<String, f64>) -> Self {
        let get = |key: &str, default: f64| params.get(key).copied().unwrap_or(default);

        match name.to_lowercase().as_str() {
            "normal" => Self::Normal {
                mean: get("mean", 0.0),
                std: get("std", 1.0),
            },
            "beta" => Self::Beta {
                alpha: get("alpha", 2.0),
                beta: get("beta", 5.0),
                scale: get("scale", 1.0),
            },
            "triangular" => Self::Triangular {
                left: get("left", 0.0),
                mode: get("mode", 0.5),
                right: get("right", 1.0),
            },
            "uniform" => Self::Uniform {
                low: get("low", 0.0),
                high: get("high", 1.0),
            },
            "exponential" => Self::Exponential {
                scale: get("scale", 1.0),
            },
            "gamma" => Self::Gamma {
                shape: get("shape", 2.0),
                scale: get("scale", 1.0),
            },
            _ => Self::Normal {
                mean: get("mean", 0.0),
                std: get("std", 1.0),
            },
        }
    }

    /// Draw a single sample
    ///
    /// Invalid parameter combinations (negative std, non-positive shape,
    /// inverted bounds) fall back to a central value of the distribution
    /// instead of panicking, so a simulation never aborts mid-run.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            Self::Normal { mean, std } => match Normal::new(mean, std.max(0.0)) {
                Ok(dist) => dist.sample(rng),
                Err(_) => mean,
            },
            Self::Beta { alpha, beta, scale } => match Beta::new(alpha, beta) {
                Ok(dist) => dist.sample(rng) * scale,
                Err(_) => 0.5 * scale,
            },
            Self::Triangular { left, mode, right } => {
                match Triangular::new(left, right, mode) {
                    Ok(dist) => dist.sample(rng),
                    Err(_) => mode,
                }
            }
            Self::Uniform { low, high } => {
                if high > low {
                    Uniform::new(low, high).sample(rng)
                } else {
                    low
                }
            }
            Self::Exponential { scale } => {
                if scale > 0.0 {
                    match Exp::new(1.0 / scale) {
                        Ok(dist) => dist.sample(rng),
                        Err(_) => scale,
                    }
                } else {
                    0.0
                }
            }
            Self::Gamma { shape, scale } => match Gamma::new(shape, scale) {
                Ok(dist) => dist.sample(rng),
                Err(_) => shape.max(0.0) * scale.max(0.0),
            },
        }
    }

    /// Return a copy with all magnitude parameters multiplied by `factor`
    ///
    /// Shape parameters (beta alpha/beta, gamma shape) are left untouched;
    /// only location and scale parameters move. Used by the contextual
    /// adjuster and by scenario variations.
    pub fn scaled(&self, factor: f64) -> Self {
        let factor = factor.max(0.0);
        match *self {
            Self::Normal { mean, std } => Self::Normal {
                mean: mean * factor,
                std: std * factor,
            },
            Self::Beta { alpha, beta, scale } => Self::Beta {
                alpha,
                beta,
                scale: scale * factor,
            },
            Self::Triangular { left, mode, right } => Self::Triangular {
                left: left * factor,
                mode: mode * factor,
                right: right * factor,
            },
            Self::Uniform { low, high } => Self::Uniform {
                low: low * factor,
                high: high * factor,
            },
            Self::Exponential { scale } => Self::Exponential {
                scale: scale * factor,
            },
            Self::Gamma { shape, scale } => Self::Gamma {
                shape,
                scale: scale * factor,
            },
        }
    }

    /// Largest raw parameter value, used as a theoretical single-event
    /// ceiling when normalizing the overall risk score
    pub fn upper_bound(&self) -> f64 {
        match *self {
            Self::Normal { mean, std } => mean.max(std),
            Self::Beta { alpha, beta, scale } => alpha.max(beta).max(scale),
            Self::Triangular { left, mode, right } => left.max(mode).max(right),
            Self::Uniform { low, high } => low.max(high),
            Self::Exponential { scale } => scale,
            Self::Gamma { shape, scale } => shape.max(scale),
        }
    }

    /// Human-readable distribution name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Normal { .. } => "normal",
            Self::Beta { .. } => "beta",
            Self::Triangular { .. } => "triangular",
            Self::Uniform { .. } => "uniform",
            Self::Exponential { .. } => "exponential",
            Self::Gamma { .. } => "gamma",
        }
    }
}
