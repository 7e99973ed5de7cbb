//! Probability distributions for inter-arrival times and stage durations.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// A sampling distribution over durations in minutes.
///
/// `Exponential` is the default for arrivals and service times. `Uniform`
/// covers bounded durations; with `low == high` it degenerates to a constant,
/// which is what deterministic scenarios use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Distribution {
    Exponential { mean: f64 },
    Uniform { low: f64, high: f64 },
}

impl Distribution {
    pub fn exponential(mean: f64) -> Self {
        Self::Exponential { mean }
    }

    pub fn uniform(low: f64, high: f64) -> Self {
        Self::Uniform { low, high }
    }

    /// Constant duration, expressed as a degenerate uniform.
    pub fn fixed(value: f64) -> Self {
        Self::Uniform {
            low: value,
            high: value,
        }
    }

    /// Draw one sample. Always non-negative for a valid distribution.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        match *self {
            Self::Exponential { mean } => {
                // Inverse transform: -mean * ln(U), U uniform in [0,1).
                let u: f64 = rng.gen();
                let u = u.max(1e-10); // Avoid log(0)
                -mean * u.ln()
            }
            Self::Uniform { low, high } => rng.gen_range(low..=high),
        }
    }

    /// Expected value of the distribution.
    pub fn mean(&self) -> f64 {
        match *self {
            Self::Exponential { mean } => mean,
            Self::Uniform { low, high } => (low + high) / 2.0,
        }
    }

    pub(crate) fn validate(&self, field: &str) -> Result<(), SimError> {
        match *self {
            Self::Exponential { mean } => {
                if mean <= 0.0 || !mean.is_finite() {
                    return Err(SimError::InvalidConfiguration(format!(
                        "{field}: exponential mean must be positive, got {mean}"
                    )));
                }
            }
            Self::Uniform { low, high } => {
                if !(low.is_finite() && high.is_finite()) || low < 0.0 || high < low {
                    return Err(SimError::InvalidConfiguration(format!(
                        "{field}: uniform bounds must satisfy 0 <= low <= high, got [{low}, {high}]"
                    )));
                }
            }
        }
        Ok(())
    }
}
