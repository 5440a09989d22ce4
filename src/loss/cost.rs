use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{NetworkError, Result};

/// Selects the cost function a network trains against.
///
/// - `Quadratic`: sum of squared errors, `Σ(result - expected)²`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CostFunction {
    #[serde(rename = "QUADRATIC")]
    Quadratic,
}

impl CostFunction {
    pub const ALL: [CostFunction; 1] = [CostFunction::Quadratic];

    pub fn tag(&self) -> &'static str {
        match self {
            CostFunction::Quadratic => "QUADRATIC",
        }
    }

    /// Scalar cost of `result` against `expected`.
    pub fn value(&self, result: &[f64], expected: &[f64]) -> Result<f64> {
        check_lengths(result, expected)?;
        Ok(match self {
            CostFunction::Quadratic => result.iter().zip(expected.iter())
                .map(|(r, e)| (r - e).powi(2))
                .sum(),
        })
    }

    /// Per-output gradient ∂C/∂a.
    pub fn derivative(&self, result: &[f64], expected: &[f64]) -> Result<Vec<f64>> {
        check_lengths(result, expected)?;
        Ok(match self {
            CostFunction::Quadratic => result.iter().zip(expected.iter())
                .map(|(r, e)| 2.0 * (r - e))
                .collect(),
        })
    }
}

fn check_lengths(result: &[f64], expected: &[f64]) -> Result<()> {
    if result.len() != expected.len() {
        return Err(NetworkError::LengthMismatch {
            expected: result.len(),
            found: expected.len(),
        });
    }
    Ok(())
}

impl fmt::Display for CostFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for CostFunction {
    type Err = NetworkError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        CostFunction::ALL
            .into_iter()
            .find(|c| c.tag() == s)
            .ok_or_else(|| NetworkError::UnknownCost(s.to_string()))
    }
}
