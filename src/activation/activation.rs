use serde::{Serialize, Deserialize};
use std::f64::consts::E;
use std::fmt;
use std::str::FromStr;

use crate::error::NetworkError;

/// Slope applied to negative inputs by `LeakyReLU`.
pub const LEAKY_SLOPE: f64 = 0.1;

/// Element-wise activation strategies.
///
/// Each variant has a stable tag (see `tag()`) used by the text model format
/// and by JSON specs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivationFunction {
    #[serde(rename = "SIGMOID")]
    Sigmoid,
    #[serde(rename = "RE_LU")]
    ReLU,
    #[serde(rename = "LEAKY_RE_LU")]
    LeakyReLU,
}

impl ActivationFunction {
    pub const ALL: [ActivationFunction; 3] = [
        ActivationFunction::Sigmoid,
        ActivationFunction::ReLU,
        ActivationFunction::LeakyReLU,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            ActivationFunction::Sigmoid => "SIGMOID",
            ActivationFunction::ReLU => "RE_LU",
            ActivationFunction::LeakyReLU => "LEAKY_RE_LU",
        }
    }

    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::LeakyReLU => if x > 0.0 { x } else { LEAKY_SLOPE * x },
        }
    }

    /// Derivative with respect to the pre-activation `x`.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => {
                let fx = self.function(x);
                fx * (1.0 - fx)
            },
            ActivationFunction::ReLU => if x > 0.0 { 1.0 } else { 0.0 },
            ActivationFunction::LeakyReLU => if x > 0.0 { 1.0 } else { LEAKY_SLOPE },
        }
    }

    /// The same derivative expressed through the output `a = function(x)`.
    ///
    /// Layers keep only post-activation values, so backprop goes through this.
    /// For the rectifiers `a > 0` exactly when `x > 0`.
    pub fn derivative_from_output(&self, a: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => a * (1.0 - a),
            ActivationFunction::ReLU => if a > 0.0 { 1.0 } else { 0.0 },
            ActivationFunction::LeakyReLU => if a > 0.0 { 1.0 } else { LEAKY_SLOPE },
        }
    }
}

impl fmt::Display for ActivationFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ActivationFunction {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivationFunction::ALL
            .into_iter()
            .find(|a| a.tag() == s)
            .ok_or_else(|| NetworkError::UnknownActivation(s.to_string()))
    }
}
