use rand::Rng;
use std::ops::RangeInclusive;

/// Default range for randomly initialized weights and biases.
pub const INIT_RANGE: RangeInclusive<f64> = -0.5..=0.5;

/// A single unit: its outgoing weights, its bias and its current activation.
///
/// `weights[j]` connects this unit to unit `j` of the following layer, so a
/// unit in the output layer has no weights.
#[derive(Debug, Clone, PartialEq)]
pub struct Neuron {
    weights: Vec<f64>,
    bias: f64,
    value: f64,
}

impl Neuron {
    /// Draws every weight, then the bias, uniformly from `range`.
    pub fn random<R: Rng + ?Sized>(next_size: usize, range: RangeInclusive<f64>, rng: &mut R) -> Neuron {
        let weights = (0..next_size).map(|_| rng.gen_range(range.clone())).collect();
        let bias = rng.gen_range(range);
        Neuron { weights, bias, value: 0.0 }
    }

    pub fn zeroed(next_size: usize) -> Neuron {
        Neuron { weights: vec![0.0; next_size], bias: 0.0, value: 0.0 }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn weight(&self, index: usize) -> f64 {
        self.weights[index]
    }

    pub fn set_weights(&mut self, weights: Vec<f64>) {
        self.weights = weights;
    }

    pub fn set_weight(&mut self, index: usize, weight: f64) {
        self.weights[index] = weight;
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn set_bias(&mut self, bias: f64) {
        self.bias = bias;
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }
}
