use serde::{Serialize, Deserialize};

use crate::layers::dense::Layer;

/// Fixed-rate gradient descent with L2 shrinkage of the averaged weight gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sgd {
    pub learning_rate: f64,
    pub l2_constant: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64, l2_constant: f64) -> Sgd {
        Sgd { learning_rate, l2_constant }
    }

    /// Applies the layer's accumulated gradient samples.
    pub fn step(&self, layer: &mut Layer) {
        layer.apply_update(self.learning_rate, self.l2_constant);
    }
}

impl Default for Sgd {
    fn default() -> Self {
        Sgd { learning_rate: 0.1, l2_constant: 0.02 }
    }
}
