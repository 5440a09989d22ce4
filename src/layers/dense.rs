use log::debug;
use rand::Rng;

use crate::{math::matrix::{self, Matrix}, activation::activation::ActivationFunction};
use super::neuron::{Neuron, INIT_RANGE};

/// A fully connected layer.
///
/// Each neuron holds the weights of its *outgoing* connections, so the layer's
/// weight matrix is `[size][next_size]`. The layer's activation is applied to
/// the values it produces in the *next* layer; the output layer's is never applied.
#[derive(Debug, Clone)]
pub struct Layer{
    neurons: Vec<Neuron>,
    next_size: usize,
    activator: ActivationFunction,
    weight_grads: Vec<Matrix>,
    bias_grads: Vec<Vec<f64>>,
}

impl Layer {
    pub fn new<R: Rng + ?Sized>(size: usize, next_size: usize, activation: ActivationFunction, rng: &mut R) -> Layer {
        let neurons = (0..size)
            .map(|_| Neuron::random(next_size, INIT_RANGE, rng))
            .collect();
        Layer::from_neurons(neurons, next_size, activation)
    }

    /// Assembles a layer from existing neurons (used when loading a saved model).
    pub fn from_neurons(neurons: Vec<Neuron>, next_size: usize, activation: ActivationFunction) -> Layer {
        Layer {
            neurons,
            next_size,
            activator: activation,
            weight_grads: Vec::new(),
            bias_grads: Vec::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.neurons.len()
    }

    pub fn next_size(&self) -> usize {
        self.next_size
    }

    pub fn activation(&self) -> ActivationFunction {
        self.activator
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub fn neurons_mut(&mut self) -> &mut [Neuron] {
        &mut self.neurons
    }

    pub fn values(&self) -> Vec<f64> {
        self.neurons.iter().map(Neuron::value).collect()
    }

    pub fn weight_matrix(&self) -> Matrix {
        Matrix {
            rows: self.neurons.len(),
            cols: self.next_size,
            data: self.neurons.iter().map(|n| n.weights().to_vec()).collect(),
        }
    }

    /// Computes `next`'s values from this layer's values and outgoing weights:
    /// `z_j = b_j + Σ_i a_i · w_ij`, then `a_j = self.activation(z_j)`.
    pub fn forward(&self, next: &mut Layer) {
        let activator = self.activator;
        for (j, target) in next.neurons.iter_mut().enumerate() {
            let z = target.bias() + self.neurons.iter()
                .map(|n| n.value() * n.weight(j))
                .sum::<f64>();
            target.set_value(activator.function(z));
        }
    }

    /// ∂C/∂z for this layer given ∂C/∂a, using the stored activations.
    ///
    /// `activation` is the strategy that produced this layer's values, i.e.
    /// the previous layer's.
    pub fn delta_with(&self, activation: ActivationFunction, cost_gradient: &[f64]) -> Vec<f64> {
        let act_derivative: Vec<f64> = self.neurons.iter()
            .map(|n| activation.derivative_from_output(n.value()))
            .collect();
        matrix::hadamard(&act_derivative, cost_gradient)
    }

    pub fn record_weight_gradient(&mut self, dw: Matrix) {
        self.weight_grads.push(dw);
    }

    pub fn record_bias_gradient(&mut self, db: Vec<f64>) {
        self.bias_grads.push(db);
    }

    pub fn weight_gradients(&self) -> &[Matrix] {
        &self.weight_grads
    }

    pub fn bias_gradients(&self) -> &[Vec<f64>] {
        &self.bias_grads
    }

    /// Averages the recorded samples and applies them, then clears both lists.
    ///
    /// Biases move by `+lr · avg` and weights by `-lr · avg` after L2
    /// shrinkage. Each list with no samples leaves its parameters untouched.
    pub fn apply_update(&mut self, learning_rate: f64, l2_constant: f64) {
        if let Some(avg_dw) = average_matrices(&self.weight_grads) {
            let avg_dw = avg_dw.map(|x| x - x * l2_constant);
            for (neuron, row) in self.neurons.iter_mut().zip(avg_dw.data.iter()) {
                for (j, g) in row.iter().enumerate() {
                    neuron.set_weight(j, neuron.weight(j) - g * learning_rate);
                }
            }
        }

        if let Some(avg_db) = average_vectors(&self.bias_grads) {
            for (neuron, g) in self.neurons.iter_mut().zip(avg_db.iter()) {
                neuron.set_bias(neuron.bias() + g * learning_rate);
            }
        }

        debug!(
            "applied {} weight / {} bias samples to layer of {} units",
            self.weight_grads.len(),
            self.bias_grads.len(),
            self.neurons.len()
        );
        self.weight_grads.clear();
        self.bias_grads.clear();
    }
}

fn average_matrices(samples: &[Matrix]) -> Option<Matrix> {
    let (first, rest) = samples.split_first()?;
    let n = samples.len() as f64;
    let sum = rest.iter().fold(first.clone(), |acc, m| acc + m);
    Some(sum.map(|x| x / n))
}

fn average_vectors(samples: &[Vec<f64>]) -> Option<Vec<f64>> {
    let (first, rest) = samples.split_first()?;
    let n = samples.len() as f64;
    let mut sum = first.clone();
    for sample in rest {
        for (acc, x) in sum.iter_mut().zip(sample.iter()) {
            *acc += x;
        }
    }
    Some(sum.into_iter().map(|x| x / n).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn fixed_layer(weights: Vec<Vec<f64>>, biases: Vec<f64>, activation: ActivationFunction) -> Layer {
        let next_size = weights.first().map_or(0, |w| w.len());
        let neurons = weights.into_iter().zip(biases)
            .map(|(w, b)| {
                let mut n = Neuron::zeroed(0);
                n.set_weights(w);
                n.set_bias(b);
                n
            })
            .collect();
        Layer::from_neurons(neurons, next_size, activation)
    }

    #[test]
    fn forward_applies_weights_bias_and_own_activation() {
        let mut input = fixed_layer(
            vec![vec![1.0, -1.0], vec![2.0, 0.5]],
            vec![0.0, 0.0],
            ActivationFunction::ReLU,
        );
        input.neurons_mut()[0].set_value(1.0);
        input.neurons_mut()[1].set_value(3.0);
        let mut next = fixed_layer(vec![vec![], vec![]], vec![0.5, -2.5], ActivationFunction::Sigmoid);

        input.forward(&mut next);

        // z0 = 0.5 + 1*1 + 3*2 = 7.5 ; z1 = -2.5 + 1*-1 + 3*0.5 = -2.0
        assert_eq!(next.values(), vec![7.5, 0.0]);
    }

    #[test]
    fn forward_ignores_destination_activation() {
        let mut input = fixed_layer(vec![vec![-1.0]], vec![0.0], ActivationFunction::Sigmoid);
        input.neurons_mut()[0].set_value(1.0);
        let mut next = fixed_layer(vec![vec![]], vec![0.0], ActivationFunction::ReLU);

        input.forward(&mut next);

        assert_relative_eq!(next.values()[0], 0.2689414213699951, epsilon = 1e-12);
    }

    #[test]
    fn identical_samples_are_all_recorded() {
        let mut layer = fixed_layer(vec![vec![0.0]], vec![0.0], ActivationFunction::Sigmoid);
        let dw = Matrix::from_data(vec![vec![1.0]]);
        layer.record_weight_gradient(dw.clone());
        layer.record_weight_gradient(dw.clone());
        layer.record_weight_gradient(dw);
        layer.record_bias_gradient(vec![0.5]);
        layer.record_bias_gradient(vec![0.5]);
        assert_eq!(layer.weight_gradients().len(), 3);
        assert_eq!(layer.bias_gradients().len(), 2);
    }

    #[test]
    fn apply_update_rule_and_clears_samples() {
        let mut layer = fixed_layer(vec![vec![1.0, 2.0]], vec![0.0], ActivationFunction::Sigmoid);
        layer.record_weight_gradient(Matrix::from_data(vec![vec![1.0, 0.0]]));
        layer.record_weight_gradient(Matrix::from_data(vec![vec![3.0, 2.0]]));
        layer.record_bias_gradient(vec![0.2]);
        layer.record_bias_gradient(vec![0.4]);

        layer.apply_update(0.1, 0.5);

        // avg dW = [2, 1] -> shrunk [1, 0.5]; weights -= 0.1 * that
        assert_relative_eq!(layer.neurons()[0].weight(0), 0.9, epsilon = 1e-12);
        assert_relative_eq!(layer.neurons()[0].weight(1), 1.95, epsilon = 1e-12);
        // avg dB = 0.3; bias += 0.1 * 0.3
        assert_relative_eq!(layer.neurons()[0].bias(), 0.03, epsilon = 1e-12);
        assert!(layer.weight_gradients().is_empty());
        assert!(layer.bias_gradients().is_empty());
    }

    #[test]
    fn repeated_sample_averages_to_itself() {
        let base = fixed_layer(vec![vec![0.3, -0.7]], vec![0.1], ActivationFunction::Sigmoid);
        let dw = Matrix::from_data(vec![vec![0.25, -1.5]]);

        let mut once = base.clone();
        once.record_weight_gradient(dw.clone());
        once.apply_update(0.1, 0.02);

        let mut many = base;
        for _ in 0..5 {
            many.record_weight_gradient(dw.clone());
        }
        many.apply_update(0.1, 0.02);

        assert_eq!(once.weight_matrix(), many.weight_matrix());
    }

    #[test]
    fn apply_update_without_samples_is_noop() {
        let mut layer = fixed_layer(vec![vec![1.0]], vec![0.5], ActivationFunction::Sigmoid);
        let before = layer.weight_matrix();
        layer.apply_update(0.1, 0.02);
        assert_eq!(layer.weight_matrix(), before);
        assert_eq!(layer.neurons()[0].bias(), 0.5);
    }

    #[test]
    fn delta_uses_stored_activation() {
        let mut layer = fixed_layer(vec![vec![], vec![]], vec![0.0, 0.0], ActivationFunction::ReLU);
        layer.neurons_mut()[0].set_value(0.5);
        layer.neurons_mut()[1].set_value(0.9);
        let d = layer.delta_with(ActivationFunction::Sigmoid, &[2.0, 1.0]);
        assert_relative_eq!(d[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(d[1], 0.09, epsilon = 1e-12);
    }
}
