use log::{debug, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::path::Path;

use crate::{
    activation::activation::ActivationFunction,
    error::{NetworkError, Result},
    layers::dense::Layer,
    loss::cost::CostFunction,
    math::matrix::Matrix,
    optim::sgd::Sgd,
};
use super::persist;

/// A feedforward network: an input layer, any number of hidden layers and an
/// output layer, trained against one cost function.
#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<Layer>,
    cost: CostFunction,
}

impl Network {
    /// Builds a randomly initialized network with one activation per layer.
    ///
    /// Fails with `TooFewLayers` for fewer than two sizes.
    pub fn new<R: Rng + ?Sized>(
        sizes: &[usize],
        activations: &[ActivationFunction],
        cost: CostFunction,
        rng: &mut R,
    ) -> Result<Network> {
        if sizes.len() < 2 {
            return Err(NetworkError::TooFewLayers { found: sizes.len() });
        }
        if activations.len() != sizes.len() {
            return Err(NetworkError::ActivationCountMismatch {
                layers: sizes.len(),
                activations: activations.len(),
            });
        }
        if let Some(index) = sizes.iter().position(|&s| s == 0) {
            return Err(NetworkError::EmptyLayer { index });
        }

        let layers = sizes.iter().enumerate()
            .map(|(i, &size)| {
                let next_size = sizes.get(i + 1).copied().unwrap_or(0);
                Layer::new(size, next_size, activations[i], rng)
            })
            .collect();
        debug!("built network {:?} with {} cost", sizes, cost);
        Ok(Network { layers, cost })
    }

    /// Same as `new`, drawing initial parameters from a `StdRng` seeded with `seed`.
    pub fn with_seed(
        sizes: &[usize],
        activations: &[ActivationFunction],
        cost: CostFunction,
        seed: u64,
    ) -> Result<Network> {
        Network::new(sizes, activations, cost, &mut StdRng::seed_from_u64(seed))
    }

    /// Assembles a network from already-built layers.
    ///
    /// Every layer's fan-out must equal the next layer's width, and the output
    /// layer's must be 0.
    pub fn from_layers(layers: Vec<Layer>, cost: CostFunction) -> Result<Network> {
        if layers.len() < 2 {
            return Err(NetworkError::TooFewLayers { found: layers.len() });
        }
        for (index, layer) in layers.iter().enumerate() {
            let actual = layers.get(index + 1).map_or(0, Layer::size);
            let declared = layer.neurons().iter()
                .map(|n| n.weights().len())
                .find(|&len| len != actual)
                .unwrap_or(layer.next_size());
            if declared != actual {
                return Err(NetworkError::LayerMismatch { index, declared, actual });
            }
        }
        Ok(Network { layers, cost })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    pub fn cost_function(&self) -> CostFunction {
        self.cost
    }

    pub fn sizes(&self) -> Vec<usize> {
        self.layers.iter().map(Layer::size).collect()
    }

    pub fn input_size(&self) -> usize {
        self.layers[0].size()
    }

    pub fn output_size(&self) -> usize {
        self.output_layer().size()
    }

    fn output_layer(&self) -> &Layer {
        &self.layers[self.layers.len() - 1]
    }

    /// Writes `input` into the input layer.
    ///
    /// Values beyond the input layer's width are ignored with a warning; a
    /// shorter input is rejected before anything is written.
    pub fn initialize(&mut self, input: &[f64]) -> Result<()> {
        let expected = self.input_size();
        if input.len() < expected {
            return Err(NetworkError::InputTooShort { expected, found: input.len() });
        }
        if input.len() > expected {
            warn!(
                "input has {} values but the input layer has {} units; ignoring the extra {}",
                input.len(),
                expected,
                input.len() - expected
            );
        }
        for (neuron, &x) in self.layers[0].neurons_mut().iter_mut().zip(input) {
            neuron.set_value(x);
        }
        Ok(())
    }

    /// Propagates the current input-layer values through to the output layer.
    pub fn forward(&mut self) {
        for i in 0..self.layers.len() - 1 {
            let (current, rest) = self.layers.split_at_mut(i + 1);
            current[i].forward(&mut rest[0]);
        }
    }

    pub fn forward_with_result(&mut self) -> Vec<f64> {
        self.forward();
        self.output()
    }

    pub fn forward_with_input(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        self.initialize(input)?;
        Ok(self.forward_with_result())
    }

    /// Output-layer values from the most recent forward pass.
    pub fn output(&self) -> Vec<f64> {
        self.output_layer().values()
    }

    /// Cost of the current output against `expected`.
    pub fn cost(&self, expected: &[f64]) -> Result<f64> {
        self.cost.value(&self.output(), expected)
    }

    /// Backpropagates the error of the current output against `expected` and
    /// records one gradient sample per layer. Parameters are not modified
    /// until `update_layers` is called.
    pub fn learn_from(&mut self, expected: &[f64]) -> Result<()> {
        let mut cost_gradient = self.cost.derivative(&self.output(), expected)?;

        for l in (1..self.layers.len()).rev() {
            let prev = &self.layers[l - 1];
            let delta = self.layers[l].delta_with(prev.activation(), &cost_gradient);
            let weights_grad = Matrix::outer(&prev.values(), &delta);
            cost_gradient = prev.weight_matrix().mul_vec(&delta);

            self.layers[l - 1].record_weight_gradient(weights_grad);
            self.layers[l].record_bias_gradient(delta);
        }
        Ok(())
    }

    /// Applies and clears every layer's accumulated gradients.
    ///
    /// Calling this after each example gives plain SGD; every N examples gives
    /// mini-batch descent.
    pub fn update_layers(&mut self, optimizer: &Sgd) {
        for layer in &mut self.layers {
            optimizer.step(layer);
        }
    }

    /// Number of examples recorded since the last update.
    pub fn pending_samples(&self) -> usize {
        self.output_layer().bias_gradients().len()
    }

    /// Writes the network in the line-oriented text format.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        persist::save(self, path.as_ref())
    }

    /// Reads a network previously written by `save`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Network> {
        persist::load(path.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::neuron::Neuron;
    use approx::assert_relative_eq;

    const SIGMOIDS: [ActivationFunction; 3] = [ActivationFunction::Sigmoid; 3];

    fn net(sizes: &[usize]) -> Network {
        let acts = vec![ActivationFunction::Sigmoid; sizes.len()];
        Network::with_seed(sizes, &acts, CostFunction::Quadratic, 42).unwrap()
    }

    #[test]
    fn too_few_layers() {
        for sizes in [&[][..], &[3][..]] {
            let err = Network::with_seed(sizes, &SIGMOIDS[..sizes.len()], CostFunction::Quadratic, 1)
                .unwrap_err();
            assert!(matches!(err, NetworkError::TooFewLayers { found } if found == sizes.len()));
        }
    }

    #[test]
    fn activation_count_must_match() {
        let err = Network::with_seed(&[2, 2], &SIGMOIDS, CostFunction::Quadratic, 1).unwrap_err();
        assert!(matches!(err, NetworkError::ActivationCountMismatch { layers: 2, activations: 3 }));
    }

    #[test]
    fn zero_width_layer_rejected() {
        let err = Network::with_seed(&[2, 0, 1], &SIGMOIDS, CostFunction::Quadratic, 1).unwrap_err();
        assert!(matches!(err, NetworkError::EmptyLayer { index: 1 }));
    }

    #[test]
    fn weight_vectors_match_next_layer() {
        let n = net(&[4, 3, 2]);
        assert_eq!(n.sizes(), vec![4, 3, 2]);
        for (i, layer) in n.layers().iter().enumerate() {
            let next = n.layers().get(i + 1).map_or(0, Layer::size);
            assert_eq!(layer.next_size(), next);
            assert!(layer.neurons().iter().all(|u| u.weights().len() == next));
        }
    }

    #[test]
    fn short_input_rejected_long_input_truncated() {
        let mut n = net(&[3, 2]);
        let err = n.initialize(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, NetworkError::InputTooShort { expected: 3, found: 2 }));
        assert_eq!(n.layers()[0].values(), vec![0.0; 3]);

        n.initialize(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(n.layers()[0].values(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn learn_from_records_without_mutating() {
        let mut n = net(&[2, 3, 2]);
        let before: Vec<Matrix> = n.layers().iter().map(Layer::weight_matrix).collect();
        n.forward_with_input(&[0.3, 0.7]).unwrap();
        n.learn_from(&[1.0, 0.0]).unwrap();

        let after: Vec<Matrix> = n.layers().iter().map(Layer::weight_matrix).collect();
        assert_eq!(before, after);
        assert_eq!(n.layers()[0].weight_gradients().len(), 1);
        assert_eq!(n.layers()[0].bias_gradients().len(), 0);
        assert_eq!(n.layers()[1].weight_gradients().len(), 1);
        assert_eq!(n.layers()[1].bias_gradients().len(), 1);
        assert_eq!(n.layers()[2].weight_gradients().len(), 0);
        assert_eq!(n.layers()[2].bias_gradients().len(), 1);
        assert_eq!(n.layers()[0].weight_gradients()[0].rows, 2);
        assert_eq!(n.layers()[0].weight_gradients()[0].cols, 3);
        assert_eq!(n.pending_samples(), 1);
    }

    #[test]
    fn learn_from_wrong_length_records_nothing() {
        let mut n = net(&[2, 3, 2]);
        n.forward_with_input(&[0.3, 0.7]).unwrap();
        let err = n.learn_from(&[1.0]).unwrap_err();
        assert!(matches!(err, NetworkError::LengthMismatch { expected: 2, found: 1 }));
        assert!(n.layers().iter().all(|l| l.weight_gradients().is_empty()));
        assert_eq!(n.pending_samples(), 0);
    }

    #[test]
    fn update_consumes_samples_and_reduces_cost() {
        let mut n = net(&[2, 3, 1]);
        let input = [0.2, 0.9];
        let target = [1.0];
        n.forward_with_input(&input).unwrap();
        let before = n.cost(&target).unwrap();

        n.learn_from(&target).unwrap();
        n.update_layers(&Sgd::default());
        assert_eq!(n.pending_samples(), 0);
        assert!(n.layers().iter().all(|l| l.weight_gradients().is_empty()));

        n.forward_with_input(&input).unwrap();
        let after = n.cost(&target).unwrap();
        assert!(after.is_finite());
        assert_ne!(before, after);
    }

    fn layer_with_fan_out(size: usize, fan_out: usize, next_size: usize) -> Layer {
        let neurons = (0..size).map(|_| Neuron::zeroed(fan_out)).collect();
        Layer::from_neurons(neurons, next_size, ActivationFunction::Sigmoid)
    }

    #[test]
    fn from_layers_accepts_consistent_fan_out() {
        let layers = vec![layer_with_fan_out(2, 3, 3), layer_with_fan_out(3, 0, 0)];
        let n = Network::from_layers(layers, CostFunction::Quadratic).unwrap();
        assert_eq!(n.sizes(), vec![2, 3]);
    }

    #[test]
    fn from_layers_rejects_declared_fan_out_mismatch() {
        let layers = vec![layer_with_fan_out(2, 2, 2), layer_with_fan_out(3, 0, 0)];
        let err = Network::from_layers(layers, CostFunction::Quadratic).unwrap_err();
        assert!(matches!(err, NetworkError::LayerMismatch { index: 0, declared: 2, actual: 3 }));
    }

    #[test]
    fn from_layers_rejects_short_weight_vector() {
        let mut first = layer_with_fan_out(2, 3, 3);
        first.neurons_mut()[1].set_weights(vec![0.0; 2]);
        let err = Network::from_layers(vec![first, layer_with_fan_out(3, 0, 0)], CostFunction::Quadratic)
            .unwrap_err();
        assert!(matches!(err, NetworkError::LayerMismatch { index: 0, declared: 2, actual: 3 }));
    }

    #[test]
    fn from_layers_rejects_output_layer_with_weights() {
        let layers = vec![layer_with_fan_out(2, 1, 1), layer_with_fan_out(1, 4, 4)];
        let err = Network::from_layers(layers, CostFunction::Quadratic).unwrap_err();
        assert!(matches!(err, NetworkError::LayerMismatch { index: 1, declared: 4, actual: 0 }));
    }

    #[test]
    fn mixed_activations_apply_source_layer_strategy() {
        let mut n = Network::with_seed(
            &[1, 1],
            &[ActivationFunction::Sigmoid, ActivationFunction::ReLU],
            CostFunction::Quadratic,
            3,
        ).unwrap();
        n.layers_mut()[0].neurons_mut()[0].set_weights(vec![-1.0]);
        n.layers_mut()[1].neurons_mut()[0].set_bias(0.0);

        let out = n.forward_with_input(&[1.0]).unwrap();
        assert_relative_eq!(out[0], 0.2689, epsilon = 1e-4);
    }

    #[test]
    fn end_to_end_fixed_weights() {
        let mut n = net(&[2, 2, 1]);
        for layer in n.layers_mut() {
            for unit in layer.neurons_mut() {
                let w = vec![0.5; unit.weights().len()];
                unit.set_weights(w);
                unit.set_bias(0.0);
            }
        }
        let out = n.forward_with_input(&[1.0, 1.0]).unwrap();
        assert_eq!(out.len(), 1);
        assert_relative_eq!(out[0], 0.6750, epsilon = 1e-4);
    }
}
