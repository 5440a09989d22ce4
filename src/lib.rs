pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod data;
pub mod train;

// Convenience re-exports
pub use error::{NetworkError, Result};
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::{dense::Layer, neuron::Neuron};
pub use network::{Network, NetworkSpec, LayerSpec};
pub use loss::cost::CostFunction;
pub use optim::sgd::Sgd;
pub use data::{flatten, shapes::Shape};
pub use train::{train_shapes, TrainConfig, TrainStats};
