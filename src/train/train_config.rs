use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::Result;
use crate::loss::cost::CostFunction;
use crate::network::spec::NetworkSpec;
use crate::optim::sgd::Sgd;

/// Configuration for a shape-training run, loadable from JSON.
///
/// # Fields
/// - `network`   : architecture to build; the input layer must be 81 wide
///               and the output layer 4 wide for the shape task
/// - `examples`  : total number of training examples to draw
/// - `batch_size`: examples per update; use `1` for plain SGD
/// - `optimizer` : learning rate and L2 constant
/// - `seed`      : seeds initialization and sampling; `None` uses OS entropy
/// - `model_path`: where the trained network is written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub network: NetworkSpec,
    pub examples: usize,
    pub batch_size: usize,
    pub optimizer: Sgd,
    pub seed: Option<u64>,
    pub model_path: String,
}

impl TrainConfig {
    /// Deserializes a `TrainConfig` from a JSON file; missing fields take defaults.
    pub fn load_json(path: &str) -> Result<TrainConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            network: NetworkSpec::new(
                &[81, 57, 4],
                &[
                    ActivationFunction::Sigmoid,
                    ActivationFunction::Sigmoid,
                    ActivationFunction::Sigmoid,
                ],
                CostFunction::Quadratic,
            ),
            examples: 256 * 200,
            batch_size: 256,
            optimizer: Sgd::default(),
            seed: None,
            model_path: "shapes.net".to_string(),
        }
    }
}
