use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::Result;
use crate::loss::cost::CostFunction;
use crate::network::network::Network;

/// Describes one layer in a network specification.
///
/// Fields:
/// - `size`      : number of neurons in this layer
/// - `activation`: activation applied to the values this layer produces in the
///               next layer (ignored for the output layer, but kept so the
///               spec round-trips)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub size: usize,
    pub activation: ActivationFunction,
}

/// A serializable description of a network architecture and its cost function.
///
/// `NetworkSpec` carries no weights; it can be stored as JSON before training
/// starts and turned into a freshly initialized `Network` with `build`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Ordered list of layer descriptions (input → output).
    pub layers: Vec<LayerSpec>,
    #[serde(default = "default_cost")]
    pub cost: CostFunction,
}

fn default_cost() -> CostFunction {
    CostFunction::Quadratic
}

impl NetworkSpec {
    pub fn new(sizes: &[usize], activations: &[ActivationFunction], cost: CostFunction) -> NetworkSpec {
        let layers = sizes.iter().zip(activations.iter())
            .map(|(&size, &activation)| LayerSpec { size, activation })
            .collect();
        NetworkSpec { layers, cost }
    }

    pub fn sizes(&self) -> Vec<usize> {
        self.layers.iter().map(|l| l.size).collect()
    }

    pub fn activations(&self) -> Vec<ActivationFunction> {
        self.layers.iter().map(|l| l.activation).collect()
    }

    /// Builds a randomly initialized network matching this spec.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Network> {
        Network::new(&self.sizes(), &self.activations(), self.cost, rng)
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl Network {
    /// The architecture of this network, without its weights.
    pub fn spec(&self) -> NetworkSpec {
        NetworkSpec {
            layers: self.layers().iter()
                .map(|l| LayerSpec { size: l.size(), activation: l.activation() })
                .collect(),
            cost: self.cost_function(),
        }
    }
}
