//! Plain-text model format.
//!
//! ```text
//! <cost tag>
//! <layer count>
//! <units> <next units> <activation tag>     (once per layer, followed by)
//! <next units space-separated weights>      (two lines per unit)
//! <bias>
//! ```
//!
//! Floats are written with `f64`'s shortest round-trip representation, so a
//! saved network loads back bit-for-bit.

use log::info;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use crate::{
    activation::activation::ActivationFunction,
    error::{NetworkError, Result},
    layers::{dense::Layer, neuron::Neuron},
    loss::cost::CostFunction,
};
use super::network::Network;

pub fn save(network: &Network, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_network(network, &mut writer)?;
    writer.flush()?;
    info!("saved {:?} network to {}", network.sizes(), path.display());
    Ok(())
}

pub fn load(path: &Path) -> Result<Network> {
    let file = File::open(path)?;
    let network = read_network(BufReader::new(file))?;
    info!("loaded {:?} network from {}", network.sizes(), path.display());
    Ok(network)
}

pub fn write_network<W: Write>(network: &Network, w: &mut W) -> Result<()> {
    writeln!(w, "{}", network.cost_function())?;
    writeln!(w, "{}", network.layers().len())?;
    for layer in network.layers() {
        writeln!(w, "{} {} {}", layer.size(), layer.next_size(), layer.activation())?;
        for neuron in layer.neurons() {
            let weights: Vec<String> = neuron.weights().iter().map(f64::to_string).collect();
            writeln!(w, "{}", weights.join(" "))?;
            writeln!(w, "{}", neuron.bias())?;
        }
    }
    Ok(())
}

pub fn read_network<R: BufRead>(reader: R) -> Result<Network> {
    let mut lines = Lines::new(reader);

    let cost: CostFunction = lines.next_line()?.trim().parse()?;
    let count_line = lines.next_line()?;
    let layer_count: usize = lines.parse_field(count_line.trim(), "layer count")?;
    if layer_count < 2 {
        return Err(NetworkError::TooFewLayers { found: layer_count });
    }

    let mut layers = Vec::with_capacity(layer_count);
    for _ in 0..layer_count {
        let header = lines.next_line()?;
        let header_line = lines.line;
        let fields: Vec<&str> = header.split_whitespace().collect();
        if fields.len() != 3 {
            return Err(lines.error(format!(
                "layer header needs '<units> <next units> <activation>', got '{}'",
                header.trim()
            )));
        }
        let size: usize = lines.parse_field(fields[0], "unit count")?;
        let next_size: usize = lines.parse_field(fields[1], "next unit count")?;
        let activation: ActivationFunction = fields[2].parse()?;
        if size == 0 {
            return Err(lines.error("layer has no units".to_string()));
        }

        let mut neurons = Vec::with_capacity(size);
        for _ in 0..size {
            let mut neuron = Neuron::zeroed(next_size);
            let weight_line = lines.next_line()?;
            let weights = weight_line.split_whitespace()
                .map(|field| lines.parse_field::<f64>(field, "weight"))
                .collect::<Result<Vec<f64>>>()?;
            if weights.len() != next_size {
                return Err(lines.error(format!(
                    "expected {} weights, got {}",
                    next_size,
                    weights.len()
                )));
            }
            neuron.set_weights(weights);
            let bias_line = lines.next_line()?;
            neuron.set_bias(lines.parse_field(bias_line.trim(), "bias")?);
            neurons.push(neuron);
        }
        layers.push((header_line, Layer::from_neurons(neurons, next_size, activation)));
    }

    // Each layer's declared fan-out must equal the following layer's width.
    for i in 0..layers.len() {
        let declared = layers[i].1.next_size();
        let actual = layers.get(i + 1).map_or(0, |(_, l)| l.size());
        if declared != actual {
            return Err(NetworkError::Parse {
                line: layers[i].0,
                message: format!(
                    "layer {} declares {} outgoing connections but the next layer has {} units",
                    i, declared, actual
                ),
            });
        }
    }

    if let Some(extra) = lines.next_non_blank()? {
        return Err(lines.error(format!("unexpected trailing content '{}'", extra.trim())));
    }

    Network::from_layers(layers.into_iter().map(|(_, l)| l).collect(), cost)
}

/// Line reader that remembers the 1-based number of the last line returned.
struct Lines<R> {
    inner: std::io::Lines<R>,
    line: usize,
}

impl<R: BufRead> Lines<R> {
    fn new(reader: R) -> Self {
        Lines { inner: reader.lines(), line: 0 }
    }

    fn next_line(&mut self) -> Result<String> {
        match self.inner.next() {
            Some(line) => {
                self.line += 1;
                Ok(line?)
            }
            None => Err(NetworkError::Parse {
                line: self.line + 1,
                message: "unexpected end of file".to_string(),
            }),
        }
    }

    fn next_non_blank(&mut self) -> Result<Option<String>> {
        while let Some(line) = self.inner.next() {
            self.line += 1;
            let line = line?;
            if !line.trim().is_empty() {
                return Ok(Some(line));
            }
        }
        Ok(None)
    }

    fn parse_field<T: FromStr>(&self, field: &str, what: &str) -> Result<T> {
        field.parse().map_err(|_| self.error(format!("invalid {} '{}'", what, field)))
    }

    fn error(&self, message: String) -> NetworkError {
        NetworkError::Parse { line: self.line, message }
    }
}
