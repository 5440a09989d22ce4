use log::{debug, info};
use rand::Rng;

use crate::{
    data::{flatten, shapes::Shape},
    error::Result,
    network::network::Network,
    train::train_config::TrainConfig,
};

/// Summary of a training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainStats {
    pub examples: usize,
    pub updates: usize,
    /// Mean cost over the examples of the last batch.
    pub last_batch_cost: f64,
}

/// Trains `network` on randomly drawn synthetic shapes.
///
/// Gradients are recorded for every example and applied every
/// `config.batch_size` examples; a trailing partial batch is applied at the end.
pub fn train_shapes<R: Rng + ?Sized>(
    network: &mut Network,
    config: &TrainConfig,
    rng: &mut R,
) -> Result<TrainStats> {
    let batch_size = config.batch_size.max(1);
    let mut updates = 0;
    let mut batch_cost = 0.0;
    let mut batch_len = 0;
    let mut last_batch_cost = 0.0;

    for i in 1..=config.examples {
        let shape = Shape::random(rng);
        let target = shape.target();
        network.forward_with_input(&flatten(&shape.generate(rng)))?;
        batch_cost += network.cost(&target)?;
        batch_len += 1;
        network.learn_from(&target)?;

        if i % batch_size == 0 || i == config.examples {
            network.update_layers(&config.optimizer);
            updates += 1;
            last_batch_cost = batch_cost / batch_len as f64;
            debug!("update {updates}: mean cost {last_batch_cost:.6}");
            batch_cost = 0.0;
            batch_len = 0;
        }
    }

    info!(
        "trained on {} examples with {} updates, last batch cost {:.6}",
        config.examples, updates, last_batch_cost
    );
    Ok(TrainStats { examples: config.examples, updates, last_batch_cost })
}
