//! Trains a network to recognise four synthetic 9×9 shapes, saves it, reloads
//! it and classifies any images passed on the command line.
//!
//! Usage:
//!   pulse-nn [--config train.json] [image.png ...]
//!
//! Set `RUST_LOG=debug` to see per-update costs.

use log::{error, info};
use rand::{rngs::StdRng, SeedableRng};

use pulse_nn::{
    data::image::image_to_intensity,
    flatten, train_shapes, Network, Result, Shape, TrainConfig,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1).peekable();
    let config = if args.peek().map(String::as_str) == Some("--config") {
        args.next();
        match args.next() {
            Some(path) => TrainConfig::load_json(&path)?,
            None => {
                error!("--config needs a path");
                std::process::exit(2);
            }
        }
    } else {
        TrainConfig::default()
    };
    let images: Vec<String> = args.collect();

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    info!(
        "training {:?} for {} examples, batch size {}",
        config.network.sizes(),
        config.examples,
        config.batch_size
    );
    let mut network = config.network.build(&mut rng)?;
    train_shapes(&mut network, &config, &mut rng)?;

    network.save(&config.model_path)?;
    let mut network = Network::load(&config.model_path)?;

    for shape in Shape::ALL {
        let output = network.forward_with_input(&flatten(&shape.generate(&mut rng)))?;
        let guess = Shape::best_match(&output, network.cost_function())?;
        info!("synthetic {:?}: classified as {:?}, output {}", shape, guess, format_output(&output));
    }

    for path in &images {
        let output = network.forward_with_input(&flatten(&image_to_intensity(path)?))?;
        let guess = Shape::best_match(&output, network.cost_function())?;
        info!("{}: this is a {:?}, output {}", path, guess, format_output(&output));
    }

    Ok(())
}

fn format_output(output: &[f64]) -> String {
    output.iter().map(|x| format!("{x:.2}")).collect::<Vec<_>>().join(" ")
}
