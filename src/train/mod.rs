pub mod trainer;
pub mod train_config;

pub use trainer::{train_shapes, TrainStats};
pub use train_config::TrainConfig;
