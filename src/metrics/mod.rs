pub mod tracker;

pub use tracker::{MetricsTracker, TrainingMetrics};
