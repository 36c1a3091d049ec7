//! The data-preparation-and-prediction pipeline
//!
//! Loader → encoder → trainer → (forecaster | persistence). Each stage is
//! a pure transformation over the previous one; file I/O only happens at
//! the loader and persistence boundaries.

pub mod dataset;
pub mod encoding;
pub mod forecast;
pub mod model;
pub mod persistence;
pub mod stats;
pub mod training;

pub use dataset::{FeatureRow, SensorDataset};
pub use encoding::LabelCodec;
pub use model::IrrigationClassifier;
pub use training::{TrainingOptions, TrainingOutcome};
