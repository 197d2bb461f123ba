//! Classification domain types: predictions, ranking, model metadata

pub mod metadata;
pub mod prediction;

pub use metadata::ModelMetadata;
pub use prediction::{Prediction, PredictionSet};
