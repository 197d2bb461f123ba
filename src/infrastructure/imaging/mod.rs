//! Image preprocessing pipeline

pub mod preprocessor;

pub use preprocessor::ImagePreprocessor;
