//! Infrastructure layer: concrete repositories, the classifier
//! implementation, the preprocessing pipeline, and the service layer.

pub mod catalog;
pub mod classifier;
pub mod correction;
pub mod imaging;
pub mod logging;
pub mod services;
