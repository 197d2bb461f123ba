//! Classifier implementation: the network, versioned models, artifact I/O,
//! and the shared active-model handle

pub mod artifact;
pub mod network;
pub mod registry;
pub mod version;

pub use artifact::ModelArtifact;
pub use network::{MlpNetwork, NetworkWeights};
pub use registry::ActiveModel;
pub use version::ModelVersion;
