//! An immutable, versioned classifier model

use crate::domain::classifier::{ModelMetadata, PredictionSet};
use crate::domain::imaging::ImageTensor;
use crate::domain::DomainError;

use super::network::MlpNetwork;

/// A loaded classifier: network weights plus the ordered label list.
///
/// Versions are immutable once constructed. Retraining builds a successor
/// version and swaps it in; it never mutates an existing one.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelVersion {
    version: u64,
    name: String,
    labels: Vec<String>,
    network: MlpNetwork,
}

impl ModelVersion {
    /// Bind a network to its metadata.
    ///
    /// The label list length must equal the network's output width; a
    /// mismatch fails loudly instead of silently misaligning labels.
    pub fn new(
        version: u64,
        metadata: &ModelMetadata,
        network: MlpNetwork,
    ) -> Result<Self, DomainError> {
        if metadata.label_count() != network.output_size() {
            return Err(DomainError::label_mismatch(
                network.output_size(),
                metadata.label_count(),
            ));
        }
        Ok(Self {
            version,
            name: metadata.name().to_string(),
            labels: metadata.labels().to_vec(),
            network,
        })
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn network(&self) -> &MlpNetwork {
        &self.network
    }

    /// Index of a label in the ordered label list
    pub fn label_index(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Run a forward pass and rank the output.
    ///
    /// Read-only: concurrent calls against one version are safe.
    pub fn classify(
        &self,
        tensor: &ImageTensor,
        unknown_threshold: f64,
    ) -> Result<PredictionSet, DomainError> {
        let probabilities = self.network.forward(tensor.features())?;
        let probabilities: Vec<f64> = probabilities.iter().map(|&p| f64::from(p)).collect();
        PredictionSet::rank(&probabilities, &self.labels, unknown_threshold)
    }

    /// Sanity-check a candidate version before it may become active.
    ///
    /// Weights must be finite and a probe forward pass must produce a
    /// probability distribution.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.network.is_finite() {
            return Err(DomainError::retrain_failed(
                "candidate model contains non-finite weights",
            ));
        }

        let probe = ndarray::Array1::zeros(self.network.input_size());
        let output = self
            .network
            .forward(probe.view())
            .map_err(|e| DomainError::retrain_failed(format!("probe forward pass failed: {}", e)))?;
        let sum: f32 = output.sum();
        if !sum.is_finite() || (sum - 1.0).abs() > 1e-3 {
            return Err(DomainError::retrain_failed(format!(
                "probe output does not form a distribution (sum = {})",
                sum
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array4;

    fn metadata(labels: &[&str]) -> ModelMetadata {
        ModelMetadata::new("test-model", labels.iter().map(|s| s.to_string()).collect())
            .unwrap()
    }

    fn tensor(size: usize) -> ImageTensor {
        ImageTensor::new(Array4::from_elem((1, size, size, 3), 0.4)).unwrap()
    }

    #[test]
    fn test_label_count_must_match_output() {
        let network = MlpNetwork::seeded(12, 8, 3, 7).unwrap();
        let err =
            ModelVersion::new(1, &metadata(&["A B", "C D"]), network.clone()).unwrap_err();
        assert!(matches!(err, DomainError::LabelMismatch { .. }));

        assert!(ModelVersion::new(1, &metadata(&["A B", "C D", "E F"]), network).is_ok());
    }

    #[test]
    fn test_classify_returns_ranked_distribution() {
        let network = MlpNetwork::seeded(2 * 2 * 3, 8, 3, 7).unwrap();
        let version =
            ModelVersion::new(1, &metadata(&["A B", "C D", "E F"]), network).unwrap();

        let set = version.classify(&tensor(2), 0.0).unwrap();
        assert_eq!(set.predictions().len(), 3);
        assert!((set.probability_mass() - 1.0).abs() < 1e-3);

        let probabilities: Vec<f64> =
            set.predictions().iter().map(|p| p.probability()).collect();
        let mut sorted = probabilities.clone();
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap());
        assert_eq!(probabilities, sorted);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let network = MlpNetwork::seeded(2 * 2 * 3, 8, 3, 7).unwrap();
        let version =
            ModelVersion::new(1, &metadata(&["A B", "C D", "E F"]), network).unwrap();

        let first = version.classify(&tensor(2), 0.3).unwrap();
        let second = version.classify(&tensor(2), 0.3).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_label_index() {
        let network = MlpNetwork::seeded(12, 8, 2, 7).unwrap();
        let version = ModelVersion::new(1, &metadata(&["A B", "C D"]), network).unwrap();
        assert_eq!(version.label_index("C D"), Some(1));
        assert_eq!(version.label_index("missing"), None);
    }

    #[test]
    fn test_validate_accepts_seeded_network() {
        let network = MlpNetwork::seeded(12, 8, 2, 7).unwrap();
        let version = ModelVersion::new(1, &metadata(&["A B", "C D"]), network).unwrap();
        version.validate().unwrap();
    }
}
