//! Model artifact persistence
//!
//! An artifact is two JSON files: a weights descriptor and a metadata file
//! carrying the ordered label list. Both are validated at load time so a
//! malformed or drifted pair is rejected before it can serve.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use tracing::info;

use crate::domain::classifier::ModelMetadata;
use crate::domain::DomainError;

use super::network::{MlpNetwork, NetworkWeights};
use super::version::ModelVersion;

/// Loader/saver for the on-disk model descriptor pair
#[derive(Debug)]
pub struct ModelArtifact;

impl ModelArtifact {
    /// Load a model version from its weights and metadata files.
    ///
    /// Fails with `LabelMismatch` when the label list length does not equal
    /// the network's output dimensionality.
    pub fn load(
        weights_path: &Path,
        metadata_path: &Path,
        version: u64,
    ) -> Result<ModelVersion, DomainError> {
        let weights: NetworkWeights = read_json(weights_path)?;
        let metadata: ModelMetadata = read_json(metadata_path)?;
        metadata.validate()?;

        let network = MlpNetwork::from_weights(weights)?;
        let model = ModelVersion::new(version, &metadata, network)?;

        info!(
            model = model.name(),
            version = model.version(),
            classes = model.labels().len(),
            "model artifact loaded"
        );
        Ok(model)
    }

    /// Persist a model version as a weights + metadata file pair
    pub fn save(
        model: &ModelVersion,
        weights_path: &Path,
        metadata_path: &Path,
    ) -> Result<(), DomainError> {
        let metadata = ModelMetadata::new(model.name(), model.labels().to_vec())?;
        write_json(weights_path, &model.network().to_weights())?;
        write_json(metadata_path, &metadata)?;
        Ok(())
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, DomainError> {
    let file = File::open(path).map_err(|e| {
        DomainError::configuration(format!("cannot open {}: {}", path.display(), e))
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        DomainError::configuration(format!("cannot parse {}: {}", path.display(), e))
    })
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), DomainError> {
    let file = File::create(path).map_err(|e| {
        DomainError::internal(format!("cannot create {}: {}", path.display(), e))
    })?;
    serde_json::to_writer(BufWriter::new(file), value)
        .map_err(|e| DomainError::internal(format!("cannot write {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn model() -> ModelVersion {
        let metadata = ModelMetadata::new(
            "heads-v1",
            vec!["STX Sabre".to_string(), "Brine Edge".to_string()],
        )
        .unwrap();
        let network = MlpNetwork::seeded(12, 6, 2, 9).unwrap();
        ModelVersion::new(1, &metadata, network).unwrap()
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let weights = dir.path().join("model.json");
        let metadata = dir.path().join("metadata.json");

        let original = model();
        ModelArtifact::save(&original, &weights, &metadata).unwrap();
        let loaded = ModelArtifact::load(&weights, &metadata, 1).unwrap();

        assert_eq!(loaded, original);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = ModelArtifact::load(
            &dir.path().join("missing.json"),
            &dir.path().join("metadata.json"),
            1,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));
    }

    #[test]
    fn test_load_rejects_label_drift() {
        let dir = tempdir().unwrap();
        let weights = dir.path().join("model.json");
        let metadata_path = dir.path().join("metadata.json");

        ModelArtifact::save(&model(), &weights, &metadata_path).unwrap();

        // Rewrite metadata with one label too many.
        let drifted = ModelMetadata::new(
            "heads-v1",
            vec![
                "STX Sabre".to_string(),
                "Brine Edge".to_string(),
                "Warrior Blade".to_string(),
            ],
        )
        .unwrap();
        std::fs::write(&metadata_path, serde_json::to_string(&drifted).unwrap()).unwrap();

        let err = ModelArtifact::load(&weights, &metadata_path, 2).unwrap_err();
        assert!(matches!(err, DomainError::LabelMismatch { .. }));
    }

    #[test]
    fn test_load_rejects_malformed_metadata() {
        let dir = tempdir().unwrap();
        let weights = dir.path().join("model.json");
        let metadata_path = dir.path().join("metadata.json");

        ModelArtifact::save(&model(), &weights, &metadata_path).unwrap();
        std::fs::write(&metadata_path, r#"{"name": "x", "labels": []}"#).unwrap();

        assert!(ModelArtifact::load(&weights, &metadata_path, 2).is_err());
    }
}
