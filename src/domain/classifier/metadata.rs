//! Model metadata: the ordered label list shipped alongside the weights

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Metadata file contents for a model artifact.
///
/// The label list is ordered: position i names the class behind output i of
/// the network. Malformed metadata is rejected at load time rather than
/// letting undefined labels reach callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    name: String,
    labels: Vec<String>,
}

impl ModelMetadata {
    /// Create metadata with validation
    pub fn new(name: impl Into<String>, labels: Vec<String>) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("model name cannot be empty"));
        }
        if labels.is_empty() {
            return Err(DomainError::validation(
                "model metadata must list at least one label",
            ));
        }
        if labels.iter().any(|l| l.trim().is_empty()) {
            return Err(DomainError::validation(
                "model metadata contains an empty label",
            ));
        }
        Ok(Self { name, labels })
    }

    /// Validate a deserialized metadata file
    pub fn validate(&self) -> Result<(), DomainError> {
        Self::new(self.name.clone(), self.labels.clone()).map(|_| ())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered class labels
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_metadata() {
        let meta = ModelMetadata::new(
            "lacrosse-heads-v1",
            vec!["STX Sabre".to_string(), "Brine Edge".to_string()],
        )
        .unwrap();
        assert_eq!(meta.label_count(), 2);
        assert_eq!(meta.labels()[0], "STX Sabre");
    }

    #[test]
    fn test_rejects_empty_labels() {
        assert!(ModelMetadata::new("m", vec![]).is_err());
        assert!(ModelMetadata::new("m", vec!["A B".to_string(), " ".to_string()]).is_err());
    }

    #[test]
    fn test_rejects_empty_name() {
        assert!(ModelMetadata::new("", vec!["A B".to_string()]).is_err());
    }

    #[test]
    fn test_metadata_roundtrip() {
        let meta =
            ModelMetadata::new("heads-v2", vec!["Warrior Blade".to_string()]).unwrap();
        let json = serde_json::to_string(&meta).unwrap();
        let parsed: ModelMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, meta);
    }
}
