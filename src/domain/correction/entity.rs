//! Correction and prediction record entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::DomainError;

// ============================================================================
// CorrectionId
// ============================================================================

/// Unique identifier for a correction record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrectionId(Uuid);

impl CorrectionId {
    /// Generate a fresh id
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an id from its string form
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| DomainError::validation(format!("invalid correction id '{}'", value)))
    }
}

impl fmt::Display for CorrectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// CorrectionStatus
// ============================================================================

/// Lifecycle of a correction record.
///
/// The only legal transition is Pending -> Processed; records are never
/// deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionStatus {
    #[default]
    Pending,
    Processed,
}

impl fmt::Display for CorrectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processed => write!(f, "processed"),
        }
    }
}

// ============================================================================
// CorrectionRecord
// ============================================================================

/// A user-submitted "this was wrong, the correct answer is X" record.
///
/// Append-only; the audit trail is permanent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionRecord {
    id: CorrectionId,
    incorrect_brand: String,
    incorrect_model: String,
    correct_brand: String,
    correct_model: String,
    confidence_at_prediction: f64,
    submitted_at: DateTime<Utc>,
    status: CorrectionStatus,
}

impl CorrectionRecord {
    /// Create a new Pending record with a fresh id and server-assigned
    /// timestamp.
    pub fn new(
        incorrect_brand: impl Into<String>,
        incorrect_model: impl Into<String>,
        correct_brand: impl Into<String>,
        correct_model: impl Into<String>,
        confidence_at_prediction: f64,
    ) -> Result<Self, DomainError> {
        if !(0.0..=1.0).contains(&confidence_at_prediction) {
            return Err(DomainError::validation(format!(
                "confidence must be in [0, 1], got {}",
                confidence_at_prediction
            )));
        }
        Ok(Self {
            id: CorrectionId::generate(),
            incorrect_brand: incorrect_brand.into(),
            incorrect_model: incorrect_model.into(),
            correct_brand: correct_brand.into(),
            correct_model: correct_model.into(),
            confidence_at_prediction,
            submitted_at: Utc::now(),
            status: CorrectionStatus::Pending,
        })
    }

    pub fn id(&self) -> CorrectionId {
        self.id
    }

    pub fn incorrect_brand(&self) -> &str {
        &self.incorrect_brand
    }

    pub fn incorrect_model(&self) -> &str {
        &self.incorrect_model
    }

    pub fn correct_brand(&self) -> &str {
        &self.correct_brand
    }

    pub fn correct_model(&self) -> &str {
        &self.correct_model
    }

    pub fn confidence_at_prediction(&self) -> f64 {
        self.confidence_at_prediction
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    pub fn status(&self) -> CorrectionStatus {
        self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status == CorrectionStatus::Pending
    }

    /// Transition Pending -> Processed.
    ///
    /// A second call fails: the transition is one-way and one-time.
    pub fn mark_processed(&mut self) -> Result<(), DomainError> {
        match self.status {
            CorrectionStatus::Pending => {
                self.status = CorrectionStatus::Processed;
                Ok(())
            }
            CorrectionStatus::Processed => Err(DomainError::invalid_state_transition(format!(
                "correction '{}' is already processed",
                self.id
            ))),
        }
    }

    /// Grouping key for confusion-pair aggregation
    pub fn confusion_key(&self) -> (String, String, String, String) {
        (
            self.incorrect_brand.clone(),
            self.incorrect_model.clone(),
            self.correct_brand.clone(),
            self.correct_model.clone(),
        )
    }
}

// ============================================================================
// PredictionRecord
// ============================================================================

/// Unique identifier for a logged prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PredictionRecordId(Uuid);

impl PredictionRecordId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for PredictionRecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One confidently-identified prediction, logged for performance tracking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    id: PredictionRecordId,
    brand: String,
    model: String,
    confidence: f64,
    recorded_at: DateTime<Utc>,
}

impl PredictionRecord {
    pub fn new(
        brand: impl Into<String>,
        model: impl Into<String>,
        confidence: f64,
    ) -> Result<Self, DomainError> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(DomainError::validation(format!(
                "confidence must be in [0, 1], got {}",
                confidence
            )));
        }
        Ok(Self {
            id: PredictionRecordId::generate(),
            brand: brand.into(),
            model: model.into(),
            confidence,
            recorded_at: Utc::now(),
        })
    }

    pub fn id(&self) -> PredictionRecordId {
        self.id
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> CorrectionRecord {
        CorrectionRecord::new("STX", "Sabre", "Brine", "Edge", 0.72).unwrap()
    }

    #[test]
    fn test_new_record_is_pending() {
        let record = record();
        assert_eq!(record.status(), CorrectionStatus::Pending);
        assert!(record.is_pending());
    }

    #[test]
    fn test_mark_processed_once() {
        let mut record = record();
        record.mark_processed().unwrap();
        assert_eq!(record.status(), CorrectionStatus::Processed);

        let err = record.mark_processed().unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidStateTransition { .. }
        ));
    }

    #[test]
    fn test_rejects_out_of_range_confidence() {
        assert!(CorrectionRecord::new("A", "B", "C", "D", 1.2).is_err());
        assert!(PredictionRecord::new("A", "B", -0.1).is_err());
    }

    #[test]
    fn test_unique_ids() {
        assert_ne!(record().id(), record().id());
    }

    #[test]
    fn test_confusion_key() {
        let record = record();
        assert_eq!(
            record.confusion_key(),
            (
                "STX".to_string(),
                "Sabre".to_string(),
                "Brine".to_string(),
                "Edge".to_string()
            )
        );
    }

    #[test]
    fn test_correction_id_parse_roundtrip() {
        let id = CorrectionId::generate();
        let parsed = CorrectionId::parse(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
        assert!(CorrectionId::parse("not-a-uuid").is_err());
    }
}
