//! Correction service over the append-only ledger

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::correction::{CorrectionId, CorrectionLedger, CorrectionRecord, NewCorrection};
use crate::domain::DomainError;

// ============================================================================
// Request Types
// ============================================================================

/// A user's report of a misidentification
#[derive(Debug, Clone)]
pub struct SubmitCorrectionRequest {
    pub incorrect_brand: String,
    pub incorrect_model: String,
    pub correct_brand: String,
    pub correct_model: String,
    /// The confidence the model reported for the wrong prediction, in [0, 1]
    pub confidence_at_prediction: f64,
}

// ============================================================================
// CorrectionService
// ============================================================================

/// Validates and records user corrections
#[derive(Debug)]
pub struct CorrectionService<L: CorrectionLedger> {
    ledger: Arc<L>,
}

impl<L: CorrectionLedger> CorrectionService<L> {
    pub fn new(ledger: Arc<L>) -> Self {
        Self { ledger }
    }

    /// Record a correction, assigning id, timestamp, and Pending status
    pub async fn submit(
        &self,
        request: SubmitCorrectionRequest,
    ) -> Result<CorrectionRecord, DomainError> {
        validate_submission(&request)?;

        let incorrect = format!("{} {}", request.incorrect_brand, request.incorrect_model);
        let correct = format!("{} {}", request.correct_brand, request.correct_model);
        debug!(incorrect = %incorrect, correct = %correct, "recording correction");

        let record = self
            .ledger
            .append(NewCorrection {
                incorrect_brand: request.incorrect_brand.trim().to_string(),
                incorrect_model: request.incorrect_model.trim().to_string(),
                correct_brand: request.correct_brand.trim().to_string(),
                correct_model: request.correct_model.trim().to_string(),
                confidence_at_prediction: request.confidence_at_prediction,
            })
            .await?;

        info!(id = %record.id(), "correction recorded");
        Ok(record)
    }

    /// Get a correction by its string id
    pub async fn get(&self, id: &str) -> Result<Option<CorrectionRecord>, DomainError> {
        let id = CorrectionId::parse(id)?;
        self.ledger.get(id).await
    }

    /// Transition a correction Pending -> Processed
    pub async fn process(&self, id: &str) -> Result<CorrectionRecord, DomainError> {
        let id = CorrectionId::parse(id)?;
        let record = self.ledger.mark_processed(id).await?;
        info!(id = %record.id(), "correction processed");
        Ok(record)
    }
}

fn validate_submission(request: &SubmitCorrectionRequest) -> Result<(), DomainError> {
    let fields = [
        ("incorrect_brand", &request.incorrect_brand),
        ("incorrect_model", &request.incorrect_model),
        ("correct_brand", &request.correct_brand),
        ("correct_model", &request.correct_model),
    ];
    for (name, value) in fields {
        if value.trim().is_empty() {
            return Err(DomainError::validation(format!("{} cannot be empty", name)));
        }
    }
    if !(0.0..=1.0).contains(&request.confidence_at_prediction) {
        return Err(DomainError::validation(format!(
            "confidence must be in [0, 1], got {}",
            request.confidence_at_prediction
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::correction::CorrectionStatus;
    use crate::infrastructure::correction::InMemoryCorrectionLedger;

    fn service() -> CorrectionService<InMemoryCorrectionLedger> {
        CorrectionService::new(Arc::new(InMemoryCorrectionLedger::new()))
    }

    fn request() -> SubmitCorrectionRequest {
        SubmitCorrectionRequest {
            incorrect_brand: "STX".to_string(),
            incorrect_model: "Sabre".to_string(),
            correct_brand: "Brine".to_string(),
            correct_model: "Edge".to_string(),
            confidence_at_prediction: 0.72,
        }
    }

    #[tokio::test]
    async fn test_submit_and_get() {
        let service = service();
        let record = service.submit(request()).await.unwrap();
        assert_eq!(record.status(), CorrectionStatus::Pending);

        let fetched = service.get(&record.id().to_string()).await.unwrap().unwrap();
        assert_eq!(fetched, record);
    }

    #[tokio::test]
    async fn test_submit_trims_whitespace() {
        let service = service();
        let record = service
            .submit(SubmitCorrectionRequest {
                incorrect_brand: " STX ".to_string(),
                ..request()
            })
            .await
            .unwrap();
        assert_eq!(record.incorrect_brand(), "STX");
    }

    #[tokio::test]
    async fn test_submit_rejects_blank_fields() {
        let service = service();
        let err = service
            .submit(SubmitCorrectionRequest {
                correct_brand: "  ".to_string(),
                ..request()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_submit_rejects_bad_confidence() {
        let service = service();
        let err = service
            .submit(SubmitCorrectionRequest {
                confidence_at_prediction: 7.2,
                ..request()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_process_lifecycle() {
        let service = service();
        let record = service.submit(request()).await.unwrap();
        let id = record.id().to_string();

        let processed = service.process(&id).await.unwrap();
        assert_eq!(processed.status(), CorrectionStatus::Processed);

        let err = service.process(&id).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidStateTransition { .. }));
    }

    #[tokio::test]
    async fn test_process_bad_id() {
        let service = service();
        assert!(matches!(
            service.process("not-a-uuid").await.unwrap_err(),
            DomainError::Validation { .. }
        ));
        assert!(matches!(
            service
                .process(&CorrectionId::generate().to_string())
                .await
                .unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }
}
