//! In-memory correction ledger and prediction log

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::correction::{
    CorrectionId, CorrectionLedger, CorrectionRecord, NewCorrection, PredictionLog,
    PredictionRecord,
};
use crate::domain::DomainError;

// ============================================================================
// InMemoryCorrectionLedger
// ============================================================================

/// Append-only in-memory ledger.
///
/// A single write lock per append makes concurrent submissions
/// linearizable: every record gets a unique id and no write is lost.
/// `list` copies the records under the read lock, giving snapshot readers a
/// consistent point-in-time view while appends continue.
#[derive(Debug, Default)]
pub struct InMemoryCorrectionLedger {
    records: RwLock<Vec<CorrectionRecord>>,
    index: RwLock<HashMap<CorrectionId, usize>>,
}

impl InMemoryCorrectionLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CorrectionLedger for InMemoryCorrectionLedger {
    async fn append(&self, correction: NewCorrection) -> Result<CorrectionRecord, DomainError> {
        let record = CorrectionRecord::new(
            correction.incorrect_brand,
            correction.incorrect_model,
            correction.correct_brand,
            correction.correct_model,
            correction.confidence_at_prediction,
        )?;

        let mut records = self.records.write().unwrap();
        let mut index = self.index.write().unwrap();
        index.insert(record.id(), records.len());
        records.push(record.clone());
        Ok(record)
    }

    async fn get(&self, id: CorrectionId) -> Result<Option<CorrectionRecord>, DomainError> {
        let records = self.records.read().unwrap();
        let index = self.index.read().unwrap();
        Ok(index.get(&id).map(|&i| records[i].clone()))
    }

    async fn list(&self) -> Result<Vec<CorrectionRecord>, DomainError> {
        let records = self.records.read().unwrap();
        Ok(records.clone())
    }

    async fn mark_processed(&self, id: CorrectionId) -> Result<CorrectionRecord, DomainError> {
        let mut records = self.records.write().unwrap();
        let index = self.index.read().unwrap();

        let position = *index
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("correction '{}' not found", id)))?;

        let record = &mut records[position];
        record.mark_processed()?;
        Ok(record.clone())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.records.read().unwrap().len())
    }
}

// ============================================================================
// InMemoryPredictionLog
// ============================================================================

/// Append-only in-memory prediction log
#[derive(Debug, Default)]
pub struct InMemoryPredictionLog {
    records: RwLock<Vec<PredictionRecord>>,
}

impl InMemoryPredictionLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PredictionLog for InMemoryPredictionLog {
    async fn append(&self, record: PredictionRecord) -> Result<(), DomainError> {
        self.records.write().unwrap().push(record);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<PredictionRecord>, DomainError> {
        Ok(self.records.read().unwrap().clone())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.records.read().unwrap().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::correction::CorrectionStatus;
    use std::sync::Arc;

    fn submission() -> NewCorrection {
        NewCorrection {
            incorrect_brand: "STX".to_string(),
            incorrect_model: "Sabre".to_string(),
            correct_brand: "Brine".to_string(),
            correct_model: "Edge".to_string(),
            confidence_at_prediction: 0.66,
        }
    }

    #[tokio::test]
    async fn test_append_assigns_identity() {
        let ledger = InMemoryCorrectionLedger::new();
        let first = ledger.append(submission()).await.unwrap();
        let second = ledger.append(submission()).await.unwrap();

        assert_ne!(first.id(), second.id());
        assert_eq!(first.status(), CorrectionStatus::Pending);
        assert_eq!(ledger.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_mark_processed_lifecycle() {
        let ledger = InMemoryCorrectionLedger::new();
        let record = ledger.append(submission()).await.unwrap();

        let processed = ledger.mark_processed(record.id()).await.unwrap();
        assert_eq!(processed.status(), CorrectionStatus::Processed);

        let err = ledger.mark_processed(record.id()).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidStateTransition { .. }));
    }

    #[tokio::test]
    async fn test_mark_processed_unknown_id() {
        let ledger = InMemoryCorrectionLedger::new();
        let err = ledger
            .mark_processed(CorrectionId::generate())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_preserves_append_order() {
        let ledger = InMemoryCorrectionLedger::new();
        for _ in 0..3 {
            ledger.append(submission()).await.unwrap();
        }
        let records = ledger.list().await.unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.windows(2).all(|w| w[0].submitted_at() <= w[1].submitted_at()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_lose_nothing() {
        let ledger = Arc::new(InMemoryCorrectionLedger::new());

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                tokio::spawn(async move { ledger.append(submission()).await.unwrap().id() })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }

        ids.sort_by_key(|id| id.to_string());
        ids.dedup();
        assert_eq!(ids.len(), 32);
        assert_eq!(ledger.count().await.unwrap(), 32);
    }

    #[tokio::test]
    async fn test_prediction_log_appends() {
        let log = InMemoryPredictionLog::new();
        log.append(PredictionRecord::new("STX", "Sabre", 0.9).unwrap())
            .await
            .unwrap();
        log.append(PredictionRecord::new("Brine", "Edge", 0.4).unwrap())
            .await
            .unwrap();

        let records = log.list().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].brand(), "STX");
        assert_eq!(log.count().await.unwrap(), 2);
    }
}
