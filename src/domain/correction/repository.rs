//! Ledger and prediction log traits

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{CorrectionId, CorrectionRecord, PredictionRecord};
use crate::domain::DomainError;

/// Fields of a correction submission, before the ledger assigns identity
#[derive(Debug, Clone)]
pub struct NewCorrection {
    pub incorrect_brand: String,
    pub incorrect_model: String,
    pub correct_brand: String,
    pub correct_model: String,
    pub confidence_at_prediction: f64,
}

/// Append-only log of user corrections.
///
/// Appends from concurrent submitters are linearizable: every record gets a
/// unique id and no write is lost. There is deliberately no delete.
#[async_trait]
pub trait CorrectionLedger: Send + Sync + Debug {
    /// Append a new Pending record, assigning id and timestamp
    async fn append(&self, correction: NewCorrection) -> Result<CorrectionRecord, DomainError>;

    /// Get a record by id
    async fn get(&self, id: CorrectionId) -> Result<Option<CorrectionRecord>, DomainError>;

    /// A consistent point-in-time copy of all records, oldest first.
    ///
    /// Safe to call while appends are in flight; the returned vector never
    /// reflects a partially-applied write.
    async fn list(&self) -> Result<Vec<CorrectionRecord>, DomainError>;

    /// Transition a record Pending -> Processed
    async fn mark_processed(&self, id: CorrectionId) -> Result<CorrectionRecord, DomainError>;

    /// Number of records in the ledger
    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.list().await?.len())
    }
}

/// Append-only log of confidently-identified predictions
#[async_trait]
pub trait PredictionLog: Send + Sync + Debug {
    /// Append a prediction record
    async fn append(&self, record: PredictionRecord) -> Result<(), DomainError>;

    /// A consistent point-in-time copy of all records, oldest first
    async fn list(&self) -> Result<Vec<PredictionRecord>, DomainError>;

    /// Number of logged predictions
    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.list().await?.len())
    }
}
