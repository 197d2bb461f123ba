//! Correction ledger and prediction log domain types

pub mod entity;
pub mod repository;

pub use entity::{
    CorrectionId, CorrectionRecord, CorrectionStatus, PredictionRecord, PredictionRecordId,
};
pub use repository::{CorrectionLedger, NewCorrection, PredictionLog};
