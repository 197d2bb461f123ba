//! Response DTOs

use serde::{Deserialize, Serialize};

use crate::domain::classifier::Prediction;
use crate::domain::correction::{CorrectionRecord, CorrectionStatus};
use crate::domain::valuation::ValuationResult;
use crate::infrastructure::services::{Identification, RetrainOutcome};

/// Body of a successful POST /v1/identify
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifyResponse {
    pub predictions: Vec<Prediction>,
    pub unknown: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valuation: Option<ValuationResult>,
    pub model_version: u64,
}

impl From<Identification> for IdentifyResponse {
    fn from(identification: Identification) -> Self {
        Self {
            unknown: identification.predictions.is_unknown(),
            predictions: identification.predictions.predictions().to_vec(),
            valuation: identification.valuation,
            model_version: identification.model_version,
        }
    }
}

/// Body of a correction create/process response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectionResponse {
    pub id: String,
    pub incorrect_brand: String,
    pub incorrect_model: String,
    pub correct_brand: String,
    pub correct_model: String,
    pub confidence_at_prediction: f64,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub status: CorrectionStatus,
}

impl From<CorrectionRecord> for CorrectionResponse {
    fn from(record: CorrectionRecord) -> Self {
        Self {
            id: record.id().to_string(),
            incorrect_brand: record.incorrect_brand().to_string(),
            incorrect_model: record.incorrect_model().to_string(),
            correct_brand: record.correct_brand().to_string(),
            correct_model: record.correct_model().to_string(),
            confidence_at_prediction: record.confidence_at_prediction(),
            submitted_at: record.submitted_at(),
            status: record.status(),
        }
    }
}

/// Body of a successful POST /v1/training/retrain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrainResponse {
    pub message: String,
    pub version: u64,
    pub corrections_applied: usize,
}

impl From<RetrainOutcome> for RetrainResponse {
    fn from(outcome: RetrainOutcome) -> Self {
        Self {
            message: outcome.message,
            version: outcome.version,
            corrections_applied: outcome.corrections_applied,
        }
    }
}
