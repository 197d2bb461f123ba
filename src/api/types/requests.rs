//! Request DTOs

use serde::Deserialize;
use validator::Validate;

/// Body of POST /v1/corrections
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitCorrectionBody {
    #[validate(length(min = 1, message = "incorrect_brand cannot be empty"))]
    pub incorrect_brand: String,
    #[validate(length(min = 1, message = "incorrect_model cannot be empty"))]
    pub incorrect_model: String,
    #[validate(length(min = 1, message = "correct_brand cannot be empty"))]
    pub correct_brand: String,
    #[validate(length(min = 1, message = "correct_model cannot be empty"))]
    pub correct_model: String,
    /// Confidence the model reported for the wrong prediction, in [0, 1]
    #[validate(range(min = 0.0, max = 1.0, message = "confidence must be in [0, 1]"))]
    pub confidence: f64,
}
