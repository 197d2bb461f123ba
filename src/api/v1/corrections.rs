//! Correction submission endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::state::AppState;
use crate::api::types::{ApiError, CorrectionResponse, Json, SubmitCorrectionBody};
use crate::infrastructure::services::SubmitCorrectionRequest;

/// POST /v1/corrections
pub async fn submit_correction(
    State(state): State<AppState>,
    Json(body): Json<SubmitCorrectionBody>,
) -> Result<(StatusCode, Json<CorrectionResponse>), ApiError> {
    body.validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let record = state
        .correction_service
        .submit(SubmitCorrectionRequest {
            incorrect_brand: body.incorrect_brand,
            incorrect_model: body.incorrect_model,
            correct_brand: body.correct_brand,
            correct_model: body.correct_model,
            confidence_at_prediction: body.confidence,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(record.into())))
}

/// POST /v1/corrections/{correction_id}/process
pub async fn process_correction(
    State(state): State<AppState>,
    Path(correction_id): Path<String>,
) -> Result<Json<CorrectionResponse>, ApiError> {
    let record = state.correction_service.process(&correction_id).await?;
    Ok(Json(record.into()))
}
