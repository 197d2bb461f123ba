//! Retrain endpoint

use axum::extract::State;
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, RetrainResponse};

/// POST /v1/training/retrain
pub async fn retrain(State(state): State<AppState>) -> Result<Json<RetrainResponse>, ApiError> {
    info!("retrain requested");
    let outcome = state.training_service.retrain().await?;
    Ok(Json(outcome.into()))
}
