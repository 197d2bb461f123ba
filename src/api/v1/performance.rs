//! Performance and dashboard endpoints

use axum::extract::State;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::infrastructure::services::{DashboardStats, PerformanceReport};

/// GET /v1/performance
///
/// Recomputed from the full history on every call; never cached or stored.
pub async fn get_performance(
    State(state): State<AppState>,
) -> Result<Json<PerformanceReport>, ApiError> {
    let report = state.performance_service.report().await?;
    Ok(Json(report))
}

/// GET /v1/stats
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<DashboardStats>, ApiError> {
    let stats = state.performance_service.stats().await?;
    Ok(Json(stats))
}
