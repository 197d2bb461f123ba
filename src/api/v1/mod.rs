//! v1 API endpoints

pub mod corrections;
pub mod identify;
pub mod performance;
pub mod training;

use axum::{
    routing::{get, post},
    Router,
};

use super::state::AppState;

/// Create v1 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/identify", post(identify::identify))
        .route("/corrections", post(corrections::submit_correction))
        .route(
            "/corrections/{correction_id}/process",
            post(corrections::process_correction),
        )
        .route("/performance", get(performance::get_performance))
        .route("/stats", get(performance::get_stats))
        .route("/training/retrain", post(training::retrain))
}
