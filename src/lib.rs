//! GearCheck Engine
//!
//! Identifies collectible sporting equipment from photographs and estimates
//! market value, with support for:
//! - Signature-validated image preprocessing (JPEG/PNG/WebP)
//! - A versioned classifier with atomic model swaps
//! - A multiplicative rules model for valuation
//! - A feedback loop: correction ledger, performance tracking, and
//!   correction-driven retraining

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use api::state::AppState;
use domain::classifier::ModelMetadata;
use domain::DomainError;
use infrastructure::catalog::{default_catalog, default_labels, InMemoryCatalogRepository};
use infrastructure::classifier::{ActiveModel, MlpNetwork, ModelArtifact, ModelVersion};
use infrastructure::correction::{InMemoryCorrectionLedger, InMemoryPredictionLog};
use infrastructure::imaging::ImagePreprocessor;
use infrastructure::services::{
    CorrectionService, IdentificationService, PerformanceService, TrainingService,
};

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    config.validate()?;

    let active_model = Arc::new(ActiveModel::new(load_or_seed_model(config).await?));
    info!(
        model_version = active_model.version(),
        classes = active_model.current().labels().len(),
        "classifier ready"
    );

    let catalog = Arc::new(InMemoryCatalogRepository::with_entries(default_catalog()));
    let ledger = Arc::new(InMemoryCorrectionLedger::new());
    let prediction_log = Arc::new(InMemoryPredictionLog::new());

    let identification_service = Arc::new(IdentificationService::new(
        ImagePreprocessor::new(config.model.input_size),
        Arc::clone(&active_model),
        catalog,
        Arc::clone(&prediction_log),
        config.model.unknown_threshold,
        config.valuation.clone(),
    ));

    let correction_service = Arc::new(CorrectionService::new(Arc::clone(&ledger)));

    let performance_service = Arc::new(PerformanceService::new(
        Arc::clone(&ledger),
        Arc::clone(&prediction_log),
        config.training.retrain_floor,
    ));

    let training_service = Arc::new(TrainingService::new(
        Arc::clone(&active_model),
        Arc::clone(&ledger),
        Arc::clone(&prediction_log),
        config.training.retrain_floor,
        config.training.learning_rate,
        config.training.retrain_timeout(),
    ));

    Ok(AppState::new(
        identification_service,
        correction_service,
        performance_service,
        training_service,
        active_model,
    ))
}

/// Load the model artifact within the configured deadline, or seed a
/// deterministic untrained network over the default label set when no
/// artifact exists on disk.
async fn load_or_seed_model(config: &AppConfig) -> Result<ModelVersion, DomainError> {
    let weights_path = Path::new(&config.model.weights_path);
    let metadata_path = Path::new(&config.model.metadata_path);
    let input_features = feature_count(config.model.input_size);

    if weights_path.exists() && metadata_path.exists() {
        let weights = weights_path.to_path_buf();
        let metadata = metadata_path.to_path_buf();
        let load = tokio::task::spawn_blocking(move || ModelArtifact::load(&weights, &metadata, 1));

        let model = tokio::time::timeout(config.model.load_timeout(), load)
            .await
            .map_err(|_| {
                DomainError::timeout(format!(
                    "model load exceeded {}ms",
                    config.model.load_timeout_ms
                ))
            })?
            .map_err(|e| DomainError::internal(format!("model load task failed: {}", e)))??;

        if model.network().input_size() != input_features {
            return Err(DomainError::configuration(format!(
                "model expects {} input features but the configured {}x{} resolution produces {}",
                model.network().input_size(),
                config.model.input_size,
                config.model.input_size,
                input_features
            )));
        }
        Ok(model)
    } else {
        warn!(
            weights = %weights_path.display(),
            metadata = %metadata_path.display(),
            "model artifact not found; seeding an untrained network over the default label set"
        );
        let metadata = ModelMetadata::new("gearcheck-default", default_labels())?;
        let network = MlpNetwork::seeded(
            input_features,
            config.model.hidden_size,
            metadata.label_count(),
            config.model.seed,
        )?;
        ModelVersion::new(1, &metadata, network)
    }
}

fn feature_count(input_size: u32) -> usize {
    let side = input_size as usize;
    side * side * 3
}
