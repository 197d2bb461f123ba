//! Retrain policy and orchestration
//!
//! Retraining is the single writer of model state. The candidate version is
//! built and validated entirely off to the side; the active model is only
//! touched by the final atomic swap, so a failure or timeout at any earlier
//! point leaves the serving version exactly as it was.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::domain::classifier::ModelMetadata;
use crate::domain::correction::{CorrectionLedger, CorrectionRecord, PredictionLog};
use crate::domain::performance::{compute_snapshot, PerformanceSnapshot};
use crate::domain::DomainError;
use crate::infrastructure::classifier::{ActiveModel, ModelVersion};

// ============================================================================
// Types
// ============================================================================

/// Result of a successful retrain
#[derive(Debug, Clone, PartialEq)]
pub struct RetrainOutcome {
    pub version: u64,
    pub corrections_applied: usize,
    pub message: String,
}

// ============================================================================
// TrainingService
// ============================================================================

/// Decides when retraining is justified and performs the version swap
#[derive(Debug)]
pub struct TrainingService<L: CorrectionLedger, P: PredictionLog> {
    active_model: Arc<ActiveModel>,
    ledger: Arc<L>,
    prediction_log: Arc<P>,
    retrain_floor: usize,
    learning_rate: f32,
    retrain_timeout: Duration,
    // Serializes retrains; inference never takes this lock.
    retrain_lock: Mutex<()>,
}

impl<L: CorrectionLedger, P: PredictionLog> TrainingService<L, P> {
    pub fn new(
        active_model: Arc<ActiveModel>,
        ledger: Arc<L>,
        prediction_log: Arc<P>,
        retrain_floor: usize,
        learning_rate: f32,
        retrain_timeout: Duration,
    ) -> Self {
        Self {
            active_model,
            ledger,
            prediction_log,
            retrain_floor,
            learning_rate,
            retrain_timeout,
            retrain_lock: Mutex::new(()),
        }
    }

    /// Whether enough corrected data exists to justify retraining.
    ///
    /// Below the floor a retrain would overfit to noise from a tiny
    /// correction set.
    pub fn should_retrain(&self, snapshot: &PerformanceSnapshot) -> bool {
        snapshot.total_predictions >= self.retrain_floor
    }

    /// Build, validate, and atomically install a new model version derived
    /// from the pending corrections.
    pub async fn retrain(&self) -> Result<RetrainOutcome, DomainError> {
        let _guard = self.retrain_lock.lock().await;

        let predictions = self.prediction_log.list().await?;
        let corrections = self.ledger.list().await?;
        let snapshot = compute_snapshot(&predictions, &corrections);

        if !self.should_retrain(&snapshot) {
            return Err(DomainError::insufficient_data(format!(
                "{} predictions logged; at least {} required before retraining",
                snapshot.total_predictions, self.retrain_floor
            )));
        }

        let pending: Vec<CorrectionRecord> = corrections
            .into_iter()
            .filter(|c| c.is_pending())
            .collect();
        if pending.is_empty() {
            return Err(DomainError::insufficient_data(
                "no pending corrections to learn from",
            ));
        }

        let current = self.active_model.current();
        info!(
            from_version = current.version(),
            pending = pending.len(),
            "retraining started"
        );

        // Candidate construction runs off the async runtime and under a
        // deadline. On expiry the blocking task is abandoned; it only ever
        // touched its own clone of the weights.
        let learning_rate = self.learning_rate;
        let build_input = pending.clone();
        let build_from = Arc::clone(&current);
        let build = tokio::task::spawn_blocking(move || {
            build_candidate(&build_from, &build_input, learning_rate)
        });

        let candidate = tokio::time::timeout(self.retrain_timeout, build)
            .await
            .map_err(|_| {
                DomainError::timeout(format!(
                    "retraining exceeded {}ms; active model unchanged",
                    self.retrain_timeout.as_millis()
                ))
            })?
            .map_err(|e| DomainError::internal(format!("retraining task failed: {}", e)))??;

        candidate.validate()?;

        let new_version = candidate.version();
        let superseded = self.active_model.swap(Arc::new(candidate));

        // Only corrections that made it into the now-active version are
        // marked processed.
        let mut applied = 0;
        for record in &pending {
            match self.ledger.mark_processed(record.id()).await {
                Ok(_) => applied += 1,
                Err(e) => warn!(id = %record.id(), error = %e, "failed to mark correction processed"),
            }
        }

        info!(
            from_version = superseded.version(),
            to_version = new_version,
            corrections_applied = applied,
            "retraining complete"
        );

        Ok(RetrainOutcome {
            version: new_version,
            corrections_applied: applied,
            message: format!(
                "Retraining complete: model version {} is now active ({} corrections applied)",
                new_version, applied
            ),
        })
    }
}

/// Derive a successor version from the current one.
///
/// Hidden-layer weights are carried over unchanged; each confusion pair
/// nudges the output bias away from the misreported class and toward the
/// corrected one, scaled by how often users reported it.
fn build_candidate(
    current: &ModelVersion,
    pending: &[CorrectionRecord],
    learning_rate: f32,
) -> Result<ModelVersion, DomainError> {
    let mut frequencies: HashMap<(String, String), usize> = HashMap::new();
    for correction in pending {
        let incorrect = format!(
            "{} {}",
            correction.incorrect_brand(),
            correction.incorrect_model()
        );
        let correct = format!(
            "{} {}",
            correction.correct_brand(),
            correction.correct_model()
        );
        *frequencies.entry((incorrect, correct)).or_default() += 1;
    }

    let mut network = current.network().clone();
    for ((incorrect, correct), frequency) in frequencies {
        let delta = learning_rate * frequency as f32;

        match current.label_index(&incorrect) {
            Some(index) => network.adjust_output_bias(index, -delta)?,
            None => warn!(label = %incorrect, "corrected-away label not in label set"),
        }
        match current.label_index(&correct) {
            Some(index) => network.adjust_output_bias(index, delta)?,
            None => warn!(label = %correct, "corrected-to label not in label set"),
        }
    }

    let metadata = ModelMetadata::new(current.name(), current.labels().to_vec())?;
    ModelVersion::new(current.version() + 1, &metadata, network)
}
