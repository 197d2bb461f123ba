//! Identification service: preprocess, classify, combine, valuate
//!
//! Each request owns its tensors for its lifetime; they are dropped on every
//! exit path, including cancellation, because nothing stores them outside
//! the request future.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info, warn};

use crate::domain::catalog::{CatalogKey, CatalogRepository};
use crate::domain::classifier::{Prediction, PredictionSet};
use crate::domain::correction::{PredictionLog, PredictionRecord};
use crate::domain::valuation::{ConditionGrade, Provenance, ValuationResult, ValuationTables};
use crate::domain::DomainError;
use crate::infrastructure::classifier::ActiveModel;
use crate::infrastructure::imaging::ImagePreprocessor;

// ============================================================================
// Request / Response Types
// ============================================================================

/// One uploaded photo
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Bytes,
    pub mime_hint: Option<String>,
}

/// An identification request from the boundary
#[derive(Debug, Clone)]
pub struct IdentifyRequest {
    pub images: Vec<ImageUpload>,
    pub description: Option<String>,
    pub condition: ConditionGrade,
    pub provenance: Provenance,
}

/// The combined outcome of one identification
#[derive(Debug, Clone, PartialEq)]
pub struct Identification {
    pub predictions: PredictionSet,
    /// Present when the prediction was confident and in the catalog
    pub valuation: Option<ValuationResult>,
    pub model_version: u64,
}

// ============================================================================
// IdentificationService
// ============================================================================

/// Orchestrates the identify pipeline against the active model
#[derive(Debug)]
pub struct IdentificationService<C: CatalogRepository, P: PredictionLog> {
    preprocessor: ImagePreprocessor,
    active_model: Arc<ActiveModel>,
    catalog: Arc<C>,
    prediction_log: Arc<P>,
    unknown_threshold: f64,
    tables: ValuationTables,
}

impl<C: CatalogRepository, P: PredictionLog> IdentificationService<C, P> {
    pub fn new(
        preprocessor: ImagePreprocessor,
        active_model: Arc<ActiveModel>,
        catalog: Arc<C>,
        prediction_log: Arc<P>,
        unknown_threshold: f64,
        tables: ValuationTables,
    ) -> Self {
        Self {
            preprocessor,
            active_model,
            catalog,
            prediction_log,
            unknown_threshold,
            tables,
        }
    }

    /// Identify one item from 1..N photos.
    ///
    /// Multi-image policy: each photo is preprocessed and classified
    /// independently, per-class probabilities are averaged across photos,
    /// and the averaged distribution is re-ranked. The unknown flag is
    /// evaluated on the combined top probability.
    pub async fn identify(&self, request: IdentifyRequest) -> Result<Identification, DomainError> {
        if request.images.is_empty() {
            return Err(DomainError::validation(
                "at least one image is required",
            ));
        }

        if let Some(description) = &request.description {
            debug!(length = description.len(), "free-text description attached");
        }

        // The model snapshot is pinned for the whole request; a concurrent
        // retrain swap does not affect us.
        let model = self.active_model.current();

        let mut per_image: Vec<PredictionSet> = Vec::with_capacity(request.images.len());
        for upload in &request.images {
            let tensor = self
                .preprocessor
                .preprocess(&upload.bytes, upload.mime_hint.as_deref())?;
            per_image.push(model.classify(&tensor, self.unknown_threshold)?);
            // tensor dropped here; the next image gets its own buffer
        }

        let combined = combine(&per_image, model.labels(), self.unknown_threshold);

        if combined.is_unknown() {
            info!(
                images = request.images.len(),
                model_version = model.version(),
                "no confident match"
            );
            return Ok(Identification {
                predictions: combined,
                valuation: None,
                model_version: model.version(),
            });
        }

        let top = combined
            .top()
            .ok_or_else(|| DomainError::internal("confident prediction set is empty"))?
            .clone();

        let key = CatalogKey::from_label(top.label())?;
        let entry = self.catalog.require(&key).await?;
        let valuation = ValuationResult::compute(
            &entry,
            request.condition,
            request.provenance,
            top.probability(),
            &self.tables,
        )?;

        let record = PredictionRecord::new(key.brand(), key.model(), top.probability())?;
        if let Err(e) = self.prediction_log.append(record).await {
            // Logging the prediction must not fail the identification.
            warn!(error = %e, "failed to append prediction record");
        }

        info!(
            brand = key.brand(),
            model = key.model(),
            confidence = top.probability(),
            estimated_value = valuation.estimated_value(),
            model_version = model.version(),
            "identification complete"
        );

        Ok(Identification {
            predictions: combined,
            valuation: Some(valuation),
            model_version: model.version(),
        })
    }
}

/// Average per-class probabilities across images and re-rank
fn combine(per_image: &[PredictionSet], labels: &[String], unknown_threshold: f64) -> PredictionSet {
    if per_image.len() == 1 {
        return per_image[0].clone();
    }

    let count = per_image.len() as f64;
    let mut averaged: Vec<Prediction> = labels
        .iter()
        .map(|label| {
            let sum: f64 = per_image
                .iter()
                .flat_map(|set| set.predictions())
                .filter(|p| p.label() == label.as_str())
                .map(|p| p.probability())
                .sum();
            Prediction::new(label.clone(), sum / count)
        })
        .collect();

    // Stable sort keeps label-list order on ties, like single-image ranking.
    averaged.sort_by(|a, b| {
        b.probability()
            .partial_cmp(&a.probability())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    PredictionSet::from_ranked(averaged, unknown_threshold)
}
