//! Ranked prediction types

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// A single class prediction with its probability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    label: String,
    probability: f64,
}

impl Prediction {
    pub fn new(label: impl Into<String>, probability: f64) -> Self {
        Self {
            label: label.into(),
            probability,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

/// The ordered output of one classification.
///
/// Entries are sorted by descending probability; ties keep the position the
/// label held in the model's label list. `unknown` is set when the top
/// probability fell below the configured threshold, so callers can tell a
/// low-confidence real prediction from no match at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionSet {
    predictions: Vec<Prediction>,
    unknown: bool,
}

impl PredictionSet {
    /// Rank a probability vector against its ordered label list.
    ///
    /// The two sequences must agree in length; a mismatch here means the
    /// model graph and metadata drifted apart.
    pub fn rank(
        probabilities: &[f64],
        labels: &[String],
        unknown_threshold: f64,
    ) -> Result<Self, DomainError> {
        if probabilities.len() != labels.len() {
            return Err(DomainError::label_mismatch(
                probabilities.len(),
                labels.len(),
            ));
        }

        let mut predictions: Vec<Prediction> = labels
            .iter()
            .zip(probabilities)
            .map(|(label, &p)| Prediction::new(label.clone(), p))
            .collect();

        // Stable sort: equal probabilities keep label-list order.
        predictions.sort_by(|a, b| {
            b.probability
                .partial_cmp(&a.probability)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let unknown = predictions
            .first()
            .map(|top| top.probability < unknown_threshold)
            .unwrap_or(true);

        Ok(Self {
            predictions,
            unknown,
        })
    }

    /// Build directly from already-ranked entries (used when combining
    /// multiple per-image rankings).
    pub fn from_ranked(predictions: Vec<Prediction>, unknown_threshold: f64) -> Self {
        let unknown = predictions
            .first()
            .map(|top| top.probability < unknown_threshold)
            .unwrap_or(true);
        Self {
            predictions,
            unknown,
        }
    }

    /// Ranked entries, best first
    pub fn predictions(&self) -> &[Prediction] {
        &self.predictions
    }

    /// The best-ranked prediction, if any classes exist
    pub fn top(&self) -> Option<&Prediction> {
        self.predictions.first()
    }

    /// Whether the top probability fell below the unknown-threshold
    pub fn is_unknown(&self) -> bool {
        self.unknown
    }

    /// Sum of all probabilities (should be ~1.0 for a softmax output)
    pub fn probability_mass(&self) -> f64 {
        self.predictions.iter().map(|p| p.probability).sum()
    }
}
