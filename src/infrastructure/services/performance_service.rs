//! Performance reporting: snapshots, recommendations, dashboard stats

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::correction::{CorrectionLedger, PredictionLog};
use crate::domain::performance::{compute_snapshot, PerformanceSnapshot};
use crate::domain::DomainError;

/// Brand accuracy below this percentage triggers a recommendation
const ACCURACY_RECOMMENDATION_FLOOR: f64 = 70.0;
/// Confusion pairs at or above this frequency trigger a recommendation
const MISTAKE_RECOMMENDATION_FLOOR: usize = 3;

// ============================================================================
// Response Types
// ============================================================================

/// Snapshot plus advisory training recommendations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub performance: PerformanceSnapshot,
    pub recommendations: Vec<String>,
}

/// Volume and confidence for one class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassActivity {
    pub label: String,
    pub count: usize,
    pub average_confidence: f64,
}

/// A recent correction in dashboard form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentCorrection {
    pub id: String,
    pub incorrect: String,
    pub correct: String,
    pub confidence: f64,
    pub submitted_at: DateTime<Utc>,
}

/// Aggregate view backing the operations dashboard.
///
/// Derived entirely from the prediction log and ledger; never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_identifications: usize,
    pub average_confidence: f64,
    pub class_distribution: BTreeMap<String, usize>,
    pub top_classes: Vec<ClassActivity>,
    pub total_corrections: usize,
    pub pending_corrections: usize,
    pub processed_corrections: usize,
    pub most_corrected: Option<String>,
    pub recent_corrections: Vec<RecentCorrection>,
}

// ============================================================================
// PerformanceService
// ============================================================================

/// Computes derived performance views on demand
#[derive(Debug)]
pub struct PerformanceService<L: CorrectionLedger, P: PredictionLog> {
    ledger: Arc<L>,
    prediction_log: Arc<P>,
    retrain_floor: usize,
}

impl<L: CorrectionLedger, P: PredictionLog> PerformanceService<L, P> {
    pub fn new(ledger: Arc<L>, prediction_log: Arc<P>, retrain_floor: usize) -> Self {
        Self {
            ledger,
            prediction_log,
            retrain_floor,
        }
    }

    /// Recompute the snapshot from the full history
    pub async fn snapshot(&self) -> Result<PerformanceSnapshot, DomainError> {
        let predictions = self.prediction_log.list().await?;
        let corrections = self.ledger.list().await?;
        debug!(
            predictions = predictions.len(),
            corrections = corrections.len(),
            "computing performance snapshot"
        );
        Ok(compute_snapshot(&predictions, &corrections))
    }

    /// Snapshot plus advisory recommendations
    pub async fn report(&self) -> Result<PerformanceReport, DomainError> {
        let performance = self.snapshot().await?;
        let recommendations = self.recommendations(&performance);
        Ok(PerformanceReport {
            performance,
            recommendations,
        })
    }

    /// Advisory text derived from brand accuracy and confusion volume.
    ///
    /// These guide data collection; nothing enforces them.
    pub fn recommendations(&self, snapshot: &PerformanceSnapshot) -> Vec<String> {
        let mut recommendations = Vec::new();

        if snapshot.total_predictions < self.retrain_floor {
            recommendations.push(format!(
                "Only {} predictions logged; at least {} are needed before retraining is worthwhile",
                snapshot.total_predictions, self.retrain_floor
            ));
        }

        for (brand, accuracy) in &snapshot.brand_accuracy {
            if *accuracy < ACCURACY_RECOMMENDATION_FLOOR {
                recommendations.push(format!(
                    "Brand {} has only {:.1}% accuracy; collect more labeled examples",
                    brand, accuracy
                ));
            }
        }

        for mistake in &snapshot.common_mistakes {
            if mistake.frequency >= MISTAKE_RECOMMENDATION_FLOOR {
                recommendations.push(format!(
                    "{} {} is confused with {} {} ({} times); add distinguishing photos to the training set",
                    mistake.correct_brand,
                    mistake.correct_model,
                    mistake.incorrect_brand,
                    mistake.incorrect_model,
                    mistake.frequency
                ));
            }
        }

        recommendations
    }

    /// Dashboard aggregate over both logs
    pub async fn stats(&self) -> Result<DashboardStats, DomainError> {
        let predictions = self.prediction_log.list().await?;
        let corrections = self.ledger.list().await?;

        let total_identifications = predictions.len();
        let average_confidence = if predictions.is_empty() {
            0.0
        } else {
            predictions.iter().map(|p| p.confidence()).sum::<f64>() / predictions.len() as f64
        };

        let mut per_class: BTreeMap<String, (usize, f64)> = BTreeMap::new();
        for prediction in &predictions {
            let label = format!("{} {}", prediction.brand(), prediction.model());
            let entry = per_class.entry(label).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += prediction.confidence();
        }

        let class_distribution: BTreeMap<String, usize> = per_class
            .iter()
            .map(|(label, (count, _))| (label.clone(), *count))
            .collect();

        let mut top_classes: Vec<ClassActivity> = per_class
            .into_iter()
            .map(|(label, (count, confidence_sum))| ClassActivity {
                label,
                count,
                average_confidence: confidence_sum / count as f64,
            })
            .collect();
        top_classes.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
        top_classes.truncate(5);

        let pending_corrections = corrections.iter().filter(|c| c.is_pending()).count();

        let mut corrected_counts: BTreeMap<String, usize> = BTreeMap::new();
        for correction in &corrections {
            let label = format!(
                "{} {}",
                correction.incorrect_brand(),
                correction.incorrect_model()
            );
            *corrected_counts.entry(label).or_default() += 1;
        }
        let most_corrected = corrected_counts
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
            .map(|(label, _)| label);

        let mut recent: Vec<&_> = corrections.iter().collect();
        recent.sort_by(|a, b| b.submitted_at().cmp(&a.submitted_at()));
        let recent_corrections = recent
            .into_iter()
            .take(5)
            .map(|c| RecentCorrection {
                id: c.id().to_string(),
                incorrect: format!("{} {}", c.incorrect_brand(), c.incorrect_model()),
                correct: format!("{} {}", c.correct_brand(), c.correct_model()),
                confidence: c.confidence_at_prediction(),
                submitted_at: c.submitted_at(),
            })
            .collect();

        Ok(DashboardStats {
            total_identifications,
            average_confidence,
            class_distribution,
            top_classes,
            total_corrections: corrections.len(),
            pending_corrections,
            processed_corrections: corrections.len() - pending_corrections,
            most_corrected,
            recent_corrections,
        })
    }
}
