//! Snapshot computation
//!
//! A snapshot is always a derived view: it is recomputed from the full
//! prediction log and correction history on demand and never stored as a
//! source of truth. The computation is a pure function of its inputs, so
//! recomputing on unchanged data yields identical output.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::correction::{CorrectionRecord, PredictionRecord};

/// Confidence bucket boundaries: high >= 0.80, medium >= 0.50, low below
const HIGH_CONFIDENCE: f64 = 0.80;
const MEDIUM_CONFIDENCE: f64 = 0.50;

/// Prediction counts per confidence bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfidenceDistribution {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl ConfidenceDistribution {
    fn record(&mut self, confidence: f64) {
        if confidence >= HIGH_CONFIDENCE {
            self.high += 1;
        } else if confidence >= MEDIUM_CONFIDENCE {
            self.medium += 1;
        } else {
            self.low += 1;
        }
    }
}

/// An aggregated (incorrect, correct) label pair with its frequency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionPair {
    pub incorrect_brand: String,
    pub incorrect_model: String,
    pub correct_brand: String,
    pub correct_model: String,
    pub frequency: usize,
}

/// Point-in-time aggregate of identification performance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSnapshot {
    pub total_predictions: usize,
    pub correct_predictions: usize,
    /// Percentage in [0, 100]; 0.0 when no predictions exist
    pub accuracy: f64,
    /// Per-brand accuracy percentage for every brand with at least one
    /// logged prediction
    pub brand_accuracy: BTreeMap<String, f64>,
    pub confidence_distribution: ConfidenceDistribution,
    /// Confusion pairs sorted by frequency descending, most recent first on
    /// ties
    pub common_mistakes: Vec<ConfusionPair>,
}

/// Compute a snapshot from the full prediction log and correction history.
///
/// Each correction record counts one logged prediction as incorrect; counts
/// saturate so a correction backlog larger than the log cannot drive
/// accuracy negative.
pub fn compute_snapshot(
    predictions: &[PredictionRecord],
    corrections: &[CorrectionRecord],
) -> PerformanceSnapshot {
    let total_predictions = predictions.len();
    let correct_predictions = total_predictions.saturating_sub(corrections.len());

    let accuracy = percentage(correct_predictions, total_predictions);

    let mut confidence_distribution = ConfidenceDistribution::default();
    let mut brand_totals: BTreeMap<String, usize> = BTreeMap::new();
    for prediction in predictions {
        confidence_distribution.record(prediction.confidence());
        *brand_totals.entry(prediction.brand().to_string()).or_default() += 1;
    }

    let mut brand_mistakes: HashMap<String, usize> = HashMap::new();
    for correction in corrections {
        *brand_mistakes
            .entry(correction.incorrect_brand().to_string())
            .or_default() += 1;
    }

    let brand_accuracy = brand_totals
        .into_iter()
        .map(|(brand, total)| {
            let wrong = brand_mistakes.get(&brand).copied().unwrap_or(0).min(total);
            let accuracy = percentage(total - wrong, total);
            (brand, accuracy)
        })
        .collect();

    PerformanceSnapshot {
        total_predictions,
        correct_predictions,
        accuracy,
        brand_accuracy,
        confidence_distribution,
        common_mistakes: aggregate_mistakes(corrections),
    }
}

fn percentage(correct: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    // Multiply before dividing so round counts stay exact (16/20 -> 80.0).
    (correct as f64 * 100.0) / total as f64
}

fn aggregate_mistakes(corrections: &[CorrectionRecord]) -> Vec<ConfusionPair> {
    let mut groups: HashMap<(String, String, String, String), (usize, DateTime<Utc>)> =
        HashMap::new();

    for correction in corrections {
        let entry = groups
            .entry(correction.confusion_key())
            .or_insert((0, correction.submitted_at()));
        entry.0 += 1;
        entry.1 = entry.1.max(correction.submitted_at());
    }

    let mut pairs: Vec<(ConfusionPair, DateTime<Utc>)> = groups
        .into_iter()
        .map(|((ib, im, cb, cm), (frequency, latest))| {
            (
                ConfusionPair {
                    incorrect_brand: ib,
                    incorrect_model: im,
                    correct_brand: cb,
                    correct_model: cm,
                    frequency,
                },
                latest,
            )
        })
        .collect();

    // Frequency descending; ties broken by most recent submission.
    pairs.sort_by(|a, b| {
        b.0.frequency
            .cmp(&a.0.frequency)
            .then_with(|| b.1.cmp(&a.1))
    });

    pairs.into_iter().map(|(pair, _)| pair).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::correction::{CorrectionRecord, PredictionRecord};

    fn prediction(brand: &str, confidence: f64) -> PredictionRecord {
        PredictionRecord::new(brand, "Model", confidence).unwrap()
    }

    fn correction(incorrect: (&str, &str), correct: (&str, &str)) -> CorrectionRecord {
        CorrectionRecord::new(incorrect.0, incorrect.1, correct.0, correct.1, 0.6).unwrap()
    }

    #[test]
    fn test_empty_inputs_yield_zero_accuracy() {
        let snapshot = compute_snapshot(&[], &[]);
        assert_eq!(snapshot.total_predictions, 0);
        assert_eq!(snapshot.accuracy, 0.0);
        assert!(snapshot.brand_accuracy.is_empty());
        assert!(snapshot.common_mistakes.is_empty());
    }

    #[test]
    fn test_reference_accuracy() {
        // 20 predictions, 4 corrections -> 16 correct -> 80.0%
        let predictions: Vec<_> = (0..20).map(|_| prediction("STX", 0.9)).collect();
        let corrections: Vec<_> = (0..4)
            .map(|_| correction(("STX", "Sabre"), ("Brine", "Edge")))
            .collect();

        let snapshot = compute_snapshot(&predictions, &corrections);
        assert_eq!(snapshot.total_predictions, 20);
        assert_eq!(snapshot.correct_predictions, 16);
        assert_eq!(snapshot.accuracy, 80.0);
    }

    #[test]
    fn test_idempotent() {
        let predictions = vec![prediction("STX", 0.9), prediction("Brine", 0.4)];
        let corrections = vec![correction(("STX", "Sabre"), ("Brine", "Edge"))];

        let first = compute_snapshot(&predictions, &corrections);
        let second = compute_snapshot(&predictions, &corrections);
        assert_eq!(first, second);
    }

    #[test]
    fn test_brand_accuracy() {
        let predictions = vec![
            prediction("STX", 0.9),
            prediction("STX", 0.85),
            prediction("STX", 0.8),
            prediction("STX", 0.95),
            prediction("Brine", 0.7),
        ];
        let corrections = vec![correction(("STX", "Sabre"), ("Brine", "Edge"))];

        let snapshot = compute_snapshot(&predictions, &corrections);
        assert_eq!(snapshot.brand_accuracy["STX"], 75.0);
        assert_eq!(snapshot.brand_accuracy["Brine"], 100.0);
    }

    #[test]
    fn test_brand_accuracy_saturates() {
        // More corrections against a brand than logged predictions for it.
        let predictions = vec![prediction("STX", 0.9)];
        let corrections = vec![
            correction(("STX", "Sabre"), ("Brine", "Edge")),
            correction(("STX", "Sabre"), ("Brine", "Edge")),
        ];

        let snapshot = compute_snapshot(&predictions, &corrections);
        assert_eq!(snapshot.brand_accuracy["STX"], 0.0);
        assert_eq!(snapshot.correct_predictions, 0);
    }

    #[test]
    fn test_confidence_buckets() {
        let predictions = vec![
            prediction("A", 0.95),
            prediction("B", 0.80), // boundary: high
            prediction("C", 0.79),
            prediction("D", 0.50), // boundary: medium
            prediction("E", 0.49),
        ];
        let snapshot = compute_snapshot(&predictions, &[]);
        assert_eq!(snapshot.confidence_distribution.high, 2);
        assert_eq!(snapshot.confidence_distribution.medium, 2);
        assert_eq!(snapshot.confidence_distribution.low, 1);
    }

    #[test]
    fn test_common_mistakes_ordering() {
        let corrections = vec![
            correction(("A", "B"), ("X", "Y")),
            correction(("C", "D"), ("X", "Y")),
            correction(("A", "B"), ("X", "Y")),
            correction(("A", "B"), ("X", "Y")),
        ];

        let snapshot = compute_snapshot(&[], &corrections);
        assert_eq!(snapshot.common_mistakes.len(), 2);
        assert_eq!(snapshot.common_mistakes[0].incorrect_brand, "A");
        assert_eq!(snapshot.common_mistakes[0].frequency, 3);
        assert_eq!(snapshot.common_mistakes[1].incorrect_brand, "C");
        assert_eq!(snapshot.common_mistakes[1].frequency, 1);
    }

    #[test]
    fn test_common_mistakes_tie_breaks_by_recency() {
        // Same frequency; the pair whose latest submission is newer leads.
        let older = correction(("A", "B"), ("X", "Y"));
        std::thread::sleep(std::time::Duration::from_millis(5));
        let newer = correction(("C", "D"), ("X", "Y"));

        let snapshot = compute_snapshot(&[], &[older, newer]);
        assert_eq!(snapshot.common_mistakes[0].incorrect_brand, "C");
        assert_eq!(snapshot.common_mistakes[1].incorrect_brand, "A");
    }
}
