//! Performance metrics derived from the prediction log and correction ledger

pub mod snapshot;

pub use snapshot::{
    compute_snapshot, ConfidenceDistribution, ConfusionPair, PerformanceSnapshot,
};
