//! Shared handle to the active model version
//!
//! Inference reads and retrain swaps meet here. Readers clone the `Arc`
//! under a briefly-held read lock and run inference lock-free, so an
//! in-flight retrain never blocks classification; the write lock is held
//! only for the pointer swap itself.

use std::sync::{Arc, RwLock};

use crate::domain::DomainError;

use super::version::ModelVersion;

/// Process-scoped holder of the active `ModelVersion`
#[derive(Debug)]
pub struct ActiveModel {
    current: RwLock<Arc<ModelVersion>>,
}

impl ActiveModel {
    pub fn new(version: ModelVersion) -> Self {
        Self {
            current: RwLock::new(Arc::new(version)),
        }
    }

    /// Snapshot of the currently active version.
    ///
    /// The returned `Arc` stays valid for the caller even if a swap happens
    /// immediately after.
    pub fn current(&self) -> Arc<ModelVersion> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Atomically replace the active version, returning the superseded one.
    ///
    /// Callers must fully build and validate the new version first; readers
    /// never observe a half-swapped state.
    pub fn swap(&self, next: Arc<ModelVersion>) -> Arc<ModelVersion> {
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::replace(&mut *guard, next)
    }

    /// Version number of the active model
    pub fn version(&self) -> u64 {
        self.current().version()
    }

    /// Fail if the active model cannot serve (defensively re-run the
    /// structural validation; used by readiness checks).
    pub fn check(&self) -> Result<(), DomainError> {
        self.current().validate()
    }
}
