//! Application state for shared services

use std::sync::Arc;

use crate::domain::catalog::CatalogRepository;
use crate::domain::correction::{CorrectionLedger, CorrectionRecord, PredictionLog};
use crate::domain::DomainError;
use crate::infrastructure::classifier::ActiveModel;
use crate::infrastructure::services::{
    CorrectionService, DashboardStats, Identification, IdentificationService, IdentifyRequest,
    PerformanceReport, PerformanceService, RetrainOutcome, SubmitCorrectionRequest,
    TrainingService,
};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub identification_service: Arc<dyn IdentificationServiceTrait>,
    pub correction_service: Arc<dyn CorrectionServiceTrait>,
    pub performance_service: Arc<dyn PerformanceServiceTrait>,
    pub training_service: Arc<dyn TrainingServiceTrait>,
    pub active_model: Arc<ActiveModel>,
}

impl AppState {
    pub fn new(
        identification_service: Arc<dyn IdentificationServiceTrait>,
        correction_service: Arc<dyn CorrectionServiceTrait>,
        performance_service: Arc<dyn PerformanceServiceTrait>,
        training_service: Arc<dyn TrainingServiceTrait>,
        active_model: Arc<ActiveModel>,
    ) -> Self {
        Self {
            identification_service,
            correction_service,
            performance_service,
            training_service,
            active_model,
        }
    }
}

/// Trait for the identify pipeline
#[async_trait::async_trait]
pub trait IdentificationServiceTrait: Send + Sync {
    async fn identify(&self, request: IdentifyRequest) -> Result<Identification, DomainError>;
}

/// Trait for correction operations
#[async_trait::async_trait]
pub trait CorrectionServiceTrait: Send + Sync {
    async fn submit(
        &self,
        request: SubmitCorrectionRequest,
    ) -> Result<CorrectionRecord, DomainError>;
    async fn process(&self, id: &str) -> Result<CorrectionRecord, DomainError>;
}

/// Trait for performance views
#[async_trait::async_trait]
pub trait PerformanceServiceTrait: Send + Sync {
    async fn report(&self) -> Result<PerformanceReport, DomainError>;
    async fn stats(&self) -> Result<DashboardStats, DomainError>;
}

/// Trait for retrain orchestration
#[async_trait::async_trait]
pub trait TrainingServiceTrait: Send + Sync {
    async fn retrain(&self) -> Result<RetrainOutcome, DomainError>;
}

// Implement traits for the actual services

#[async_trait::async_trait]
impl<C: CatalogRepository + 'static, P: PredictionLog + 'static> IdentificationServiceTrait
    for IdentificationService<C, P>
{
    async fn identify(&self, request: IdentifyRequest) -> Result<Identification, DomainError> {
        IdentificationService::identify(self, request).await
    }
}

#[async_trait::async_trait]
impl<L: CorrectionLedger + 'static> CorrectionServiceTrait for CorrectionService<L> {
    async fn submit(
        &self,
        request: SubmitCorrectionRequest,
    ) -> Result<CorrectionRecord, DomainError> {
        CorrectionService::submit(self, request).await
    }

    async fn process(&self, id: &str) -> Result<CorrectionRecord, DomainError> {
        CorrectionService::process(self, id).await
    }
}

#[async_trait::async_trait]
impl<L: CorrectionLedger + 'static, P: PredictionLog + 'static> PerformanceServiceTrait
    for PerformanceService<L, P>
{
    async fn report(&self) -> Result<PerformanceReport, DomainError> {
        PerformanceService::report(self).await
    }

    async fn stats(&self) -> Result<DashboardStats, DomainError> {
        PerformanceService::stats(self).await
    }
}

#[async_trait::async_trait]
impl<L: CorrectionLedger + 'static, P: PredictionLog + 'static> TrainingServiceTrait
    for TrainingService<L, P>
{
    async fn retrain(&self) -> Result<RetrainOutcome, DomainError> {
        TrainingService::retrain(self).await
    }
}
