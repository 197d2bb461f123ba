//! Service layer orchestrating the domain

pub mod correction_service;
pub mod identification_service;
pub mod performance_service;
pub mod training_service;

pub use correction_service::{CorrectionService, SubmitCorrectionRequest};
pub use identification_service::{
    Identification, IdentificationService, IdentifyRequest, ImageUpload,
};
pub use performance_service::{
    ClassActivity, DashboardStats, PerformanceReport, PerformanceService, RecentCorrection,
};
pub use training_service::{RetrainOutcome, TrainingService};
