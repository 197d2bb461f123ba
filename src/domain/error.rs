use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Unsupported image format: {message}")]
    UnsupportedFormat { message: String },

    #[error("Image decode error: {message}")]
    Decode { message: String },

    #[error("Label mismatch: model outputs {output_size} classes but metadata lists {label_count} labels")]
    LabelMismatch {
        output_size: usize,
        label_count: usize,
    },

    #[error("No catalog entry for {brand} {model}")]
    UnknownCatalogEntry { brand: String, model: String },

    #[error("Insufficient data: {message}")]
    InsufficientData { message: String },

    #[error("Retrain failed: {message}")]
    RetrainFailed { message: String },

    #[error("Invalid state transition: {message}")]
    InvalidStateTransition { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Timeout: {message}")]
    Timeout { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn unsupported_format(message: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn label_mismatch(output_size: usize, label_count: usize) -> Self {
        Self::LabelMismatch {
            output_size,
            label_count,
        }
    }

    pub fn unknown_catalog_entry(brand: impl Into<String>, model: impl Into<String>) -> Self {
        Self::UnknownCatalogEntry {
            brand: brand.into(),
            model: model.into(),
        }
    }

    pub fn insufficient_data(message: impl Into<String>) -> Self {
        Self::InsufficientData {
            message: message.into(),
        }
    }

    pub fn retrain_failed(message: impl Into<String>) -> Self {
        Self::RetrainFailed {
            message: message.into(),
        }
    }

    pub fn invalid_state_transition(message: impl Into<String>) -> Self {
        Self::InvalidStateTransition {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Stable machine-readable kind for the API error envelope
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat { .. } => "unsupported_format",
            Self::Decode { .. } => "decode_error",
            Self::LabelMismatch { .. } => "label_mismatch",
            Self::UnknownCatalogEntry { .. } => "unknown_catalog_entry",
            Self::InsufficientData { .. } => "insufficient_data",
            Self::RetrainFailed { .. } => "retrain_failed",
            Self::InvalidStateTransition { .. } => "invalid_state_transition",
            Self::NotFound { .. } => "not_found",
            Self::Timeout { .. } => "timeout",
            Self::Validation { .. } => "validation_error",
            Self::Configuration { .. } => "configuration_error",
            Self::Internal { .. } => "internal_error",
        }
    }
}
