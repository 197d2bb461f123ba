//! Request/response types for the engine boundary

pub mod error;
pub mod json;
pub mod requests;
pub mod responses;

pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
pub use requests::SubmitCorrectionBody;
pub use responses::{CorrectionResponse, IdentifyResponse, RetrainResponse};
