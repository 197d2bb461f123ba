//! Image-upload identification endpoint

use axum::extract::{Multipart, State};
use bytes::Bytes;
use tracing::{info, warn};

use crate::api::state::AppState;
use crate::api::types::{ApiError, IdentifyResponse, Json};
use crate::domain::valuation::{ConditionGrade, Provenance};
use crate::infrastructure::services::{IdentifyRequest, ImageUpload};

/// POST /v1/identify
///
/// Multipart form: 1..N `photos` parts, plus optional `description`,
/// `condition`, and `provenance` text parts. Upload size and count limits
/// are the caller's responsibility.
pub async fn identify(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<IdentifyResponse>, ApiError> {
    let mut images: Vec<ImageUpload> = Vec::new();
    let mut description: Option<String> = None;
    let mut condition = ConditionGrade::default();
    let mut provenance = Provenance::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("malformed multipart body: {}", e)))?
    {
        match field.name().unwrap_or_default() {
            "photos" => {
                let mime_hint = field.content_type().map(|m| m.to_string());
                let bytes: Bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("failed to read photo: {}", e)))?;
                images.push(ImageUpload { bytes, mime_hint });
            }
            "description" => {
                let text = read_text(field).await?;
                if !text.trim().is_empty() {
                    description = Some(text.trim().to_string());
                }
            }
            "condition" => {
                condition = read_text(field).await?.parse()?;
            }
            "provenance" => {
                provenance = read_text(field).await?.parse()?;
            }
            other => {
                warn!(field = other, "ignoring unknown multipart field");
            }
        }
    }

    if images.is_empty() {
        return Err(ApiError::bad_request(
            "at least one 'photos' part is required",
        ));
    }

    info!(images = images.len(), "identification request received");

    let identification = state
        .identification_service
        .identify(IdentifyRequest {
            images,
            description,
            condition,
            provenance,
        })
        .await?;

    Ok(Json(identification.into()))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::bad_request(format!("failed to read text field: {}", e)))
}
