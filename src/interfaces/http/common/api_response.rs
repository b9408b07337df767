//! Common API DTOs

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Standard API response envelope
///
/// Every JSON endpoint wraps its payload in this envelope.
/// Success: `{"success": true, "data": {...}}`,
/// failure: `{"success": false, "data": null, "error": "description"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` when the request succeeded
    pub success: bool,
    /// Payload; `null` on error
    pub data: Option<T>,
    /// Error description; omitted on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Error half of every JSON handler's `Result`.
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

impl From<DomainError> for ApiResponse<()> {
    fn from(e: DomainError) -> Self {
        Self::error(e.to_string())
    }
}

/// Maps a domain error onto its HTTP status.
pub fn domain_error(e: DomainError) -> ApiError {
    let status = match e {
        DomainError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::InvalidSchedule(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(e.into()))
}
