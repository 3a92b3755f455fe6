//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps domain errors from shiptrack-core and the store layer to HTTP status
//! codes and the JSON error envelope. Internal error details are never
//! exposed to clients — they are logged and replaced with a generic phrase.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use shiptrack_core::{QueryError, TransitionError, ValidationError};

use crate::store::StoreError;

/// Structured JSON error response body.
///
/// All failures use this format: `success` is always `false`, `message` is
/// the human-readable summary, and `error` carries the machine-readable
/// code plus optional field-level details.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Always `false`.
    pub success: bool,
    /// Human-readable error message.
    pub message: String,
    /// Machine-readable error information.
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "VALIDATION_ERROR").
    pub code: String,
    /// Field-level details, present only for client errors that have them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldDetail>>,
}

/// A single field-level validation detail.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FieldDetail {
    /// The offending field, when attributable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// What is wrong with it.
    pub message: String,
}

impl FieldDetail {
    /// Detail attributed to a specific field.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Detail not attributable to a single field.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
///
/// Business-rule failures are constructed in the service layer and propagate
/// to the boundary unmodified; store and infrastructure failures are
/// normalized into [`AppError::Internal`].
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed, missing, or out-of-range input fields (400).
    #[error("{message}")]
    Validation {
        /// Summary message.
        message: String,
        /// Field-level breakdown.
        details: Vec<FieldDetail>,
    },

    /// Structurally invalid shipment identifier (400).
    #[error("{0}")]
    InvalidId(String),

    /// Status transition outside the lifecycle edge set (400).
    #[error("{0}")]
    InvalidTransition(TransitionError),

    /// Invalid list-query parameters (400).
    #[error("{0}")]
    InvalidQuery(#[from] QueryError),

    /// Resource not found (404).
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness violation (409).
    #[error("{0}")]
    Conflict(String),

    /// Unexpected failure (500). Message is logged but not returned to the client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Validation failure with field-level details.
    pub fn validation(message: impl Into<String>, details: Vec<FieldDetail>) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    /// Validation failure with a bare message.
    pub fn validation_msg(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Not-found error for a resource kind (message `"<resource> not found"`).
    pub fn not_found(resource: &str) -> Self {
        Self::NotFound(format!("{resource} not found"))
    }

    /// The HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::InvalidId(_) => (StatusCode::BAD_REQUEST, "INVALID_ID"),
            Self::InvalidTransition(_) => (StatusCode::BAD_REQUEST, "INVALID_STATUS_TRANSITION"),
            Self::InvalidQuery(_) => (StatusCode::BAD_REQUEST, "INVALID_QUERY_PARAMS"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "RESOURCE_NOT_FOUND"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "DUPLICATE_ENTRY"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// Field-level details for the response body, when this error has them.
    fn details(&self) -> Option<Vec<FieldDetail>> {
        match self {
            Self::Validation { details, .. } if !details.is_empty() => Some(details.clone()),
            Self::InvalidTransition(err) => {
                Some(vec![FieldDetail::new("status", err.to_string())])
            }
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal error messages to clients.
        let message = match &self {
            Self::Internal(_) => "An unexpected error occurred".to_string(),
            other => other.to_string(),
        };

        // Log server-side errors for operator visibility.
        if let Self::Internal(_) = &self {
            tracing::error!(error = %self, "internal server error");
        }

        let body = ErrorBody {
            success: false,
            message,
            error: ErrorDetail {
                code: code.to_string(),
                details: self.details(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Convert core validation errors to API errors.
///
/// Identifier-format failures keep their dedicated code; everything else is
/// a validation failure attributed to its field.
impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match &err {
            ValidationError::InvalidShipmentId(_) => Self::InvalidId(err.to_string()),
            other => Self::Validation {
                message: err.to_string(),
                details: vec![FieldDetail {
                    field: other.field().map(str::to_string),
                    message: err.to_string(),
                }],
            },
        }
    }
}

/// Convert transition rejections to API errors.
impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        Self::InvalidTransition(err)
    }
}

/// Convert store failures to API errors.
///
/// Uniqueness violations become 409 Conflict; everything else is internal.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { field } => Self::Conflict(format!("Duplicate value for {field}")),
            StoreError::Backend(message) => Self::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shiptrack_core::ShipmentStatus;

    #[test]
    fn status_codes_match_taxonomy() {
        let cases: Vec<(AppError, StatusCode, &str)> = vec![
            (
                AppError::validation_msg("bad"),
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
            ),
            (
                AppError::InvalidId("Invalid shipment ID: x".into()),
                StatusCode::BAD_REQUEST,
                "INVALID_ID",
            ),
            (
                AppError::InvalidTransition(TransitionError::FinalState {
                    from: ShipmentStatus::Delivered,
                }),
                StatusCode::BAD_REQUEST,
                "INVALID_STATUS_TRANSITION",
            ),
            (
                AppError::InvalidQuery(QueryError::InvalidDateRange),
                StatusCode::BAD_REQUEST,
                "INVALID_QUERY_PARAMS",
            ),
            (
                AppError::not_found("Shipment"),
                StatusCode::NOT_FOUND,
                "RESOURCE_NOT_FOUND",
            ),
            (
                AppError::Conflict("Duplicate value for trackingNumber".into()),
                StatusCode::CONFLICT,
                "DUPLICATE_ENTRY",
            ),
            (
                AppError::Internal("db down".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
        ];
        for (err, status, code) in cases {
            let (s, c) = err.status_and_code();
            assert_eq!(s, status);
            assert_eq!(c, code);
        }
    }

    #[test]
    fn not_found_message() {
        assert_eq!(
            AppError::not_found("Shipment").to_string(),
            "Shipment not found"
        );
    }

    #[test]
    fn transition_error_carries_status_detail() {
        let err = AppError::from(TransitionError::FinalState {
            from: ShipmentStatus::Cancelled,
        });
        let details = err.details().unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].field.as_deref(), Some("status"));
        assert!(details[0].message.contains("final state"));
    }

    #[test]
    fn store_duplicate_becomes_conflict() {
        let err = AppError::from(StoreError::Duplicate {
            field: "trackingNumber",
        });
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn invalid_shipment_id_keeps_dedicated_code() {
        let err = AppError::from(ValidationError::InvalidShipmentId("zzz".into()));
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "INVALID_ID");
    }

    // ── into_response tests ──────────────────────────────────────

    use http_body_util::BodyExt;

    async fn response_parts(err: AppError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn into_response_validation_with_details() {
        let err = AppError::validation(
            "Validation failed",
            vec![FieldDetail::new("senderName", "senderName is required")],
        );
        let (status, body) = response_parts(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.success);
        assert_eq!(body.error.code, "VALIDATION_ERROR");
        let details = body.error.details.unwrap();
        assert_eq!(details[0].field.as_deref(), Some("senderName"));
    }

    #[tokio::test]
    async fn into_response_internal_hides_details() {
        let (status, body) = response_parts(AppError::Internal("db connection failed".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.code, "INTERNAL_ERROR");
        assert_eq!(body.message, "An unexpected error occurred");
        assert!(
            !body.message.contains("db connection"),
            "internal error details must not leak"
        );
        assert!(body.error.details.is_none());
    }

    #[tokio::test]
    async fn into_response_not_found() {
        let (status, body) = response_parts(AppError::not_found("Shipment")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error.code, "RESOURCE_NOT_FOUND");
        assert_eq!(body.message, "Shipment not found");
    }
}
