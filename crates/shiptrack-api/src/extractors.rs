//! # Custom Extractors & Validation
//!
//! Provides the [`Validate`] trait for request DTOs and helpers to extract
//! and validate JSON bodies in handlers. Validation collects every failing
//! field so clients see the full breakdown in one round trip rather than
//! one error at a time.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::{AppError, FieldDetail};

/// Trait for request types that validate business rules beyond what serde
/// deserialization checks.
pub trait Validate {
    /// Validate business rules, returning every field-level failure.
    fn validate(&self) -> Result<(), Vec<FieldDetail>>;
}

/// Extract a JSON body, mapping deserialization errors to a 400
/// `VALIDATION_ERROR` response.
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::validation_msg(err.body_text()))
}

/// Extract a JSON body and validate it using the [`Validate`] trait.
///
/// Handlers use:
/// ```ignore
/// async fn handler(body: Result<Json<T>, JsonRejection>) -> Result<..., AppError> {
///     let req = extract_validated_json(body)?;
///     // use req...
/// }
/// ```
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value
        .validate()
        .map_err(|details| AppError::validation("Validation failed", details))?;
    Ok(value)
}
