//! # Validation Errors
//!
//! Structured validation errors for domain primitives and shipment fields,
//! built with `thiserror`. Display strings are client-facing: the API layer
//! forwards them verbatim inside its error envelope, so they are phrased as
//! messages, not as debug output.

use thiserror::Error;

use crate::status::ShipmentStatus;

/// A domain-primitive or field validation failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was missing or empty after trimming.
    #[error("{field} is required")]
    Required {
        /// Wire-format field name (camelCase).
        field: &'static str,
    },

    /// A field was shorter than its minimum length after trimming.
    #[error("{field} must be at least {min} characters")]
    TooShort {
        /// Wire-format field name (camelCase).
        field: &'static str,
        /// Minimum number of characters.
        min: usize,
    },

    /// A field exceeded its maximum length after trimming.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Wire-format field name (camelCase).
        field: &'static str,
        /// Maximum number of characters.
        max: usize,
    },

    /// A status value outside the four lifecycle states.
    #[error("Status must be one of: {}", ShipmentStatus::wire_values())]
    InvalidStatus(
        /// The rejected input.
        String,
    ),

    /// An identifier that is not a 24-character hexadecimal string.
    #[error("Shipment ID must be a 24-character hexadecimal string")]
    InvalidShipmentId(
        /// The rejected input.
        String,
    ),

    /// A tracking number that does not match `SHP-YYYYMMDD-XXXXXXXX`.
    #[error("Invalid tracking number format: {0}")]
    InvalidTrackingNumber(
        /// The rejected input.
        String,
    ),
}

impl ValidationError {
    /// The wire-format field name this error refers to, when known.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Required { field } | Self::TooShort { field, .. } | Self::TooLong { field, .. } => {
                Some(field)
            }
            Self::InvalidStatus(_) => Some("status"),
            Self::InvalidShipmentId(_) => Some("id"),
            Self::InvalidTrackingNumber(_) => Some("trackingNumber"),
        }
    }
}
