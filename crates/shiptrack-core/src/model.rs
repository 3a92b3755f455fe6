//! # Shipment Record & Field Validation
//!
//! The shipment record as held by a store, plus the trim-and-bounds
//! validation every inbound string field passes through. Validation returns
//! the trimmed value so callers never store an untrimmed string.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::identity::ShipmentId;
use crate::status::ShipmentStatus;
use crate::tracking::TrackingNumber;

/// Minimum length of a sender/receiver name, in characters after trimming.
pub const NAME_MIN: usize = 2;
/// Maximum length of a sender/receiver name.
pub const NAME_MAX: usize = 100;
/// Minimum length of an origin/destination, in characters after trimming.
pub const LOCATION_MIN: usize = 2;
/// Maximum length of an origin/destination.
pub const LOCATION_MAX: usize = 200;

/// A shipment as stored by the persistence gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    /// Store-assigned opaque identifier. Immutable.
    pub id: ShipmentId,
    /// Generator-assigned public identifier. Immutable, unique.
    pub tracking_number: TrackingNumber,
    /// Name of the sender (2–100 characters, trimmed).
    pub sender_name: String,
    /// Name of the receiver (2–100 characters, trimmed).
    pub receiver_name: String,
    /// Origin address (2–200 characters, trimmed).
    pub origin: String,
    /// Destination address (2–200 characters, trimmed).
    pub destination: String,
    /// Current lifecycle state.
    pub status: ShipmentStatus,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
}

/// Validate a sender/receiver name, returning the trimmed value.
pub fn validate_party_name(
    field: &'static str,
    value: &str,
) -> Result<String, ValidationError> {
    validate_bounded(field, value, NAME_MIN, NAME_MAX)
}

/// Validate an origin/destination address, returning the trimmed value.
pub fn validate_location(field: &'static str, value: &str) -> Result<String, ValidationError> {
    validate_bounded(field, value, LOCATION_MIN, LOCATION_MAX)
}

fn validate_bounded(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field });
    }
    let len = trimmed.chars().count();
    if len < min {
        return Err(ValidationError::TooShort { field, min });
    }
    if len > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_string())
}
