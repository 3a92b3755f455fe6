//! # Tracking Number
//!
//! Human-readable public identifier for a shipment, distinct from the
//! internal [`ShipmentId`](crate::ShipmentId). Generated once at creation,
//! never client-supplied, never mutated.
//!
//! Format: `SHP-YYYYMMDD-XXXXXXXX` where the date is the UTC creation date
//! and the suffix is 8 random uppercase-alphanumeric characters (36^8 ≈
//! 2.8e12 values per day, making collisions practically unreachable).

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

const PREFIX: &str = "SHP";
const SUFFIX_LEN: usize = 8;
const SUFFIX_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// A shipment tracking number in `SHP-YYYYMMDD-XXXXXXXX` format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TrackingNumber(String);

impl TrackingNumber {
    /// Generate a tracking number for the current UTC date.
    pub fn generate() -> Self {
        let date = Utc::now().format("%Y%m%d");
        let mut rng = rand::thread_rng();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| SUFFIX_CHARSET[rng.gen_range(0..SUFFIX_CHARSET.len())] as char)
            .collect();
        Self(format!("{PREFIX}-{date}-{suffix}"))
    }

    /// Parse a tracking number from its wire format.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let mut parts = input.splitn(3, '-');
        let valid = parts.next() == Some(PREFIX)
            && parts
                .next()
                .is_some_and(|d| d.len() == 8 && d.bytes().all(|b| b.is_ascii_digit()))
            && parts.next().is_some_and(|s| {
                s.len() == SUFFIX_LEN && s.bytes().all(|b| SUFFIX_CHARSET.contains(&b))
            });
        if valid {
            Ok(Self(input.to_string()))
        } else {
            Err(ValidationError::InvalidTrackingNumber(input.to_string()))
        }
    }

    /// The tracking number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TrackingNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TrackingNumber {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TrackingNumber> for String {
    fn from(tn: TrackingNumber) -> Self {
        tn.0
    }
}
