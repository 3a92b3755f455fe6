//! # Shipment Identifier
//!
//! Store-assigned opaque identifier newtype. The wire format is a
//! 24-character hexadecimal string; parsing validates the format before any
//! lookup is attempted, so a malformed identifier never reaches a store.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ValidationError;

/// Number of hexadecimal characters in a shipment identifier.
const ID_LEN: usize = 24;

/// A unique identifier for a shipment, assigned by the persistence layer at
/// creation.
///
/// Always a 24-character lowercase hexadecimal string. Parsing accepts mixed
/// case and normalizes to lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShipmentId(String);

impl ShipmentId {
    /// Generate a new random identifier (12 random bytes, hex-encoded).
    pub fn generate() -> Self {
        let mut bytes = [0u8; ID_LEN / 2];
        rand::Rng::fill(&mut rand::thread_rng(), &mut bytes[..]);
        let mut hex = String::with_capacity(ID_LEN);
        for byte in bytes {
            hex.push_str(&format!("{byte:02x}"));
        }
        Self(hex)
    }

    /// Parse an identifier from its wire format.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        if input.len() == ID_LEN && input.bytes().all(|b| b.is_ascii_hexdigit()) {
            Ok(Self(input.to_ascii_lowercase()))
        } else {
            Err(ValidationError::InvalidShipmentId(input.to_string()))
        }
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ShipmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ShipmentId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ShipmentId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ShipmentId> for String {
    fn from(id: ShipmentId) -> Self {
        id.0
    }
}
