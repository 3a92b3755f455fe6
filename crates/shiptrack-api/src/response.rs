//! # Success Response Envelopes
//!
//! Every successful response uses the same envelope: `success`, a
//! human-readable `message`, the `data` payload, and — for list responses —
//! a `pagination` block. Constructors pin the message wording in one place
//! so handlers cannot drift.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::service::ShipmentResponse;

/// Envelope for single-shipment responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShipmentEnvelope {
    /// Always `true`.
    pub success: bool,
    /// Human-readable outcome description.
    pub message: String,
    /// The shipment.
    pub data: ShipmentResponse,
}

impl ShipmentEnvelope {
    fn new(message: &str, data: ShipmentResponse) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data,
        }
    }

    /// 201-style envelope for a created shipment.
    pub fn created(data: ShipmentResponse) -> Self {
        Self::new("Shipment created successfully", data)
    }

    /// Envelope for a fetched shipment.
    pub fn fetched(data: ShipmentResponse) -> Self {
        Self::new("Shipment retrieved successfully", data)
    }

    /// Envelope for an updated shipment.
    pub fn updated(data: ShipmentResponse) -> Self {
        Self::new("Shipment updated successfully", data)
    }

    /// Envelope for a deleted shipment (its last-known state).
    pub fn deleted(data: ShipmentResponse) -> Self {
        Self::new("Shipment deleted successfully", data)
    }
}

/// Envelope for paginated list responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShipmentListEnvelope {
    /// Always `true`.
    pub success: bool,
    /// Human-readable outcome description.
    pub message: String,
    /// The page of shipments (possibly empty).
    pub data: Vec<ShipmentResponse>,
    /// Pagination metadata for the full result set.
    pub pagination: PaginationMeta,
}

impl ShipmentListEnvelope {
    /// Envelope for a listed page of shipments.
    pub fn listed(data: Vec<ShipmentResponse>, pagination: PaginationMeta) -> Self {
        Self {
            success: true,
            message: "Shipments retrieved successfully".to_string(),
            data,
            pagination,
        }
    }
}

/// Pagination metadata returned alongside list data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// The page that was returned (1-based).
    pub current_page: u32,
    /// Total pages at the current page size.
    pub total_pages: u64,
    /// Total records matching the filters.
    pub total_items: u64,
    /// Page size actually applied (after defaulting/clamping).
    pub items_per_page: u32,
    /// Whether a later page exists.
    pub has_next_page: bool,
    /// Whether an earlier page exists.
    pub has_prev_page: bool,
}

impl PaginationMeta {
    /// Compute metadata for a page.
    ///
    /// `items_per_page` is always ≥ 1 by the normalizer's contract.
    pub fn new(current_page: u32, items_per_page: u32, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(u64::from(items_per_page));
        Self {
            current_page,
            total_pages,
            total_items,
            items_per_page,
            has_next_page: u64::from(current_page) < total_pages,
            has_prev_page: current_page > 1,
        }
    }
}
