//! # Shipment Service
//!
//! Business-logic layer between the HTTP handlers and the persistence
//! gateway. Owns field validation, the defensive identifier check, status
//! transition enforcement, and response shaping — the stored representation
//! never leaks past this module.

use std::sync::Arc;

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use shiptrack_core::{
    model::{validate_location, validate_party_name},
    ListQuery, RawListParams, Shipment, ShipmentId, ShipmentStatus, TrackingNumber,
};

use crate::error::AppError;
use crate::response::PaginationMeta;
use crate::store::{NewShipment, ShipmentPatch, ShipmentStore};

/// Input for creating a shipment, as received from the transport layer.
#[derive(Debug, Clone)]
pub struct CreateShipment {
    /// Sender name (untrimmed).
    pub sender_name: String,
    /// Receiver name (untrimmed).
    pub receiver_name: String,
    /// Origin address (untrimmed).
    pub origin: String,
    /// Destination address (untrimmed).
    pub destination: String,
    /// Optional initial status as its wire string; defaults to `pending`.
    pub status: Option<String>,
}

/// Input for a partial update. At least one field must be present.
#[derive(Debug, Clone, Default)]
pub struct UpdateShipment {
    /// New sender name.
    pub sender_name: Option<String>,
    /// New receiver name.
    pub receiver_name: Option<String>,
    /// New origin address.
    pub origin: Option<String>,
    /// New destination address.
    pub destination: Option<String>,
    /// New status as its wire string.
    pub status: Option<String>,
}

/// A shipment in response shape: identifier as string, timestamps as
/// ISO 8601 strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentResponse {
    /// Opaque identifier (24-character hex string).
    pub id: String,
    /// Public tracking number.
    pub tracking_number: String,
    /// Sender name.
    pub sender_name: String,
    /// Receiver name.
    pub receiver_name: String,
    /// Origin address.
    pub origin: String,
    /// Destination address.
    pub destination: String,
    /// Lifecycle status wire string.
    pub status: String,
    /// Creation timestamp, ISO 8601.
    pub created_at: String,
    /// Last-update timestamp, ISO 8601.
    pub updated_at: String,
}

impl From<Shipment> for ShipmentResponse {
    fn from(shipment: Shipment) -> Self {
        Self {
            id: shipment.id.to_string(),
            tracking_number: shipment.tracking_number.to_string(),
            sender_name: shipment.sender_name,
            receiver_name: shipment.receiver_name,
            origin: shipment.origin,
            destination: shipment.destination,
            status: shipment.status.as_str().to_string(),
            created_at: shipment
                .created_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            updated_at: shipment
                .updated_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// The shipment business-operations service.
///
/// Cheap to clone — wraps a shared store handle.
#[derive(Clone)]
pub struct ShipmentService {
    store: Arc<dyn ShipmentStore>,
}

impl ShipmentService {
    /// Build a service over a store handle.
    pub fn new(store: Arc<dyn ShipmentStore>) -> Self {
        Self { store }
    }

    /// Defensive identifier check; the transport layer has its own, so a
    /// failure here means a caller bypassed it.
    fn parse_id(&self, id: &str) -> Result<ShipmentId, AppError> {
        ShipmentId::parse(id).map_err(|_| AppError::InvalidId(format!("Invalid shipment ID: {id}")))
    }

    fn parse_status(value: &str) -> Result<ShipmentStatus, AppError> {
        value.trim().parse::<ShipmentStatus>().map_err(AppError::from)
    }

    /// Create a shipment. The tracking number is generated here,
    /// independent of anything the client sent.
    pub async fn create(&self, input: CreateShipment) -> Result<ShipmentResponse, AppError> {
        let status = match input.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(value) => Self::parse_status(value)?,
            None => ShipmentStatus::Pending,
        };
        let new = NewShipment {
            tracking_number: TrackingNumber::generate(),
            sender_name: validate_party_name("senderName", &input.sender_name)?,
            receiver_name: validate_party_name("receiverName", &input.receiver_name)?,
            origin: validate_location("origin", &input.origin)?,
            destination: validate_location("destination", &input.destination)?,
            status,
        };
        let created = self.store.create(new).await?;
        tracing::info!(
            id = %created.id,
            tracking_number = %created.tracking_number,
            "shipment created"
        );
        Ok(created.into())
    }

    /// Fetch a shipment by id.
    pub async fn get_by_id(&self, id: &str) -> Result<ShipmentResponse, AppError> {
        let id = self.parse_id(id)?;
        self.store
            .find_by_id(&id)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::not_found("Shipment"))
    }

    /// Fetch a shipment by tracking number.
    pub async fn get_by_tracking_number(
        &self,
        tracking_number: &str,
    ) -> Result<ShipmentResponse, AppError> {
        self.store
            .find_by_tracking_number(tracking_number.trim())
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::not_found("Shipment"))
    }

    /// Apply a partial update.
    ///
    /// When the requested status differs from the stored one, the
    /// transition is validated against the lifecycle edge table. The check
    /// and the write are two separate store calls; a concurrent writer can
    /// change the status in between. That window is accepted baseline
    /// behavior — the store offers no conditional write.
    pub async fn update(
        &self,
        id: &str,
        input: UpdateShipment,
    ) -> Result<ShipmentResponse, AppError> {
        let id = self.parse_id(id)?;

        let mut patch = ShipmentPatch::default();
        if let Some(value) = &input.sender_name {
            patch.sender_name = Some(validate_party_name("senderName", value)?);
        }
        if let Some(value) = &input.receiver_name {
            patch.receiver_name = Some(validate_party_name("receiverName", value)?);
        }
        if let Some(value) = &input.origin {
            patch.origin = Some(validate_location("origin", value)?);
        }
        if let Some(value) = &input.destination {
            patch.destination = Some(validate_location("destination", value)?);
        }
        let requested_status = match &input.status {
            Some(value) => Some(Self::parse_status(value)?),
            None => None,
        };
        if patch.is_empty() && requested_status.is_none() {
            return Err(AppError::validation_msg(
                "At least one field must be provided for update",
            ));
        }

        let existing = self
            .store
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::not_found("Shipment"))?;

        if let Some(target) = requested_status {
            if target != existing.status {
                existing.status.check_transition(target)?;
                tracing::info!(
                    id = %id,
                    from = %existing.status,
                    to = %target,
                    "shipment status transition"
                );
            }
            patch.status = Some(target);
        }

        self.store
            .update(&id, &patch)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::not_found("Shipment"))
    }

    /// Delete a shipment, returning its last-known state.
    pub async fn delete(&self, id: &str) -> Result<ShipmentResponse, AppError> {
        let id = self.parse_id(id)?;
        let deleted = self
            .store
            .delete(&id)
            .await?
            .ok_or_else(|| AppError::not_found("Shipment"))?;
        tracing::info!(id = %id, "shipment deleted");
        Ok(deleted.into())
    }

    /// List shipments with pagination, filtering, and sorting.
    ///
    /// Count and page fetch run concurrently; they are independent reads
    /// with no snapshot guarantee between them. A page past the end yields
    /// an empty array, never an error.
    pub async fn list(
        &self,
        raw: RawListParams,
    ) -> Result<(Vec<ShipmentResponse>, PaginationMeta), AppError> {
        let query = ListQuery::from_raw(raw)?;
        let (total_items, items) = tokio::join!(
            self.store.count(&query.filters),
            self.store.list(&query)
        );
        let pagination = PaginationMeta::new(query.page, query.limit, total_items?);
        Ok((items?.into_iter().map(Into::into).collect(), pagination))
    }
}
