//! # Shipment Resource API
//!
//! HTTP surface for the shipment resource. Handlers stay thin: request
//! DTOs are validated at this boundary (collecting every failing field,
//! the same checks the service re-runs defensively), then the service
//! does the actual work.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::ToSchema;

use shiptrack_core::model::{validate_location, validate_party_name};
use shiptrack_core::{RawListParams, ShipmentId, ShipmentStatus};

use crate::error::{AppError, FieldDetail};
use crate::extractors::{extract_validated_json, Validate};
use crate::response::{ShipmentEnvelope, ShipmentListEnvelope};
use crate::service::{CreateShipment, UpdateShipment};
use crate::state::AppState;

/// Request to create a shipment.
///
/// Fields are `Option` so that a missing field surfaces as a field-level
/// validation detail rather than a deserialization failure; [`Validate`]
/// guarantees they are present before the handler converts to the service
/// input. Status arrives as its wire string and is checked against the
/// four lifecycle states.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateShipmentRequest {
    /// Sender name (required, 2–100 characters).
    pub sender_name: Option<String>,
    /// Receiver name (required, 2–100 characters).
    pub receiver_name: Option<String>,
    /// Origin address (required, 2–200 characters).
    pub origin: Option<String>,
    /// Destination address (required, 2–200 characters).
    pub destination: Option<String>,
    /// Initial status; defaults to `pending`.
    pub status: Option<String>,
}

fn check_required(
    details: &mut Vec<FieldDetail>,
    field: &'static str,
    value: Option<&str>,
    validate: impl Fn(&'static str, &str) -> Result<String, shiptrack_core::ValidationError>,
) {
    match value {
        None => details.push(FieldDetail::new(field, format!("{field} is required"))),
        Some(v) => {
            if let Err(err) = validate(field, v) {
                details.push(FieldDetail::new(field, err.to_string()));
            }
        }
    }
}

fn check_optional(
    details: &mut Vec<FieldDetail>,
    field: &'static str,
    value: Option<&str>,
    validate: impl Fn(&'static str, &str) -> Result<String, shiptrack_core::ValidationError>,
) {
    if let Some(v) = value {
        if let Err(err) = validate(field, v) {
            details.push(FieldDetail::new(field, err.to_string()));
        }
    }
}

fn check_status(details: &mut Vec<FieldDetail>, value: Option<&str>) {
    if let Some(v) = value {
        if v.trim().parse::<ShipmentStatus>().is_err() {
            details.push(FieldDetail::new(
                "status",
                format!("Status must be one of: {}", ShipmentStatus::wire_values()),
            ));
        }
    }
}

impl Validate for CreateShipmentRequest {
    fn validate(&self) -> Result<(), Vec<FieldDetail>> {
        let mut details = Vec::new();
        check_required(
            &mut details,
            "senderName",
            self.sender_name.as_deref(),
            validate_party_name,
        );
        check_required(
            &mut details,
            "receiverName",
            self.receiver_name.as_deref(),
            validate_party_name,
        );
        check_required(&mut details, "origin", self.origin.as_deref(), validate_location);
        check_required(
            &mut details,
            "destination",
            self.destination.as_deref(),
            validate_location,
        );
        check_status(&mut details, self.status.as_deref());
        if details.is_empty() {
            Ok(())
        } else {
            Err(details)
        }
    }
}

impl CreateShipmentRequest {
    fn into_input(self) -> CreateShipment {
        CreateShipment {
            sender_name: self.sender_name.unwrap_or_default(),
            receiver_name: self.receiver_name.unwrap_or_default(),
            origin: self.origin.unwrap_or_default(),
            destination: self.destination.unwrap_or_default(),
            status: self.status,
        }
    }
}

/// Request to partially update a shipment. At least one field is required.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShipmentRequest {
    /// New sender name (2–100 characters).
    pub sender_name: Option<String>,
    /// New receiver name (2–100 characters).
    pub receiver_name: Option<String>,
    /// New origin address (2–200 characters).
    pub origin: Option<String>,
    /// New destination address (2–200 characters).
    pub destination: Option<String>,
    /// New status; transitions are validated against the lifecycle.
    pub status: Option<String>,
}

impl Validate for UpdateShipmentRequest {
    fn validate(&self) -> Result<(), Vec<FieldDetail>> {
        if self.sender_name.is_none()
            && self.receiver_name.is_none()
            && self.origin.is_none()
            && self.destination.is_none()
            && self.status.is_none()
        {
            return Err(vec![FieldDetail::message(
                "At least one field must be provided for update",
            )]);
        }
        let mut details = Vec::new();
        check_optional(
            &mut details,
            "senderName",
            self.sender_name.as_deref(),
            validate_party_name,
        );
        check_optional(
            &mut details,
            "receiverName",
            self.receiver_name.as_deref(),
            validate_party_name,
        );
        check_optional(&mut details, "origin", self.origin.as_deref(), validate_location);
        check_optional(
            &mut details,
            "destination",
            self.destination.as_deref(),
            validate_location,
        );
        check_status(&mut details, self.status.as_deref());
        if details.is_empty() {
            Ok(())
        } else {
            Err(details)
        }
    }
}

impl UpdateShipmentRequest {
    fn into_input(self) -> UpdateShipment {
        UpdateShipment {
            sender_name: self.sender_name,
            receiver_name: self.receiver_name,
            origin: self.origin,
            destination: self.destination,
            status: self.status,
        }
    }
}

/// Reject a malformed path identifier before any lookup is attempted.
fn ensure_id_param(id: &str) -> Result<(), AppError> {
    ShipmentId::parse(id).map(|_| ()).map_err(|err| {
        AppError::validation(
            "Validation failed",
            vec![FieldDetail::new("id", err.to_string())],
        )
    })
}

/// Build the shipments router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/shipments", get(list_shipments).post(create_shipment))
        .route(
            "/v1/shipments/tracking/:tracking_number",
            get(get_shipment_by_tracking_number),
        )
        .route(
            "/v1/shipments/:id",
            get(get_shipment).put(update_shipment).delete(delete_shipment),
        )
}

/// POST /v1/shipments — Create a shipment.
#[utoipa::path(
    post,
    path = "/v1/shipments",
    request_body = CreateShipmentRequest,
    responses(
        (status = 201, description = "Shipment created", body = ShipmentEnvelope),
        (status = 400, description = "Validation failure", body = crate::error::ErrorBody),
    ),
    tag = "shipments"
)]
pub async fn create_shipment(
    State(state): State<AppState>,
    body: Result<Json<CreateShipmentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShipmentEnvelope>), AppError> {
    let req = extract_validated_json(body)?;
    let shipment = state.service.create(req.into_input()).await?;
    Ok((StatusCode::CREATED, Json(ShipmentEnvelope::created(shipment))))
}

/// GET /v1/shipments — List shipments with pagination, filtering, sorting,
/// and search.
#[utoipa::path(
    get,
    path = "/v1/shipments",
    params(
        ("page" = Option<String>, Query, description = "Page number (default 1)"),
        ("limit" = Option<String>, Query, description = "Items per page (default 10, max 100)"),
        ("sortBy" = Option<String>, Query, description = "Sort field: createdAt, updatedAt, senderName, receiverName, origin, destination, status, trackingNumber"),
        ("order" = Option<String>, Query, description = "Sort direction: asc or desc (default desc)"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("origin" = Option<String>, Query, description = "Filter by origin (partial match)"),
        ("destination" = Option<String>, Query, description = "Filter by destination (partial match)"),
        ("search" = Option<String>, Query, description = "Search in sender/receiver names"),
        ("startDate" = Option<String>, Query, description = "Created on or after (ISO 8601)"),
        ("endDate" = Option<String>, Query, description = "Created on or before (ISO 8601)"),
    ),
    responses(
        (status = 200, description = "Page of shipments", body = ShipmentListEnvelope),
        (status = 400, description = "Invalid query parameters", body = crate::error::ErrorBody),
    ),
    tag = "shipments"
)]
pub async fn list_shipments(
    State(state): State<AppState>,
    Query(params): Query<RawListParams>,
) -> Result<Json<ShipmentListEnvelope>, AppError> {
    let (data, pagination) = state.service.list(params).await?;
    Ok(Json(ShipmentListEnvelope::listed(data, pagination)))
}

/// GET /v1/shipments/:id — Fetch a shipment by id.
#[utoipa::path(
    get,
    path = "/v1/shipments/{id}",
    params(("id" = String, Path, description = "Shipment id (24-character hex)")),
    responses(
        (status = 200, description = "Shipment found", body = ShipmentEnvelope),
        (status = 400, description = "Malformed id", body = crate::error::ErrorBody),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "shipments"
)]
pub async fn get_shipment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ShipmentEnvelope>, AppError> {
    ensure_id_param(&id)?;
    let shipment = state.service.get_by_id(&id).await?;
    Ok(Json(ShipmentEnvelope::fetched(shipment)))
}

/// GET /v1/shipments/tracking/:tracking_number — Fetch a shipment by its
/// public tracking number.
#[utoipa::path(
    get,
    path = "/v1/shipments/tracking/{trackingNumber}",
    params(("trackingNumber" = String, Path, description = "Tracking number")),
    responses(
        (status = 200, description = "Shipment found", body = ShipmentEnvelope),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "shipments"
)]
pub async fn get_shipment_by_tracking_number(
    State(state): State<AppState>,
    Path(tracking_number): Path<String>,
) -> Result<Json<ShipmentEnvelope>, AppError> {
    let shipment = state.service.get_by_tracking_number(&tracking_number).await?;
    Ok(Json(ShipmentEnvelope::fetched(shipment)))
}

/// PUT /v1/shipments/:id — Partially update a shipment.
#[utoipa::path(
    put,
    path = "/v1/shipments/{id}",
    params(("id" = String, Path, description = "Shipment id (24-character hex)")),
    request_body = UpdateShipmentRequest,
    responses(
        (status = 200, description = "Shipment updated", body = ShipmentEnvelope),
        (status = 400, description = "Validation failure or invalid status transition", body = crate::error::ErrorBody),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "shipments"
)]
pub async fn update_shipment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateShipmentRequest>, JsonRejection>,
) -> Result<Json<ShipmentEnvelope>, AppError> {
    ensure_id_param(&id)?;
    let req = extract_validated_json(body)?;
    let shipment = state.service.update(&id, req.into_input()).await?;
    Ok(Json(ShipmentEnvelope::updated(shipment)))
}

/// DELETE /v1/shipments/:id — Delete a shipment.
#[utoipa::path(
    delete,
    path = "/v1/shipments/{id}",
    params(("id" = String, Path, description = "Shipment id (24-character hex)")),
    responses(
        (status = 200, description = "Shipment deleted", body = ShipmentEnvelope),
        (status = 400, description = "Malformed id", body = crate::error::ErrorBody),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "shipments"
)]
pub async fn delete_shipment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ShipmentEnvelope>, AppError> {
    ensure_id_param(&id)?;
    let shipment = state.service.delete(&id).await?;
    Ok(Json(ShipmentEnvelope::deleted(shipment)))
}
