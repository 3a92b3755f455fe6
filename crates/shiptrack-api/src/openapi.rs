//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shiptrack API",
        version = "0.1.0",
        description = "Shipment tracking API: CRUD over shipments with lifecycle-validated status transitions, server-side pagination, filtering, sorting, and search.",
        license(name = "MIT")
    ),
    paths(
        crate::routes::shipments::create_shipment,
        crate::routes::shipments::list_shipments,
        crate::routes::shipments::get_shipment,
        crate::routes::shipments::get_shipment_by_tracking_number,
        crate::routes::shipments::update_shipment,
        crate::routes::shipments::delete_shipment,
    ),
    components(schemas(
        // Response shapes
        crate::service::ShipmentResponse,
        crate::response::ShipmentEnvelope,
        crate::response::ShipmentListEnvelope,
        crate::response::PaginationMeta,
        // Error types
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::error::FieldDetail,
        // Request DTOs
        crate::routes::shipments::CreateShipmentRequest,
        crate::routes::shipments::UpdateShipmentRequest,
    )),
    tags(
        (name = "shipments", description = "Shipment resource management")
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
