//! # shiptrack-api — Axum API Service for Shiptrack
//!
//! RESTful shipment tracking: CRUD over a single resource with
//! lifecycle-validated status transitions and paginated listing with
//! filtering, sorting, and search.
//!
//! ## API Surface
//!
//! | Route                                  | Module                 |
//! |----------------------------------------|------------------------|
//! | `POST   /v1/shipments`                 | [`routes::shipments`]  |
//! | `GET    /v1/shipments`                 | [`routes::shipments`]  |
//! | `GET    /v1/shipments/:id`             | [`routes::shipments`]  |
//! | `GET    /v1/shipments/tracking/:tn`    | [`routes::shipments`]  |
//! | `PUT    /v1/shipments/:id`             | [`routes::shipments`]  |
//! | `DELETE /v1/shipments/:id`             | [`routes::shipments`]  |
//! | `GET    /openapi.json`                 | [`openapi`]            |
//! | `GET    /health/*`                     | this module            |
//!
//! ## Architecture
//!
//! Handlers delegate to [`service::ShipmentService`], which consumes the
//! [`store::ShipmentStore`] gateway. The store is selected at startup:
//! PostgreSQL when `DATABASE_URL` is set, in-memory otherwise.

pub mod error;
pub mod extractors;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

use axum::http::{Method, Uri};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;

/// Assemble the full application router.
///
/// Health probes (`/health/*`) are mounted outside the API router. Unmatched
/// routes fall through to a JSON 404 in the standard error envelope.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::shipments::router())
        .merge(openapi::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new()
        .merge(health)
        .merge(api)
        .fallback(route_not_found)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}

/// JSON 404 for unmatched routes.
async fn route_not_found(method: Method, uri: Uri) -> AppError {
    AppError::not_found(&format!("Route {method} {uri}"))
}
