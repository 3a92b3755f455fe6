//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers via
//! the `State` extractor. Holds the shipment service (which wraps the
//! store handle) and the runtime configuration. There is no other shared
//! mutable state — every request is handled independently.

use std::sync::Arc;

use crate::service::ShipmentService;
use crate::store::memory::MemoryStore;
use crate::store::ShipmentStore;

/// Runtime configuration assembled from the environment in `main`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// TCP port the server binds to.
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The shipment business-operations service.
    pub service: ShipmentService,
    /// Runtime configuration.
    pub config: AppConfig,
}

impl AppState {
    /// State backed by a fresh in-memory store (development and tests).
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()), AppConfig::default())
    }

    /// State backed by an explicit store handle.
    pub fn with_store(store: Arc<dyn ShipmentStore>, config: AppConfig) -> Self {
        Self {
            service: ShipmentService::new(store),
            config,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
