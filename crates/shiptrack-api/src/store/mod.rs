//! # Persistence Gateway
//!
//! The [`ShipmentStore`] trait is the only surface the service layer sees.
//! It is a dumb store: it executes filters, sorting, and pagination exactly
//! as described by the normalized descriptor, but enforces no business
//! rules. Two implementations exist:
//!
//! - [`memory::MemoryStore`] — process-local, used in tests and when
//!   `DATABASE_URL` is unset (state does not survive restarts).
//! - [`postgres::PgStore`] — SQLx-backed PostgreSQL persistence.
//!
//! Store failures are reported through [`StoreError`], a tagged kind
//! enumeration decoupled from any driver's native error shapes.

pub mod memory;
pub mod postgres;

use thiserror::Error;

use shiptrack_core::{
    ListQuery, Shipment, ShipmentFilters, ShipmentId, ShipmentStatus, TrackingNumber,
};

/// Fields for a shipment about to be created.
///
/// The store assigns `id`, `created_at`, and `updated_at`.
#[derive(Debug, Clone)]
pub struct NewShipment {
    /// Generator-assigned tracking number.
    pub tracking_number: TrackingNumber,
    /// Validated, trimmed sender name.
    pub sender_name: String,
    /// Validated, trimmed receiver name.
    pub receiver_name: String,
    /// Validated, trimmed origin.
    pub origin: String,
    /// Validated, trimmed destination.
    pub destination: String,
    /// Initial status.
    pub status: ShipmentStatus,
}

/// A partial update. `None` fields are left untouched; the store refreshes
/// `updated_at` on every applied patch.
#[derive(Debug, Clone, Default)]
pub struct ShipmentPatch {
    /// New sender name, if changing.
    pub sender_name: Option<String>,
    /// New receiver name, if changing.
    pub receiver_name: Option<String>,
    /// New origin, if changing.
    pub origin: Option<String>,
    /// New destination, if changing.
    pub destination: Option<String>,
    /// New status, if changing (already transition-checked by the service).
    pub status: Option<ShipmentStatus>,
}

impl ShipmentPatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.sender_name.is_none()
            && self.receiver_name.is_none()
            && self.origin.is_none()
            && self.destination.is_none()
            && self.status.is_none()
    }
}

/// Store-agnostic failure kinds.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A uniqueness constraint was violated.
    #[error("duplicate value for unique field {field}")]
    Duplicate {
        /// Wire-format name of the unique field.
        field: &'static str,
    },

    /// The backing store failed (connection, I/O, malformed row).
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// The document-store capability the service layer consumes.
#[axum::async_trait]
pub trait ShipmentStore: Send + Sync {
    /// Persist a new shipment, assigning id and timestamps.
    async fn create(&self, new: NewShipment) -> Result<Shipment, StoreError>;

    /// Fetch a shipment by id.
    async fn find_by_id(&self, id: &ShipmentId) -> Result<Option<Shipment>, StoreError>;

    /// Fetch a shipment by tracking number.
    async fn find_by_tracking_number(
        &self,
        tracking_number: &str,
    ) -> Result<Option<Shipment>, StoreError>;

    /// Apply a partial update, refreshing `updated_at`. `None` when the
    /// shipment does not exist.
    async fn update(
        &self,
        id: &ShipmentId,
        patch: &ShipmentPatch,
    ) -> Result<Option<Shipment>, StoreError>;

    /// Remove a shipment, returning its last-known state. `None` when it
    /// does not exist.
    async fn delete(&self, id: &ShipmentId) -> Result<Option<Shipment>, StoreError>;

    /// Count shipments matching the filters.
    async fn count(&self, filters: &ShipmentFilters) -> Result<u64, StoreError>;

    /// Return the page of shipments described by the query, ordered by its
    /// sort field and direction.
    async fn list(&self, query: &ListQuery) -> Result<Vec<Shipment>, StoreError>;
}
