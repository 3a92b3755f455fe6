//! # API Route Modules
//!
//! - `shipments` — the shipment resource: create, list (with pagination,
//!   filtering, sorting, and search), fetch by id or tracking number,
//!   partial update with lifecycle-validated status transitions, and hard
//!   delete.

pub mod shipments;
