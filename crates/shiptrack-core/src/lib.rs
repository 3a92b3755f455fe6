#![deny(missing_docs)]

//! # shiptrack-core — Foundational Types for Shiptrack
//!
//! This crate defines the domain types the API crate depends on. It has no
//! I/O and no internal crate dependencies — only `serde`, `thiserror`,
//! `chrono`, and `rand` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** A [`ShipmentId`] and a
//!    [`TrackingNumber`] are distinct types; both validate their format at
//!    construction time, so a malformed identifier never reaches a store.
//!
//! 2. **Single [`ShipmentStatus`] enum.** One definition of the lifecycle,
//!    one static edge table, exhaustive `match` everywhere.
//!
//! 3. **Structured errors with `thiserror`.** No `Box<dyn Error>`, no
//!    `.unwrap()` outside tests. Error display strings are the exact
//!    diagnostic messages the API returns to clients.
//!
//! 4. **Untrusted input is normalized once.** [`ListQuery::from_raw`] is the
//!    sole path from raw query strings to a bounded, validated descriptor.

pub mod error;
pub mod identity;
pub mod model;
pub mod query;
pub mod status;
pub mod tracking;

// Re-export primary types at crate root for ergonomic imports.
pub use error::ValidationError;
pub use identity::ShipmentId;
pub use model::Shipment;
pub use query::{ListQuery, QueryError, RawListParams, ShipmentFilters, SortField, SortOrder};
pub use status::{ShipmentStatus, TransitionError};
pub use tracking::TrackingNumber;
