//! # Shipment Lifecycle State Machine
//!
//! Models the four-state shipment lifecycle and validates transitions.
//!
//! ## States
//!
//! ```text
//! pending ──▶ in_transit ──▶ delivered (terminal)
//!    │             │
//!    ▼             ▼
//! cancelled (terminal)
//! ```
//!
//! ## Design Decision
//!
//! The lifecycle uses an enum with a static edge table rather than typestate
//! types. With four states and five edges the invariant is small enough to
//! validate at runtime, and the edge table doubles as the source for the
//! diagnostics the API returns on rejected transitions. A transition to the
//! current status is always a permitted no-op, including for terminal
//! states, so idempotent updates never fail.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::error::ValidationError;

/// The lifecycle state of a shipment.
///
/// Serializes to the snake_case wire strings (`pending`, `in_transit`,
/// `delivered`, `cancelled`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    /// Shipment registered but not yet picked up.
    Pending,
    /// Shipment en route to its destination.
    InTransit,
    /// Shipment arrived at its destination (terminal).
    Delivered,
    /// Shipment cancelled before delivery (terminal).
    Cancelled,
}

impl ShipmentStatus {
    /// All lifecycle states, in wire order.
    pub const ALL: [ShipmentStatus; 4] = [
        Self::Pending,
        Self::InTransit,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// The wire-format string for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InTransit => "in_transit",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Comma-separated list of all wire values, for diagnostics.
    pub fn wire_values() -> &'static str {
        "pending, in_transit, delivered, cancelled"
    }

    /// The statuses reachable from this one (excluding the no-op
    /// self-transition). Empty for terminal states.
    pub fn allowed_transitions(&self) -> &'static [ShipmentStatus] {
        match self {
            Self::Pending => &[Self::InTransit, Self::Cancelled],
            Self::InTransit => &[Self::Delivered, Self::Cancelled],
            Self::Delivered => &[],
            Self::Cancelled => &[],
        }
    }

    /// Whether this state has no outgoing edges.
    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// Whether a transition to `target` is permitted.
    ///
    /// A target equal to the current status is always permitted (no-op
    /// update), regardless of whether the state is terminal.
    pub fn can_transition_to(&self, target: ShipmentStatus) -> bool {
        *self == target || self.allowed_transitions().contains(&target)
    }

    /// Validate a transition to `target`, returning a structured error
    /// carrying the diagnostic message on rejection.
    pub fn check_transition(&self, target: ShipmentStatus) -> Result<(), TransitionError> {
        if self.can_transition_to(target) {
            Ok(())
        } else if self.is_terminal() {
            Err(TransitionError::FinalState { from: *self })
        } else {
            Err(TransitionError::NotAllowed {
                from: *self,
                to: target,
            })
        }
    }
}

impl std::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShipmentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_transit" => Ok(Self::InTransit),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(ValidationError::InvalidStatus(other.to_string())),
        }
    }
}

/// A rejected status transition.
///
/// Display strings are the diagnostic messages the API surfaces to clients.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// The current state has no outgoing edges.
    #[error("Cannot change status from '{from}'. This is a final state.")]
    FinalState {
        /// The terminal state the shipment is in.
        from: ShipmentStatus,
    },

    /// The target is not in the current state's edge set.
    #[error(
        "Invalid status transition from '{from}' to '{to}'. Allowed transitions: {}",
        .from.allowed_transitions().iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
    )]
    NotAllowed {
        /// The current state.
        from: ShipmentStatus,
        /// The rejected target state.
        to: ShipmentStatus,
    },
}

impl TransitionError {
    /// The state the shipment was in when the transition was rejected.
    pub fn from_status(&self) -> ShipmentStatus {
        match self {
            Self::FinalState { from } | Self::NotAllowed { from, .. } => *from,
        }
    }
}
