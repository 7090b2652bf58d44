//! Errors raised when mutating a [`Space`](crate::Space).

use thiserror::Error;

use crate::space::ColliderId;

/// Errors from collider registration and updates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpaceError {
    /// The shape has a non-finite coordinate or a non-positive extent.
    #[error("invalid collider shape: {0}")]
    InvalidShape(String),

    /// No collider is registered under this id.
    #[error("unknown collider {0}")]
    UnknownCollider(ColliderId),
}
