//! Error types for the simulation core
//!
//! `DofMismatch`, `AlreadyDetached` and `Uninitialized` are construction or
//! usage bugs: they abort the operation and propagate to the caller.

use thiserror::Error;

use crate::graph::{BodyId, JointId};

/// Result type alias for simulation operations
pub type Result<T> = std::result::Result<T, ErrorKind>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// Coordinate vector length differs from the joint's enabled-axis count
    #[error("joint {joint:?} expects {expected} coordinates, got {got}")]
    DofMismatch {
        joint: JointId,
        expected: usize,
        got: usize,
    },

    /// Joint was already removed from its parent body
    #[error("joint {0:?} is already detached")]
    AlreadyDetached(JointId),

    /// Dynamics stepped before inertia/spring/damper were configured
    #[error("dynamics of body {0:?} used before initialization")]
    Uninitialized(BodyId),

    /// Only seed joints can be cut loose
    #[error("joint {0:?} does not carry a seed")]
    NotASeed(JointId),

    #[error("unknown joint {0:?}")]
    UnknownJoint(JointId),

    #[error("unknown body {0:?}")]
    UnknownBody(BodyId),

    /// Scene configuration could not be parsed or failed validation
    #[error("configuration error: {0}")]
    Config(String),
}

impl ErrorKind {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
