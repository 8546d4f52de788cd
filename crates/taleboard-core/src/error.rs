//! Domain error types.

use thiserror::Error;

/// Top-level error type for board generation, layout and movement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Board settings outside the accepted ranges.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// A space whose branch metadata does not agree with the board topology.
    #[error("topology inconsistency at position {position}: {reason}")]
    TopologyInconsistency {
        /// Position of the offending space.
        position: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// A fork choice that names no path of the split it was applied to.
    #[error("fork choice {choice} is out of range for a split with {branch_count} paths")]
    OutOfRangeForkChoice {
        /// The requested path index.
        choice: usize,
        /// Number of paths at the split.
        branch_count: usize,
    },

    /// A malformed request (for example a graph with position gaps).
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure failure such as a poisoned lock.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Shorthand for building a `TopologyInconsistency`.
    #[must_use]
    pub fn topology(position: usize, reason: impl Into<String>) -> Self {
        Self::TopologyInconsistency {
            position,
            reason: reason.into(),
        }
    }
}
