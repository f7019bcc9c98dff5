//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors signal programming mistakes in an add sequence.
/// They stop the current call; the tree is left as it was before it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid argument at position {position}: {reason}")]
    InvalidArgument { position: usize, reason: String },

    #[error("expected non-negative tree depth, got {0}")]
    InvalidDepth(isize),
}

impl DomainError {
    /// Create an invalid-argument error for the given flattened position.
    pub fn invalid_argument(position: usize, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            position,
            reason: reason.into(),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
