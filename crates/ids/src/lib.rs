//! Identifier utilities for the triage workspace.
//!
//! Two identifiers are issued during a session:
//!
//! - [`MessageId`]: one per chat message, a canonical UUID (32 lowercase hex characters,
//!   no hyphens), the same value you would get from `Uuid::new_v4().simple().to_string()`.
//! - [`AssessmentId`]: one per saved assessment, `TRIAGE_<unix-millis>`, for example
//!   `TRIAGE_1760601322045`.
//!
//! Externally supplied identifiers (for example, read back from the local store) must
//! already be in canonical form; use the `parse` constructors to validate them.

mod service;

// Re-export public types
pub use service::{AssessmentId, MessageId, Uuid};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum IdError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type IdResult<T> = Result<T, IdError>;
