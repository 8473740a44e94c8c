//! Error types for `RowDeck`.
//!
//! This module provides a unified error type for all table-engine operations,
//! designed for direct exposure to embedding UI layers.

use thiserror::Error;

/// Result type alias for `RowDeck` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in `RowDeck` operations.
///
/// Each variant includes a descriptive error message suitable for end-users.
/// Error codes follow the pattern `DECK-XXX` for easy debugging.
#[derive(Error, Debug)]
pub enum Error {
    /// Record not found (DECK-001).
    #[error("[DECK-001] Record '{0}' not found in the loaded data set")]
    RecordNotFound(String),

    /// Column not found (DECK-002).
    #[error("[DECK-002] Column '{0}' not found")]
    ColumnNotFound(String),

    /// Column not editable (DECK-003).
    #[error("[DECK-003] Column '{0}' is read-only and cannot be edited")]
    ColumnReadonly(String),

    /// Initial load failure (DECK-004).
    ///
    /// The table is left in a blocking failed state; no stale rows are served.
    #[error("[DECK-004] Failed to load records: {0}")]
    LoadFailed(String),

    /// A bulk commit is already in flight (DECK-005).
    ///
    /// Commits are serialized per table to keep two bulk updates from racing
    /// over the same pending buffer. Retry after the current commit resolves.
    #[error("[DECK-005] A bulk commit is already in flight for this table")]
    CommitInFlight,

    /// Commit gateway transport failure (DECK-006).
    ///
    /// Nothing was applied remotely; the pending buffer is preserved for retry.
    #[error("[DECK-006] Commit gateway failure: {0}")]
    Gateway(String),

    /// Persisted state storage error (DECK-007).
    ///
    /// The key-value store backing client-local state failed to read or
    /// write; retrying without fixing the environment will fail again.
    #[error("[DECK-007] Storage error: {0}")]
    Storage(String),

    /// IO error (DECK-008).
    #[error("[DECK-008] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error (DECK-009).
    #[error("[DECK-009] Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (DECK-010).
    #[error("[DECK-010] Configuration error: {0}")]
    Config(String),

    /// Export error (DECK-011).
    #[error("[DECK-011] Export error: {0}")]
    Export(String),
}

impl Error {
    /// Returns the error code (e.g., "DECK-001").
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::RecordNotFound(_) => "DECK-001",
            Self::ColumnNotFound(_) => "DECK-002",
            Self::ColumnReadonly(_) => "DECK-003",
            Self::LoadFailed(_) => "DECK-004",
            Self::CommitInFlight => "DECK-005",
            Self::Gateway(_) => "DECK-006",
            Self::Storage(_) => "DECK-007",
            Self::Io(_) => "DECK-008",
            Self::Serialization(_) => "DECK-009",
            Self::Config(_) => "DECK-010",
            Self::Export(_) => "DECK-011",
        }
    }

    /// Returns true if this error is safe to retry.
    ///
    /// Non-retryable errors indicate corrupt persisted state or a broken
    /// local environment rather than a transient condition.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Io(_) | Self::Storage(_) | Self::Serialization(_))
    }
}

/// Conversion from CSV writer errors.
impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}
