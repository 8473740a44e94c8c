//! Bulk commit of staged edits to a remote collaborator.
//!
//! The gateway seam is the only place the engine touches the outside world
//! besides the initial record load. Implementations wrap a REST bulk-update
//! endpoint or a spreadsheet batch-cell write (see [`crate::sheet`] for the
//! addressing translation); tests use in-memory fakes.

use serde::{Deserialize, Serialize};

use crate::column::ColumnId;
use crate::error::Result;
use crate::record::RecordId;

/// One staged cell change, as submitted to the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellEdit {
    /// Identity of the record being edited.
    pub record: RecordId,
    /// Column being edited.
    pub column: ColumnId,
    /// New value, serialized as text.
    pub value: String,
}

impl CellEdit {
    /// Creates a cell edit.
    #[must_use]
    pub fn new(
        record: impl Into<RecordId>,
        column: impl Into<ColumnId>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            record: record.into(),
            column: column.into(),
            value: value.into(),
        }
    }
}

/// Per-item outcome of one submitted edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EditStatus {
    /// The remote store applied the edit.
    Applied,
    /// The record identifier no longer exists remotely.
    RecordNotFound,
    /// The staged field has no matching column in the remote schema.
    FieldNotFound,
    /// The remote store rejected the edit for another reason.
    Rejected {
        /// Remote-supplied rejection reason.
        reason: String,
    },
}

impl EditStatus {
    /// Returns true if the edit was applied remotely.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// One submitted edit paired with its per-item outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditResult {
    /// The submitted edit.
    pub edit: CellEdit,
    /// Its outcome.
    pub status: EditStatus,
}

impl EditResult {
    /// Creates an edit result.
    #[must_use]
    pub const fn new(edit: CellEdit, status: EditStatus) -> Self {
        Self { edit, status }
    }
}

/// Outcome of one bulk commit.
///
/// Errors are summarized as counts by default; per-item detail is available
/// on demand through `results`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitOutcome {
    /// Number of edits the remote store applied.
    pub success_count: usize,
    /// Number of edits that failed per-item.
    pub failure_count: usize,
    /// Per-item detail, one entry per submitted edit.
    pub results: Vec<EditResult>,
}

impl CommitOutcome {
    /// Builds an outcome from per-item results, deriving the counts.
    #[must_use]
    pub fn from_results(results: Vec<EditResult>) -> Self {
        let success_count = results
            .iter()
            .filter(|result| result.status.is_applied())
            .count();
        Self {
            success_count,
            failure_count: results.len() - success_count,
            results,
        }
    }

    /// Builds a fully successful outcome for the given edits.
    ///
    /// Convenience for gateways whose remote side reports only a total.
    #[must_use]
    pub fn all_applied(edits: &[CellEdit]) -> Self {
        Self::from_results(
            edits
                .iter()
                .map(|edit| EditResult::new(edit.clone(), EditStatus::Applied))
                .collect(),
        )
    }

    /// Returns true when every submitted edit was applied.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.failure_count == 0
    }

    /// User-facing one-line summary, e.g. `"5 applied, 2 failed"`.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("{} applied, {} failed", self.success_count, self.failure_count)
    }
}

/// External collaborator applying a batch of cell edits remotely.
///
/// A transport-level `Err` means nothing was applied and the caller must
/// preserve its pending buffer; per-item failures are reported inside an
/// `Ok` outcome and never abort the batch.
pub trait CommitGateway {
    /// Submits all edits as one remote request.
    ///
    /// # Errors
    ///
    /// Returns an error on network or remote failure, in which case no edit
    /// is considered applied.
    fn commit(&self, edits: &[CellEdit]) -> Result<CommitOutcome>;
}
