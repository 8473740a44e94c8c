//! The pending-edit buffer: staged, not-yet-committed cell changes.
//!
//! The buffer is keyed by stable record identity, never by row index, so a
//! staged value renders correctly regardless of the current filter, sort or
//! page. It writes through an injected [`KvStore`] on every mutation and
//! reloads on construction, so unsaved edits survive a page reload. Keys are
//! scoped per logical table.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::column::ColumnId;
use crate::commit::{CellEdit, EditResult};
use crate::error::{Error, Result};
use crate::kv::KvStore;
use crate::record::RecordId;

type Edits = IndexMap<RecordId, IndexMap<ColumnId, String>>;

/// Staged cell edits for one logical table.
///
/// All mutations are atomic read-modify-write operations under an internal
/// lock, so edits to different cells in quick succession are never lost.
pub struct PendingEdits {
    table_key: String,
    store: Arc<dyn KvStore>,
    edits: RwLock<Edits>,
}

impl fmt::Debug for PendingEdits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingEdits")
            .field("table_key", &self.table_key)
            .field("edit_count", &self.edit_count())
            .finish_non_exhaustive()
    }
}

impl PendingEdits {
    /// Opens the buffer for a table, reloading any persisted edits.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or holds corrupt state.
    pub fn open(table_key: impl Into<String>, store: Arc<dyn KvStore>) -> Result<Self> {
        let table_key = table_key.into();
        let edits = match store.load(&Self::storage_key(&table_key))? {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|err| Error::Serialization(err.to_string()))?,
            None => Edits::default(),
        };
        Ok(Self {
            table_key,
            store,
            edits: RwLock::new(edits),
        })
    }

    fn storage_key(table_key: &str) -> String {
        format!("pending_edits/{table_key}")
    }

    /// Stages a cell edit; a prior staged value for the same cell is
    /// overwritten (last write wins, no history).
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the buffer fails.
    pub fn stage(
        &self,
        record: &RecordId,
        column: impl Into<ColumnId>,
        val: impl Into<String>,
    ) -> Result<()> {
        {
            let mut edits = self.edits.write();
            edits
                .entry(record.clone())
                .or_default()
                .insert(column.into(), val.into());
        }
        self.persist()
    }

    /// Returns the staged value for a cell, or `None` when unstaged.
    #[must_use]
    pub fn get(&self, record: &RecordId, column: &str) -> Option<String> {
        self.edits
            .read()
            .get(record)
            .and_then(|fields| fields.get(column).cloned())
    }

    /// Discards all staged edits.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the cleared buffer fails.
    pub fn clear_all(&self) -> Result<()> {
        self.edits.write().clear();
        self.persist()
    }

    /// Number of distinct records with at least one staged field.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.edits.read().len()
    }

    /// Total number of staged field edits across all records.
    ///
    /// This is the one count used for every "N pending" display.
    #[must_use]
    pub fn edit_count(&self) -> usize {
        self.edits.read().values().map(IndexMap::len).sum()
    }

    /// Returns true when nothing is staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edits.read().is_empty()
    }

    /// Snapshots the buffer as a flat list of edit triples, in staging order.
    ///
    /// The snapshot is what a commit submits; edits staged after the snapshot
    /// are untouched by the subsequent reconciliation.
    #[must_use]
    pub fn snapshot(&self) -> Vec<CellEdit> {
        self.edits
            .read()
            .iter()
            .flat_map(|(record, fields)| {
                fields.iter().map(|(column, val)| CellEdit {
                    record: record.clone(),
                    column: column.clone(),
                    value: val.clone(),
                })
            })
            .collect()
    }

    /// Reconciles the buffer with per-item commit results.
    ///
    /// Removes each *applied* edit, but only while its staged value still
    /// equals the committed value; a cell re-staged while the commit was in
    /// flight keeps its newer value for the next attempt. Failed edits remain
    /// staged for retry.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the reconciled buffer fails.
    pub fn absorb(&self, results: &[EditResult]) -> Result<()> {
        {
            let mut edits = self.edits.write();
            for result in results.iter().filter(|r| r.status.is_applied()) {
                let record_drained = match edits.get_mut(&result.edit.record) {
                    Some(fields) => {
                        if fields.get(&result.edit.column) == Some(&result.edit.value) {
                            fields.shift_remove(&result.edit.column);
                        }
                        fields.is_empty()
                    }
                    None => false,
                };
                if record_drained {
                    edits.shift_remove(&result.edit.record);
                }
            }
        }
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        let raw = serde_json::to_string(&*self.edits.read())
            .map_err(|err| Error::Serialization(err.to_string()))?;
        self.store.save(&Self::storage_key(&self.table_key), &raw)
    }
}
