//! Multi-cell selection state, owned per table instance.
//!
//! Each controller owns its own selection; nothing is shared across table
//! instances, so selecting cells in one table can never bleed into another.

use indexmap::IndexSet;

use crate::column::ColumnId;
use crate::record::RecordId;

/// The set of currently selected cells of one table.
///
/// Cells are keyed by `(record identity, column id)`, never by row index, so
/// a selection survives filter, sort and page changes.
#[derive(Debug, Clone, Default)]
pub struct CellSelection {
    cells: IndexSet<(RecordId, ColumnId)>,
}

impl CellSelection {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cell to the selection.
    pub fn select(&mut self, record: &RecordId, column: impl Into<ColumnId>) {
        self.cells.insert((record.clone(), column.into()));
    }

    /// Removes a cell from the selection.
    pub fn deselect(&mut self, record: &RecordId, column: &str) {
        self.cells.shift_remove(&(record.clone(), column.to_string()));
    }

    /// Toggles a cell's membership; returns true when the cell is now
    /// selected.
    pub fn toggle(&mut self, record: &RecordId, column: impl Into<ColumnId>) -> bool {
        let cell = (record.clone(), column.into());
        if self.cells.shift_remove(&cell) {
            false
        } else {
            self.cells.insert(cell);
            true
        }
    }

    /// Clears the selection.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Returns true if the cell is selected.
    #[must_use]
    pub fn is_selected(&self, record: &RecordId, column: &str) -> bool {
        self.cells.contains(&(record.clone(), column.to_string()))
    }

    /// Number of selected cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true when nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates over selected cells in selection order.
    pub fn iter(&self) -> impl Iterator<Item = &(RecordId, ColumnId)> {
        self.cells.iter()
    }
}
