//! Spreadsheet cell addressing for sheet-backed commit gateways.
//!
//! A sheet batch-write API addresses cells by `(sheet name, column letter,
//! row number)` while the engine works in `(record id, column id)`. The
//! layout captured at load time performs the translation; ids or fields that
//! no longer resolve become per-item failures and never abort the batch.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::column::ColumnId;
use crate::commit::{CellEdit, EditResult, EditStatus};
use crate::record::RecordId;

/// One translated cell write in sheet addressing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetCellUpdate {
    /// Target sheet name.
    pub sheet: String,
    /// Column letter in A1 notation (`A`, `B`, ..., `AA`).
    pub column_letter: String,
    /// One-based sheet row number.
    pub row: u32,
    /// New cell value.
    pub value: String,
}

/// Maps record/column identities onto sheet coordinates.
///
/// Built from the column order and record order observed at load time; the
/// first data row follows the header row(s).
#[derive(Debug, Clone)]
pub struct SheetLayout {
    sheet: String,
    columns: Vec<ColumnId>,
    rows: HashMap<RecordId, u32>,
}

impl SheetLayout {
    /// Creates a layout from the sheet's left-to-right column order and
    /// top-to-bottom record order.
    ///
    /// `first_data_row` is the one-based row number of the first record
    /// (2 for a sheet with a single header row).
    #[must_use]
    pub fn new(
        sheet: impl Into<String>,
        columns: Vec<ColumnId>,
        record_order: &[RecordId],
        first_data_row: u32,
    ) -> Self {
        let rows = record_order
            .iter()
            .enumerate()
            .map(|(offset, record)| (record.clone(), first_data_row + offset as u32))
            .collect();
        Self {
            sheet: sheet.into(),
            columns,
            rows,
        }
    }

    /// Translates one edit into a sheet cell write.
    ///
    /// # Errors
    ///
    /// Returns the per-item status when the record id or the column no
    /// longer resolves against this layout.
    pub fn resolve(&self, edit: &CellEdit) -> std::result::Result<SheetCellUpdate, EditStatus> {
        let row = *self
            .rows
            .get(&edit.record)
            .ok_or(EditStatus::RecordNotFound)?;
        let column_index = self
            .columns
            .iter()
            .position(|column| column == &edit.column)
            .ok_or(EditStatus::FieldNotFound)?;

        Ok(SheetCellUpdate {
            sheet: self.sheet.clone(),
            column_letter: column_letter(column_index),
            row,
            value: edit.value.clone(),
        })
    }
}

/// Partitions a batch of edits into addressable sheet writes and per-item
/// failures for the unresolvable rest.
#[must_use]
pub fn plan_sheet_updates(
    layout: &SheetLayout,
    edits: &[CellEdit],
) -> (Vec<SheetCellUpdate>, Vec<EditResult>) {
    let mut updates = Vec::new();
    let mut failures = Vec::new();

    for edit in edits {
        match layout.resolve(edit) {
            Ok(update) => updates.push(update),
            Err(status) => failures.push(EditResult::new(edit.clone(), status)),
        }
    }

    (updates, failures)
}

/// Converts a zero-based column index to its A1 letter (0 → `A`, 26 → `AA`).
#[must_use]
pub fn column_letter(index: usize) -> String {
    let mut remaining = index + 1;
    let mut letters = Vec::new();

    while remaining > 0 {
        remaining -= 1;
        letters.push(b'A' + (remaining % 26) as u8);
        remaining /= 26;
    }

    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}
