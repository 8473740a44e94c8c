//! Record sources: the external data collaborators a table loads from.

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{Error, Result};
use crate::record::{Record, RecordId};
use crate::value;

/// External source of a table's full row collection.
///
/// Two variants exist in practice: a REST list endpoint returning an array of
/// key→scalar records, and a full-sheet read returning a header row plus data
/// rows (reconstructed via [`records_from_sheet`]). Loads are wholesale: the
/// controller replaces its store with whatever the source returns.
pub trait RecordSource {
    /// Fetches the full row collection.
    ///
    /// # Errors
    ///
    /// Returns an error on network or remote failure; the caller surfaces it
    /// as a blocking load failure.
    fn fetch_all(&self) -> Result<Vec<Record>>;
}

/// A fixed in-memory source, used by tests and demos.
impl RecordSource for Vec<Record> {
    fn fetch_all(&self) -> Result<Vec<Record>> {
        Ok(self.clone())
    }
}

/// Reconstructs records from a sheet read: one header row plus data rows.
///
/// Short rows pad missing trailing cells with null. Rows whose id cell is
/// absent or renders empty cannot be edit-targeted and are skipped with a
/// warning rather than failing the load.
///
/// # Errors
///
/// Returns [`Error::ColumnNotFound`] when the header lacks the id column.
pub fn records_from_sheet(
    header: &[String],
    rows: &[Vec<Value>],
    id_column: &str,
) -> Result<Vec<Record>> {
    let id_index = header
        .iter()
        .position(|name| name == id_column)
        .ok_or_else(|| Error::ColumnNotFound(id_column.to_string()))?;

    let mut records = Vec::with_capacity(rows.len());

    for (offset, row) in rows.iter().enumerate() {
        let id = row.get(id_index).map_or_else(String::new, value::display_string);
        if id.is_empty() {
            warn!(row = offset + 2, "skipping sheet row without identifier");
            continue;
        }

        let mut fields = Map::with_capacity(header.len());
        for (column_index, name) in header.iter().enumerate() {
            let cell = row.get(column_index).cloned().unwrap_or(Value::Null);
            fields.insert(name.clone(), cell);
        }

        records.push(Record::new(RecordId::new(id), fields));
    }

    Ok(records)
}
