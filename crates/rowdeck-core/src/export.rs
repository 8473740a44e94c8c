//! CSV export of the current filtered view.
//!
//! A pure transform over the filtering pipeline's output: visible columns
//! become the header, formatter-applied display values become the cells.
//! Quoting and escaping are delegated to the `csv` writer.

use crate::column::ColumnDescriptor;
use crate::error::{Error, Result};
use crate::record::Record;

/// Serializes rows to CSV bytes, one column per descriptor.
///
/// Column labels form the header row; cell values go through each column's
/// display rendering, so the export matches what the table shows.
///
/// # Errors
///
/// Returns an error if CSV serialization fails.
pub fn export_csv(rows: &[Record], columns: &[ColumnDescriptor]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(columns.iter().map(|column| column.label.as_str()))?;

    for row in rows {
        writer.write_record(columns.iter().map(|column| {
            row.field(&column.id)
                .map_or_else(String::new, |raw| column.display(raw))
        }))?;
    }

    writer
        .into_inner()
        .map_err(|err| Error::Export(err.to_string()))
}
