//! Record data structure representing one row of tabular data.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::value;

/// Stable identity of a record, taken from the table's designated key column
/// (e.g. a policy number).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Creates a record id from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One row of tabular data.
///
/// A record is an open-ended mapping from column name to scalar value
/// (string, number, bool or null). The column set is shared but not
/// statically fixed within one table instance; descriptors are declared or
/// sampled separately (see [`crate::column`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Stable identity, mirrored from the designated key column.
    pub id: RecordId,

    /// Column name to scalar value mapping, key column included.
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Creates a record with the given identity and fields.
    #[must_use]
    pub fn new(id: impl Into<RecordId>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Builds a record from a field map, extracting its identity from the
    /// designated key column.
    ///
    /// Returns `None` when the key column is absent or renders empty.
    #[must_use]
    pub fn from_fields(id_column: &str, fields: Map<String, Value>) -> Option<Self> {
        let id = fields.get(id_column).map(value::display_string)?;
        if id.is_empty() {
            return None;
        }
        Some(Self::new(RecordId::new(id), fields))
    }

    /// Returns the raw value of a column, or `None` when absent.
    #[must_use]
    pub fn field(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    /// Returns the display string for a column; absent columns render empty.
    #[must_use]
    pub fn display(&self, column: &str) -> String {
        self.field(column).map_or_else(String::new, value::display_string)
    }

    /// Sets a column value in place.
    pub fn set_field(&mut self, column: impl Into<String>, val: Value) {
        self.fields.insert(column.into(), val);
    }

    /// Returns the column names in this record's insertion order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}
