//! Single-column stable sorting over filtered rows.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::column::{ColumnDescriptor, ColumnId};
use crate::record::Record;
use crate::value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest value first.
    Ascending,
    /// Largest value first.
    Descending,
}

impl SortDirection {
    /// Returns the opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// The active sort of a table: one column, one direction.
///
/// No multi-column sort; absence of a spec preserves insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Column driving the sort.
    pub column: ColumnId,
    /// Sort direction.
    pub direction: SortDirection,
}

impl SortSpec {
    /// Creates an ascending sort on a column.
    #[must_use]
    pub fn ascending(column: impl Into<ColumnId>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// Creates a descending sort on a column.
    #[must_use]
    pub fn descending(column: impl Into<ColumnId>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// Sorts rows by the given spec, preserving input order when `spec` is `None`.
///
/// The sort is stable in both directions (descending reverses the comparator,
/// not the rows, so equal keys keep their relative order). Columns declared
/// numeric (`Number`, `Currency`) compare via the canonical numeric coercion,
/// under which non-numeric cells sort as zero; all other columns compare as
/// locale-naive strings. Both comparisons are total, so no `NaN` ordering
/// issues arise.
#[must_use]
pub fn apply_sort(
    rows: &[Record],
    spec: Option<&SortSpec>,
    columns: &[ColumnDescriptor],
) -> Vec<Record> {
    let mut sorted: Vec<Record> = rows.to_vec();
    let Some(spec) = spec else {
        return sorted;
    };

    let numeric = columns
        .iter()
        .find(|column| column.id == spec.column)
        .is_some_and(|column| column.kind.is_numeric());

    sorted.sort_by(|left, right| {
        let ordering = if numeric {
            let l = left.field(&spec.column).map_or(0.0, value::to_number);
            let r = right.field(&spec.column).map_or(0.0, value::to_number);
            l.partial_cmp(&r).unwrap_or(Ordering::Equal)
        } else {
            left.display(&spec.column).cmp(&right.display(&spec.column))
        };
        match spec.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });

    sorted
}
