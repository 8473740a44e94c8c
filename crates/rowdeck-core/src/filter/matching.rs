//! Filter matching logic and the filtering entry point.

use super::{ColumnFilter, FilterSet};
use crate::record::Record;
use crate::value;

impl ColumnFilter {
    /// Evaluates the filter against one cell of a record.
    ///
    /// Absent columns behave like null cells: they render as an empty string,
    /// coerce to 0 numerically and never parse as a date.
    #[must_use]
    pub fn matches(&self, record: &Record, column: &str) -> bool {
        match self {
            Self::Values { accepted } => {
                let text = record.display(column);
                accepted.iter().any(|candidate| candidate == &text)
            }
            Self::Substring { needle } => {
                if needle.trim().is_empty() {
                    return true;
                }
                record
                    .display(column)
                    .to_lowercase()
                    .contains(&needle.to_lowercase())
            }
            Self::DateRange { start, end } => record
                .field(column)
                .and_then(value::to_date)
                .is_some_and(|date| {
                    start.is_none_or(|bound| date >= bound)
                        && end.is_none_or(|bound| date <= bound)
                }),
            Self::NumberRange { min, max } => {
                let number = record.field(column).map_or(0.0, value::to_number);
                min.is_none_or(|bound| number >= bound) && max.is_none_or(|bound| number <= bound)
            }
        }
    }
}

/// Returns true if any field of the record (or its id) contains the needle.
///
/// The needle must already be lowercased.
fn matches_search(record: &Record, needle: &str) -> bool {
    if record.id.as_str().to_lowercase().contains(needle) {
        return true;
    }
    record
        .fields
        .values()
        .any(|raw| value::display_string(raw).to_lowercase().contains(needle))
}

/// Applies the global search and all column filters to a row collection.
///
/// Pure function of its inputs: the input slice is never mutated and its
/// order is preserved, so repeated application is idempotent. A whitespace
/// search term filters nothing; column filters are ANDed together and with
/// the search.
#[must_use]
pub fn apply_filters(rows: &[Record], global_search: &str, filters: &FilterSet) -> Vec<Record> {
    let needle = global_search.trim().to_lowercase();

    rows.iter()
        .filter(|record| {
            (needle.is_empty() || matches_search(record, &needle))
                && filters
                    .iter()
                    .all(|(column, filter)| filter.matches(record, column))
        })
        .cloned()
        .collect()
}
