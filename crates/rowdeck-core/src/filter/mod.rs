//! Client-side filtering for tabular data.
//!
//! This module provides the per-column filters and the global text search
//! that narrow an in-memory row collection before sorting and pagination.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rowdeck_core::filter::{apply_filters, ColumnFilter, FilterSet};
//!
//! let mut filters = FilterSet::new();
//! filters.set("status", ColumnFilter::values(["Active"]));
//! filters.set("premium", ColumnFilter::number_range(Some(1000.0), None));
//!
//! let visible = apply_filters(&rows, "a100", &filters);
//! ```

mod builders;
mod matching;

pub use matching::apply_filters;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::column::ColumnId;

/// A filter applied to a single column.
///
/// At most one filter is active per column; absence of a filter means the
/// column is unfiltered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnFilter {
    /// Row passes iff the stringified cell value is in the accepted set.
    ///
    /// An empty accepted set matches nothing. That is distinct from removing
    /// the filter, which matches everything.
    Values {
        /// Accepted display strings.
        accepted: Vec<String>,
    },
    /// Row passes iff the stringified cell value contains the needle,
    /// case-insensitive.
    Substring {
        /// Substring to search for.
        needle: String,
    },
    /// Row passes iff the cell parses as a date within `[start, end]`
    /// inclusive. Unparsable cells fail the filter.
    DateRange {
        /// Inclusive lower bound; open-ended when absent.
        start: Option<NaiveDate>,
        /// Inclusive upper bound; open-ended when absent.
        end: Option<NaiveDate>,
    },
    /// Row passes iff the numerically coerced cell value falls within
    /// `[min, max]` inclusive. Non-numeric cells compare as 0.
    NumberRange {
        /// Inclusive lower bound; open-ended when absent.
        min: Option<f64>,
        /// Inclusive upper bound; open-ended when absent.
        max: Option<f64>,
    },
}

/// The active per-column filters of one table, at most one per column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    filters: IndexMap<ColumnId, ColumnFilter>,
}

impl FilterSet {
    /// Creates an empty filter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets (or replaces) the filter on a column.
    pub fn set(&mut self, column: impl Into<ColumnId>, filter: ColumnFilter) {
        self.filters.insert(column.into(), filter);
    }

    /// Removes the filter on a column, returning it if one was active.
    pub fn remove(&mut self, column: &str) -> Option<ColumnFilter> {
        self.filters.shift_remove(column)
    }

    /// Removes all filters.
    pub fn clear(&mut self) {
        self.filters.clear();
    }

    /// Returns the active filter on a column, if any.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&ColumnFilter> {
        self.filters.get(column)
    }

    /// Returns the number of active filters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns true when no filter is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Iterates over `(column, filter)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&ColumnId, &ColumnFilter)> {
        self.filters.iter()
    }
}
