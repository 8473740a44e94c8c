//! Builder methods for creating `ColumnFilter` instances.

use chrono::NaiveDate;

use super::ColumnFilter;

impl ColumnFilter {
    /// Creates a value-set filter from any collection of accepted values.
    #[must_use]
    pub fn values<I, S>(accepted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Values {
            accepted: accepted.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a case-insensitive substring filter.
    #[must_use]
    pub fn substring(needle: impl Into<String>) -> Self {
        Self::Substring {
            needle: needle.into(),
        }
    }

    /// Creates an inclusive date-range filter; either bound may be open.
    #[must_use]
    pub fn date_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self::DateRange { start, end }
    }

    /// Creates an inclusive number-range filter; either bound may be open.
    #[must_use]
    pub fn number_range(min: Option<f64>, max: Option<f64>) -> Self {
        Self::NumberRange { min, max }
    }
}
