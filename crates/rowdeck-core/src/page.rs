//! Pagination over the filtered and sorted row set.

use serde::Serialize;

use crate::record::Record;

/// One page of the filtered/sorted view, plus paging metadata.
///
/// A derived projection, recomputed on every input change and never mutated
/// in place.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    /// Rows of the current page.
    pub rows: Vec<Record>,
    /// Zero-based page index, clamped to the valid range.
    pub page_index: usize,
    /// Page size in effect (at least 1).
    pub page_size: usize,
    /// Total rows across all pages (after filtering).
    pub total_records: usize,
    /// Total number of pages; 0 when there are no rows.
    pub total_pages: usize,
}

/// Slices rows into one page.
///
/// `page_index` is zero-based; an out-of-range index clamps to the last valid
/// page rather than erroring. A page size of 0 is normalised to 1.
#[must_use]
pub fn paginate(rows: &[Record], page_index: usize, page_size: usize) -> Page {
    let page_size = page_size.max(1);
    let total_records = rows.len();
    let total_pages = total_records.div_ceil(page_size);

    let page_index = if total_pages == 0 {
        0
    } else {
        page_index.min(total_pages - 1)
    };

    let rows = rows
        .iter()
        .skip(page_index * page_size)
        .take(page_size)
        .cloned()
        .collect();

    Page {
        rows,
        page_index,
        page_size,
        total_records,
        total_pages,
    }
}
