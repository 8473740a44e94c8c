//! The client filtering controller: the stateful unit behind one table view.
//!
//! Composes the record store, filter engine, sort engine and paginator into
//! the pipeline a table UI consumes, and owns the table's pending-edit
//! buffer and cell selection. All query-state mutators are synchronous; only
//! [`TableController::load`] and [`TableController::commit_with`] call
//! external collaborators.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::column::{self, ColumnDescriptor, ColumnId};
use crate::commit::{CommitGateway, CommitOutcome};
use crate::error::{Error, Result};
use crate::export;
use crate::filter::{apply_filters, ColumnFilter, FilterSet};
use crate::kv::KvStore;
use crate::page::{paginate, Page};
use crate::pending::PendingEdits;
use crate::record::{Record, RecordId};
use crate::selection::CellSelection;
use crate::sheet::SheetLayout;
use crate::sort::{apply_sort, SortDirection, SortSpec};
use crate::source::RecordSource;

/// Static configuration of one table controller.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Key scoping persisted client state (pending edits) to this table.
    pub table_key: String,
    /// Column serving as the stable record identifier.
    pub id_column: ColumnId,
    /// Declared column descriptors; empty means derive from sampled data on
    /// first load.
    pub columns: Vec<ColumnDescriptor>,
    /// Initial page size.
    pub page_size: usize,
}

impl TableConfig {
    /// Creates a config with dynamic column derivation and the default page
    /// size.
    #[must_use]
    pub fn new(table_key: impl Into<String>, id_column: impl Into<ColumnId>) -> Self {
        Self {
            table_key: table_key.into(),
            id_column: id_column.into(),
            columns: Vec::new(),
            page_size: 25,
        }
    }

    /// Declares the column descriptors statically.
    #[must_use]
    pub fn with_columns(mut self, columns: Vec<ColumnDescriptor>) -> Self {
        self.columns = columns;
        self
    }

    /// Sets the initial page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

/// Load lifecycle of the table's record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// No load attempted yet.
    NotLoaded,
    /// A load succeeded; the store holds valid rows.
    Loaded,
    /// The last load failed; no stale rows are served as valid.
    Failed(String),
}

/// Summary of one wholesale load.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    /// Number of records loaded.
    pub loaded: usize,
    /// Identifiers that appeared more than once.
    ///
    /// Duplicate rows are kept and shown, but identity lookups (edit
    /// targeting, pending overlay) resolve to the first occurrence.
    pub duplicate_ids: Vec<RecordId>,
}

/// The stateful controller backing one table view.
pub struct TableController {
    config: TableConfig,
    columns: Vec<ColumnDescriptor>,
    rows: Vec<Record>,
    index: HashMap<RecordId, usize>,
    load_state: LoadState,
    search: String,
    filters: FilterSet,
    sort: Option<SortSpec>,
    page_index: usize,
    page_size: usize,
    pending: Arc<PendingEdits>,
    selection: CellSelection,
    commit_in_flight: bool,
}

impl TableController {
    /// Opens a controller, reloading any persisted pending edits for its
    /// table key from the injected store.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted state cannot be read.
    pub fn open(config: TableConfig, store: Arc<dyn KvStore>) -> Result<Self> {
        let pending = Arc::new(PendingEdits::open(config.table_key.clone(), store)?);
        let columns = config.columns.clone();
        let page_size = config.page_size.max(1);
        Ok(Self {
            config,
            columns,
            rows: Vec::new(),
            index: HashMap::new(),
            load_state: LoadState::NotLoaded,
            search: String::new(),
            filters: FilterSet::new(),
            sort: None,
            page_index: 0,
            page_size,
            pending,
            selection: CellSelection::new(),
            commit_in_flight: false,
        })
    }

    // -------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------

    /// Wholesale refresh from the record source.
    ///
    /// On success the store is replaced, the page index resets and columns
    /// are derived from the sample if none were declared. Duplicate
    /// identifiers are reported, not fatal. On failure the controller enters
    /// a blocking failed state and serves no rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LoadFailed`] when the source fails.
    pub fn load(&mut self, source: &dyn RecordSource) -> Result<LoadReport> {
        let records = match source.fetch_all() {
            Ok(records) => records,
            Err(err) => {
                let message = err.to_string();
                self.rows.clear();
                self.index.clear();
                self.load_state = LoadState::Failed(message.clone());
                return Err(Error::LoadFailed(message));
            }
        };

        let mut index = HashMap::with_capacity(records.len());
        let mut duplicate_ids = Vec::new();
        for (position, record) in records.iter().enumerate() {
            // First occurrence wins for identity lookups.
            if let std::collections::hash_map::Entry::Vacant(entry) =
                index.entry(record.id.clone())
            {
                entry.insert(position);
            } else {
                duplicate_ids.push(record.id.clone());
            }
        }
        if !duplicate_ids.is_empty() {
            warn!(
                table = %self.config.table_key,
                duplicates = duplicate_ids.len(),
                "record identifiers are not unique; edit targeting uses the first occurrence"
            );
        }

        if self.columns.is_empty() {
            self.columns = column::derive_columns(&records);
        }

        let report = LoadReport {
            loaded: records.len(),
            duplicate_ids,
        };
        self.rows = records;
        self.index = index;
        self.load_state = LoadState::Loaded;
        self.page_index = 0;

        info!(
            table = %self.config.table_key,
            loaded = report.loaded,
            "record store refreshed"
        );
        Ok(report)
    }

    /// Current load lifecycle state.
    #[must_use]
    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// Column descriptors in effect (declared or derived).
    #[must_use]
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Number of rows in the unfiltered store.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Looks up a record by identity (first occurrence on duplicates).
    #[must_use]
    pub fn record(&self, id: &RecordId) -> Option<&Record> {
        self.index.get(id).and_then(|&position| self.rows.get(position))
    }

    // -------------------------------------------------------------------
    // Query state
    // -------------------------------------------------------------------

    /// Sets the global search term and resets to the first page.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page_index = 0;
        debug!(table = %self.config.table_key, search = %self.search, "search updated");
    }

    /// Sets (or replaces) the filter on a column and resets to the first
    /// page.
    pub fn set_filter(&mut self, col: impl Into<ColumnId>, filter: ColumnFilter) {
        let col = col.into();
        debug!(table = %self.config.table_key, column = %col, "column filter set");
        self.filters.set(col, filter);
        self.page_index = 0;
    }

    /// Removes the filter on a column.
    pub fn clear_filter(&mut self, col: &str) {
        self.filters.remove(col);
        self.page_index = 0;
    }

    /// Removes all column filters and the global search.
    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.search.clear();
        self.page_index = 0;
    }

    /// Active column filters.
    #[must_use]
    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    /// Sets the sort spec (`None` restores insertion order).
    ///
    /// Requests on columns not declared sortable are ignored.
    pub fn set_sort(&mut self, spec: Option<SortSpec>) {
        if let Some(spec) = &spec {
            if !self.is_sortable(&spec.column) {
                debug!(column = %spec.column, "ignoring sort on unsortable column");
                return;
            }
        }
        self.sort = spec;
    }

    /// Cycles a column's sort: unsorted → ascending → descending.
    ///
    /// Toggling a different column starts ascending there.
    pub fn toggle_sort(&mut self, col: &str) {
        if !self.is_sortable(col) {
            return;
        }
        self.sort = match self.sort.take() {
            Some(spec) if spec.column == col => Some(SortSpec {
                column: spec.column,
                direction: spec.direction.reversed(),
            }),
            _ => Some(SortSpec::ascending(col)),
        };
    }

    fn is_sortable(&self, col: &str) -> bool {
        self.columns
            .iter()
            .find(|descriptor| descriptor.id == col)
            .is_none_or(|descriptor| descriptor.sortable)
    }

    /// Active sort spec.
    #[must_use]
    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    /// Moves to a page; out-of-range indices clamp at view time.
    pub fn set_page(&mut self, page_index: usize) {
        self.page_index = page_index;
    }

    /// Changes the page size (normalised to at least 1); the page index
    /// re-clamps against the new page count at view time.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
    }

    // -------------------------------------------------------------------
    // Views
    // -------------------------------------------------------------------

    /// Filtered and sorted rows, before pagination.
    ///
    /// Recomputed from the unfiltered store on every call; never cached.
    #[must_use]
    pub fn filtered_rows(&self) -> Vec<Record> {
        let filtered = apply_filters(&self.rows, &self.search, &self.filters);
        apply_sort(&filtered, self.sort.as_ref(), &self.columns)
    }

    /// The current page of the filtered/sorted view.
    #[must_use]
    pub fn view(&self) -> Page {
        paginate(&self.filtered_rows(), self.page_index, self.page_size)
    }

    /// Display value of one cell: the staged pending value when present,
    /// the stored value otherwise.
    ///
    /// Keyed by record identity, so the overlay is independent of the
    /// current filter, sort and page state. Unknown records render empty.
    #[must_use]
    pub fn display_value(&self, record: &RecordId, col: &str) -> String {
        if let Some(staged) = self.pending.get(record, col) {
            return staged;
        }
        let Some(row) = self.record(record) else {
            return String::new();
        };
        let raw = row.field(col);
        match self.columns.iter().find(|descriptor| descriptor.id == col) {
            Some(descriptor) => raw.map_or_else(String::new, |raw| descriptor.display(raw)),
            None => raw.map_or_else(String::new, crate::value::display_string),
        }
    }

    /// Exports the current filtered view (visible columns only) as CSV
    /// bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if CSV serialization fails.
    pub fn export_visible_csv(&self) -> Result<Vec<u8>> {
        let rows = self.filtered_rows();
        let columns = column::visible_columns(&self.columns, &self.rows);
        export::export_csv(&rows, &columns)
    }

    /// Builds the sheet addressing layout for the loaded row order, for
    /// sheet-backed commit gateways.
    ///
    /// `first_data_row` is the one-based row of the first record (2 for a
    /// single header row).
    #[must_use]
    pub fn sheet_layout(&self, sheet: impl Into<String>, first_data_row: u32) -> SheetLayout {
        let record_order: Vec<RecordId> = self.rows.iter().map(|row| row.id.clone()).collect();
        let columns = self
            .columns
            .iter()
            .map(|descriptor| descriptor.id.clone())
            .collect();
        SheetLayout::new(sheet, columns, &record_order, first_data_row)
    }

    // -------------------------------------------------------------------
    // Editing
    // -------------------------------------------------------------------

    /// Stages an in-place cell edit into the pending buffer.
    ///
    /// # Errors
    ///
    /// Returns an error when the record is unknown, the column undeclared,
    /// the column read-only, or the buffer cannot be persisted.
    pub fn stage_edit(
        &mut self,
        record: &RecordId,
        col: &str,
        val: impl Into<String>,
    ) -> Result<()> {
        if !self.index.contains_key(record) {
            return Err(Error::RecordNotFound(record.to_string()));
        }
        let descriptor = self
            .columns
            .iter()
            .find(|descriptor| descriptor.id == col)
            .ok_or_else(|| Error::ColumnNotFound(col.to_string()))?;
        if !descriptor.accepts_edits() {
            return Err(Error::ColumnReadonly(col.to_string()));
        }
        self.pending.stage(record, col, val.into())
    }

    /// Stages the same value into every editable selected cell; returns the
    /// number of cells staged.
    ///
    /// Cells whose record vanished or whose column is read-only are skipped
    /// silently — bulk apply is best-effort over the selection.
    ///
    /// # Errors
    ///
    /// Returns an error only when persisting the buffer fails.
    pub fn stage_selection(&mut self, val: &str) -> Result<usize> {
        let cells: Vec<(RecordId, ColumnId)> = self.selection.iter().cloned().collect();
        let mut staged = 0;
        for (record, col) in cells {
            match self.stage_edit(&record, &col, val) {
                Ok(()) => staged += 1,
                Err(Error::RecordNotFound(_) | Error::ColumnNotFound(_) | Error::ColumnReadonly(_)) => {}
                Err(err) => return Err(err),
            }
        }
        debug!(table = %self.config.table_key, staged, "selection bulk-staged");
        Ok(staged)
    }

    /// Discards all staged edits.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the cleared buffer fails.
    pub fn discard_edits(&mut self) -> Result<()> {
        self.pending.clear_all()
    }

    /// Total staged field edits (the count behind every "N pending" badge).
    #[must_use]
    pub fn pending_edit_count(&self) -> usize {
        self.pending.edit_count()
    }

    /// Distinct records with at least one staged edit.
    #[must_use]
    pub fn pending_record_count(&self) -> usize {
        self.pending.record_count()
    }

    /// Handle to the pending buffer, shareable with toolbar components.
    #[must_use]
    pub fn pending(&self) -> Arc<PendingEdits> {
        Arc::clone(&self.pending)
    }

    /// The table's cell selection.
    #[must_use]
    pub fn selection(&self) -> &CellSelection {
        &self.selection
    }

    /// Mutable access to the cell selection.
    pub fn selection_mut(&mut self) -> &mut CellSelection {
        &mut self.selection
    }

    // -------------------------------------------------------------------
    // Committing
    // -------------------------------------------------------------------

    /// Returns true while a bulk commit is in flight.
    #[must_use]
    pub fn is_committing(&self) -> bool {
        self.commit_in_flight
    }

    /// Submits the staged buffer to the gateway as one bulk request.
    ///
    /// Commits are serialized per table: a second call while one is in
    /// flight fails with [`Error::CommitInFlight`]. On transport failure the
    /// buffer is preserved untouched for retry. On an `Ok` outcome, applied
    /// edits leave the buffer while per-item failures remain staged; a cell
    /// re-staged during the flight keeps its newer value for the next
    /// attempt.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CommitInFlight`] on overlap, or the gateway's
    /// transport error.
    pub fn commit_with(&mut self, gateway: &dyn CommitGateway) -> Result<CommitOutcome> {
        if self.commit_in_flight {
            return Err(Error::CommitInFlight);
        }

        let snapshot = self.pending.snapshot();
        if snapshot.is_empty() {
            return Ok(CommitOutcome::default());
        }

        self.commit_in_flight = true;
        let outcome = gateway.commit(&snapshot);
        self.commit_in_flight = false;

        let outcome = outcome?;
        self.pending.absorb(&outcome.results)?;

        info!(
            table = %self.config.table_key,
            submitted = snapshot.len(),
            applied = outcome.success_count,
            failed = outcome.failure_count,
            "bulk commit resolved"
        );
        Ok(outcome)
    }
}
