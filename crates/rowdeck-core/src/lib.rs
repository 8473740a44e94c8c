//! # `RowDeck` Core
//!
//! Client-side tabular data engine for back-office applications.
//!
//! `RowDeck` backs spreadsheet-like MIS tables: it holds an already-fetched
//! row collection in memory and provides global text search, per-column
//! filtering, stable sorting, pagination, and an optimistic pending-edit
//! buffer that stages cell-level changes until a bulk commit flushes them to
//! a remote store (REST bulk-update endpoint or spreadsheet batch write).
//!
//! ## Features
//!
//! - **Schema-agnostic rows**: records are open key→scalar maps; columns are
//!   declared once per table or sampled from the data
//! - **Pure pipeline**: filter → sort → paginate, recomputed per view, never
//!   mutated in place
//! - **Durable staging**: pending edits persist through a storage-backed
//!   key-value store and survive a page reload
//! - **Safe bulk commit**: serialized per table, per-item failure reporting,
//!   buffer preserved on transport failure
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rowdeck_core::{
//!     ColumnFilter, FileKvStore, TableConfig, TableController,
//! };
//!
//! let store = Arc::new(FileKvStore::open("./rowdeck_state")?);
//! let config = TableConfig::new("policies", "policy_no");
//! let mut table = TableController::open(config, store)?;
//!
//! table.load(&policy_source)?;
//! table.set_search("a100");
//! table.set_filter("premium", ColumnFilter::number_range(Some(1000.0), None));
//!
//! let page = table.view();
//! table.stage_edit(&"P1".into(), "agent", "A999")?;
//! let outcome = table.commit_with(&rest_gateway)?;
//! println!("{}", outcome.summary());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]

pub mod column;
pub mod commit;
pub mod config;
pub mod controller;
#[cfg(test)]
mod controller_tests;
pub mod error;
#[cfg(test)]
mod error_tests;
pub mod export;
pub mod filter;
pub mod kv;
pub mod page;
pub mod pending;
pub mod record;
pub mod selection;
pub mod sheet;
pub mod sort;
pub mod source;
#[cfg(test)]
mod source_tests;
pub mod value;

pub use column::{derive_columns, visible_columns, ColumnDescriptor, ColumnId, ValueKind};
pub use commit::{CellEdit, CommitGateway, CommitOutcome, EditResult, EditStatus};
pub use config::{ConfigError, DeckConfig, LoggingConfig, StorageConfig, TableDefaultsConfig};
pub use controller::{LoadReport, LoadState, TableConfig, TableController};
pub use error::{Error, Result};
pub use export::export_csv;
pub use filter::{apply_filters, ColumnFilter, FilterSet};
pub use kv::{FileKvStore, KvStore, MemoryKvStore};
pub use page::{paginate, Page};
pub use pending::PendingEdits;
pub use record::{Record, RecordId};
pub use selection::CellSelection;
pub use sheet::{column_letter, plan_sheet_updates, SheetCellUpdate, SheetLayout};
pub use sort::{apply_sort, SortDirection, SortSpec};
pub use source::{records_from_sheet, RecordSource};
