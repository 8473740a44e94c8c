//! Column descriptors: per-column metadata declared once per table session.

use serde_json::Value;

use crate::record::Record;
use crate::value;

/// Identifier of a column within a table (the record field name).
pub type ColumnId = String;

/// Formats a raw scalar into its display string.
pub type Formatter = fn(&Value) -> String;

/// Decides whether a column is shown, based on the sampled data set.
pub type VisibilityPredicate = fn(&[Record]) -> bool;

/// The value kind of a column, driving comparison and rendering behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Free-form text (default).
    #[default]
    Text,
    /// Plain numeric value.
    Number,
    /// Calendar date.
    Date,
    /// One of a fixed set of options.
    Select,
    /// Short status label rendered as a badge.
    Badge,
    /// Monetary amount; compared numerically, rendered with two decimals.
    Currency,
    /// Never editable, regardless of the editable flag.
    Readonly,
}

impl ValueKind {
    /// Returns true for kinds compared numerically when sorting.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Number | Self::Currency)
    }
}

/// Static (or sampled) metadata about one column across all records.
///
/// Descriptors are immutable for the duration of a table session.
#[derive(Debug, Clone)]
pub struct ColumnDescriptor {
    /// Column id, matching the record field name.
    pub id: ColumnId,
    /// Human-readable header label.
    pub label: String,
    /// Value kind.
    pub kind: ValueKind,
    /// Whether cells in this column accept staged edits.
    pub editable: bool,
    /// Whether the column can drive sorting.
    pub sortable: bool,
    /// Fixed option set for `Select` columns; empty otherwise.
    pub options: Vec<String>,
    /// Optional display formatter overriding the kind-based rendering.
    pub formatter: Option<Formatter>,
    /// Optional predicate hiding the column depending on sampled data.
    pub visible_when: Option<VisibilityPredicate>,
}

impl ColumnDescriptor {
    /// Creates an editable, sortable text column.
    #[must_use]
    pub fn new(id: impl Into<ColumnId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: ValueKind::Text,
            editable: true,
            sortable: true,
            options: Vec::new(),
            formatter: None,
            visible_when: None,
        }
    }

    /// Sets the value kind.
    #[must_use]
    pub fn with_kind(mut self, kind: ValueKind) -> Self {
        self.kind = kind;
        self
    }

    /// Marks the column read-only.
    #[must_use]
    pub fn readonly(mut self) -> Self {
        self.editable = false;
        self
    }

    /// Disables sorting on the column.
    #[must_use]
    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    /// Declares the fixed option set of a `Select` column.
    #[must_use]
    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.kind = ValueKind::Select;
        self.options = options;
        self
    }

    /// Overrides the display rendering with a custom formatter.
    #[must_use]
    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Hides the column unless the predicate holds for the sampled rows.
    #[must_use]
    pub fn visible_when(mut self, predicate: VisibilityPredicate) -> Self {
        self.visible_when = Some(predicate);
        self
    }

    /// Returns true if cells in this column accept staged edits.
    #[must_use]
    pub fn accepts_edits(&self) -> bool {
        self.editable && self.kind != ValueKind::Readonly
    }

    /// Renders a raw scalar for display in this column.
    ///
    /// The explicit formatter wins; `Currency` columns render with two
    /// decimals via the canonical numeric coercion; everything else uses the
    /// plain display string.
    #[must_use]
    pub fn display(&self, raw: &Value) -> String {
        if let Some(formatter) = self.formatter {
            return formatter(raw);
        }
        match self.kind {
            ValueKind::Currency => format!("{:.2}", value::to_number(raw)),
            _ => value::display_string(raw),
        }
    }
}

/// Derives descriptors dynamically from the sampled data set.
///
/// Uses the first record's key order; every derived column is an editable,
/// sortable text column. Tables with richer semantics declare descriptors
/// statically instead.
#[must_use]
pub fn derive_columns(rows: &[Record]) -> Vec<ColumnDescriptor> {
    rows.first().map_or_else(Vec::new, |first| {
        first
            .fields
            .keys()
            .map(|name| ColumnDescriptor::new(name.clone(), name.clone()))
            .collect()
    })
}

/// Applies visibility predicates against the sampled rows.
#[must_use]
pub fn visible_columns(columns: &[ColumnDescriptor], rows: &[Record]) -> Vec<ColumnDescriptor> {
    columns
        .iter()
        .filter(|column| column.visible_when.is_none_or(|predicate| predicate(rows)))
        .cloned()
        .collect()
}
