//! Tests for the table controller

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{json, Value};

    use crate::column::{ColumnDescriptor, ValueKind};
    use crate::commit::{CellEdit, CommitGateway, CommitOutcome, EditResult, EditStatus};
    use crate::controller::{LoadState, TableConfig, TableController};
    use crate::error::{Error, Result};
    use crate::filter::ColumnFilter;
    use crate::kv::{KvStore, MemoryKvStore};
    use crate::pending::PendingEdits;
    use crate::record::{Record, RecordId};
    use crate::sort::SortSpec;
    use crate::source::RecordSource;

    fn record(id: &str, fields: Value) -> Record {
        let Value::Object(map) = fields else {
            panic!("expected an object literal");
        };
        Record::new(id, map)
    }

    fn policy_rows() -> Vec<Record> {
        vec![
            record(
                "P1",
                json!({"policy_no": "P1", "agent": "A100", "premium": "1,200.50"}),
            ),
            record(
                "P2",
                json!({"policy_no": "P2", "agent": "A200", "premium": "-"}),
            ),
            record(
                "P3",
                json!({"policy_no": "P3", "agent": "A050", "premium": "800"}),
            ),
        ]
    }

    fn policy_columns() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::new("policy_no", "Policy No").with_kind(ValueKind::Readonly),
            ColumnDescriptor::new("agent", "Agent"),
            ColumnDescriptor::new("premium", "Premium").with_kind(ValueKind::Currency),
        ]
    }

    fn controller() -> TableController {
        controller_with_store(&Arc::new(MemoryKvStore::new()))
    }

    fn controller_with_store(store: &Arc<MemoryKvStore>) -> TableController {
        let config = TableConfig::new("policies", "policy_no")
            .with_columns(policy_columns())
            .with_page_size(25);
        let mut table = TableController::open(
            config,
            Arc::<MemoryKvStore>::clone(store) as Arc<dyn KvStore>,
        )
        .unwrap();
        table.load(&policy_rows()).unwrap();
        table
    }

    struct FailingSource;

    impl RecordSource for FailingSource {
        fn fetch_all(&self) -> Result<Vec<Record>> {
            Err(Error::Gateway("connection refused".to_string()))
        }
    }

    struct SuccessGateway;

    impl CommitGateway for SuccessGateway {
        fn commit(&self, edits: &[CellEdit]) -> Result<CommitOutcome> {
            Ok(CommitOutcome::all_applied(edits))
        }
    }

    struct FailingGateway;

    impl CommitGateway for FailingGateway {
        fn commit(&self, _edits: &[CellEdit]) -> Result<CommitOutcome> {
            Err(Error::Gateway("timeout".to_string()))
        }
    }

    /// Applies the first edit, fails the rest per-item.
    struct PartialGateway;

    impl CommitGateway for PartialGateway {
        fn commit(&self, edits: &[CellEdit]) -> Result<CommitOutcome> {
            Ok(CommitOutcome::from_results(
                edits
                    .iter()
                    .enumerate()
                    .map(|(position, edit)| {
                        let status = if position == 0 {
                            EditStatus::Applied
                        } else {
                            EditStatus::RecordNotFound
                        };
                        EditResult::new(edit.clone(), status)
                    })
                    .collect(),
            ))
        }
    }

    /// Stages a newer value for the first submitted cell while the commit is
    /// in flight, then applies everything.
    struct RestagingGateway {
        pending: Arc<PendingEdits>,
        newer_value: String,
    }

    impl CommitGateway for RestagingGateway {
        fn commit(&self, edits: &[CellEdit]) -> Result<CommitOutcome> {
            let first = &edits[0];
            self.pending
                .stage(&first.record, first.column.clone(), self.newer_value.clone())?;
            Ok(CommitOutcome::all_applied(edits))
        }
    }

    struct UnreachableGateway;

    impl CommitGateway for UnreachableGateway {
        fn commit(&self, _edits: &[CellEdit]) -> Result<CommitOutcome> {
            panic!("gateway must not be called for an empty buffer");
        }
    }

    // =========================================================================
    // Loading
    // =========================================================================

    #[test]
    fn test_load_replaces_store_wholesale() {
        let mut table = controller();
        assert_eq!(table.row_count(), 3);
        assert_eq!(*table.load_state(), LoadState::Loaded);

        table.load(&vec![record("P9", json!({"policy_no": "P9"}))]).unwrap();
        assert_eq!(table.row_count(), 1);
        assert!(table.record(&RecordId::new("P1")).is_none());
    }

    #[test]
    fn test_load_failure_blocks_the_table() {
        let mut table = controller();
        let err = table.load(&FailingSource).unwrap_err();
        assert!(matches!(err, Error::LoadFailed(_)));
        assert!(matches!(table.load_state(), LoadState::Failed(_)));
        // No stale rows served as valid.
        assert_eq!(table.row_count(), 0);
        assert!(table.view().rows.is_empty());
    }

    #[test]
    fn test_duplicate_ids_reported_not_fatal() {
        let mut table = controller();
        let report = table
            .load(&vec![
                record("P1", json!({"policy_no": "P1", "agent": "first"})),
                record("P1", json!({"policy_no": "P1", "agent": "second"})),
            ])
            .unwrap();

        assert_eq!(report.loaded, 2);
        assert_eq!(report.duplicate_ids, vec![RecordId::new("P1")]);
        // Both rows are kept and shown.
        assert_eq!(table.row_count(), 2);
        // Identity lookups resolve to the first occurrence.
        assert_eq!(
            table.record(&RecordId::new("P1")).unwrap().display("agent"),
            "first"
        );
    }

    #[test]
    fn test_columns_derived_when_not_declared() {
        let config = TableConfig::new("dynamic", "policy_no");
        let mut table = TableController::open(
            config,
            Arc::new(MemoryKvStore::new()) as Arc<dyn KvStore>,
        )
        .unwrap();
        table.load(&policy_rows()).unwrap();

        let ids: Vec<&str> = table.columns().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["policy_no", "agent", "premium"]);
    }

    // =========================================================================
    // Filtering, sorting, paging through the controller
    // =========================================================================

    #[test]
    fn test_search_filters_the_view() {
        let mut table = controller();
        table.set_search("a100");
        let page = table.view();
        assert_eq!(page.total_records, 1);
        assert_eq!(page.rows[0].id.as_str(), "P1");
    }

    #[test]
    fn test_number_range_filter_on_premium() {
        let mut table = controller();
        table.set_filter("premium", ColumnFilter::number_range(Some(1000.0), None));
        let page = table.view();
        assert_eq!(page.total_records, 1);
        assert_eq!(page.rows[0].id.as_str(), "P1");
    }

    #[test]
    fn test_clear_filters_restores_everything() {
        let mut table = controller();
        table.set_search("a100");
        table.set_filter("premium", ColumnFilter::number_range(Some(1000.0), None));
        table.clear_filters();
        assert_eq!(table.view().total_records, 3);
    }

    #[test]
    fn test_toggle_sort_cycles_direction() {
        let mut table = controller();
        table.toggle_sort("agent");
        assert_eq!(table.sort(), Some(&SortSpec::ascending("agent")));
        let page = table.view();
        assert_eq!(page.rows[0].id.as_str(), "P3"); // A050 first

        table.toggle_sort("agent");
        assert_eq!(table.sort(), Some(&SortSpec::descending("agent")));
        assert_eq!(table.view().rows[0].id.as_str(), "P2"); // A200 first

        table.toggle_sort("premium");
        assert_eq!(table.sort(), Some(&SortSpec::ascending("premium")));
    }

    #[test]
    fn test_page_size_change_reclamps_index() {
        let mut table = controller();
        table.set_page_size(1);
        table.set_page(2);
        assert_eq!(table.view().page_index, 2);

        table.set_page_size(2);
        // Only 2 pages remain; the stale index clamps to the last one.
        let page = table.view();
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.page_index, 1);
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut table = controller();
        table.set_page_size(1);
        table.set_page(2);
        table.set_search("a");
        assert_eq!(table.view().page_index, 0);
    }

    // =========================================================================
    // Pending edits through the controller
    // =========================================================================

    #[test]
    fn test_staged_value_survives_sort_and_filter_churn() {
        // Stage an edit, churn sort/filter/page, and the cell still reads
        // the staged value via its record identity.
        let mut table = controller();
        let p1 = RecordId::new("P1");
        table.stage_edit(&p1, "agent", "A999").unwrap();

        table.set_sort(Some(SortSpec::descending("agent")));
        table.set_filter("premium", ColumnFilter::number_range(Some(1000.0), None));
        table.set_page(5);

        assert_eq!(table.display_value(&p1, "agent"), "A999");
        assert_eq!(table.pending_edit_count(), 1);
    }

    #[test]
    fn test_display_value_falls_back_to_stored() {
        let table = controller();
        let p2 = RecordId::new("P2");
        assert_eq!(table.display_value(&p2, "agent"), "A200");
        // Currency column renders through the canonical coercion.
        assert_eq!(table.display_value(&p2, "premium"), "0.00");
        // Unknown record renders empty.
        assert_eq!(table.display_value(&RecordId::new("P9"), "agent"), "");
    }

    #[test]
    fn test_stage_edit_rejects_unknown_record() {
        let mut table = controller();
        let err = table
            .stage_edit(&RecordId::new("P9"), "agent", "A1")
            .unwrap_err();
        assert!(matches!(err, Error::RecordNotFound(_)));
    }

    #[test]
    fn test_stage_edit_rejects_unknown_column() {
        let mut table = controller();
        let err = table
            .stage_edit(&RecordId::new("P1"), "commission", "5")
            .unwrap_err();
        assert!(matches!(err, Error::ColumnNotFound(_)));
    }

    #[test]
    fn test_stage_edit_rejects_readonly_column() {
        let mut table = controller();
        let err = table
            .stage_edit(&RecordId::new("P1"), "policy_no", "P99")
            .unwrap_err();
        assert!(matches!(err, Error::ColumnReadonly(_)));
    }

    #[test]
    fn test_pending_edits_survive_controller_reopen() {
        let store = Arc::new(MemoryKvStore::new());
        {
            let mut table = controller_with_store(&store);
            table.stage_edit(&RecordId::new("P1"), "agent", "A999").unwrap();
        }
        let table = controller_with_store(&store);
        assert_eq!(table.display_value(&RecordId::new("P1"), "agent"), "A999");
    }

    #[test]
    fn test_stage_selection_bulk_applies_value() {
        let mut table = controller();
        let p1 = RecordId::new("P1");
        let p2 = RecordId::new("P2");
        table.selection_mut().select(&p1, "agent");
        table.selection_mut().select(&p2, "agent");
        table.selection_mut().select(&p1, "policy_no"); // readonly, skipped

        let staged = table.stage_selection("A777").unwrap();
        assert_eq!(staged, 2);
        assert_eq!(table.display_value(&p1, "agent"), "A777");
        assert_eq!(table.display_value(&p2, "agent"), "A777");
        assert_eq!(table.display_value(&p1, "policy_no"), "P1");
    }

    #[test]
    fn test_discard_edits() {
        let mut table = controller();
        table.stage_edit(&RecordId::new("P1"), "agent", "A999").unwrap();
        table.discard_edits().unwrap();
        assert_eq!(table.pending_edit_count(), 0);
        assert_eq!(table.display_value(&RecordId::new("P1"), "agent"), "A100");
    }

    // =========================================================================
    // Bulk commit
    // =========================================================================

    #[test]
    fn test_commit_success_clears_buffer() {
        let mut table = controller();
        table.stage_edit(&RecordId::new("P1"), "agent", "A9").unwrap();
        table.stage_edit(&RecordId::new("P2"), "agent", "B9").unwrap();

        let outcome = table.commit_with(&SuccessGateway).unwrap();
        assert_eq!(outcome.success_count, 2);
        assert_eq!(outcome.failure_count, 0);
        assert_eq!(table.pending_edit_count(), 0);
        assert!(!table.is_committing());
    }

    #[test]
    fn test_commit_transport_failure_preserves_buffer() {
        let mut table = controller();
        table.stage_edit(&RecordId::new("P1"), "agent", "A9").unwrap();
        table.stage_edit(&RecordId::new("P2"), "agent", "B9").unwrap();

        let err = table.commit_with(&FailingGateway).unwrap_err();
        assert!(matches!(err, Error::Gateway(_)));
        assert_eq!(table.pending_edit_count(), 2);
        assert_eq!(table.display_value(&RecordId::new("P1"), "agent"), "A9");
        assert!(!table.is_committing());
    }

    #[test]
    fn test_commit_partial_failure_keeps_failed_edits_staged() {
        let mut table = controller();
        table.stage_edit(&RecordId::new("P1"), "agent", "A9").unwrap();
        table.stage_edit(&RecordId::new("P2"), "agent", "B9").unwrap();

        let outcome = table.commit_with(&PartialGateway).unwrap();
        assert_eq!(outcome.success_count, 1);
        assert_eq!(outcome.failure_count, 1);
        // The failed edit remains staged for retry.
        assert_eq!(table.pending_edit_count(), 1);
        assert_eq!(table.display_value(&RecordId::new("P2"), "agent"), "B9");
    }

    #[test]
    fn test_edit_staged_during_flight_survives_commit() {
        let mut table = controller();
        table.stage_edit(&RecordId::new("P1"), "agent", "A9").unwrap();

        let gateway = RestagingGateway {
            pending: table.pending(),
            newer_value: "A10".to_string(),
        };
        table.commit_with(&gateway).unwrap();

        // The mid-flight value is reflected in the next attempt, not lost.
        assert_eq!(table.pending_edit_count(), 1);
        assert_eq!(table.display_value(&RecordId::new("P1"), "agent"), "A10");
    }

    #[test]
    fn test_commit_with_empty_buffer_skips_gateway() {
        let mut table = controller();
        let outcome = table.commit_with(&UnreachableGateway).unwrap();
        assert!(outcome.is_complete());
        assert!(outcome.results.is_empty());
    }

    // =========================================================================
    // Export and sheet addressing glue
    // =========================================================================

    #[test]
    fn test_export_visible_csv_matches_filtered_view() {
        let mut table = controller();
        table.set_filter("premium", ColumnFilter::number_range(Some(1000.0), None));

        let text = String::from_utf8(table.export_visible_csv().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Policy No,Agent,Premium");
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("P1,"));
    }

    #[test]
    fn test_sheet_layout_follows_loaded_order() {
        let table = controller();
        let layout = table.sheet_layout("Policies", 2);
        let update = layout
            .resolve(&CellEdit::new("P3", "premium", "850"))
            .unwrap();
        assert_eq!(update.column_letter, "C");
        assert_eq!(update.row, 4); // P3 is the third data row
    }
}
