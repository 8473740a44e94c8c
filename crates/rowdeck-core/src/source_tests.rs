//! Tests for record sources

#[cfg(test)]
mod tests {
    use crate::record::RecordId;
    use crate::source::{records_from_sheet, RecordSource};
    use serde_json::json;

    fn header() -> Vec<String> {
        vec!["policy_no".to_string(), "agent".to_string(), "premium".to_string()]
    }

    #[test]
    fn test_reconstructs_records_from_header_and_rows() {
        let rows = vec![
            vec![json!("P1"), json!("A100"), json!("1,200.50")],
            vec![json!("P2"), json!("A200"), json!("-")],
        ];
        let records = records_from_sheet(&header(), &rows, "policy_no").unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, RecordId::new("P1"));
        assert_eq!(records[0].display("agent"), "A100");
        assert_eq!(records[1].display("premium"), "-");
        assert_eq!(records[0].column_names(), vec!["policy_no", "agent", "premium"]);
    }

    #[test]
    fn test_short_rows_pad_with_null() {
        let rows = vec![vec![json!("P1"), json!("A100")]];
        let records = records_from_sheet(&header(), &rows, "policy_no").unwrap();
        assert_eq!(records[0].field("premium"), Some(&json!(null)));
    }

    #[test]
    fn test_rows_without_identifier_are_skipped() {
        let rows = vec![
            vec![json!(""), json!("A100"), json!("10")],
            vec![json!("P2"), json!("A200"), json!("20")],
            vec![json!(null), json!("A300"), json!("30")],
        ];
        let records = records_from_sheet(&header(), &rows, "policy_no").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, RecordId::new("P2"));
    }

    #[test]
    fn test_missing_id_column_is_an_error() {
        let rows = vec![vec![json!("P1")]];
        assert!(records_from_sheet(&header(), &rows, "claim_no").is_err());
    }

    #[test]
    fn test_numeric_identifiers_stringify() {
        let rows = vec![vec![json!(1001), json!("A1"), json!(10)]];
        let records = records_from_sheet(&header(), &rows, "policy_no").unwrap();
        assert_eq!(records[0].id.as_str(), "1001");
    }

    #[test]
    fn test_vec_source_fetches_clone() {
        let rows = records_from_sheet(
            &header(),
            &[vec![json!("P1"), json!("A100"), json!(10)]],
            "policy_no",
        )
        .unwrap();
        let fetched = rows.fetch_all().unwrap();
        assert_eq!(fetched, rows);
    }
}
