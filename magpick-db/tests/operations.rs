use magpick_core::{
    BatchRequest, DispatchOptions, LinkField, ReportWriter, SelectMode, run_batch,
};
use magpick_db::*;

fn record(code: &str, links: &[&str]) -> ImportRecord {
    let mut r = ImportRecord::new(code);
    r.links = LinkField::List(links.iter().map(|s| s.to_string()).collect());
    r
}

#[test]
fn upsert_reports_created_updated_unchanged() {
    let conn = open_memory().unwrap();
    let mut r = record("abc-001", &["x"]);
    assert_eq!(r.code, "ABC-001");

    assert_eq!(upsert_record(&conn, &r).unwrap(), UpsertOutcome::Created);
    assert_eq!(upsert_record(&conn, &r).unwrap(), UpsertOutcome::Unchanged);

    r.title = "New Title".to_string();
    assert_eq!(upsert_record(&conn, &r).unwrap(), UpsertOutcome::Updated);

    let found = find_by_code(&conn, "ABC-001").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "New Title");
}

#[test]
fn upsert_replaces_actress_credits() {
    let conn = open_memory().unwrap();
    let mut r = record("ABC-001", &["x"]);
    r.actresses = vec!["Old".to_string()];
    upsert_record(&conn, &r).unwrap();

    r.actresses = vec!["New".to_string()];
    upsert_record(&conn, &r).unwrap();

    assert!(find_by_actress(&conn, "Old").unwrap().is_empty());
    assert_eq!(find_by_actress(&conn, "New").unwrap().len(), 1);
}

#[test]
fn upsert_keeps_insertion_order() {
    let conn = open_memory().unwrap();
    upsert_record(&conn, &record("ABC-002", &["b"])).unwrap();
    upsert_record(&conn, &record("ABC-001", &["a"])).unwrap();
    upsert_record(&conn, &record("ABC-002", &["b2"])).unwrap();

    let codes: Vec<_> = find_by_series(&conn, "abc")
        .unwrap()
        .into_iter()
        .map(|r| r.code)
        .collect();
    assert_eq!(codes, ["ABC-002", "ABC-001"]);
}

#[test]
fn import_counts_and_logs() {
    let mut conn = open_memory().unwrap();
    let records = vec![record("A-1", &["x"]), record("A-2", &["y"])];
    let stats = import_records(&mut conn, "first", &records).unwrap();
    assert_eq!(stats.created, 2);
    assert_eq!(stats.total(), 2);

    let mut changed = records.clone();
    changed[1].links = LinkField::List(vec!["z".into()]);
    let stats = import_records(&mut conn, "second", &changed).unwrap();
    assert_eq!(stats.unchanged, 1);
    assert_eq!(stats.updated, 1);

    let logs = list_import_logs(&conn, Some(10)).unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].source_name, "second");
}

#[test]
fn credit_split_change_is_an_update() {
    let conn = open_memory().unwrap();
    let mut r = record("ABC-001", &["x"]);
    r.actresses = vec!["A, B".to_string()];
    assert_eq!(upsert_record(&conn, &r).unwrap(), UpsertOutcome::Created);

    // Same display string, different credits
    r.actresses = vec!["A".to_string(), "B".to_string()];
    assert_eq!(upsert_record(&conn, &r).unwrap(), UpsertOutcome::Updated);
    assert_eq!(find_by_actress(&conn, "A").unwrap().len(), 1);
    assert_eq!(find_by_actress(&conn, "B").unwrap().len(), 1);
    assert!(find_by_actress(&conn, "A, B").unwrap().is_empty());

    assert_eq!(upsert_record(&conn, &r).unwrap(), UpsertOutcome::Unchanged);
}

#[test]
fn load_export_file_into_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.jsonl");
    std::fs::write(
        &path,
        "{\"fanhao\": \"mism-091\", \"actress\": \"A\", \"magnets\": [\"m-C\"]}\n\
         {\"fanhao\": \"mism-092\", \"magnets\": \"raw-link\"}\n",
    )
    .unwrap();

    let records = load_export(&path).unwrap();
    let mut store = SqliteStore::in_memory().unwrap();
    let stats = import_records(store.conn_mut(), "export.jsonl", &records).unwrap();
    assert_eq!(stats.created, 2);
    assert_eq!(find_by_actress(store.conn(), "A").unwrap()[0].code, "MISM-091");
}

#[test]
fn missing_export_file_is_io_error() {
    let err = load_export(std::path::Path::new("/nonexistent/export.json")).unwrap_err();
    assert!(matches!(err, ExportError::Io { .. }));
}

#[test]
fn batch_over_sqlite_store() {
    let mut store = SqliteStore::in_memory().unwrap();
    let records: Vec<_> = (1..=21)
        .map(|n| record(&format!("ABC-{n:03}"), &["same-link"]))
        .collect();
    import_records(store.conn_mut(), "fixture", &records).unwrap();

    let request = BatchRequest::from_json_str(r#"{"series": ["abc"]}"#).unwrap();
    let mut report = ReportWriter::new(Vec::new());
    let summary = run_batch(
        &store,
        &request,
        &mut report,
        DispatchOptions::new(SelectMode::Full),
        |_| {},
    )
    .unwrap();
    assert_eq!(summary.written, 21);

    let text = String::from_utf8(report.finish().unwrap()).unwrap();
    let expected = format!(
        "abc:\n\n{}\n\n\n\nsame-link\n\n",
        "same-link\n".repeat(20)
    );
    assert_eq!(text, expected);
}

#[test]
fn batch_falls_back_to_raw_link_in_full_mode() {
    let mut store = SqliteStore::in_memory().unwrap();
    let mut r = ImportRecord::new("RAW-001");
    r.links = LinkField::from_json(Some(serde_json::json!("raw-link")));
    import_records(store.conn_mut(), "t", &[r]).unwrap();

    let request = BatchRequest::from_json_str(r#"{"fanhao": ["raw001"]}"#).unwrap();

    let mut report = ReportWriter::new(Vec::new());
    let summary = run_batch(&store, &request, &mut report, DispatchOptions::default(), |_| {})
        .unwrap();
    assert_eq!(summary.fallbacks, 1);
    let text = String::from_utf8(report.finish().unwrap()).unwrap();
    assert_eq!(text, "raw001:\n\nraw-link\n\n");

    let mut report = ReportWriter::new(Vec::new());
    let summary = run_batch(
        &store,
        &request,
        &mut report,
        DispatchOptions::new(SelectMode::SubtitleOnly),
        |_| {},
    )
    .unwrap();
    assert_eq!(summary.written, 0);
    assert_eq!(summary.skipped, 1);
}
