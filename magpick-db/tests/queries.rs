use magpick_core::{LinkField, Query, RecordStore};
use magpick_db::*;
use serde_json::json;

fn record(code: &str, title: &str, actresses: &[&str], links: &[&str]) -> ImportRecord {
    let mut r = ImportRecord::new(code);
    r.title = title.to_string();
    r.actresses = actresses.iter().map(|s| s.to_string()).collect();
    r.links = LinkField::List(links.iter().map(|s| s.to_string()).collect());
    r
}

fn setup_store() -> SqliteStore {
    let mut store = SqliteStore::in_memory().unwrap();
    let records = vec![
        record("MVSD-164", "Morning Office Story", &["Name One"], &["a-hd", "b-C"]),
        record("MVSD-208", "Late Night", &["Name Two", "Name One"], &["c-fhd"]),
        record("JUFD-948", "Office Party", &["Name Three"], &["d-44x.me"]),
        record("MVSDX-001", "100% Real_Title", &[], &["e"]),
    ];
    import_records(store.conn_mut(), "fixture", &records).unwrap();
    store
}

fn codes(records: Vec<magpick_core::Record>) -> Vec<String> {
    records.into_iter().map(|r| r.code).collect()
}

#[test]
fn exact_code_lookup() {
    let store = setup_store();
    let found = find_by_code(store.conn(), "JUFD-948").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "Office Party");
    assert_eq!(found[0].actress, "Name Three");
    assert_eq!(found[0].links, LinkField::List(vec!["d-44x.me".into()]));
}

#[test]
fn exact_code_lookup_is_case_sensitive() {
    let store = setup_store();
    assert!(find_by_code(store.conn(), "jufd-948").unwrap().is_empty());
}

#[test]
fn series_lookup_is_case_insensitive_prefix() {
    let store = setup_store();
    assert_eq!(
        codes(find_by_series(store.conn(), "mvsd").unwrap()),
        ["MVSD-164", "MVSD-208", "MVSDX-001"]
    );
    assert_eq!(
        codes(find_by_series(store.conn(), "MVSD-").unwrap()),
        ["MVSD-164", "MVSD-208"]
    );
    assert!(find_by_series(store.conn(), "164").unwrap().is_empty());
}

#[test]
fn title_lookup_is_case_insensitive_substring() {
    let store = setup_store();
    assert_eq!(
        codes(find_by_title(store.conn(), "office").unwrap()),
        ["MVSD-164", "JUFD-948"]
    );
}

#[test]
fn like_wildcards_in_terms_are_literal() {
    let store = setup_store();
    assert_eq!(
        codes(find_by_title(store.conn(), "100%").unwrap()),
        ["MVSDX-001"]
    );
    assert_eq!(
        codes(find_by_title(store.conn(), "l_T").unwrap()),
        ["MVSDX-001"]
    );
    assert!(find_by_title(store.conn(), "e_P").unwrap().is_empty());
    assert!(find_by_series(store.conn(), "_VSD").unwrap().is_empty());
}

#[test]
fn actress_lookup_matches_any_credit() {
    let store = setup_store();
    assert_eq!(
        codes(find_by_actress(store.conn(), "Name One").unwrap()),
        ["MVSD-164", "MVSD-208"]
    );
    assert!(find_by_actress(store.conn(), "name one").unwrap().is_empty());
    assert!(find_by_actress(store.conn(), "Name").unwrap().is_empty());
}

#[test]
fn store_trait_dispatches_queries() {
    let store = setup_store();
    let found = store.lookup(&Query::ExactCode("MVSD-208".into())).unwrap();
    assert_eq!(found[0].actress, "Name Two, Name One");
    assert_eq!(
        store
            .lookup(&Query::SeriesPrefix("jufd".into()))
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn missing_and_malformed_links_round_trip() {
    let mut store = SqliteStore::in_memory().unwrap();
    let mut missing = ImportRecord::new("NOL-001");
    missing.links = LinkField::Missing;
    let mut malformed = ImportRecord::new("BAD-001");
    malformed.links = LinkField::from_json(Some(json!({"hd": "magnet:?xt=x"})));
    import_records(store.conn_mut(), "t", &[missing, malformed]).unwrap();

    let found = find_by_code(store.conn(), "NOL-001").unwrap();
    assert_eq!(found[0].links, LinkField::Missing);

    let found = find_by_code(store.conn(), "BAD-001").unwrap();
    assert!(matches!(found[0].links, LinkField::Malformed(_)));
    assert_eq!(found[0].links.first_raw().as_deref(), Some("magnet:?xt=x"));
}

#[test]
fn stats_and_import_logs() {
    let store = setup_store();
    let stats = store_stats(store.conn()).unwrap();
    assert_eq!(stats.records, 4);
    assert_eq!(stats.with_links, 4);
    assert_eq!(stats.without_links, 0);
    assert_eq!(stats.actresses, 3);
    assert_eq!(stats.imports, 1);

    let logs = list_import_logs(store.conn(), None).unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].source_name, "fixture");
    assert_eq!(logs[0].records_created, 4);
}
