use gridlink_driver::{Column, ColumnValue, Conn, DriverRegistry, PrimaryKey, Row, Schema};
use gridlink_sheets::{CsvGridService, MemoryGridService, SpreadsheetDriver, CSV_DRIVER, MEMORY_DRIVER};
use serde_json::json;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("debug")
        .try_init();
}

fn registry(service: MemoryGridService) -> DriverRegistry {
    let registry = DriverRegistry::new();
    registry.register(MEMORY_DRIVER, SpreadsheetDriver::new(service));
    registry
}

fn insert(service: &MemoryGridService, table: &str, values: serde_json::Value) {
    service.insert("book", table, serde_json::from_value(values).unwrap());
}

fn schema(columns: &[&str], key: &[&str]) -> Schema {
    Schema {
        name: "t".to_string(),
        columns: columns
            .iter()
            .enumerate()
            .map(|(position, name)| Column::new(*name, position))
            .collect(),
        primary_key: PrimaryKey::new(key.iter().copied()),
    }
}

async fn open(registry: &DriverRegistry, dsn: &str) -> Box<dyn Conn> {
    registry.open(MEMORY_DRIVER, dsn).await.expect("Open conn")
}

#[tokio::test]
async fn test_scenario_users_table() {
    init_logging();
    let service = MemoryGridService::new();
    insert(&service, "users", json!([["(id)", "name"], ["1", "alice"], ["2", "bob"]]));
    let conn = open(&registry(service), "book").await;

    let schema = conn.get_schema("users").await.unwrap();
    let columns: Vec<_> = schema
        .columns
        .iter()
        .map(|c| (c.name.as_str(), c.ordinal_position))
        .collect();
    assert_eq!(columns, vec![("id", 0), ("name", 1)]);
    assert_eq!(schema.primary_key.column_names, vec!["id"]);

    let rows = conn.get_rows("users").await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].values, Row::from_values([("id", "1"), ("name", "alice")]).values);
    assert_eq!(rows[1].values, Row::from_values([("id", "2"), ("name", "bob")]).values);
    assert_eq!(rows[0].group_by_key["id"], vec![ColumnValue::from("1")]);
    assert_eq!(rows[1].group_by_key["id"], vec![ColumnValue::from("2")]);
}

#[rstest::rstest]
#[case(&["id", "name", "age"], &["id"])]
#[case(&["name", "org", "id"], &["org", "id"])]
#[case(&["a"], &[])]
#[case(&["first name", "last name"], &["last name"])]
#[tokio::test]
async fn test_schema_round_trip(#[case] columns: &[&str], #[case] key: &[&str]) {
    let registry = registry(MemoryGridService::new());
    let conn = open(&registry, "book").await;

    let expected = schema(columns, key);
    conn.set_schema("t", &expected).await.unwrap();
    assert_eq!(conn.get_schema("t").await.unwrap(), expected);
}

#[tokio::test]
async fn test_schema_replaces_previous_header() {
    let service = MemoryGridService::new();
    insert(&service, "t", json!([["(a)", "b", "c", "d", "e"], ["1", "2"]]));
    let conn = open(&registry(service.clone()), "book").await;

    let expected = schema(&["x", "y"], &["y"]);
    conn.set_schema("t", &expected).await.unwrap();
    assert_eq!(conn.get_schema("t").await.unwrap(), expected);
    assert_eq!(
        service.get("book", "t"),
        Some(serde_json::from_value(json!([["x", "(y)"], ["1", "2"]])).unwrap())
    );
}

#[tokio::test]
async fn test_header_offset_excludes_header_row() {
    let service = MemoryGridService::new();
    insert(&service, "t", json!([["h1"], ["id", "name"], ["1", "a"], ["2", "b"]]));
    let conn = open(&registry(service), "book?header_row=1").await;

    let rows = conn.get_rows("t").await.unwrap();
    assert_eq!(rows.len(), 2);
    for row in rows.iter() {
        assert_ne!(row.get("id").unwrap().as_str(), "id");
        assert_ne!(row.get("name").unwrap().as_str(), "name");
    }
}

#[tokio::test]
async fn test_short_rows_read_as_empty() {
    let service = MemoryGridService::new();
    insert(&service, "t", json!([["a", "b", "c"], ["1"], ["1", "2"]]));
    let conn = open(&registry(service), "book").await;

    let rows = conn.get_rows("t").await.unwrap();
    assert_eq!(rows[0].get("b").unwrap().as_str(), "");
    assert_eq!(rows[0].get("c").unwrap().as_str(), "");
    assert_eq!(rows[1].get("c").unwrap().as_str(), "");
    assert!(rows.iter().all(|row| row.values.len() == 3));
}

#[tokio::test]
async fn test_grouping_is_deterministic() {
    let service = MemoryGridService::new();
    insert(
        &service,
        "t",
        json!([["(org)", "name", "(id)"], ["acme", "a", "1"], ["acme", "b"], [], ["x", "c", "9"]]),
    );
    let conn = open(&registry(service), "book").await;

    let rows = conn.get_rows("t").await.unwrap();
    assert_eq!(rows.len(), 4);
    for row in rows.iter() {
        assert_eq!(row.group_by_key.len(), 1);
        assert_eq!(row.group_by_key["org,id"].len(), 2);
    }
}

#[tokio::test]
async fn test_rows_round_trip() {
    init_logging();
    let service = MemoryGridService::new();
    let registry = registry(service);
    let conn = open(&registry, "book?header_row=2").await;

    conn.set_schema("t", &schema(&["id", "name", "email"], &["id"]))
        .await
        .unwrap();

    let rows = vec![
        Row::from_values([("id", "1"), ("name", "alice"), ("email", "alice@example.com")]),
        Row::from_values([("id", "2"), ("name", ""), ("email", "bob@example.com")]),
        Row::from_values([("id", "3"), ("name", "eve"), ("email", "")]),
    ];
    conn.set_rows("t", &rows).await.unwrap();

    let fetched = conn.get_rows("t").await.unwrap();
    let fetched: Vec<_> = fetched.into_iter().map(|row| row.values).collect();
    let expected: Vec<_> = rows.into_iter().map(|row| row.values).collect();
    assert_eq!(fetched, expected);
}

#[tokio::test]
async fn test_rows_round_trip_csv() {
    let dir = tempfile::tempdir().unwrap();
    let registry = DriverRegistry::new();
    registry.register(CSV_DRIVER, SpreadsheetDriver::new(CsvGridService::new(dir.path())));
    let conn = registry.open(CSV_DRIVER, "book").await.unwrap();

    conn.set_schema("users", &schema(&["id", "name"], &["id"]))
        .await
        .unwrap();
    let rows = vec![
        Row::from_values([("id", "1"), ("name", "alice, \"al\" smith")]),
        Row::from_values([("id", "2"), ("name", "bob")]),
    ];
    conn.set_rows("users", &rows).await.unwrap();

    let fetched = conn.get_rows("users").await.unwrap();
    assert_eq!(fetched.len(), 2);
    assert_eq!(fetched[0].values, rows[0].values);
    assert_eq!(fetched[1].values, rows[1].values);
    assert_eq!(fetched[1].group_by_key["id"], vec![ColumnValue::from("2")]);
}

async fn assert_empty_rows_round_trip(conn: &dyn Conn) {
    conn.set_schema("t", &schema(&["id", "name"], &["id"]))
        .await
        .unwrap();
    let rows = vec![
        Row::from_values([("id", "1"), ("name", "a")]),
        Row::from_values([("id", ""), ("name", "")]),
        Row::from_values([("id", ""), ("name", "")]),
    ];
    conn.set_rows("t", &rows).await.unwrap();

    let fetched = conn.get_rows("t").await.unwrap();
    assert_eq!(fetched.len(), rows.len());
    let fetched: Vec<_> = fetched.into_iter().map(|row| row.values).collect();
    let expected: Vec<_> = rows.into_iter().map(|row| row.values).collect();
    assert_eq!(fetched, expected);
}

#[tokio::test]
async fn test_trailing_empty_rows_round_trip() {
    let registry = registry(MemoryGridService::new());
    let conn = open(&registry, "book").await;
    assert_empty_rows_round_trip(conn.as_ref()).await;
}

#[tokio::test]
async fn test_trailing_empty_rows_round_trip_csv() {
    let dir = tempfile::tempdir().unwrap();
    let registry = DriverRegistry::new();
    registry.register(CSV_DRIVER, SpreadsheetDriver::new(CsvGridService::new(dir.path())));
    let conn = registry.open(CSV_DRIVER, "book").await.unwrap();
    assert_empty_rows_round_trip(conn.as_ref()).await;
}
