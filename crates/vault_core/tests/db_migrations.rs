use rusqlite::Connection;
use vault_core::db::migrations::latest_version;
use vault_core::db::{open_db, open_db_in_memory, DbError};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "records");
}

#[test]
fn opening_same_database_twice_is_idempotent_and_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vault.sqlite3");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO records (id, name, value, created_at, updated_at)
             VALUES ('0b7e2c4a-9f1d-4c3e-8a5b-6d2f1e0c9a7b', 'alpha', '1', 1, 1);",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let count: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM records;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn opening_unreachable_path_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-parent").join("vault.sqlite3");

    assert!(matches!(open_db(&path), Err(DbError::Sqlite(_))));
}

#[test]
fn schema_rejects_blank_names_and_inverted_timestamps() {
    let conn = open_db_in_memory().unwrap();

    let blank = conn.execute(
        "INSERT INTO records (id, name, value, created_at, updated_at)
         VALUES ('a', '   ', 'v', 1, 1);",
        [],
    );
    assert!(blank.is_err());

    let inverted = conn.execute(
        "INSERT INTO records (id, name, value, created_at, updated_at)
         VALUES ('b', 'n', 'v', 5, 1);",
        [],
    );
    assert!(inverted.is_err());
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
