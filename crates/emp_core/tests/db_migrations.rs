use emp_core::db::migrations::latest_version;
use emp_core::db::{open_db, open_db_in_memory, DbError};
use emp_core::{EmpListQuery, EmpRepository, Gender, NewEmp, SqliteEmpRepository};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "emp");
    let foreign_keys: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(foreign_keys, 1);
}

#[test]
fn reopening_file_database_keeps_rows_and_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("emp.db");

    let id = {
        let conn = open_db(&path).unwrap();
        let repo = SqliteEmpRepository::try_new(&conn).unwrap();
        repo.insert(&NewEmp::new("Tom2", "Tom II", Gender::Male))
            .unwrap()
    };

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let repo = SqliteEmpRepository::try_new(&conn).unwrap();
    let rows = repo.list(&EmpListQuery::default()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, id);
}

#[test]
fn ids_are_not_reused_after_delete() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("emp.db");
    let conn = open_db(&path).unwrap();
    let repo = SqliteEmpRepository::try_new(&conn).unwrap();

    let first = repo
        .insert(&NewEmp::new("first", "First", Gender::Male))
        .unwrap();
    repo.delete(first).unwrap();
    let second = repo
        .insert(&NewEmp::new("second", "Second", Gender::Female))
        .unwrap();

    assert!(second > first);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
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
