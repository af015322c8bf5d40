use keysafe_core::db::migrations::latest_version;
use keysafe_core::db::{open_db, open_db_in_memory, DbError};
use keysafe_core::{Account, SecretRecord, StoreLocation, VaultStore};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "accounts");
    assert_table_exists(&conn, "records");
}

#[test]
fn foreign_keys_are_enabled_on_open() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}

#[test]
fn records_owner_column_cascades_on_delete() {
    let conn = open_db_in_memory().unwrap();
    let on_delete: String = conn
        .query_row(
            "SELECT on_delete FROM pragma_foreign_key_list('records') WHERE \"from\" = 'owner_id';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(on_delete, "CASCADE");
}

#[test]
fn schema_columns_match_model_fields() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(column_names(&conn, "accounts"), ["id", "login", "credential"]);
    assert_eq!(
        column_names(&conn, "records"),
        ["id", "name", "login", "secret", "owner_id"]
    );
}

#[test]
fn opening_same_database_twice_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keysafe.sqlite3");

    {
        let mut store = VaultStore::open(StoreLocation::File(path.clone())).unwrap();
        let alice = store
            .register(&Account::new("alice", "hash1"))
            .unwrap()
            .unwrap();
        store
            .add_record(&alice, &SecretRecord::new("site1", "u", "p"))
            .unwrap()
            .unwrap();
        store.close().unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    drop(conn);

    let store = VaultStore::open(StoreLocation::File(path)).unwrap();
    let alice = store.authenticate("alice", "hash1").unwrap().unwrap();
    assert_eq!(store.list_records(&alice).unwrap().len(), 1);
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

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn column_names(conn: &Connection, table_name: &str) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid;")
        .unwrap();
    stmt.query_map([table_name], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
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
