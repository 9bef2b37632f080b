use enotes_core::db::migrations::{apply_migrations, latest_version};
use enotes_core::db::{ensure_blob_schema, open_db, open_db_in_memory, DbError, BLOB_TABLE};
use enotes_core::{BlobError, BlobStore, SqliteBlobStore};
use rusqlite::Connection;

fn user_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn blob_columns(conn: &Connection) -> Vec<(String, String, bool)> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({BLOB_TABLE});"))
        .unwrap();
    stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, i64>(3)? == 1,
        ))
    })
    .unwrap()
    .collect::<Result<Vec<_>, _>>()
    .unwrap()
}

#[test]
fn fresh_database_is_at_schema_one_with_blob_columns() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(latest_version(), 1);
    assert_eq!(user_version(&conn), 1);
    assert_eq!(
        blob_columns(&conn),
        vec![
            ("key".to_string(), "TEXT".to_string(), true),
            ("value".to_string(), "TEXT".to_string(), true),
            ("updated_at".to_string(), "INTEGER".to_string(), true),
        ]
    );
    ensure_blob_schema(&conn).unwrap();
}

#[test]
fn applying_migrations_again_is_a_no_op() {
    let mut conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO blobs (key, value, updated_at) VALUES ('notes', '[]', 1);",
        [],
    )
    .unwrap();

    apply_migrations(&mut conn).unwrap();

    let value: String = conn
        .query_row("SELECT value FROM blobs WHERE key = 'notes';", [], |row| row.get(0))
        .unwrap();
    assert_eq!(value, "[]");
}

#[test]
fn upsert_survives_reopen_and_stamps_updated_at() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blobs.sqlite3");

    {
        let mut store = SqliteBlobStore::open(&path).unwrap();
        store.set("notes", "[]").unwrap();
        store.set("notes", r#"[{"id":1}]"#).unwrap();
    }

    let mut reopened = SqliteBlobStore::open(&path).unwrap();
    assert_eq!(reopened.get("notes").unwrap().as_deref(), Some(r#"[{"id":1}]"#));
    reopened.set("notes", r#"[{"id":2}]"#).unwrap();
    drop(reopened);

    let raw = Connection::open(&path).unwrap();
    let (rows, updated_at): (i64, i64) = raw
        .query_row(
            "SELECT COUNT(*), MAX(updated_at) FROM blobs WHERE key = 'notes';",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(rows, 1);
    assert!(updated_at > 1_600_000_000_000, "updated_at should be epoch millis");
}

#[test]
fn database_from_newer_build_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("newer.sqlite3");
    Connection::open(&path)
        .unwrap()
        .execute_batch(&format!("PRAGMA user_version = {};", latest_version() + 1))
        .unwrap();

    assert!(matches!(
        SqliteBlobStore::open(&path),
        Err(DbError::UnsupportedSchemaVersion { db_version: 2, latest_supported: 1 })
    ));
}

#[test]
fn wrapping_connection_checks_blob_columns() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("CREATE TABLE blobs (key TEXT PRIMARY KEY, value TEXT NOT NULL);")
        .unwrap();

    let err = SqliteBlobStore::try_new(conn).unwrap_err();
    assert!(matches!(
        err,
        BlobError::Db(DbError::MissingSchema {
            column: Some("updated_at"),
            ..
        })
    ));

    let migrated = SqliteBlobStore::try_new(open_db(":memory:").unwrap()).unwrap();
    assert_eq!(migrated.get("notes").unwrap(), None);
}
