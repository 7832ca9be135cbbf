//! Unit tests for the linkstash database layer (connection + migrations).

use linkstash::database::{migrations, Database};

#[test]
fn test_open_in_memory_succeeds() {
    let db = Database::open_in_memory();
    assert!(db.is_ok(), "open_in_memory should succeed");
}

#[test]
fn test_migrations_create_all_tables() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    let expected_tables = ["bookmarks_table", "tags_table", "schema_version"];

    for table in &expected_tables {
        let exists: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name=?1",
                [table],
                |row| row.get(0),
            )
            .unwrap_or(false);
        assert!(exists, "Table '{}' should exist after migrations", table);
    }
}

#[test]
fn test_migrations_create_indexes() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    let expected_indexes = ["idx_tags_tag_name", "idx_bookmarks_created_at"];

    for index in &expected_indexes {
        let exists: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='index' AND name=?1",
                [index],
                |row| row.get(0),
            )
            .unwrap_or(false);
        assert!(exists, "Index '{}' should exist after migrations", index);
    }
}

#[test]
fn test_schema_version_recorded() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let version = migrations::get_schema_version(db.connection());
    assert_eq!(version, migrations::CURRENT_SCHEMA_VERSION);
}

#[test]
fn test_foreign_keys_enabled() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let enabled: bool = db
        .connection()
        .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
        .expect("pragma query failed");
    assert!(enabled, "foreign_keys pragma should be on");
}

#[test]
fn test_tag_link_requires_existing_bookmark() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let result = db.connection().execute(
        "INSERT INTO tags_table (bookmark_id, tag_name) VALUES (999, 'orphan')",
        [],
    );
    assert!(result.is_err(), "orphan tag link must be rejected");
}

#[test]
fn test_migrations_idempotent_on_reopen() {
    let dir = tempfile::tempdir().expect("tempdir failed");
    let path = dir.path().join("linkstash.db");

    {
        let db = Database::open(&path).expect("first open failed");
        db.connection()
            .execute(
                "INSERT INTO bookmarks_table (title, link, created_at) VALUES ('t', 'l', 0)",
                [],
            )
            .unwrap();
    }

    // Reopening runs migrations again; data and version must survive.
    let db = Database::open(&path).expect("second open failed");
    let count: i64 = db
        .connection()
        .query_row("SELECT COUNT(*) FROM bookmarks_table", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(
        migrations::get_schema_version(db.connection()),
        migrations::CURRENT_SCHEMA_VERSION
    );
}

#[test]
fn test_open_bad_path_is_storage_error() {
    let result = Database::open("/this/path/does/not/exist/linkstash.db");
    assert!(result.is_err());
}
