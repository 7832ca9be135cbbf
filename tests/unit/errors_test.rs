//! Unit tests for linkstash error types.
//!
//! Verifies Display formatting and the rusqlite error mapping.

use linkstash::types::errors::{ImportError, StoreError};
use rstest::rstest;

#[rstest]
#[case(StoreError::Validation("bookmark link is required".into()), "Validation error: bookmark link is required")]
#[case(StoreError::NotFound(42), "Bookmark not found: 42")]
#[case(StoreError::Constraint("UNIQUE constraint failed".into()), "Constraint violation: UNIQUE constraint failed")]
#[case(StoreError::Storage("unable to open database file".into()), "Storage error: unable to open database file")]
fn test_store_error_display(#[case] error: StoreError, #[case] expected: &str) {
    assert_eq!(error.to_string(), expected);
}

#[rstest]
#[case(ImportError::FileRead("no such file".into()), "Import file read error: no such file")]
#[case(ImportError::InvalidFormat("expected object".into()), "Import format error: expected object")]
#[case(ImportError::Storage("disk I/O error".into()), "Import storage error: disk I/O error")]
fn test_import_error_display(#[case] error: ImportError, #[case] expected: &str) {
    assert_eq!(error.to_string(), expected);
}

#[test]
fn test_store_error_implements_error_trait() {
    let err: Box<dyn std::error::Error> = Box::new(StoreError::NotFound(1));
    assert!(err.to_string().contains("not found"));
}

#[test]
fn test_import_error_wraps_store_error() {
    let store_err = StoreError::Storage("database is locked".into());
    let import_err: ImportError = store_err.into();
    match import_err {
        ImportError::Storage(msg) => assert!(msg.contains("database is locked")),
        other => panic!("expected ImportError::Storage, got {:?}", other),
    }
}

#[test]
fn test_constraint_violation_maps_from_rusqlite() {
    // A direct duplicate insert without OR IGNORE must surface as a
    // Constraint error, not a generic Storage error.
    let db = linkstash::database::Database::open_in_memory().expect("open failed");
    let conn = db.connection();
    conn.execute(
        "INSERT INTO bookmarks_table (id, title, link, created_at) VALUES (1, 't', 'l', 0)",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO tags_table (bookmark_id, tag_name) VALUES (1, 'a')",
        [],
    )
    .unwrap();

    let result = conn.execute(
        "INSERT INTO tags_table (bookmark_id, tag_name) VALUES (1, 'a')",
        [],
    );
    let err: StoreError = result.unwrap_err().into();
    match err {
        StoreError::Constraint(_) => {}
        other => panic!("expected Constraint, got {:?}", other),
    }
}
