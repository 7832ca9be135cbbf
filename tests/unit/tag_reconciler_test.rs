//! Unit tests for the TagReconciler batch operation.

use std::collections::BTreeSet;

use linkstash::database::Database;
use linkstash::managers::bookmark_store::{BookmarkStore, BookmarkStoreTrait};
use linkstash::managers::tag_reconciler::{TagReconciler, TagReconcilerTrait};
use linkstash::types::bookmark::BookmarkDraft;

fn setup() -> Database {
    Database::open_in_memory().expect("Failed to open in-memory database")
}

fn tags(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn create(db: &Database, link: &str, initial: &[&str]) -> i64 {
    let mut store = BookmarkStore::new(db.connection());
    store
        .create(&BookmarkDraft::new(link), &tags(initial))
        .unwrap()
}

fn tags_of(db: &Database, id: i64) -> BTreeSet<String> {
    let store = BookmarkStore::new(db.connection());
    store.get(id).unwrap().unwrap().tags
}

/// Add-set and delete-set apply independently across the batch: every id
/// gains "x"; only the id that carried "y" loses it, the other is a no-op.
#[test]
fn test_reconcile_add_and_delete_independence() {
    let db = setup();
    let one = create(&db, "https://one.example", &["y"]);
    let two = create(&db, "https://two.example", &[]);

    let mut reconciler = TagReconciler::new(db.connection());
    reconciler
        .reconcile(&[one, two], &tags(&["x"]), &tags(&["y"]))
        .unwrap();

    assert_eq!(tags_of(&db, one), tags(&["x"]));
    assert_eq!(tags_of(&db, two), tags(&["x"]));
}

#[test]
fn test_reconcile_duplicate_add_is_noop() {
    let db = setup();
    let id = create(&db, "https://x.example", &["a"]);

    let mut reconciler = TagReconciler::new(db.connection());
    reconciler
        .reconcile(&[id], &tags(&["a"]), &tags(&[]))
        .unwrap();
    reconciler
        .reconcile(&[id], &tags(&["a"]), &tags(&[]))
        .unwrap();

    let count: i64 = db
        .connection()
        .query_row(
            "SELECT COUNT(*) FROM tags_table WHERE bookmark_id = ?1 AND tag_name = 'a'",
            [id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn test_reconcile_delete_absent_tag_is_noop() {
    let db = setup();
    let id = create(&db, "https://x.example", &["a"]);

    let mut reconciler = TagReconciler::new(db.connection());
    reconciler
        .reconcile(&[id], &tags(&[]), &tags(&["never-there"]))
        .unwrap();

    assert_eq!(tags_of(&db, id), tags(&["a"]));
}

/// A tag requested for both add and delete is skipped entirely, so the end
/// state is deterministic: carriers keep it, non-carriers never gain it.
#[test]
fn test_reconcile_tag_in_both_sets_is_skipped() {
    let db = setup();
    let carrier = create(&db, "https://carrier.example", &["both"]);
    let clean = create(&db, "https://clean.example", &[]);

    let mut reconciler = TagReconciler::new(db.connection());
    reconciler
        .reconcile(&[carrier, clean], &tags(&["both", "x"]), &tags(&["both"]))
        .unwrap();

    assert_eq!(tags_of(&db, carrier), tags(&["both", "x"]));
    assert_eq!(tags_of(&db, clean), tags(&["x"]));
}

#[test]
fn test_reconcile_skips_missing_ids() {
    let db = setup();
    let id = create(&db, "https://x.example", &[]);

    let mut reconciler = TagReconciler::new(db.connection());
    reconciler
        .reconcile(&[id, 999], &tags(&["t"]), &tags(&[]))
        .unwrap();

    assert_eq!(tags_of(&db, id), tags(&["t"]));
    // The missing id must not have produced an orphan link.
    let orphans: i64 = db
        .connection()
        .query_row(
            "SELECT COUNT(*) FROM tags_table WHERE bookmark_id = 999",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(orphans, 0);
}

#[test]
fn test_reconcile_large_batch() {
    let db = setup();
    let ids: Vec<i64> = (0..500)
        .map(|i| create(&db, &format!("https://bulk{}.example", i), &["old"]))
        .collect();

    let mut reconciler = TagReconciler::new(db.connection());
    reconciler
        .reconcile(&ids, &tags(&["new-a", "new-b"]), &tags(&["old"]))
        .unwrap();

    for id in [ids[0], ids[250], ids[499]] {
        assert_eq!(tags_of(&db, id), tags(&["new-a", "new-b"]));
    }
}
