//! Property-based tests for the tag reconciler.
//!
//! The observable contract is a per-pair idempotent upsert/delete with a
//! deterministic end state: for every bookmark in the batch,
//!
//!   after = (before ∪ (add − both)) − (delete − both)
//!
//! where `both` is the set of tags requested for add and delete at once
//! (those are skipped).

use std::collections::BTreeSet;

use linkstash::database::Database;
use linkstash::managers::bookmark_store::{BookmarkStore, BookmarkStoreTrait};
use linkstash::managers::tag_reconciler::{TagReconciler, TagReconcilerTrait};
use linkstash::types::bookmark::BookmarkDraft;
use proptest::prelude::*;

/// Tags drawn from a small alphabet so the add/delete/initial sets overlap.
fn arb_tags() -> impl Strategy<Value = BTreeSet<String>> {
    proptest::collection::btree_set(
        prop_oneof![
            Just("red".to_string()),
            Just("green".to_string()),
            Just("blue".to_string()),
            Just("work".to_string()),
            Just("home".to_string()),
        ],
        0..4,
    )
}

fn expected_end_state(
    before: &BTreeSet<String>,
    add: &BTreeSet<String>,
    delete: &BTreeSet<String>,
) -> BTreeSet<String> {
    let both: BTreeSet<&String> = add.intersection(delete).collect();
    let mut after = before.clone();
    for tag in add {
        if !both.contains(tag) {
            after.insert(tag.clone());
        }
    }
    for tag in delete {
        if !both.contains(tag) {
            after.remove(tag);
        }
    }
    after
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn reconcile_end_state_is_deterministic(
        initial_sets in proptest::collection::vec(arb_tags(), 1..5),
        add in arb_tags(),
        delete in arb_tags(),
    ) {
        let db = Database::open_in_memory()
            .expect("Failed to open in-memory database");
        let mut store = BookmarkStore::new(db.connection());

        let mut ids = Vec::new();
        for (i, tags) in initial_sets.iter().enumerate() {
            let id = store
                .create(&BookmarkDraft::new(format!("https://b{}.example", i)), tags)
                .expect("create should succeed");
            ids.push(id);
        }

        let mut reconciler = TagReconciler::new(db.connection());
        reconciler
            .reconcile(&ids, &add, &delete)
            .expect("reconcile should succeed");

        for (id, before) in ids.iter().zip(&initial_sets) {
            let found = store.get(*id).expect("get should succeed").expect("exists");
            let expected = expected_end_state(before, &add, &delete);
            prop_assert_eq!(
                &found.tags, &expected,
                "bookmark {} started with {:?}, add {:?}, delete {:?}",
                id, before, &add, &delete
            );
        }
    }

    // Applying the same reconcile twice reaches the same end state: every
    // pair operation is idempotent.
    #[test]
    fn reconcile_is_idempotent(
        before in arb_tags(),
        add in arb_tags(),
        delete in arb_tags(),
    ) {
        let db = Database::open_in_memory()
            .expect("Failed to open in-memory database");
        let mut store = BookmarkStore::new(db.connection());
        let id = store
            .create(&BookmarkDraft::new("https://x.example"), &before)
            .expect("create should succeed");

        let mut reconciler = TagReconciler::new(db.connection());
        reconciler.reconcile(&[id], &add, &delete).expect("first pass");
        let first = store.get(id).unwrap().unwrap().tags;

        reconciler.reconcile(&[id], &add, &delete).expect("second pass");
        let second = store.get(id).unwrap().unwrap().tags;

        prop_assert_eq!(first, second);
    }
}
