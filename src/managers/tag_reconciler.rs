//! Tag Reconciler for linkstash.
//!
//! Applies an add-set and a delete-set of tags across an arbitrary batch of
//! bookmark ids in one transaction.

use std::collections::BTreeSet;

use rusqlite::{params, Connection};
use tracing::{debug, warn};

use crate::types::errors::StoreError;

/// Trait defining the batch tag reconciliation operation.
pub trait TagReconcilerTrait {
    /// For every id, inserts each tag in `to_add` (duplicate links are a
    /// silent no-op) and removes each tag in `to_delete` (absent links are a
    /// silent no-op). A tag present in both sets is skipped so the end state
    /// is deterministic. Ids missing from the store are skipped.
    fn reconcile(
        &mut self,
        ids: &[i64],
        to_add: &BTreeSet<String>,
        to_delete: &BTreeSet<String>,
    ) -> Result<(), StoreError>;
}

/// Tag reconciler backed by a SQLite connection.
pub struct TagReconciler<'a> {
    conn: &'a Connection,
}

impl<'a> TagReconciler<'a> {
    /// Creates a new `TagReconciler` using the provided database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl<'a> TagReconcilerTrait for TagReconciler<'a> {
    fn reconcile(
        &mut self,
        ids: &[i64],
        to_add: &BTreeSet<String>,
        to_delete: &BTreeSet<String>,
    ) -> Result<(), StoreError> {
        let contested: BTreeSet<&String> = to_add.intersection(to_delete).collect();
        if !contested.is_empty() {
            warn!(
                tags = ?contested,
                "tags requested for both add and delete; skipping them"
            );
        }

        let tx = self.conn.unchecked_transaction()?;
        {
            // Ids that no longer exist are a batch skip, not an error. The
            // insert below would otherwise trip the foreign key.
            let mut exists_stmt =
                tx.prepare("SELECT EXISTS(SELECT 1 FROM bookmarks_table WHERE id = ?1)")?;
            let mut insert_stmt = tx.prepare(
                "INSERT OR IGNORE INTO tags_table (bookmark_id, tag_name) VALUES (?1, ?2)",
            )?;
            let mut delete_stmt =
                tx.prepare("DELETE FROM tags_table WHERE bookmark_id = ?1 AND tag_name = ?2")?;

            for id in ids {
                let found: bool = exists_stmt.query_row(params![id], |row| row.get(0))?;
                if !found {
                    continue;
                }
                for tag in to_add {
                    if contested.contains(tag) {
                        continue;
                    }
                    insert_stmt.execute(params![id, tag])?;
                }
                for tag in to_delete {
                    if contested.contains(tag) {
                        continue;
                    }
                    delete_stmt.execute(params![id, tag])?;
                }
            }
        }
        tx.commit()?;

        debug!(
            ids = ids.len(),
            added = to_add.len(),
            deleted = to_delete.len(),
            "reconciled tags"
        );
        Ok(())
    }
}
