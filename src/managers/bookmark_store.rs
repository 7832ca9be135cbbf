//! Bookmark Store for linkstash.
//!
//! Implements `BookmarkStoreTrait` — CRUD for bookmark rows transactionally
//! paired with their tag links, backed by SQLite via `rusqlite`.

use std::collections::BTreeSet;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::types::bookmark::{Bookmark, BookmarkDraft, BookmarkPatch, BookmarkWithTags};
use crate::types::errors::StoreError;

/// Trait defining bookmark store operations.
///
/// Every mutating operation spans multiple row-level writes (bookmark row
/// plus tag links) and executes as one transaction: either every write is
/// visible or none are.
pub trait BookmarkStoreTrait {
    /// Creates a bookmark with the given tag set. Returns the new id.
    fn create(&mut self, draft: &BookmarkDraft, tags: &BTreeSet<String>) -> Result<i64, StoreError>;
    /// Updates the supplied scalar fields. `tags: Some(set)` replaces the
    /// full tag set (an empty set clears it); `tags: None` leaves the
    /// existing links untouched.
    fn update(
        &mut self,
        id: i64,
        patch: &BookmarkPatch,
        tags: Option<&BTreeSet<String>>,
    ) -> Result<(), StoreError>;
    /// Removes the bookmark and all its tag links.
    fn delete(&mut self, id: i64) -> Result<(), StoreError>;
    /// Batch delete. Ids that do not exist are skipped, not an error.
    fn delete_many(&mut self, ids: &[i64]) -> Result<(), StoreError>;
    /// Reads one bookmark with its full tag set.
    fn get(&self, id: i64) -> Result<Option<BookmarkWithTags>, StoreError>;
    /// Every distinct tag name currently linked to any bookmark, sorted.
    fn all_tags(&self) -> Result<Vec<String>, StoreError>;
}

/// Bookmark store backed by a SQLite connection.
pub struct BookmarkStore<'a> {
    conn: &'a Connection,
}

impl<'a> BookmarkStore<'a> {
    /// Creates a new `BookmarkStore` using the provided database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Returns the current UNIX timestamp in milliseconds.
    pub(crate) fn now_millis() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64
    }

    /// Reads a single `Bookmark` row into a struct.
    pub(crate) fn row_to_bookmark(row: &rusqlite::Row) -> rusqlite::Result<Bookmark> {
        Ok(Bookmark {
            id: row.get(0)?,
            title: row.get(1)?,
            link: row.get(2)?,
            icon_link: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    fn tags_for(&self, id: i64) -> Result<BTreeSet<String>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT tag_name FROM tags_table WHERE bookmark_id = ?1")?;
        let rows = stmt.query_map(params![id], |row| row.get::<_, String>(0))?;

        let mut tags = BTreeSet::new();
        for row in rows {
            tags.insert(row?);
        }
        Ok(tags)
    }
}

impl<'a> BookmarkStoreTrait for BookmarkStore<'a> {
    fn create(&mut self, draft: &BookmarkDraft, tags: &BTreeSet<String>) -> Result<i64, StoreError> {
        if draft.link.trim().is_empty() {
            return Err(StoreError::Validation("bookmark link is required".into()));
        }

        let title = match &draft.title {
            Some(t) if !t.trim().is_empty() => t.trim().to_string(),
            _ => draft.link.clone(),
        };
        let created_at = draft.created_at.unwrap_or_else(Self::now_millis);

        // Bookmark row and its tag links commit as one unit.
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO bookmarks_table (title, link, icon_link, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![title, draft.link, draft.icon_link, created_at],
        )?;
        let id = tx.last_insert_rowid();

        {
            // INSERT OR IGNORE makes a duplicate tag a silent no-op.
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO tags_table (bookmark_id, tag_name) VALUES (?1, ?2)",
            )?;
            for tag in tags {
                stmt.execute(params![id, tag])?;
            }
        }
        tx.commit()?;

        debug!(id, tag_count = tags.len(), "created bookmark");
        Ok(id)
    }

    fn update(
        &mut self,
        id: i64,
        patch: &BookmarkPatch,
        tags: Option<&BTreeSet<String>>,
    ) -> Result<(), StoreError> {
        if let Some(link) = &patch.link {
            if link.trim().is_empty() {
                return Err(StoreError::Validation("bookmark link is required".into()));
            }
        }

        let tx = self.conn.unchecked_transaction()?;

        if patch.is_empty() {
            // Nothing scalar to write — still distinguish a missing id.
            let found: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM bookmarks_table WHERE id = ?1)",
                params![id],
                |row| row.get(0),
            )?;
            if !found {
                return Err(StoreError::NotFound(id));
            }
        } else {
            let mut assignments: Vec<&str> = Vec::new();
            let mut values: Vec<&dyn rusqlite::ToSql> = Vec::new();
            if let Some(title) = &patch.title {
                assignments.push("title = ?");
                values.push(title);
            }
            if let Some(link) = &patch.link {
                assignments.push("link = ?");
                values.push(link);
            }
            if let Some(icon_link) = &patch.icon_link {
                assignments.push("icon_link = ?");
                values.push(icon_link);
            }
            values.push(&id);

            let sql = format!(
                "UPDATE bookmarks_table SET {} WHERE id = ?",
                assignments.join(", ")
            );
            let affected = tx.execute(&sql, &values[..])?;
            if affected == 0 {
                return Err(StoreError::NotFound(id));
            }
        }

        // Absent tags leave links untouched; a supplied set (even empty)
        // replaces the whole set.
        if let Some(new_tags) = tags {
            tx.execute("DELETE FROM tags_table WHERE bookmark_id = ?1", params![id])?;
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO tags_table (bookmark_id, tag_name) VALUES (?1, ?2)",
            )?;
            for tag in new_tags {
                stmt.execute(params![id, tag])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn delete(&mut self, id: i64) -> Result<(), StoreError> {
        // ON DELETE CASCADE removes the tag links in the same statement.
        let affected = self
            .conn
            .execute("DELETE FROM bookmarks_table WHERE id = ?1", params![id])?;

        if affected == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn delete_many(&mut self, ids: &[i64]) -> Result<(), StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare("DELETE FROM bookmarks_table WHERE id = ?1")?;
            for id in ids {
                // Missing ids delete zero rows; a batch skip is not an error.
                stmt.execute(params![id])?;
            }
        }
        tx.commit()?;

        debug!(count = ids.len(), "batch deleted bookmarks");
        Ok(())
    }

    fn get(&self, id: i64) -> Result<Option<BookmarkWithTags>, StoreError> {
        let bookmark = self
            .conn
            .query_row(
                "SELECT id, title, link, icon_link, created_at FROM bookmarks_table WHERE id = ?1",
                params![id],
                Self::row_to_bookmark,
            )
            .optional()?;

        match bookmark {
            Some(bookmark) => {
                let tags = self.tags_for(id)?;
                Ok(Some(BookmarkWithTags { bookmark, tags }))
            }
            None => Ok(None),
        }
    }

    fn all_tags(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT tag_name FROM tags_table ORDER BY tag_name")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut tags = Vec::new();
        for row in rows {
            tags.push(row?);
        }
        Ok(tags)
    }
}
