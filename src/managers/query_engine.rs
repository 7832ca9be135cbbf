//! Query Engine for linkstash.
//!
//! Resolves a [`QuerySpec`] — title substring, required tag set, sort key
//! and page window — into an ordered, paginated result with pre-pagination
//! totals. The read path has no side effects.

use std::collections::{BTreeMap, BTreeSet};

use rusqlite::{params_from_iter, Connection, ToSql};

use crate::managers::bookmark_store::BookmarkStore;
use crate::types::bookmark::BookmarkWithTags;
use crate::types::errors::StoreError;
use crate::types::query::{BookmarkQueryResponse, PageWindow, QuerySpec, SortDirection};

/// Trait defining the bookmark query operation.
pub trait QueryEngineTrait {
    fn run(&self, spec: &QuerySpec) -> Result<BookmarkQueryResponse, StoreError>;
}

/// Query engine backed by a SQLite connection.
pub struct QueryEngine<'a> {
    conn: &'a Connection,
}

impl<'a> QueryEngine<'a> {
    /// Creates a new `QueryEngine` using the provided database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Builds the WHERE clause shared by the count and page queries.
    ///
    /// Title matching is a case-insensitive substring. Each requested tag
    /// must be carried by the bookmark, where "carried" is lenient: the
    /// bookmark's tag matches if it equals the requested name or contains
    /// it as a substring (case-insensitive).
    fn build_filter(spec: &QuerySpec) -> (String, Vec<String>) {
        let mut clauses: Vec<String> = Vec::new();
        let mut args: Vec<String> = Vec::new();

        if let Some(title) = &spec.title_filter {
            if !title.is_empty() {
                clauses.push("instr(lower(b.title), lower(?)) > 0".to_string());
                args.push(title.clone());
            }
        }

        for tag in &spec.tag_filters {
            clauses.push(
                "EXISTS (SELECT 1 FROM tags_table t \
                 WHERE t.bookmark_id = b.id AND instr(lower(t.tag_name), lower(?)) > 0)"
                    .to_string(),
            );
            args.push(tag.clone());
        }

        if clauses.is_empty() {
            (String::new(), args)
        } else {
            (format!(" WHERE {}", clauses.join(" AND ")), args)
        }
    }

    /// Loads and folds the tag links for one page of bookmark ids.
    fn tags_for_ids(&self, ids: &[i64]) -> Result<BTreeMap<i64, BTreeSet<String>>, StoreError> {
        let mut folded: BTreeMap<i64, BTreeSet<String>> = BTreeMap::new();
        if ids.is_empty() {
            return Ok(folded);
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT bookmark_id, tag_name FROM tags_table WHERE bookmark_id IN ({})",
            placeholders
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(ids.iter()), |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (id, tag) = row?;
            folded.entry(id).or_default().insert(tag);
        }
        Ok(folded)
    }
}

impl<'a> QueryEngineTrait for QueryEngine<'a> {
    fn run(&self, spec: &QuerySpec) -> Result<BookmarkQueryResponse, StoreError> {
        // Caller errors are rejected before the store is touched.
        if let PageWindow::Page { index, size } = spec.page {
            if index < 0 {
                return Err(StoreError::Validation(format!(
                    "negative page index: {}",
                    index
                )));
            }
            if size <= 0 {
                return Err(StoreError::Validation(format!(
                    "page size must be positive: {}",
                    size
                )));
            }
        }

        let (where_sql, args) = Self::build_filter(spec);

        let count_sql = format!("SELECT COUNT(*) FROM bookmarks_table b{}", where_sql);
        let total_count: i64 = self.conn.query_row(
            &count_sql,
            params_from_iter(args.iter()),
            |row| row.get(0),
        )?;

        let direction = match spec.sort_direction {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        };
        // Ties broken by id ascending so page boundaries are deterministic.
        let order_sql = format!(
            " ORDER BY b.{} {}, b.id ASC",
            spec.sort_key.column(),
            direction
        );

        let (page_sql, total_pages, page_index) = match spec.page {
            PageWindow::All => (String::new(), 1, 0),
            PageWindow::Page { index, size } => (
                format!(" LIMIT {} OFFSET {}", size, size * index),
                (total_count + size - 1) / size,
                index,
            ),
        };

        let select_sql = format!(
            "SELECT b.id, b.title, b.link, b.icon_link, b.created_at FROM bookmarks_table b{}{}{}",
            where_sql, order_sql, page_sql
        );
        let mut stmt = self.conn.prepare(&select_sql)?;
        let params: Vec<&dyn ToSql> = args.iter().map(|a| a as &dyn ToSql).collect();
        let rows = stmt.query_map(&params[..], BookmarkStore::row_to_bookmark)?;

        let mut bookmarks_only = Vec::new();
        for row in rows {
            bookmarks_only.push(row?);
        }

        // Fold the tag links into one record per bookmark; a bookmark with
        // zero tags still appears exactly once, with an empty set.
        let ids: Vec<i64> = bookmarks_only.iter().map(|b| b.id).collect();
        let mut tag_map = self.tags_for_ids(&ids)?;

        let bookmarks = bookmarks_only
            .into_iter()
            .map(|bookmark| {
                let tags = tag_map.remove(&bookmark.id).unwrap_or_default();
                BookmarkWithTags { bookmark, tags }
            })
            .collect();

        Ok(BookmarkQueryResponse {
            bookmarks,
            total_count,
            total_pages,
            page: page_index,
        })
    }
}
