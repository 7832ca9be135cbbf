use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::bookmark::BookmarkWithTags;

/// Column a bookmark query is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    CreatedAt,
    Title,
    Link,
    Id,
}

impl SortKey {
    /// Parses a caller-supplied sort key name. Unknown names are a caller
    /// error, rejected before the store is touched.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "created_at" => Some(SortKey::CreatedAt),
            "title" => Some(SortKey::Title),
            "link" => Some(SortKey::Link),
            "id" => Some(SortKey::Id),
            _ => None,
        }
    }

    /// SQL column backing this sort key.
    pub(crate) fn column(self) -> &'static str {
        match self {
            SortKey::CreatedAt => "created_at",
            SortKey::Title => "title",
            SortKey::Link => "link",
            SortKey::Id => "id",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Descending,
    Ascending,
}

/// Requested result window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageWindow {
    /// Every matching row, no pagination.
    All,
    /// Zero-based page index with a fixed page size.
    Page { index: i64, size: i64 },
}

impl Default for PageWindow {
    fn default() -> Self {
        PageWindow::Page {
            index: 0,
            size: 10,
        }
    }
}

/// One query against the bookmark store: optional title substring, required
/// tag set (intersection semantics), sort key/direction and a page window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuerySpec {
    pub title_filter: Option<String>,
    pub tag_filters: BTreeSet<String>,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
    pub page: PageWindow,
}

/// Ordered, paginated query result plus pre-pagination totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkQueryResponse {
    pub bookmarks: Vec<BookmarkWithTags>,
    pub total_count: i64,
    pub total_pages: i64,
    pub page: i64,
}
