use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A saved bookmark row. Timestamps are milliseconds since the UNIX epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: i64,
    pub title: String,
    pub link: String,
    pub icon_link: Option<String>,
    pub created_at: i64,
}

/// Input for creating a bookmark. `title` falls back to the link when absent
/// or blank; `created_at` falls back to the current time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkDraft {
    pub title: Option<String>,
    pub link: String,
    pub icon_link: Option<String>,
    pub created_at: Option<i64>,
}

impl BookmarkDraft {
    pub fn new(link: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_icon_link(mut self, icon_link: impl Into<String>) -> Self {
        self.icon_link = Some(icon_link.into());
        self
    }

    pub fn with_created_at(mut self, created_at: i64) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

/// Partial scalar update. Only supplied fields are written; tags are carried
/// separately because "absent" and "empty set" mean different things there.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkPatch {
    pub title: Option<String>,
    pub link: Option<String>,
    pub icon_link: Option<String>,
}

impl BookmarkPatch {
    /// True when no scalar field is supplied.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.link.is_none() && self.icon_link.is_none()
    }
}

/// A bookmark materialized with its full tag set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmarkWithTags {
    #[serde(flatten)]
    pub bookmark: Bookmark,
    pub tags: BTreeSet<String>,
}
