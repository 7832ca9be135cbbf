//! Import Transformer for linkstash.
//!
//! Walks an externally supplied hierarchical bookmark tree (browser JSON
//! export) depth-first and creates one flat bookmark per leaf, tagged with
//! the titles of every enclosing folder. The synthetic root's own title is
//! never applied as a tag.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rusqlite::Connection;
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::managers::bookmark_store::{BookmarkStore, BookmarkStoreTrait};
use crate::types::bookmark::BookmarkDraft;
use crate::types::errors::{ImportError, StoreError};
use crate::types::import::{ImportEvent, ImportLeaf, ImportReport, SkippedNode};

/// Receives lifecycle notifications while an import runs.
///
/// The transformer calls this synchronously from the walk; implementations
/// should hand the event off rather than block.
pub trait ImportObserver {
    fn on_event(&self, event: &ImportEvent);
}

/// Observer that discards every event.
pub struct NoopObserver;

impl ImportObserver for NoopObserver {
    fn on_event(&self, _event: &ImportEvent) {}
}

/// Shared cancellation flag for a long-running import.
///
/// Cloning yields a handle to the same flag, so the host can keep one side
/// and hand the other to the transformer. Bookmarks committed before the
/// cancel stay committed.
#[derive(Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Computes the tag set for a folder's children: the parent set plus the
/// folder's trimmed title. A blank title contributes nothing. Returns a new
/// set; the parent set is never mutated, so sibling subtrees cannot observe
/// each other's accumulation.
pub fn accumulate(parent_tags: &BTreeSet<String>, folder_title: &str) -> BTreeSet<String> {
    let mut child_tags = parent_tags.clone();
    let trimmed = folder_title.trim();
    if !trimmed.is_empty() {
        child_tags.insert(trimmed.to_string());
    }
    child_tags
}

/// Interpreted shape of one tree node. A node is exclusively a leaf or a
/// folder; anything else is malformed input and gets skipped.
enum NodeShape<'v> {
    Leaf(ImportLeaf),
    Folder { title: String, children: &'v Vec<Value> },
    Malformed(String),
}

fn classify(node: &Value) -> NodeShape<'_> {
    let obj = match node.as_object() {
        Some(obj) => obj,
        None => return NodeShape::Malformed("node is not an object".into()),
    };

    let has_uri = obj.contains_key("uri");
    let has_children = obj.contains_key("children");
    match (has_uri, has_children) {
        (true, true) => NodeShape::Malformed("node has both a link and children".into()),
        (false, false) => NodeShape::Malformed("node has neither a link nor children".into()),
        (true, false) => match serde_json::from_value::<ImportLeaf>(node.clone()) {
            Ok(leaf) => NodeShape::Leaf(leaf),
            Err(e) => NodeShape::Malformed(format!("unreadable leaf: {}", e)),
        },
        (false, true) => match obj.get("children").and_then(Value::as_array) {
            Some(children) => NodeShape::Folder {
                title: obj
                    .get("title")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                children,
            },
            None => NodeShape::Malformed("children is not an array".into()),
        },
    }
}

/// Import transformer backed by a SQLite connection.
pub struct ImportTransformer<'a> {
    conn: &'a Connection,
    observer: &'a dyn ImportObserver,
    cancel: CancelToken,
}

impl<'a> ImportTransformer<'a> {
    /// Creates a new `ImportTransformer` using the provided database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            observer: &NoopObserver,
            cancel: CancelToken::new(),
        }
    }

    /// Sends lifecycle events to the given observer.
    pub fn with_observer(mut self, observer: &'a dyn ImportObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Lets the host abort the walk through the given token.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Reads and imports a browser JSON export file.
    pub fn import_file<P: AsRef<Path>>(&mut self, path: P) -> Result<ImportReport, ImportError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ImportError::FileRead(e.to_string()))?;
        let root: Value = serde_json::from_str(&content)
            .map_err(|e| ImportError::InvalidFormat(e.to_string()))?;
        self.import_tree(&root)
    }

    /// Imports an already-parsed bookmark tree.
    ///
    /// Each leaf commits through its own `create` transaction, so an aborted
    /// or failed import keeps every bookmark committed before the stop.
    pub fn import_tree(&mut self, root: &Value) -> Result<ImportReport, ImportError> {
        let job_id = Uuid::new_v4();
        self.observer.on_event(&ImportEvent::ImportStarted { job_id });

        match self.walk(job_id, root) {
            Ok(report) => {
                self.observer.on_event(&ImportEvent::ImportFinished {
                    job_id,
                    created: report.created,
                    skipped: report.skipped.len() as u64,
                });
                Ok(report)
            }
            Err(e) => {
                self.observer.on_event(&ImportEvent::ImportFailed {
                    job_id,
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    fn walk(&mut self, job_id: Uuid, root: &Value) -> Result<ImportReport, ImportError> {
        let mut report = ImportReport {
            job_id,
            created: 0,
            skipped: Vec::new(),
            cancelled: false,
        };
        let mut store = BookmarkStore::new(self.conn);

        // Depth-first over an explicit stack; each entry carries the tag set
        // accumulated from its enclosing folders, computed before any of its
        // leaves are reached. The root's own title is deliberately absent.
        let mut stack: Vec<(&Value, BTreeSet<String>)> = Vec::new();
        match classify(root) {
            NodeShape::Folder { children, .. } => {
                for child in children.iter().rev() {
                    stack.push((child, BTreeSet::new()));
                }
            }
            // A bare leaf export is a degenerate but valid tree.
            NodeShape::Leaf(_) => stack.push((root, BTreeSet::new())),
            NodeShape::Malformed(reason) => {
                return Err(ImportError::InvalidFormat(reason));
            }
        }

        while let Some((node, tags)) = stack.pop() {
            if self.cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            match classify(node) {
                NodeShape::Folder { title, children } => {
                    let child_tags = accumulate(&tags, &title);
                    for child in children.iter().rev() {
                        stack.push((child, child_tags.clone()));
                    }
                }
                NodeShape::Leaf(leaf) => match self.create_leaf(&mut store, &leaf, &tags) {
                    Ok(()) => {
                        report.created += 1;
                        self.observer.on_event(&ImportEvent::ImportProgress {
                            job_id,
                            created: report.created,
                        });
                    }
                    Err(StoreError::Validation(reason)) => {
                        warn!(title = %leaf.title, %reason, "skipping invalid leaf");
                        report.skipped.push(SkippedNode {
                            title: Some(leaf.title),
                            reason,
                        });
                    }
                    // Store unavailable mid-walk is the one fatal case.
                    Err(e) => return Err(e.into()),
                },
                NodeShape::Malformed(reason) => {
                    let title = node
                        .get("title")
                        .and_then(Value::as_str)
                        .map(str::to_string);
                    warn!(?title, %reason, "skipping malformed import node");
                    report.skipped.push(SkippedNode { title, reason });
                }
            }
        }

        Ok(report)
    }

    fn create_leaf(
        &self,
        store: &mut BookmarkStore,
        leaf: &ImportLeaf,
        tags: &BTreeSet<String>,
    ) -> Result<(), StoreError> {
        // The source encodes microseconds since epoch; the store keeps
        // milliseconds. Integer division by 1000 is the exact conversion.
        // A leaf without a timestamp takes the store's now-default.
        let mut draft = BookmarkDraft::new(leaf.uri.clone()).with_title(leaf.title.trim());
        if let Some(date_added) = leaf.date_added {
            draft = draft.with_created_at(date_added / 1000);
        }
        draft.icon_link = leaf.icon_uri.clone();

        store.create(&draft, tags)?;
        Ok(())
    }
}
