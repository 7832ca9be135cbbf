//! Command boundary for the linkstash engine.
//!
//! `handle_method` dispatches the logical operations a presentation layer
//! invokes — bookmark CRUD, batch tag updates, the filtered listing query
//! and the hierarchical import — to the managers and services via the
//! `App` struct. Cache invalidation after a successful mutation is the
//! caller's responsibility, not the engine's.

use std::collections::BTreeSet;
use std::sync::Mutex;

use serde_json::{json, Value};

use crate::app::App;
use crate::managers::bookmark_store::{BookmarkStore, BookmarkStoreTrait};
use crate::managers::query_engine::{QueryEngine, QueryEngineTrait};
use crate::managers::tag_reconciler::{TagReconciler, TagReconcilerTrait};
use crate::services::import_transformer::ImportTransformer;
use crate::types::bookmark::{BookmarkDraft, BookmarkPatch};
use crate::types::query::{PageWindow, QuerySpec, SortDirection, SortKey};

/// The one import format shipped with the engine.
pub const BROWSER_JSON_PARSER: &str = "browser-json";

/// Reads a string array parameter into a deduplicated tag set.
fn tag_set(value: &Value) -> Result<BTreeSet<String>, String> {
    let items = value.as_array().ok_or("expected an array of tag names")?;
    let mut set = BTreeSet::new();
    for item in items {
        let tag = item.as_str().ok_or("tag names must be strings")?;
        set.insert(tag.to_string());
    }
    Ok(set)
}

fn id_list(value: &Value) -> Result<Vec<i64>, String> {
    let items = value.as_array().ok_or("expected an array of ids")?;
    items
        .iter()
        .map(|v| v.as_i64().ok_or_else(|| "ids must be integers".to_string()))
        .collect()
}

/// Dispatch a logical operation to the appropriate manager or service.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        // ─── Bookmarks ───
        "bookmark.insert" => {
            let draft: BookmarkDraft =
                serde_json::from_value(params.clone()).map_err(|e| e.to_string())?;
            let tags = match params.get("tags") {
                Some(v) => tag_set(v)?,
                None => BTreeSet::new(),
            };
            let a = app.lock().map_err(|e| e.to_string())?;
            let mut store = BookmarkStore::new(a.db.connection());
            let id = store.create(&draft, &tags).map_err(|e| e.to_string())?;
            Ok(json!({"id": id}))
        }
        "bookmark.update" => {
            let id = params.get("id").and_then(|v| v.as_i64()).ok_or("missing id")?;
            let patch: BookmarkPatch =
                serde_json::from_value(params.clone()).map_err(|e| e.to_string())?;
            // "tags absent" and "tags: []" are different requests: the first
            // leaves links untouched, the second clears them.
            let tags = match params.get("tags") {
                Some(v) => Some(tag_set(v)?),
                None => None,
            };
            let a = app.lock().map_err(|e| e.to_string())?;
            let mut store = BookmarkStore::new(a.db.connection());
            store
                .update(id, &patch, tags.as_ref())
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "bookmark.delete" => {
            let id = params.get("id").and_then(|v| v.as_i64()).ok_or("missing id")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let mut store = BookmarkStore::new(a.db.connection());
            store.delete(id).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "bookmark.delete_many" => {
            let ids = id_list(params.get("ids").ok_or("missing ids")?)?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let mut store = BookmarkStore::new(a.db.connection());
            store.delete_many(&ids).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "bookmark.get" => {
            let id = params.get("id").and_then(|v| v.as_i64()).ok_or("missing id")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let store = BookmarkStore::new(a.db.connection());
            let found = store.get(id).map_err(|e| e.to_string())?;
            serde_json::to_value(found).map_err(|e| e.to_string())
        }

        // ─── Tags ───
        "tags.update" => {
            let ids = id_list(params.get("ids").ok_or("missing ids")?)?;
            let to_add = match params.get("tagsToAdd") {
                Some(v) => tag_set(v)?,
                None => BTreeSet::new(),
            };
            let to_delete = match params.get("tagsToDelete") {
                Some(v) => tag_set(v)?,
                None => BTreeSet::new(),
            };
            let a = app.lock().map_err(|e| e.to_string())?;
            let mut reconciler = TagReconciler::new(a.db.connection());
            reconciler
                .reconcile(&ids, &to_add, &to_delete)
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "tags.all" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let store = BookmarkStore::new(a.db.connection());
            let tags = store.all_tags().map_err(|e| e.to_string())?;
            Ok(json!(tags))
        }

        // ─── Queries ───
        "bookmarks.get" => {
            // Caller errors (unknown sort key, negative page) are rejected
            // here or in the engine before the store is touched.
            let sort_key = match params.get("sortKey").and_then(|v| v.as_str()) {
                Some(name) => {
                    SortKey::parse(name).ok_or_else(|| format!("unknown sort key: {}", name))?
                }
                None => SortKey::default(),
            };
            let sort_direction = match params.get("sortDirection").and_then(|v| v.as_str()) {
                Some("ascending") => SortDirection::Ascending,
                Some("descending") | None => SortDirection::Descending,
                Some(other) => return Err(format!("unknown sort direction: {}", other)),
            };
            let page = if params.get("all").and_then(|v| v.as_bool()).unwrap_or(false) {
                PageWindow::All
            } else {
                PageWindow::Page {
                    index: params.get("page").and_then(|v| v.as_i64()).unwrap_or(0),
                    size: params.get("pageSize").and_then(|v| v.as_i64()).unwrap_or(10),
                }
            };
            let spec = QuerySpec {
                title_filter: params
                    .get("titleFilter")
                    .and_then(|v| v.as_str())
                    .map(str::to_string),
                tag_filters: match params.get("tagFilters") {
                    Some(v) => tag_set(v)?,
                    None => BTreeSet::new(),
                },
                sort_key,
                sort_direction,
                page,
            };

            let a = app.lock().map_err(|e| e.to_string())?;
            let engine = QueryEngine::new(a.db.connection());
            let response = engine.run(&spec).map_err(|e| e.to_string())?;
            serde_json::to_value(response).map_err(|e| e.to_string())
        }

        // ─── Import ───
        "import.run" => {
            let file_path = params
                .get("filePath")
                .and_then(|v| v.as_str())
                .ok_or("missing filePath")?;
            let parser = params
                .get("parser")
                .and_then(|v| v.as_str())
                .unwrap_or(BROWSER_JSON_PARSER);
            if parser != BROWSER_JSON_PARSER {
                return Err(format!("unknown parser: {}", parser));
            }

            let a = app.lock().map_err(|e| e.to_string())?;
            let mut transformer = ImportTransformer::new(a.db.connection());
            let report = transformer
                .import_file(file_path)
                .map_err(|e| e.to_string())?;
            serde_json::to_value(report).map_err(|e| e.to_string())
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
