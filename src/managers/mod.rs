// linkstash persistence managers
// Managers hold a borrowed connection and cover one concern each:
// bookmark CRUD, batch tag reconciliation, and the filtered read path.

pub mod bookmark_store;
pub mod query_engine;
pub mod tag_reconciler;
