//! App Core for linkstash.
//!
//! Central struct owning the database handle. The store, reconciler, query
//! engine and import transformer borrow the connection with a lifetime, so
//! they are created on demand via `app.db.connection()` rather than stored.

use std::sync::Arc;

use crate::database::connection::Database;
use crate::types::errors::StoreError;

/// Central application struct owning the persistence boundary.
pub struct App {
    pub db: Arc<Database>,
}

impl App {
    /// Opens (or creates) the database at the given path.
    pub fn new(db_path: &str) -> Result<Self, StoreError> {
        let db = Arc::new(Database::open(db_path)?);
        Ok(Self { db })
    }

    /// Opens an in-memory database. Useful for tests and ephemeral hosts.
    pub fn new_in_memory() -> Result<Self, StoreError> {
        let db = Arc::new(Database::open_in_memory()?);
        Ok(Self { db })
    }
}
