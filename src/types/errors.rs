use std::fmt;

use tracing::error;

// === StoreError ===

/// Errors surfaced by the bookmark store, tag reconciler and query engine.
#[derive(Debug)]
pub enum StoreError {
    /// Malformed input to a public operation. Rejected before any write.
    Validation(String),
    /// The targeted bookmark id does not exist.
    NotFound(i64),
    /// A write would break a schema invariant. Internal-logic defect;
    /// logged loudly and the operation aborted.
    Constraint(String),
    /// The backing store cannot be reached or opened.
    Storage(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Validation(msg) => write!(f, "Validation error: {}", msg),
            StoreError::NotFound(id) => write!(f, "Bookmark not found: {}", id),
            StoreError::Constraint(msg) => write!(f, "Constraint violation: {}", msg),
            StoreError::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(e, msg)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                let detail = msg.unwrap_or_else(|| e.to_string());
                // A constraint trip means a write slipped past validation.
                error!(%detail, "schema constraint violated, aborting operation");
                StoreError::Constraint(detail)
            }
            other => StoreError::Storage(other.to_string()),
        }
    }
}

// === ImportError ===

/// Errors related to the hierarchical bookmark import.
#[derive(Debug)]
pub enum ImportError {
    /// The export file could not be read.
    FileRead(String),
    /// The export file is not a parseable bookmark tree.
    InvalidFormat(String),
    /// The store became unavailable mid-walk. Bookmarks committed before
    /// the failure stay committed.
    Storage(String),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::FileRead(msg) => write!(f, "Import file read error: {}", msg),
            ImportError::InvalidFormat(msg) => write!(f, "Import format error: {}", msg),
            ImportError::Storage(msg) => write!(f, "Import storage error: {}", msg),
        }
    }
}

impl std::error::Error for ImportError {}

impl From<StoreError> for ImportError {
    fn from(err: StoreError) -> Self {
        ImportError::Storage(err.to_string())
    }
}
