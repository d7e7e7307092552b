//! SQLite connection management for the HERA universal tables.
//!
//! One [`Database`] handle wraps a single connection shared by every store.
//! Opening a database bootstraps the five universal tables and their
//! indexes; the partial unique indexes (`WHERE is_active = 1`) are what make
//! the entity-code and metadata single-active invariants hold even under
//! racing writers.

mod error;
mod schema;

pub use error::{DbError, DbResult};

use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Connection options.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// How long a writer waits on a locked database before failing.
    pub busy_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_secs(5),
        }
    }
}

/// A shared handle to the underlying SQLite connection.
///
/// Cheap to clone; all stores constructed from the same handle share one
/// connection, which is what lets cross-store writes (entity plus its
/// initial attributes, say) run in a single transaction.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Opens (or creates) a database file and bootstraps the schema.
    pub fn open(path: impl AsRef<Path>, config: &DatabaseConfig) -> DbResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .map_err(|e| DbError::Open(format!("{}: {e}", path.display())))?;
        tracing::info!(path = %path.display(), "opened database");
        Self::from_connection(conn, config)
    }

    /// Opens an in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| DbError::Open(format!("in-memory: {e}")))?;
        Self::from_connection(conn, &DatabaseConfig::default())
    }

    fn from_connection(conn: Connection, config: &DatabaseConfig) -> DbResult<Self> {
        conn.busy_timeout(config.busy_timeout)?;
        conn.pragma_update(None, "foreign_keys", true)?;
        schema::init(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Locks the shared connection.
    ///
    /// Hold the guard across `Connection::transaction()` for multi-statement
    /// writes; drop it as soon as the statement or transaction completes.
    pub fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }
}
