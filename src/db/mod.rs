pub mod cards;
pub mod reviews;
pub mod schema;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, Result};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

// Re-export all public items from submodules
pub use cards::*;
pub use reviews::*;
pub use schema::run_migrations;

pub type DbPool = Arc<Mutex<Connection>>;

/// Extension trait for logging errors before discarding them
pub trait LogOnError<T> {
    /// Log the error at warn level and return None
    fn log_warn(self, context: &str) -> Option<T>;
}

impl<T, E: std::fmt::Display> LogOnError<T> for std::result::Result<T, E> {
    fn log_warn(self, context: &str) -> Option<T> {
        match self {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("{}: {}", context, e);
                None
            }
        }
    }
}

/// Error returned when database lock cannot be acquired
#[derive(Debug)]
pub struct DbLockError;

impl std::fmt::Display for DbLockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Database unavailable")
    }
}

impl std::error::Error for DbLockError {}

/// Try to acquire the database lock, returning an error if poisoned
pub fn try_lock(pool: &DbPool) -> std::result::Result<MutexGuard<'_, Connection>, DbLockError> {
    pool.lock().map_err(|_: PoisonError<_>| {
        tracing::error!("Database mutex poisoned - a thread panicked while holding the lock");
        DbLockError
    })
}

pub fn init_db(path: &Path) -> Result<DbPool> {
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::warn!("Could not create database directory {}: {}", parent.display(), e);
        }
    }

    // Create backup before migrations if database exists
    if path.exists() {
        let backup_path = crate::paths::backup_path(path);
        if let Err(e) = std::fs::copy(path, &backup_path) {
            tracing::warn!("Could not create database backup: {}", e);
        }
    }

    let conn = Connection::open(path)?;
    run_migrations(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// In-memory database with the full schema
pub fn init_memory_db() -> Result<DbPool> {
    let conn = Connection::open_in_memory()?;
    run_migrations(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// Fixed-width RFC 3339 so stored timestamps compare correctly as text
pub(crate) fn to_db_time(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_db_time(column: usize, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
        })
}
