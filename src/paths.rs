//! Project path functions - single source of truth for file paths.
//!
//! ## Environment Variables
//!
//! - `DATA_DIR`: Override the base data directory (default: "data")
//! - `DATABASE_PATH`, `PORT`: see config.rs
//!
//! This allows running multiple isolated server instances side by side:
//! ```bash
//! DATA_DIR=data/test/a PORT=3001 cargo run
//! DATA_DIR=data/test/b PORT=3002 cargo run
//! ```

use std::path::PathBuf;

pub const DEFAULT_DATA_DIR: &str = "data";

const DB_FILE_NAME: &str = "drillcards.db";

/// SQLite database path under a data directory
pub fn db_path_in(data_dir: &str) -> PathBuf {
    PathBuf::from(data_dir).join(DB_FILE_NAME)
}

/// Backup written before migrations run against an existing database
pub fn backup_path(db_path: &std::path::Path) -> PathBuf {
    db_path.with_extension("db.backup")
}
