//! Application configuration.
//!
//! Every value is resolved with priority: config.toml > .env / environment > default.

use serde::Deserialize;
use std::path::PathBuf;

use crate::srs::sm2::MAX_INTERVAL_DAYS;

// ==================== Defaults ====================

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Server port
pub const SERVER_PORT: u16 = 3000;

/// Cards shown in one session when studying across all notes
pub const DEFAULT_SESSION_LIMIT: usize = 20;

/// Days of review history used for the retention rate
pub const RETENTION_WINDOW_DAYS: i64 = 7;

/// Look-ahead for the upcoming-reviews count
pub const UPCOMING_WINDOW_DAYS: i64 = 7;

// ==================== config.toml ====================

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct AppConfig {
    database: Option<DatabaseConfig>,
    server: Option<ServerConfig>,
    study: Option<StudyFileConfig>,
}

#[derive(Debug, Deserialize)]
struct DatabaseConfig {
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServerConfig {
    addr: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct StudyFileConfig {
    session_limit: Option<usize>,
    retention_window_days: Option<i64>,
    upcoming_window_days: Option<i64>,
}

// ==================== Resolved settings ====================

/// Study tunables shared with handlers through `AppState`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudyConfig {
    pub session_limit: usize,
    pub retention_window_days: i64,
    pub upcoming_window_days: i64,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            session_limit: DEFAULT_SESSION_LIMIT,
            retention_window_days: RETENTION_WINDOW_DAYS,
            upcoming_window_days: UPCOMING_WINDOW_DAYS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub database_path: PathBuf,
    pub addr: String,
    pub port: u16,
    pub study: StudyConfig,
}

impl Settings {
    /// Load settings from ./config.toml and the process environment
    pub fn load() -> Self {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let contents = std::fs::read_to_string("config.toml").ok();
        Self::resolve(contents.as_deref(), |key| std::env::var(key).ok())
    }

    /// Resolve settings from config.toml contents and an environment lookup
    pub fn resolve(config_toml: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Self {
        let file = match config_toml.map(toml::from_str::<AppConfig>) {
            Some(Ok(config)) => config,
            Some(Err(e)) => {
                tracing::warn!("Ignoring malformed config.toml: {}", e);
                AppConfig::default()
            }
            None => AppConfig::default(),
        };

        let database_path = resolve_database_path(&file, &env);

        let server = file.server.as_ref();
        let addr = server
            .and_then(|s| s.addr.clone())
            .unwrap_or_else(|| SERVER_ADDR.to_string());
        let port = server
            .and_then(|s| s.port)
            .or_else(|| env("PORT").and_then(|p| p.parse().ok()))
            .unwrap_or(SERVER_PORT);

        let defaults = StudyConfig::default();
        let study = match file.study {
            Some(s) => StudyConfig {
                session_limit: s.session_limit.unwrap_or(defaults.session_limit),
                retention_window_days: bounded_window(
                    "retention_window_days",
                    s.retention_window_days,
                    defaults.retention_window_days,
                ),
                upcoming_window_days: bounded_window(
                    "upcoming_window_days",
                    s.upcoming_window_days,
                    defaults.upcoming_window_days,
                ),
            },
            None => defaults,
        };

        Self {
            database_path,
            addr,
            port,
            study,
        }
    }

    /// Get the full server bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.addr, self.port)
    }
}

/// Day windows must stay within the longest schedulable interval
fn bounded_window(name: &str, value: Option<i64>, default: i64) -> i64 {
    match value {
        Some(days) if (0..=MAX_INTERVAL_DAYS).contains(&days) => days,
        Some(days) => {
            let clamped = days.clamp(0, MAX_INTERVAL_DAYS);
            tracing::warn!("[study] {} = {} out of range, using {}", name, days, clamped);
            clamped
        }
        None => default,
    }
}

fn resolve_database_path(file: &AppConfig, env: &impl Fn(&str) -> Option<String>) -> PathBuf {
    // Priority 1: config.toml
    if let Some(path) = file.database.as_ref().and_then(|db| db.path.clone()) {
        tracing::info!("Using database from config.toml: {}", path);
        return PathBuf::from(path);
    }

    // Priority 2: .env DATABASE_PATH
    if let Some(path) = env("DATABASE_PATH") {
        tracing::info!("Using database from DATABASE_PATH env: {}", path);
        return PathBuf::from(path);
    }

    // Default
    let data_dir = env("DATA_DIR").unwrap_or_else(|| crate::paths::DEFAULT_DATA_DIR.to_string());
    let default = crate::paths::db_path_in(&data_dir);
    tracing::info!("Using default database path: {}", default.display());
    default
}
