//! Test utilities for database setup.
//!
//! Reuses the authoritative schema initialization so tests never carry their
//! own copy of the tables.

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, MutexGuard};
use tempfile::TempDir;

use crate::config::StudyConfig;
use crate::db::{self, DbPool};
use crate::domain::{Card, CardType};
use crate::srs::{Clock, FixedClock};
use crate::state::AppState;

/// File-backed database in a temporary directory plus a controllable clock.
///
/// The directory is removed when the environment is dropped.
pub struct TestEnv {
    /// Temporary directory (kept alive for database file persistence)
    pub temp: TempDir,
    pub pool: DbPool,
    pub clock: Arc<FixedClock>,
}

impl TestEnv {
    pub fn new() -> rusqlite::Result<Self> {
        let temp =
            TempDir::new().map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        let pool = db::init_db(&temp.path().join("drillcards.db"))?;
        let start = Utc.with_ymd_and_hms(2025, 3, 10, 9, 30, 0).unwrap();

        Ok(Self {
            temp,
            pool,
            clock: Arc::new(FixedClock::new(start)),
        })
    }

    pub fn conn(&self) -> MutexGuard<'_, Connection> {
        self.pool.lock().unwrap()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// AppState sharing this environment's database and clock
    pub fn state(&self) -> AppState {
        AppState::with_clock(self.pool.clone(), StudyConfig::default(), self.clock.clone())
    }

    /// Insert a fresh fact card due now
    pub fn seed_card(&self, conn: &Connection, user_id: i64, note_id: Option<i64>, question: &str) -> Card {
        let mut card = Card::new(
            user_id,
            note_id,
            CardType::Fact,
            question.to_string(),
            format!("answer to {}", question),
            self.now(),
        );
        card.id = db::insert_card(conn, &card).unwrap();
        card
    }

    pub fn set_next_review(&self, conn: &Connection, card_id: i64, next_review: DateTime<Utc>) {
        conn.execute(
            "UPDATE cards SET next_review = ?1 WHERE id = ?2",
            params![db::to_db_time(&next_review), card_id],
        )
        .unwrap();
    }

    /// Get the temporary directory path for creating test files.
    pub fn path(&self) -> &Path {
        self.temp.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_database_lives_in_temp_dir() {
        let env = TestEnv::new().unwrap();
        assert!(env.path().join("drillcards.db").exists());

        let conn = env.conn();
        let card = env.seed_card(&conn, 1, None, "q");
        assert!(db::get_card_for_user(&conn, card.id, 1).unwrap().is_some());
    }
}
