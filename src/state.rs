//! Application state shared by all handlers.

use std::sync::Arc;

use crate::config::StudyConfig;
use crate::db::DbPool;
use crate::srs::{Clock, SystemClock};

/// Application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    /// Card and review store
    pub db: DbPool,

    /// Time source for every scheduling decision
    pub clock: Arc<dyn Clock>,

    pub study: StudyConfig,
}

impl AppState {
    pub fn new(db: DbPool, study: StudyConfig) -> Self {
        Self::with_clock(db, study, Arc::new(SystemClock))
    }

    pub fn with_clock(db: DbPool, study: StudyConfig, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock, study }
    }
}
