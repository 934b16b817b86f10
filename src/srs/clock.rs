//! Time source for scheduling.

use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;

pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> {
    Utc::now()
  }
}

/// Manually controlled time, for tests and replaying reviews
#[derive(Debug)]
pub struct FixedClock {
  now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
  pub fn new(now: DateTime<Utc>) -> Self {
    Self { now: Mutex::new(now) }
  }

  pub fn set(&self, now: DateTime<Utc>) {
    match self.now.lock() {
      Ok(mut guard) => *guard = now,
      Err(poisoned) => *poisoned.into_inner() = now,
    }
  }

  pub fn advance(&self, by: Duration) {
    let next = self.now() + by;
    self.set(next);
  }
}

impl Clock for FixedClock {
  fn now(&self) -> DateTime<Utc> {
    match self.now.lock() {
      Ok(guard) => *guard,
      Err(poisoned) => *poisoned.into_inner(),
    }
  }
}
