use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::srs::sm2::{ScheduleState, Sm2Result, INITIAL_EASE_FACTOR, INITIAL_INTERVAL_DAYS};

/// Kind of knowledge a card was extracted as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
  Fact,
  Concept,
  Procedure,
}

impl CardType {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "fact" => Some(Self::Fact),
      "concept" => Some(Self::Concept),
      "procedure" => Some(Self::Procedure),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Fact => "fact",
      Self::Concept => "concept",
      Self::Procedure => "procedure",
    }
  }
}

/// Maturity bucket derived from the consecutive-success count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Maturity {
  New,
  Learning,
  Mature,
}

impl Maturity {
  /// Repetitions at which a card counts as mature
  pub const MATURE_REPETITIONS: i64 = 3;

  pub fn from_repetitions(repetitions: i64) -> Self {
    if repetitions <= 0 {
      Self::New
    } else if repetitions < Self::MATURE_REPETITIONS {
      Self::Learning
    } else {
      Self::Mature
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
  pub id: i64,
  pub user_id: i64,
  /// Parent note the card was generated from (None for loose cards)
  pub note_id: Option<i64>,
  pub card_type: CardType,
  pub question: String,
  pub answer: String,

  // SM-2 scheduling state
  pub ease_factor: f64,
  pub interval_days: i64,
  pub repetitions: i64,
  pub next_review: DateTime<Utc>,

  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Card {
  /// A freshly generated card, due immediately.
  pub fn new(
    user_id: i64,
    note_id: Option<i64>,
    card_type: CardType,
    question: String,
    answer: String,
    now: DateTime<Utc>,
  ) -> Self {
    Self {
      id: 0,
      user_id,
      note_id,
      card_type,
      question,
      answer,
      ease_factor: INITIAL_EASE_FACTOR,
      interval_days: INITIAL_INTERVAL_DAYS,
      repetitions: 0,
      next_review: now,
      created_at: now,
      updated_at: now,
    }
  }

  pub fn schedule(&self) -> ScheduleState {
    ScheduleState {
      ease_factor: self.ease_factor,
      interval_days: self.interval_days,
      repetitions: self.repetitions,
    }
  }

  /// Copy a scheduling result onto the card
  pub fn apply_review(&mut self, result: &Sm2Result, now: DateTime<Utc>) {
    self.ease_factor = result.ease_factor;
    self.interval_days = result.interval_days;
    self.repetitions = result.repetitions;
    self.next_review = result.next_review;
    self.updated_at = now;
  }

  pub fn is_due(&self, now: DateTime<Utc>) -> bool {
    self.next_review <= now
  }

  pub fn maturity(&self) -> Maturity {
    Maturity::from_repetitions(self.repetitions)
  }
}
