use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StudyError;

/// Learner's self-assessed recall, 0-5.
///
/// 3 and above count as a successful review; anything lower is a lapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ReviewQuality {
  /// Complete blackout
  Blackout = 0,
  /// Incorrect, but the answer was remembered once shown
  Incorrect = 1,
  /// Incorrect, but the answer felt easy to recall once shown
  IncorrectEasyRecall = 2,
  /// Correct with serious difficulty
  CorrectDifficult = 3,
  /// Correct after hesitation
  CorrectHesitation = 4,
  /// Perfect recall
  Perfect = 5,
}

impl ReviewQuality {
  /// Lowest rating that counts as a successful review
  pub const SUCCESS_THRESHOLD: u8 = 3;

  pub fn from_u8(value: u8) -> Option<Self> {
    match value {
      0 => Some(Self::Blackout),
      1 => Some(Self::Incorrect),
      2 => Some(Self::IncorrectEasyRecall),
      3 => Some(Self::CorrectDifficult),
      4 => Some(Self::CorrectHesitation),
      5 => Some(Self::Perfect),
      _ => None,
    }
  }

  pub fn as_u8(&self) -> u8 {
    *self as u8
  }

  pub fn is_successful(&self) -> bool {
    self.as_u8() >= Self::SUCCESS_THRESHOLD
  }
}

impl From<ReviewQuality> for u8 {
  fn from(quality: ReviewQuality) -> Self {
    quality.as_u8()
  }
}

impl TryFrom<u8> for ReviewQuality {
  type Error = StudyError;

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Self::from_u8(value).ok_or_else(|| StudyError::InvalidQuality(value.to_string()))
  }
}

impl TryFrom<i64> for ReviewQuality {
  type Error = StudyError;

  fn try_from(value: i64) -> Result<Self, Self::Error> {
    u8::try_from(value)
      .ok()
      .and_then(Self::from_u8)
      .ok_or_else(|| StudyError::InvalidQuality(value.to_string()))
  }
}

impl TryFrom<&serde_json::Value> for ReviewQuality {
  type Error = StudyError;

  /// Accepts only JSON integers; `3.0`, `"3"` and friends are rejected.
  fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
    match value.as_i64() {
      Some(n) => Self::try_from(n),
      None => Err(StudyError::InvalidQuality(value.to_string())),
    }
  }
}

/// One recorded review outcome. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewEvent {
  pub id: i64,
  pub card_id: i64,
  pub user_id: i64,
  /// Drill session the review happened in, if any
  pub session_id: Option<i64>,
  pub quality: ReviewQuality,
  /// Time the learner took to answer, 0 when not measured
  pub time_taken_ms: i64,
  pub reviewed_at: DateTime<Utc>,
}

impl ReviewEvent {
  pub fn new(
    card_id: i64,
    user_id: i64,
    quality: ReviewQuality,
    time_taken_ms: Option<i64>,
    reviewed_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id: 0,
      card_id,
      user_id,
      session_id: None,
      quality,
      time_taken_ms: time_taken_ms.unwrap_or(0),
      reviewed_at,
    }
  }

  pub fn with_session(mut self, session_id: i64) -> Self {
    self.session_id = Some(session_id);
    self
  }

  pub fn is_successful(&self) -> bool {
    self.quality.is_successful()
  }
}
