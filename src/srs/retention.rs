//! Review outcome and card maturity statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Card, Maturity, ReviewEvent};

/// Share of successful reviews as a whole percentage, 0 for no reviews
pub fn retention_rate(events: &[ReviewEvent]) -> u32 {
  if events.is_empty() {
    return 0;
  }

  let successful = events.iter().filter(|e| e.is_successful()).count();
  ((successful as f64 / events.len() as f64) * 100.0).round() as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StudyStats {
  pub total: usize,
  pub due: usize,
  pub new: usize,
  pub learning: usize,
  pub mature: usize,
  /// Mean ease factor, two decimals, 0 with no cards
  pub average_ease: f64,
}

pub fn study_stats(cards: &[Card], now: DateTime<Utc>) -> StudyStats {
  if cards.is_empty() {
    return StudyStats::default();
  }

  let mut stats = StudyStats {
    total: cards.len(),
    ..StudyStats::default()
  };

  for card in cards {
    if card.is_due(now) {
      stats.due += 1;
    }
    match card.maturity() {
      Maturity::New => stats.new += 1,
      Maturity::Learning => stats.learning += 1,
      Maturity::Mature => stats.mature += 1,
    }
  }

  let ease_sum: f64 = cards.iter().map(|c| c.ease_factor).sum();
  stats.average_ease = (ease_sum / cards.len() as f64 * 100.0).round() / 100.0;

  stats
}
