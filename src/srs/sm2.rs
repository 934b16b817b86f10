//! SM-2 review scheduling.
//!
//! Lapses reset the repetition count and interval but leave the ease factor
//! untouched. The returned ease factor is always rounded to two decimals.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ReviewQuality;

pub const MIN_EASE_FACTOR: f64 = 1.3;
pub const INITIAL_EASE_FACTOR: f64 = 2.5;
pub const INITIAL_INTERVAL_DAYS: i64 = 1;

/// Interval used for the second consecutive success
pub const SECOND_INTERVAL_DAYS: i64 = 6;

/// Upper bound on any interval (~100 years) so next_review stays representable
pub const MAX_INTERVAL_DAYS: i64 = 36_500;

/// Scheduling fields of a card, as read before a review
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleState {
  pub ease_factor: f64,
  pub interval_days: i64,
  pub repetitions: i64,
}

impl Default for ScheduleState {
  fn default() -> Self {
    Self {
      ease_factor: INITIAL_EASE_FACTOR,
      interval_days: INITIAL_INTERVAL_DAYS,
      repetitions: 0,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sm2Result {
  pub ease_factor: f64,
  pub interval_days: i64,
  pub repetitions: i64,
  pub next_review: DateTime<Utc>,
}

impl Sm2Result {
  pub fn schedule(&self) -> ScheduleState {
    ScheduleState {
      ease_factor: self.ease_factor,
      interval_days: self.interval_days,
      repetitions: self.repetitions,
    }
  }
}

/// EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)), floored at 1.3
pub fn updated_ease_factor(current_ease_factor: f64, quality: ReviewQuality) -> f64 {
  let q = quality.as_u8() as f64;
  let ease_delta = 0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02);
  (current_ease_factor + ease_delta).max(MIN_EASE_FACTOR)
}

fn round_to_hundredths(value: f64) -> f64 {
  (value * 100.0).round() / 100.0
}

/// Compute the next scheduling state for a review recorded at `now`.
pub fn calculate_sm2(quality: ReviewQuality, current: &ScheduleState, now: DateTime<Utc>) -> Sm2Result {
  let (ease_factor, interval_days, repetitions) = if !quality.is_successful() {
    // Lapse: start over, ease factor is kept
    (current.ease_factor.max(MIN_EASE_FACTOR), 1, 0)
  } else {
    let ease_factor = updated_ease_factor(current.ease_factor, quality);
    let interval = match current.repetitions {
      r if r <= 0 => 1,
      1 => SECOND_INTERVAL_DAYS,
      _ => ((current.interval_days as f64) * ease_factor).round() as i64,
    };
    (ease_factor, interval.clamp(1, MAX_INTERVAL_DAYS), current.repetitions.max(0) + 1)
  };

  Sm2Result {
    ease_factor: round_to_hundredths(ease_factor),
    interval_days,
    repetitions,
    next_review: now + Duration::days(interval_days),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  use ReviewQuality::*;

  fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 14, 45, 12).unwrap()
  }

  fn state(ease_factor: f64, interval_days: i64, repetitions: i64) -> ScheduleState {
    ScheduleState {
      ease_factor,
      interval_days,
      repetitions,
    }
  }

  #[test]
  fn test_first_review_good() {
    let result = calculate_sm2(CorrectHesitation, &ScheduleState::default(), now());
    assert_eq!(result.repetitions, 1);
    assert_eq!(result.interval_days, 1);
    assert!((result.ease_factor - 2.5).abs() < 1e-9);
  }

  #[test]
  fn test_second_review_good() {
    let result = calculate_sm2(CorrectHesitation, &state(2.5, 1, 1), now());
    assert_eq!(result.repetitions, 2);
    assert_eq!(result.interval_days, 6);
  }

  #[test]
  fn test_second_review_ignores_ease() {
    for ease in [1.3, 1.7, 2.5, 3.4] {
      let result = calculate_sm2(CorrectDifficult, &state(ease, 1, 1), now());
      assert_eq!(result.interval_days, 6);
    }
  }

  #[test]
  fn test_third_review_good() {
    let result = calculate_sm2(CorrectHesitation, &state(2.5, 6, 2), now());
    assert_eq!(result.repetitions, 3);
    // 6 * 2.5 = 15
    assert_eq!(result.interval_days, 15);
  }

  #[test]
  fn test_third_review_perfect_uses_updated_ease() {
    let result = calculate_sm2(Perfect, &state(2.5, 6, 2), now());
    assert!((result.ease_factor - 2.6).abs() < 1e-9);
    // round(6 * 2.6) = 16
    assert_eq!(result.interval_days, 16);
    assert_eq!(result.repetitions, 3);
  }

  #[test]
  fn test_failed_review_resets() {
    let result = calculate_sm2(Blackout, &state(2.5, 15, 5), now());
    assert_eq!(result.repetitions, 0);
    assert_eq!(result.interval_days, 1);
  }

  #[test]
  fn test_failed_review_keeps_ease() {
    for quality in [Blackout, Incorrect, IncorrectEasyRecall] {
      let result = calculate_sm2(quality, &state(2.14, 40, 6), now());
      assert!((result.ease_factor - 2.14).abs() < 1e-9);
    }
  }

  #[test]
  fn test_difficult_review_lowers_ease() {
    let result = calculate_sm2(CorrectDifficult, &state(2.5, 6, 2), now());
    // 2.5 + (0.1 - 2 * (0.08 + 2 * 0.02)) = 2.36
    assert!((result.ease_factor - 2.36).abs() < 1e-9);
    assert_eq!(result.repetitions, 3);
  }

  #[test]
  fn test_easy_review_increases_ease() {
    let result = calculate_sm2(Perfect, &state(2.5, 1, 1), now());
    assert!(result.ease_factor > 2.5);
    assert_eq!(result.interval_days, 6);
  }

  #[test]
  fn test_ease_factor_floor() {
    // Repeated difficult reviews must not push ease below 1.3
    let mut current = state(1.5, 6, 2);
    for _ in 0..10 {
      current = calculate_sm2(CorrectDifficult, &current, now()).schedule();
    }
    assert!((current.ease_factor - MIN_EASE_FACTOR).abs() < 1e-9);
  }

  #[test]
  fn test_ease_floor_applies_to_corrupt_state_on_lapse() {
    let result = calculate_sm2(Blackout, &state(0.9, 3, 2), now());
    assert!(result.ease_factor >= MIN_EASE_FACTOR);
  }

  #[test]
  fn test_ease_factor_rounded_to_two_decimals() {
    let result = calculate_sm2(CorrectHesitation, &state(2.333_333, 6, 2), now());
    assert!((result.ease_factor - 2.33).abs() < 1e-9);
    assert!((result.ease_factor * 100.0 - (result.ease_factor * 100.0).round()).abs() < 1e-9);
  }

  #[test]
  fn test_interval_uses_unrounded_ease() {
    // 1000 * 2.446 = 2446, whereas the stored 2.45 would give 2450
    let result = calculate_sm2(Perfect, &state(2.346, 1000, 3), now());
    assert_eq!(result.interval_days, 2446);
    assert!((result.ease_factor - 2.45).abs() < 1e-9);
  }

  #[test]
  fn test_next_review_adds_whole_days() {
    let result = calculate_sm2(CorrectHesitation, &state(2.5, 6, 2), now());
    assert_eq!(result.next_review, now() + Duration::days(15));
    assert_eq!(result.next_review.time(), now().time());

    let failed = calculate_sm2(Incorrect, &state(2.5, 6, 2), now());
    assert_eq!(failed.next_review, now() + Duration::days(1));
  }

  #[test]
  fn test_interval_is_capped() {
    let result = calculate_sm2(Perfect, &state(3.0, MAX_INTERVAL_DAYS, 20), now());
    assert_eq!(result.interval_days, MAX_INTERVAL_DAYS);
  }

  #[test]
  fn test_zero_interval_state_still_schedules_forward() {
    let result = calculate_sm2(CorrectHesitation, &state(2.5, 0, 4), now());
    assert_eq!(result.interval_days, 1);
  }

  #[test]
  fn test_end_to_end_sequence() {
    let first = calculate_sm2(Perfect, &state(2.5, 1, 0), now());
    assert!((first.ease_factor - 2.6).abs() < 1e-9);
    assert_eq!((first.interval_days, first.repetitions), (1, 1));

    let second = calculate_sm2(Perfect, &first.schedule(), now());
    assert!((second.ease_factor - 2.7).abs() < 1e-9);
    assert_eq!((second.interval_days, second.repetitions), (6, 2));

    let lapse = calculate_sm2(Incorrect, &second.schedule(), now());
    assert!((lapse.ease_factor - 2.7).abs() < 1e-9);
    assert_eq!((lapse.interval_days, lapse.repetitions), (1, 0));
  }

  #[test]
  fn test_interval_grows_exponentially() {
    let mut current = ScheduleState::default();

    // Simulate 5 "correct with hesitation" reviews
    for i in 0..5 {
      current = calculate_sm2(CorrectHesitation, &current, now()).schedule();
      match i {
        0 => assert_eq!(current.interval_days, 1),
        1 => assert_eq!(current.interval_days, 6),
        _ => assert!(current.interval_days > 6),
      }
    }

    assert!(current.interval_days > 30);
  }
}
