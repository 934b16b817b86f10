//! Due-card selection and review queue ordering.
//!
//! Builds a review queue from a card population:
//! - Only cards whose `next_review` has passed are kept
//! - The most overdue card comes first, ties keep their input order
//! - The merged "all notes" view is capped at the session limit

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::config;
use crate::domain::Card;

/// Anything carrying a scheduled review time
pub trait Schedulable {
  fn next_review(&self) -> DateTime<Utc>;
}

impl Schedulable for Card {
  fn next_review(&self) -> DateTime<Utc> {
    self.next_review
  }
}

impl<T: Schedulable> Schedulable for &T {
  fn next_review(&self) -> DateTime<Utc> {
    (*self).next_review()
  }
}

/// Which cards a review session draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueScope {
  /// Every note merged together
  All,
  /// Cards generated from a single note
  Note(i64),
}

impl DueScope {
  pub fn from_note_id(note_id: Option<i64>) -> Self {
    note_id.map_or(Self::All, Self::Note)
  }

  pub fn note_id(&self) -> Option<i64> {
    match self {
      Self::All => None,
      Self::Note(id) => Some(*id),
    }
  }

  /// Session cap when the caller does not ask for one
  pub fn default_limit(&self) -> Option<usize> {
    match self {
      Self::All => Some(config::DEFAULT_SESSION_LIMIT),
      Self::Note(_) => None,
    }
  }
}

/// Cards with `next_review <= now`, input order preserved
pub fn select_due<T: Schedulable>(cards: impl IntoIterator<Item = T>, now: DateTime<Utc>) -> Vec<T> {
  cards
    .into_iter()
    .filter(|c| c.next_review() <= now)
    .collect()
}

/// Most overdue first. `sort_by_key` is stable, so equal times keep their order.
pub fn sort_by_priority<T: Schedulable>(mut cards: Vec<T>) -> Vec<T> {
  cards.sort_by_key(|c| c.next_review());
  cards
}

pub fn limit<T>(mut cards: Vec<T>, n: usize) -> Vec<T> {
  cards.truncate(n);
  cards
}

/// Scope filter, due filter, priority sort and session cap in one pass.
///
/// `max_cards` overrides the scope's default cap.
pub fn build_review_queue(
  cards: Vec<Card>,
  now: DateTime<Utc>,
  scope: DueScope,
  max_cards: Option<usize>,
) -> Vec<Card> {
  let scoped = cards
    .into_iter()
    .filter(|c| scope.note_id().is_none_or(|id| c.note_id == Some(id)));

  let queue = sort_by_priority(select_due(scoped, now));

  match max_cards.or(scope.default_limit()) {
    Some(n) => limit(queue, n),
    None => queue,
  }
}

/// Number of cards that will be due within `days` from now (already due included).
///
/// A horizon past the representable calendar counts every card.
pub fn count_due_within<T: Schedulable>(cards: &[T], now: DateTime<Utc>, days: i64) -> usize {
  let horizon = Duration::try_days(days.max(0)).and_then(|d| now.checked_add_signed(d));
  match horizon {
    Some(horizon) => cards.iter().filter(|c| c.next_review() <= horizon).count(),
    None => cards.len(),
  }
}

/// Due counts for one note
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteDueSummary {
  pub note_id: i64,
  pub total_cards: usize,
  pub due_cards: usize,
}

/// Per-note card and due counts, ordered by note id. Cards without a note are skipped.
pub fn summarize_by_note(cards: &[Card], now: DateTime<Utc>) -> Vec<NoteDueSummary> {
  let mut by_note: BTreeMap<i64, NoteDueSummary> = BTreeMap::new();

  for card in cards {
    let Some(note_id) = card.note_id else {
      continue;
    };
    let entry = by_note.entry(note_id).or_insert(NoteDueSummary {
      note_id,
      total_cards: 0,
      due_cards: 0,
    });
    entry.total_cards += 1;
    if card.is_due(now) {
      entry.due_cards += 1;
    }
  }

  by_note.into_values().collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::CardType;
  use chrono::TimeZone;

  fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 10, 12, 0, 0).unwrap()
  }

  fn card(id: i64, note_id: Option<i64>, offset_hours: i64) -> Card {
    let mut card = Card::new(
      1,
      note_id,
      CardType::Fact,
      format!("Q{}", id),
      format!("A{}", id),
      now(),
    );
    card.id = id;
    card.next_review = now() + Duration::hours(offset_hours);
    card
  }

  fn ids(cards: &[Card]) -> Vec<i64> {
    cards.iter().map(|c| c.id).collect()
  }

  #[test]
  fn test_select_due_straddling_now() {
    let cards = vec![
      card(1, None, -48),
      card(2, None, 3),
      card(3, None, 0),
      card(4, None, -1),
      card(5, None, 72),
    ];

    let due = select_due(cards, now());
    assert_eq!(ids(&due), vec![1, 3, 4]);
  }

  #[test]
  fn test_select_due_empty() {
    let due = select_due(Vec::<Card>::new(), now());
    assert!(due.is_empty());
  }

  #[test]
  fn test_select_due_by_reference() {
    let cards = vec![card(1, None, -1), card(2, None, 1)];
    let due = select_due(&cards, now());
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].id, 1);
  }

  #[test]
  fn test_sort_by_priority_most_overdue_first() {
    let cards = vec![card(1, None, -1), card(2, None, -30), card(3, None, -5)];
    let sorted = sort_by_priority(cards);
    assert_eq!(ids(&sorted), vec![2, 3, 1]);
  }

  #[test]
  fn test_sort_by_priority_is_stable() {
    let cards = vec![
      card(10, None, -2),
      card(11, None, -6),
      card(12, None, -2),
      card(13, None, -6),
      card(14, None, -2),
    ];
    let sorted = sort_by_priority(cards);
    assert_eq!(ids(&sorted), vec![11, 13, 10, 12, 14]);
  }

  #[test]
  fn test_limit_truncates() {
    let cards: Vec<Card> = (1..=5).map(|i| card(i, None, -i)).collect();
    assert_eq!(limit(cards.clone(), 3).len(), 3);
    assert_eq!(limit(cards.clone(), 10).len(), 5);
    assert!(limit(cards, 0).is_empty());
  }

  #[test]
  fn test_review_queue_all_scope_caps_at_session_limit() {
    let cards: Vec<Card> = (1..=30).map(|i| card(i, Some(i % 3), -i)).collect();
    let queue = build_review_queue(cards, now(), DueScope::All, None);

    assert_eq!(queue.len(), config::DEFAULT_SESSION_LIMIT);
    // Most overdue (id 30) first
    assert_eq!(queue[0].id, 30);
  }

  #[test]
  fn test_review_queue_note_scope_is_uncapped() {
    let cards: Vec<Card> = (1..=30).map(|i| card(i, Some(if i <= 25 { 7 } else { 8 }), -i)).collect();
    let queue = build_review_queue(cards, now(), DueScope::Note(7), None);

    assert_eq!(queue.len(), 25);
    assert!(queue.iter().all(|c| c.note_id == Some(7)));
  }

  #[test]
  fn test_review_queue_explicit_limit_wins() {
    let cards: Vec<Card> = (1..=10).map(|i| card(i, Some(1), -i)).collect();

    let queue = build_review_queue(cards.clone(), now(), DueScope::Note(1), Some(4));
    assert_eq!(ids(&queue), vec![10, 9, 8, 7]);

    let queue = build_review_queue(cards, now(), DueScope::All, Some(2));
    assert_eq!(ids(&queue), vec![10, 9]);
  }

  #[test]
  fn test_review_queue_skips_future_cards() {
    let cards = vec![card(1, Some(1), 5), card(2, Some(1), -5)];
    let queue = build_review_queue(cards, now(), DueScope::All, None);
    assert_eq!(ids(&queue), vec![2]);
  }

  #[test]
  fn test_due_scope_from_note_id() {
    assert_eq!(DueScope::from_note_id(None), DueScope::All);
    assert_eq!(DueScope::from_note_id(Some(4)), DueScope::Note(4));
    assert_eq!(DueScope::Note(4).note_id(), Some(4));
    assert_eq!(DueScope::All.default_limit(), Some(config::DEFAULT_SESSION_LIMIT));
    assert_eq!(DueScope::Note(4).default_limit(), None);
  }

  #[test]
  fn test_count_due_within_window() {
    let cards = vec![
      card(1, None, -10),
      card(2, None, 24),
      card(3, None, 24 * 7),
      card(4, None, 24 * 7 + 1),
    ];
    assert_eq!(count_due_within(&cards, now(), 0), 1);
    assert_eq!(count_due_within(&cards, now(), 1), 2);
    assert_eq!(count_due_within(&cards, now(), 7), 3);
    assert_eq!(count_due_within(&cards, now(), -3), 1);
  }

  #[test]
  fn test_count_due_within_huge_window_counts_everything() {
    let cards = vec![card(1, None, 0), card(2, None, 24 * 30), card(3, None, 24 * 36_500)];
    assert_eq!(count_due_within(&cards, now(), 1_000_000_000), 3);
    assert_eq!(count_due_within(&cards, now(), i64::MAX), 3);
  }

  #[test]
  fn test_summarize_by_note() {
    let cards = vec![
      card(1, Some(2), -1),
      card(2, Some(1), 5),
      card(3, Some(2), 5),
      card(4, Some(2), -3),
      card(5, None, -3),
    ];

    let summary = summarize_by_note(&cards, now());
    assert_eq!(
      summary,
      vec![
        NoteDueSummary { note_id: 1, total_cards: 1, due_cards: 0 },
        NoteDueSummary { note_id: 2, total_cards: 3, due_cards: 2 },
      ]
    );
  }
}
