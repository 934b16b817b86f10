//! Study service: the review, queue and statistics flows.
//!
//! Every function takes the caller's user id and scopes store access to it,
//! and takes `now` explicitly so the whole flow can be replayed in tests.

use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::{self, LogOnError};
use crate::domain::{Card, CardType, ReviewEvent, ReviewQuality};
use crate::error::{Result, StudyError};
use crate::srs::{self, DueScope, NoteDueSummary, StudyStats};

/// Outcome returned to the reviewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub card_id: i64,
    pub ease_factor: f64,
    pub interval_days: i64,
    pub repetitions: i64,
    pub next_review: DateTime<Utc>,
}

/// Record one review: load the owned card, schedule it, persist, log history.
///
/// A missing card short-circuits before any scheduling happens. Failing to
/// append the history row is logged but does not fail the review.
pub fn record_review(
    conn: &Connection,
    user_id: i64,
    card_id: i64,
    quality: ReviewQuality,
    time_taken_ms: Option<i64>,
    session_id: Option<i64>,
    now: DateTime<Utc>,
) -> Result<ReviewOutcome> {
    let mut card = db::get_card_for_user(conn, card_id, user_id)?
        .ok_or(StudyError::CardNotFound(card_id))?;

    let result = srs::calculate_sm2(quality, &card.schedule(), now);
    db::update_card_schedule(conn, card.id, &result, now)?;
    card.apply_review(&result, now);

    let mut event = ReviewEvent::new(card.id, user_id, quality, time_taken_ms, now);
    if let Some(session_id) = session_id {
        event = event.with_session(session_id);
    }
    db::insert_review_event(conn, &event).log_warn("Failed to record review");

    tracing::debug!(
        card_id = card.id,
        quality = quality.as_u8(),
        interval_days = result.interval_days,
        repetitions = result.repetitions,
        "Review recorded"
    );

    Ok(ReviewOutcome {
        card_id: card.id,
        ease_factor: card.ease_factor,
        interval_days: card.interval_days,
        repetitions: card.repetitions,
        next_review: card.next_review,
    })
}

/// Review queue for a user: scope, due filter, priority order, session cap
pub fn fetch_due_cards(
    conn: &Connection,
    user_id: i64,
    scope: DueScope,
    max_cards: Option<usize>,
    now: DateTime<Utc>,
) -> Result<Vec<Card>> {
    let cards = db::list_cards(conn, user_id, scope.note_id())?;
    Ok(srs::build_review_queue(cards, now, scope, max_cards))
}

/// Cards due now or within the next `days`
pub fn count_upcoming(conn: &Connection, user_id: i64, days: i64, now: DateTime<Utc>) -> Result<usize> {
    let cards = db::list_cards(conn, user_id, None)?;
    Ok(srs::count_due_within(&cards, now, days))
}

pub fn note_due_summary(conn: &Connection, user_id: i64, now: DateTime<Utc>) -> Result<Vec<NoteDueSummary>> {
    let cards = db::list_cards(conn, user_id, None)?;
    Ok(srs::summarize_by_note(&cards, now))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsReport {
    #[serde(flatten)]
    pub stats: StudyStats,
    pub retention_rate: u32,
    /// Days of review history the retention rate covers
    pub window_days: i64,
}

/// Card statistics plus the retention rate over the last `window_days`
pub fn compute_stats(
    conn: &Connection,
    user_id: i64,
    window_days: i64,
    now: DateTime<Utc>,
) -> Result<StatsReport> {
    let cards = db::list_cards(conn, user_id, None)?;
    // A window too large to subtract covers the whole history
    let since = Duration::try_days(window_days.max(0))
        .and_then(|d| now.checked_sub_signed(d))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    let recent = db::get_reviews_since(conn, user_id, since)?;

    Ok(StatsReport {
        stats: srs::study_stats(&cards, now),
        retention_rate: srs::retention_rate(&recent),
        window_days,
    })
}

/// Review history of one owned card
pub fn card_history(conn: &Connection, user_id: i64, card_id: i64) -> Result<Vec<ReviewEvent>> {
    db::get_card_for_user(conn, card_id, user_id)?.ok_or(StudyError::CardNotFound(card_id))?;
    Ok(db::get_card_reviews(conn, card_id, user_id)?)
}

/// A card as produced by the extraction step, before scheduling
#[derive(Debug, Clone, Deserialize)]
pub struct CardDraft {
    pub card_type: CardType,
    pub question: String,
    pub answer: String,
}

/// Store extracted cards under a note with fresh scheduling state, due now
pub fn create_cards(
    conn: &Connection,
    user_id: i64,
    note_id: i64,
    drafts: Vec<CardDraft>,
    now: DateTime<Utc>,
) -> Result<Vec<Card>> {
    if let Some(blank) = drafts
        .iter()
        .position(|d| d.question.trim().is_empty() || d.answer.trim().is_empty())
    {
        return Err(StudyError::InvalidRequest(format!(
            "Card {} needs both a question and an answer",
            blank
        )));
    }

    let tx = conn.unchecked_transaction()?;
    let mut created = Vec::with_capacity(drafts.len());
    for draft in drafts {
        let mut card = Card::new(
            user_id,
            Some(note_id),
            draft.card_type,
            draft.question.trim().to_string(),
            draft.answer.trim().to_string(),
            now,
        );
        card.id = db::insert_card(&tx, &card)?;
        created.push(card);
    }
    tx.commit()?;

    tracing::info!(note_id, count = created.len(), "Stored generated cards");
    Ok(created)
}
