//! Review history (append-only)

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result};

use crate::domain::{ReviewEvent, ReviewQuality};

use super::{parse_db_time, to_db_time};

pub fn insert_review_event(conn: &Connection, event: &ReviewEvent) -> Result<i64> {
    conn.execute(
        r#"
    INSERT INTO card_reviews (card_id, user_id, session_id, quality, time_taken, reviewed_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    "#,
        params![
            event.card_id,
            event.user_id,
            event.session_id,
            event.quality.as_u8(),
            event.time_taken_ms,
            to_db_time(&event.reviewed_at),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// A user's reviews at or after `since`, oldest first
pub fn get_reviews_since(
    conn: &Connection,
    user_id: i64,
    since: DateTime<Utc>,
) -> Result<Vec<ReviewEvent>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT id, card_id, user_id, session_id, quality, time_taken, reviewed_at
    FROM card_reviews
    WHERE user_id = ?1 AND reviewed_at >= ?2
    ORDER BY reviewed_at ASC, id ASC
    "#,
    )?;

    let events = stmt
        .query_map(params![user_id, to_db_time(&since)], row_to_review_event)?
        .collect::<Result<Vec<_>>>()?;

    Ok(events)
}

/// Full review history of one card, oldest first
pub fn get_card_reviews(conn: &Connection, card_id: i64, user_id: i64) -> Result<Vec<ReviewEvent>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT id, card_id, user_id, session_id, quality, time_taken, reviewed_at
    FROM card_reviews
    WHERE card_id = ?1 AND user_id = ?2
    ORDER BY reviewed_at ASC, id ASC
    "#,
    )?;

    let events = stmt
        .query_map(params![card_id, user_id], row_to_review_event)?
        .collect::<Result<Vec<_>>>()?;

    Ok(events)
}

fn row_to_review_event(row: &rusqlite::Row) -> Result<ReviewEvent> {
    let quality_raw: u8 = row.get(4)?;
    let quality = ReviewQuality::from_u8(quality_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Integer,
            format!("quality out of range: {}", quality_raw).into(),
        )
    })?;
    let reviewed_at: String = row.get(6)?;

    Ok(ReviewEvent {
        id: row.get(0)?,
        card_id: row.get(1)?,
        user_id: row.get(2)?,
        session_id: row.get(3)?,
        quality,
        time_taken_ms: row.get(5)?,
        reviewed_at: parse_db_time(6, &reviewed_at)?,
    })
}
