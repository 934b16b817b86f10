//! Card CRUD and query operations

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result};

use crate::domain::{Card, CardType};
use crate::srs::Sm2Result;

use super::{parse_db_time, to_db_time};

const CARD_COLUMNS: &str = "id, user_id, note_id, card_type, question, answer, ease_factor, \
                            interval_days, repetitions, next_review, created_at, updated_at";

pub fn insert_card(conn: &Connection, card: &Card) -> Result<i64> {
    conn.execute(
        r#"
    INSERT INTO cards (user_id, note_id, card_type, question, answer, ease_factor,
                       interval_days, repetitions, next_review, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
    "#,
        params![
            card.user_id,
            card.note_id,
            card.card_type.as_str(),
            card.question,
            card.answer,
            card.ease_factor,
            card.interval_days,
            card.repetitions,
            to_db_time(&card.next_review),
            to_db_time(&card.created_at),
            to_db_time(&card.updated_at),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Fetch a card only if it belongs to `user_id`
pub fn get_card_for_user(conn: &Connection, id: i64, user_id: i64) -> Result<Option<Card>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM cards WHERE id = ?1 AND user_id = ?2",
        CARD_COLUMNS
    ))?;

    let mut rows = stmt.query(params![id, user_id])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row_to_card(row)?))
    } else {
        Ok(None)
    }
}

/// All of a user's cards, optionally restricted to one note, in insertion order
pub fn list_cards(conn: &Connection, user_id: i64, note_id: Option<i64>) -> Result<Vec<Card>> {
    let mut stmt = conn.prepare(&format!(
        r#"
    SELECT {}
    FROM cards
    WHERE user_id = ?1 AND (?2 IS NULL OR note_id = ?2)
    ORDER BY id ASC
    "#,
        CARD_COLUMNS
    ))?;

    let cards = stmt
        .query_map(params![user_id, note_id], row_to_card)?
        .collect::<Result<Vec<_>>>()?;
    Ok(cards)
}

/// Persist the scheduling fields produced by a review
pub fn update_card_schedule(
    conn: &Connection,
    id: i64,
    result: &Sm2Result,
    updated_at: DateTime<Utc>,
) -> Result<()> {
    conn.execute(
        r#"
    UPDATE cards
    SET ease_factor = ?1, interval_days = ?2, repetitions = ?3, next_review = ?4, updated_at = ?5
    WHERE id = ?6
    "#,
        params![
            result.ease_factor,
            result.interval_days,
            result.repetitions,
            to_db_time(&result.next_review),
            to_db_time(&updated_at),
            id,
        ],
    )?;
    Ok(())
}

/// Convert a database row to Card
fn row_to_card(row: &rusqlite::Row) -> Result<Card> {
    let card_type_str: String = row.get(3)?;
    let card_type = CardType::from_str(&card_type_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            format!("unknown card type: {}", card_type_str).into(),
        )
    })?;

    let next_review: String = row.get(9)?;
    let created_at: String = row.get(10)?;
    let updated_at: String = row.get(11)?;

    Ok(Card {
        id: row.get(0)?,
        user_id: row.get(1)?,
        note_id: row.get(2)?,
        card_type,
        question: row.get(4)?,
        answer: row.get(5)?,
        ease_factor: row.get(6)?,
        interval_days: row.get(7)?,
        repetitions: row.get(8)?,
        next_review: parse_db_time(9, &next_review)?,
        created_at: parse_db_time(10, &created_at)?,
        updated_at: parse_db_time(11, &updated_at)?,
    })
}
