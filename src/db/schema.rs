use rusqlite::{Connection, Result};

pub fn run_migrations(conn: &Connection) -> Result<()> {
  conn.execute_batch(
    r#"
    CREATE TABLE IF NOT EXISTS cards (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      user_id INTEGER NOT NULL,
      note_id INTEGER,
      card_type TEXT NOT NULL,
      question TEXT NOT NULL,
      answer TEXT NOT NULL,
      ease_factor REAL NOT NULL DEFAULT 2.5,
      interval_days INTEGER NOT NULL DEFAULT 1,
      repetitions INTEGER NOT NULL DEFAULT 0,
      next_review TEXT NOT NULL,
      created_at TEXT NOT NULL,
      updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS card_reviews (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      card_id INTEGER NOT NULL,
      user_id INTEGER NOT NULL,
      session_id INTEGER,
      quality INTEGER NOT NULL CHECK (quality BETWEEN 0 AND 5),
      time_taken INTEGER NOT NULL DEFAULT 0,
      reviewed_at TEXT NOT NULL,
      FOREIGN KEY (card_id) REFERENCES cards(id)
    );

    -- Indexes
    CREATE INDEX IF NOT EXISTS idx_cards_user_next_review ON cards(user_id, next_review);
    CREATE INDEX IF NOT EXISTS idx_cards_note_id ON cards(note_id);
    CREATE INDEX IF NOT EXISTS idx_card_reviews_card_id ON card_reviews(card_id);
    CREATE INDEX IF NOT EXISTS idx_card_reviews_user_reviewed_at ON card_reviews(user_id, reviewed_at);
    "#,
  )?;

  Ok(())
}
