use axum::{
  extract::{Path, State},
  http::StatusCode,
  Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::AuthContext;
use crate::db::try_lock;
use crate::domain::Card;
use crate::error::{Result, StudyError};
use crate::services::study::{self, CardDraft};
use crate::srs::NoteDueSummary;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCardsRequest {
  pub cards: Vec<CardDraft>,
}

#[derive(Debug, Serialize)]
pub struct CreateCardsResponse {
  pub success: bool,
  pub cards: Vec<Card>,
}

/// Store cards extracted from a note. New cards are due immediately.
///
/// POST /api/notes/{note_id}/cards
pub async fn create_cards(
  auth: AuthContext,
  State(state): State<AppState>,
  Path(note_id): Path<i64>,
  Json(request): Json<CreateCardsRequest>,
) -> Result<(StatusCode, Json<CreateCardsResponse>)> {
  if request.cards.is_empty() {
    return Err(StudyError::InvalidRequest("No cards provided".to_string()));
  }

  let conn = try_lock(&state.db)?;
  let cards = study::create_cards(&conn, auth.user_id, note_id, request.cards, state.clock.now())?;

  Ok((
    StatusCode::CREATED,
    Json(CreateCardsResponse {
      success: true,
      cards,
    }),
  ))
}

/// GET /api/notes/due-summary
pub async fn due_summary(
  auth: AuthContext,
  State(state): State<AppState>,
) -> Result<Json<Vec<NoteDueSummary>>> {
  let conn = try_lock(&state.db)?;
  let summary = study::note_due_summary(&conn, auth.user_id, state.clock.now())?;
  Ok(Json(summary))
}
