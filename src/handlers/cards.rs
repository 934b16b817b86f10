//! Card review and queue endpoints.

use axum::{
  extract::{Path, Query, State},
  Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::AuthContext;
use crate::db::try_lock;
use crate::domain::{Card, ReviewEvent, ReviewQuality};
use crate::error::{Result, StudyError};
use crate::services::study::{self, ReviewOutcome};
use crate::srs::sm2::MAX_INTERVAL_DAYS;
use crate::srs::DueScope;
use crate::state::AppState;

// ============================================================================
// Review
// ============================================================================

/// Fields are optional so a missing one is reported as a 400 with our own
/// message instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
  pub card_id: Option<i64>,
  pub quality: Option<serde_json::Value>,
  /// Milliseconds spent on the card, 0 when absent
  pub time_taken: Option<i64>,
  pub session_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
  pub success: bool,
  #[serde(flatten)]
  pub outcome: ReviewOutcome,
}

/// Record a review and return the card's next schedule.
///
/// The body is validated before the caller's identity is checked, so an
/// incomplete request is a 400 even without credentials.
///
/// POST /api/cards/review
pub async fn submit_review(
  auth: std::result::Result<AuthContext, StudyError>,
  State(state): State<AppState>,
  Json(request): Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>> {
  let (Some(card_id), Some(quality)) = (request.card_id, request.quality.filter(|q| !q.is_null()))
  else {
    return Err(StudyError::InvalidRequest(
      "Card ID and quality required".to_string(),
    ));
  };
  let quality = ReviewQuality::try_from(&quality)?;
  if request.time_taken.is_some_and(|ms| ms < 0) {
    return Err(StudyError::InvalidRequest(
      "time_taken must not be negative".to_string(),
    ));
  }
  let auth = auth?;

  let conn = try_lock(&state.db)?;
  let outcome = study::record_review(
    &conn,
    auth.user_id,
    card_id,
    quality,
    request.time_taken,
    request.session_id,
    state.clock.now(),
  )?;

  Ok(Json(ReviewResponse {
    success: true,
    outcome,
  }))
}

// ============================================================================
// Queues
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct DueQuery {
  pub note_id: Option<i64>,
  pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct DueResponse {
  pub count: usize,
  pub cards: Vec<Card>,
}

/// Due cards, most overdue first.
///
/// Without a note the queue is capped at the session limit; a single note's
/// queue is only capped when `limit` is given.
///
/// GET /api/cards/due?note_id=&limit=
pub async fn due_cards(
  auth: AuthContext,
  State(state): State<AppState>,
  Query(query): Query<DueQuery>,
) -> Result<Json<DueResponse>> {
  let scope = DueScope::from_note_id(query.note_id);
  let max_cards = query
    .limit
    .or_else(|| scope.default_limit().map(|_| state.study.session_limit));

  let conn = try_lock(&state.db)?;
  let cards = study::fetch_due_cards(&conn, auth.user_id, scope, max_cards, state.clock.now())?;

  Ok(Json(DueResponse {
    count: cards.len(),
    cards,
  }))
}

#[derive(Debug, Deserialize)]
pub struct UpcomingQuery {
  pub days: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct UpcomingResponse {
  pub days: i64,
  pub count: usize,
}

/// GET /api/cards/upcoming?days=
pub async fn upcoming(
  auth: AuthContext,
  State(state): State<AppState>,
  Query(query): Query<UpcomingQuery>,
) -> Result<Json<UpcomingResponse>> {
  let days = query.days.unwrap_or(state.study.upcoming_window_days);
  if !(0..=MAX_INTERVAL_DAYS).contains(&days) {
    return Err(StudyError::InvalidRequest(format!(
      "days must be between 0 and {}",
      MAX_INTERVAL_DAYS
    )));
  }

  let conn = try_lock(&state.db)?;
  let count = study::count_upcoming(&conn, auth.user_id, days, state.clock.now())?;

  Ok(Json(UpcomingResponse { days, count }))
}

/// GET /api/cards/{id}/reviews
pub async fn card_reviews(
  auth: AuthContext,
  State(state): State<AppState>,
  Path(card_id): Path<i64>,
) -> Result<Json<Vec<ReviewEvent>>> {
  let conn = try_lock(&state.db)?;
  let history = study::card_history(&conn, auth.user_id, card_id)?;
  Ok(Json(history))
}
