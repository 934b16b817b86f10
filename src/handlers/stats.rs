use axum::{extract::State, Json};

use crate::auth::AuthContext;
use crate::db::try_lock;
use crate::error::Result;
use crate::services::study::{self, StatsReport};
use crate::state::AppState;

/// Card counts by maturity plus the recent retention rate.
///
/// GET /api/stats
pub async fn stats(auth: AuthContext, State(state): State<AppState>) -> Result<Json<StatsReport>> {
  let conn = try_lock(&state.db)?;
  let report = study::compute_stats(
    &conn,
    auth.user_id,
    state.study.retention_window_days,
    state.clock.now(),
  )?;
  Ok(Json(report))
}
