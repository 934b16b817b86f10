pub mod cards;
pub mod notes;
pub mod stats;

use axum::{routing::get, routing::post, Router};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub use cards::{card_reviews, due_cards, submit_review, upcoming};
pub use notes::{create_cards, due_summary};
pub use stats::stats;

/// JSON API routes with request tracing
pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/api/cards/review", post(submit_review))
    .route("/api/cards/due", get(due_cards))
    .route("/api/cards/upcoming", get(upcoming))
    .route("/api/cards/{id}/reviews", get(card_reviews))
    .route("/api/notes/{note_id}/cards", post(create_cards))
    .route("/api/notes/due-summary", get(due_summary))
    .route("/api/stats", get(stats))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
