//! Authentication extractor.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::StudyError;
use crate::state::AppState;

/// Header carrying the authenticated user id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated request context.
/// Add this as a handler parameter to require authentication.
/// Rejects with 401 when the header is missing or not a positive integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: i64,
}

impl AuthContext {
    fn from_header(value: Option<&str>) -> Result<Self, StudyError> {
        let user_id = value
            .map(str::trim)
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|id| *id > 0)
            .ok_or(StudyError::Unauthorized)?;
        Ok(Self { user_id })
    }
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = StudyError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok());

        let ctx = AuthContext::from_header(header);
        if ctx.is_err() {
            tracing::debug!(path = %parts.uri.path(), "Rejected request without valid user id");
        }
        ctx
    }
}
