//! Error type shared by the store, the study service and the HTTP handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::db::DbLockError;

#[derive(Error, Debug)]
pub enum StudyError {
    /// Quality rating outside 0-5 or not an integer
    #[error("Quality must be an integer between 0 and 5, got {0}")]
    InvalidQuality(String),

    /// Card missing or owned by someone else
    #[error("Card not found: {0}")]
    CardNotFound(i64),

    /// Malformed or incomplete request
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    /// Database mutex poisoned
    #[error("Database unavailable")]
    DbUnavailable,

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, StudyError>;

impl From<DbLockError> for StudyError {
    fn from(_: DbLockError) -> Self {
        StudyError::DbUnavailable
    }
}

impl StudyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidQuality(_) | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::CardNotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::DbUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for StudyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            // Don't leak SQL details to clients
            Self::Database(e) => {
                tracing::error!("Database error: {}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            StudyError::InvalidQuality("7".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(StudyError::CardNotFound(3).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            StudyError::InvalidRequest("Card ID and quality required".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(StudyError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            StudyError::DbUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            StudyError::Database(rusqlite::Error::QueryReturnedNoRows).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            StudyError::InvalidQuality("3.5".into()).to_string(),
            "Quality must be an integer between 0 and 5, got 3.5"
        );
        assert_eq!(StudyError::CardNotFound(42).to_string(), "Card not found: 42");
    }

    #[test]
    fn test_lock_error_maps_to_unavailable() {
        let err: StudyError = DbLockError.into();
        assert!(matches!(err, StudyError::DbUnavailable));
    }
}
