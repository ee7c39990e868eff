use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

/// Failure taxonomy shared by every handler. Each variant maps to one HTTP
/// status at the request boundary; nothing is retried automatically.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    DuplicateEntry(String),

    /// Operation not permitted in the record's current lifecycle state.
    #[error("{0}")]
    InvalidState(String),

    #[error("{0}")]
    Validation(String),

    #[error("Internal Server Error")]
    Server(#[source] sqlx::Error),
}

impl ApiError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        ApiError::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        ApiError::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }

    pub fn duplicate(msg: impl Into<String>) -> Self {
        ApiError::DuplicateEntry(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        ApiError::InvalidState(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    /// Maps a storage failure to the taxonomy. MySQL reports unique-key
    /// violations as SQLSTATE 23000; a concurrent duplicate attempt loses the
    /// race here and surfaces as DuplicateEntry rather than overwriting.
    pub fn from_sqlx(e: sqlx::Error, duplicate_msg: &str) -> Self {
        if is_duplicate_entry(&e) {
            return ApiError::DuplicateEntry(duplicate_msg.to_string());
        }
        ApiError::Server(e)
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::Unauthorized(_) => "Unauthorized",
            ApiError::Forbidden(_) => "Forbidden",
            ApiError::NotFound(_) => "NotFound",
            ApiError::DuplicateEntry(_) => "DuplicateEntry",
            ApiError::InvalidState(_) => "InvalidState",
            ApiError::Validation(_) => "ValidationError",
            ApiError::Server(_) => "ServerError",
        }
    }
}

pub fn is_duplicate_entry(e: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = e {
        return db_err.code().as_deref() == Some("23000");
    }
    false
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Server(e)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::DuplicateEntry(_) | ApiError::InvalidState(_) | ApiError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Server(e) = self {
            tracing::error!(error = %e, "request failed");
        }
        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "message": self.to_string(),
            "error": self.kind(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(
            ApiError::unauthorized("no token").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::forbidden("HR/Admin only").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::not_found("Employee not found").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::duplicate("already exists").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::invalid_state("already processed").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::validation("start after end").status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn server_error_hides_details() {
        let e = ApiError::Server(sqlx::Error::RowNotFound);
        assert_eq!(e.to_string(), "Internal Server Error");
        assert_eq!(e.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn non_database_sqlx_error_is_server_error() {
        let e = ApiError::from_sqlx(sqlx::Error::RowNotFound, "dup");
        assert!(matches!(e, ApiError::Server(_)));
    }

    #[test]
    fn kind_matches_variant() {
        assert_eq!(ApiError::duplicate("x").kind(), "DuplicateEntry");
        assert_eq!(ApiError::validation("x").kind(), "ValidationError");
    }
}
