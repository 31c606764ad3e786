use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::repositories::RepoError;
use crate::services::auth::AuthError;

/// Every failure a handler can answer with. Rendered as `(status, message)`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    /// Persistence or other unexpected failure; the message is generic.
    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    pub fn not_found(what: &str) -> Self {
        ApiError::NotFound(format!("{what} not found."))
    }

    /// Maps a repository failure, using `operation` as the message for
    /// unexpected errors (e.g. "Create error").
    pub fn repo(err: RepoError, operation: &'static str) -> Self {
        match err {
            RepoError::Restricted(_) | RepoError::Duplicate(_) => ApiError::Conflict(err.to_string()),
            RepoError::MissingParent(_) => ApiError::BadRequest(err.to_string()),
            RepoError::Database(e) => {
                tracing::error!("{}: {:?}", operation, e);
                ApiError::Internal(operation)
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        ApiError::repo(err, "Database error")
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::UnknownUser => {
                ApiError::NotFound("No user with that username. Check your details.".to_string())
            }
            AuthError::WrongPassword => ApiError::Unauthorized(
                "Password does not match the username. Check that you entered it correctly.".to_string(),
            ),
            AuthError::InvalidToken(_) => ApiError::Unauthorized("Invalid or expired token".to_string()),
            AuthError::Repo(e) => ApiError::repo(e, "Authentication error"),
            AuthError::Token(_) | AuthError::Hash(_) | AuthError::Worker(_) => {
                tracing::error!("authentication failure: {:?}", err);
                ApiError::Internal("Authentication error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_errors_map_to_statuses() {
        let restricted = ApiError::repo(RepoError::Restricted("performance"), "Delete error");
        assert_eq!(restricted.status(), StatusCode::CONFLICT);

        let missing = ApiError::repo(RepoError::MissingParent("theater"), "Create error");
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
        assert_eq!(missing.to_string(), "referenced theater does not exist");

        let db = ApiError::repo(RepoError::Database(sqlx::Error::PoolTimedOut), "Create error");
        assert_eq!(db.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(db.to_string(), "Create error");
    }

    #[test]
    fn login_failures_keep_not_found_and_unauthorized_apart() {
        assert_eq!(ApiError::from(AuthError::UnknownUser).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::from(AuthError::WrongPassword).status(), StatusCode::UNAUTHORIZED);
    }
}
