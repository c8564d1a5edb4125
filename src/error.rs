use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Everything that can go wrong while resolving or creating a short link.
///
/// All variants map directly to an HTTP status; user-input errors carry
/// their message through to the caller, infrastructure errors do not.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("Short link not found.")]
    NotFound,

    #[error("Short link has expired.")]
    Expired,

    #[error("This link is password protected.")]
    PasswordRequired,

    #[error("Password is incorrect.")]
    WrongPassword,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for LinkError {
    fn into_response(self) -> Response {
        let status = match &self {
            LinkError::NotFound => StatusCode::NOT_FOUND,
            LinkError::Expired => StatusCode::GONE,
            LinkError::PasswordRequired => StatusCode::UNAUTHORIZED,
            LinkError::WrongPassword => StatusCode::FORBIDDEN,
            LinkError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            LinkError::Database(e) => {
                tracing::error!("database error: {:?}", e);
                return (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response();
            }
            LinkError::Internal(e) => {
                tracing::error!("internal error: {:?}", e);
                return (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response();
            }
        };

        (status, self.to_string()).into_response()
    }
}
