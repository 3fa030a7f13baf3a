// src/error.rs

use axum::extract::rejection::{FormRejection, PathRejection};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

/// Where gated routes send anonymous visitors.
pub const LOGIN_PATH: &str = "/auth/login";

/// Request-ending failures. Validation problems are not errors here: they
/// re-render the form (see `entities::ValidationErrors`).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{entity} id {id} doesn't exist.")]
    NotFound { entity: &'static str, id: i64 },

    #[error("login required")]
    LoginRequired,

    /// A path segment that can't be a record id (`/lead/abc/update`).
    #[error("no such record: {0}")]
    BadPath(#[from] PathRejection),

    #[error("bad form: {0}")]
    BadForm(#[from] FormRejection),

    #[error("password hashing failed: {0}")]
    PasswordHash(argon2::password_hash::Error),

    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, self.to_string()).into_response(),
            AppError::LoginRequired => found(LOGIN_PATH),
            AppError::BadPath(_) => (StatusCode::NOT_FOUND, "Not Found".to_string()).into_response(),
            AppError::BadForm(rejection) => rejection.into_response(),
            AppError::PasswordHash(ref err) => {
                error!("Password hashing failure: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
                    .into_response()
            }
            AppError::Store(ref err) => {
                error!("Store failure: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
                    .into_response()
            }
        }
    }
}

/// Plain `302 Found`. `axum::response::Redirect` only offers 303/307/308.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
