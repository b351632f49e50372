use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::repositories::user_repository::RepositoryError;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Forbidden")]
    Forbidden,

    #[error("Not found")]
    NotFound,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error")]
    Internal,
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => AppError::NotFound,
            RepositoryError::Database(e) => AppError::Database(e),
            RepositoryError::AlreadyExists => {
                AppError::Validation("Record already exists".to_string())
            }
        }
    }
}

impl From<crate::services::user_service::UserServiceError> for AppError {
    fn from(err: crate::services::user_service::UserServiceError) -> Self {
        use crate::services::user_service::UserServiceError as E;
        match err {
            E::UserNotFound => AppError::NotFound,
            E::InvalidEmail | E::WeakPassword | E::PasswordMismatch | E::EmailTaken => {
                AppError::Validation(err.to_string())
            }
            E::UnknownRole(_) => AppError::Validation(err.to_string()),
            E::HashingError(_) => AppError::Internal,
            E::RepositoryError(e) => e.into(),
        }
    }
}

impl From<crate::services::client_service::ClientServiceError> for AppError {
    fn from(err: crate::services::client_service::ClientServiceError) -> Self {
        use crate::services::client_service::ClientServiceError as E;
        match err {
            E::NotFound => AppError::NotFound,
            E::Validation(msg) => AppError::Validation(msg),
            E::Database(e) => AppError::Database(e),
        }
    }
}

impl From<crate::services::employment_service::EmploymentServiceError> for AppError {
    fn from(err: crate::services::employment_service::EmploymentServiceError) -> Self {
        use crate::services::employment_service::EmploymentServiceError as E;
        match err {
            E::NotFound => AppError::NotFound,
            E::UnknownReference | E::InvalidStatus(_) => AppError::Validation(err.to_string()),
            E::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // Browser flow: an unauthenticated page request goes back to login.
            AppError::Unauthenticated => Redirect::to("/login").into_response(),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden".to_string()).into_response(),
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()).into_response(),
            AppError::Validation(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, msg).into_response()
            }
            AppError::Database(_) | AppError::Session(_) | AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
                .into_response(),
        }
    }
}
