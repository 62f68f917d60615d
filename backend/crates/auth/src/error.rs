//! Auth Error Types
//!
//! Auth-specific error variants. Every variant maps to a
//! [`kernel::error::kind::ErrorKind`] and is rendered through
//! [`kernel::error::app_error::AppError`] at the HTTP boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    /// No user with the given email
    #[error("User not found")]
    UserNotFound,

    #[error("A user with this email already exists")]
    EmailTaken,

    /// Wrong password, or a password login against an OAuth-only account
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Refresh token not passed")]
    MissingRefreshToken,

    #[error("Invalid or missing access token")]
    InvalidAccessToken,

    /// Refresh token verified but its subject no longer exists
    #[error("User for this token no longer exists")]
    RefreshSubjectMissing,

    #[error("Failed to create user")]
    UserCreationFailed,

    #[error("OAuth state mismatch")]
    OAuthStateMismatch,

    /// Upstream OAuth provider failure
    #[error("OAuth provider error: {0}")]
    OAuth(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    PasswordValidation(String),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::InvalidCredentials
            | AuthError::InvalidRefreshToken
            | AuthError::MissingRefreshToken
            | AuthError::InvalidAccessToken
            | AuthError::Token(_) => ErrorKind::Unauthorized,
            AuthError::RefreshSubjectMissing
            | AuthError::OAuthStateMismatch
            | AuthError::Validation(_)
            | AuthError::PasswordValidation(_) => ErrorKind::BadRequest,
            AuthError::OAuth(_) => ErrorKind::BadGateway,
            AuthError::UserCreationFailed | AuthError::Database(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Server-side details (SQL, upstream bodies) stay out of the response
    pub fn to_app_error(&self) -> AppError {
        let message = match self {
            AuthError::Database(_) | AuthError::Internal(_) => {
                "An internal error occurred".to_string()
            }
            AuthError::OAuth(_) => "Sign-in with the external provider failed".to_string(),
            _ => self.to_string(),
        };

        let err = AppError::new(self.kind(), message);
        match self {
            AuthError::MissingRefreshToken | AuthError::InvalidRefreshToken => {
                err.with_action("Sign in again")
            }
            AuthError::EmailTaken => err.with_action("Sign in instead"),
            _ => err,
        }
    }

    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::UserCreationFailed => {
                tracing::error!("User creation failed");
            }
            AuthError::OAuth(msg) => {
                tracing::error!(message = %msg, "OAuth provider error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::OAuthStateMismatch => {
                tracing::warn!("OAuth callback state mismatch");
            }
            AuthError::Token(e) => {
                tracing::warn!(error = %e, "Token rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

/// Value objects report invalid input as `BadRequest` app errors
impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest => AuthError::Validation(err.message().to_string()),
            _ => AuthError::Internal(err.to_string()),
        }
    }
}
