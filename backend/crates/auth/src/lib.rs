//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, collaborator traits
//! - `application/` - Use cases of the session/token issuer
//! - `infra/` - Postgres directory, JWT codec, Google OAuth client
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Session Model
//! - Access token (1 hour) returned in the JSON body, sent back as a bearer token
//! - Refresh token (7 days) delivered only in an HTTP-only `refreshToken` cookie
//!   that expires after 1 day
//! - Refresh issues a fresh pair; superseded refresh tokens are not revoked
//! - Passwords hashed with Argon2id; OAuth accounts have no password

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::{GoogleOAuthClient, GoogleOAuthConfig, JwtCodec, PgUserDirectory};
pub use presentation::{AuthAppState, auth_router, users_router};

pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

#[cfg(test)]
mod tests;
