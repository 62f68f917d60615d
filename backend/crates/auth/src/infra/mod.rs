//! Infrastructure Layer
//!
//! Postgres user directory, JWT codec and the Google OAuth client.

pub mod google;
pub mod jwt;
pub mod postgres;

pub use google::{GoogleOAuthClient, GoogleOAuthConfig};
pub use jwt::JwtCodec;
pub use postgres::PgUserDirectory;
