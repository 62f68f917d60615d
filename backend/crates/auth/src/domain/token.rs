//! Tokens
//!
//! Access and refresh tokens share one claim shape: the user id plus the
//! standard issued-at and expiry claims. They differ only in lifetime.

use serde::{Deserialize, Serialize};

use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};

/// Signed payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User id (UUID string)
    pub id: String,
    /// Issued at, seconds since the Unix epoch
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch
    pub exp: i64,
}

impl TokenClaims {
    pub fn new(user_id: &UserId, issued_at: i64, ttl_secs: i64) -> Self {
        Self {
            id: user_id.to_string(),
            iat: issued_at,
            exp: issued_at.saturating_add(ttl_secs),
        }
    }

    /// Subject as a typed id; a malformed subject means a malformed token
    pub fn user_id(&self) -> AuthResult<UserId> {
        self.id
            .parse()
            .map_err(|_| AuthError::Validation("Token subject is not a user id".to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Signs and verifies tokens
#[trait_variant::make(TokenCodec: Send)]
pub trait LocalTokenCodec {
    fn sign(&self, claims: &TokenClaims) -> AuthResult<String>;

    /// Check signature and expiry, returning the claims
    async fn verify(&self, token: &str) -> AuthResult<TokenClaims>;
}
