//! Token Issuance
//!
//! Turns a user id into an access/refresh token pair. Both tokens carry the
//! same claims apart from expiry.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::token::{TokenClaims, TokenCodec, TokenPair};
use crate::domain::value_object::user_id::UserId;
use crate::error::AuthResult;

/// Result of every successful login-like use case
#[derive(Debug, Clone)]
pub struct AuthOutput {
    pub user: User,
    pub tokens: TokenPair,
}

pub struct TokenIssuer<C>
where
    C: TokenCodec,
{
    codec: Arc<C>,
    config: Arc<AuthConfig>,
}

impl<C> TokenIssuer<C>
where
    C: TokenCodec,
{
    pub fn new(codec: Arc<C>, config: Arc<AuthConfig>) -> Self {
        Self { codec, config }
    }

    pub fn issue(&self, user_id: &UserId) -> AuthResult<TokenPair> {
        self.issue_at(user_id, Utc::now())
    }

    pub fn issue_at(&self, user_id: &UserId, issued_at: DateTime<Utc>) -> AuthResult<TokenPair> {
        let iat = issued_at.timestamp();
        let access = TokenClaims::new(user_id, iat, secs(self.config.access_token_ttl));
        let refresh = TokenClaims::new(user_id, iat, secs(self.config.refresh_token_ttl));

        Ok(TokenPair {
            access_token: self.codec.sign(&access)?,
            refresh_token: self.codec.sign(&refresh)?,
        })
    }

    pub(crate) fn output(&self, user: User) -> AuthResult<AuthOutput> {
        let tokens = self.issue(&user.user_id)?;
        Ok(AuthOutput { user, tokens })
    }
}

fn secs(ttl: std::time::Duration) -> i64 {
    i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX)
}
