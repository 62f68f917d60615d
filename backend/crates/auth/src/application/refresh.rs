//! Refresh Use Case
//!
//! Exchanges a valid refresh token for a new token pair. The old refresh
//! token is not revoked; it stays usable until it expires.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::issue_tokens::{AuthOutput, TokenIssuer};
use crate::domain::repository::UserDirectory;
use crate::domain::token::TokenCodec;
use crate::error::{AuthError, AuthResult};

pub struct RefreshUseCase<U, C>
where
    U: UserDirectory,
    C: TokenCodec,
{
    users: Arc<U>,
    codec: Arc<C>,
    issuer: TokenIssuer<C>,
}

impl<U, C> RefreshUseCase<U, C>
where
    U: UserDirectory,
    C: TokenCodec,
{
    pub fn new(users: Arc<U>, codec: Arc<C>, config: Arc<AuthConfig>) -> Self {
        Self {
            users,
            issuer: TokenIssuer::new(codec.clone(), config),
            codec,
        }
    }

    pub async fn execute(&self, refresh_token: &str) -> AuthResult<AuthOutput> {
        let claims = self.codec.verify(refresh_token).await.map_err(|e| {
            tracing::debug!(error = %e, "Refresh token rejected");
            AuthError::InvalidRefreshToken
        })?;
        let user_id = claims
            .user_id()
            .map_err(|_| AuthError::InvalidRefreshToken)?;

        let user = self
            .users
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::RefreshSubjectMissing)?;

        tracing::debug!(user_id = %user.user_id, "Tokens refreshed");

        self.issuer.output(user)
    }
}
