//! OAuth Login Use Case
//!
//! Logs in the owner of an external identity, creating a password-less
//! account on first sight of the email.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::issue_tokens::{AuthOutput, TokenIssuer};
use crate::domain::entity::{
    external_identity::ExternalIdentity,
    user::{NewUser, User},
};
use crate::domain::repository::UserDirectory;
use crate::domain::token::TokenCodec;
use crate::error::{AuthError, AuthResult};

pub struct OAuthLoginUseCase<U, C>
where
    U: UserDirectory,
    C: TokenCodec,
{
    users: Arc<U>,
    issuer: TokenIssuer<C>,
}

impl<U, C> OAuthLoginUseCase<U, C>
where
    U: UserDirectory,
    C: TokenCodec,
{
    pub fn new(users: Arc<U>, codec: Arc<C>, config: Arc<AuthConfig>) -> Self {
        Self {
            users,
            issuer: TokenIssuer::new(codec, config),
        }
    }

    pub async fn execute(&self, identity: ExternalIdentity) -> AuthResult<AuthOutput> {
        let user = match self.users.find_by_email(&identity.email).await? {
            Some(user) => user,
            None => self.create_user(&identity).await?,
        };

        tracing::info!(
            user_id = %user.user_id,
            provider = %identity.provider,
            "User logged in via OAuth"
        );

        self.issuer.output(user)
    }

    async fn create_user(&self, identity: &ExternalIdentity) -> AuthResult<User> {
        let new_user = NewUser {
            email: identity.email.clone(),
            name: identity.display_name(),
            picture: identity.picture.clone(),
            password_hash: None,
        };

        match self.users.create(new_user).await {
            Ok(user) => {
                tracing::info!(user_id = %user.user_id, provider = %identity.provider, "User created from OAuth profile");
                Ok(user)
            }
            // Lost a race with a concurrent first login for the same email
            Err(AuthError::EmailTaken) => self
                .users
                .find_by_email(&identity.email)
                .await?
                .ok_or(AuthError::UserCreationFailed),
            Err(e) => {
                tracing::error!(error = %e, provider = %identity.provider, "OAuth user creation failed");
                Err(AuthError::UserCreationFailed)
            }
        }
    }
}
