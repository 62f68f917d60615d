//! Login Use Case
//!
//! Email + password login.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::issue_tokens::{AuthOutput, TokenIssuer};
use crate::domain::repository::UserDirectory;
use crate::domain::token::TokenCodec;
use crate::domain::value_object::{email::Email, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

pub struct LoginUseCase<U, C>
where
    U: UserDirectory,
    C: TokenCodec,
{
    users: Arc<U>,
    issuer: TokenIssuer<C>,
    config: Arc<AuthConfig>,
}

impl<U, C> LoginUseCase<U, C>
where
    U: UserDirectory,
    C: TokenCodec,
{
    pub fn new(users: Arc<U>, codec: Arc<C>, config: Arc<AuthConfig>) -> Self {
        Self {
            users,
            issuer: TokenIssuer::new(codec, config.clone()),
            config,
        }
    }

    /// Unknown email is `UserNotFound`; a wrong password, or an account
    /// without one, is `InvalidCredentials`.
    pub async fn execute(&self, input: LoginInput) -> AuthResult<AuthOutput> {
        let email = Email::new(&input.email)?;
        let password = RawPassword::for_login(input.password);

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let verified = user
            .password_hash
            .as_ref()
            .is_some_and(|hash| hash.verify(&password, self.config.pepper()));
        if !verified {
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.user_id, "User logged in");

        self.issuer.output(user)
    }
}
