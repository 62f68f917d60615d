//! Register Use Case
//!
//! Creates a password account and logs it in.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::issue_tokens::{AuthOutput, TokenIssuer};
use crate::domain::entity::user::NewUser;
use crate::domain::repository::UserDirectory;
use crate::domain::token::TokenCodec;
use crate::domain::value_object::{
    email::Email,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

pub struct RegisterInput {
    pub email: String,
    pub password: String,
    /// Display name; the email local part when absent
    pub name: Option<String>,
}

pub struct RegisterUseCase<U, C>
where
    U: UserDirectory,
    C: TokenCodec,
{
    users: Arc<U>,
    issuer: TokenIssuer<C>,
    config: Arc<AuthConfig>,
}

impl<U, C> RegisterUseCase<U, C>
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

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<AuthOutput> {
        let email = Email::new(&input.email)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let raw_password = RawPassword::new(input.password)
            .map_err(|e| AuthError::PasswordValidation(e.message().to_string()))?;
        let password_hash = UserPassword::from_raw(&raw_password, self.config.pepper())?;

        // A concurrent registration can still win between the lookup and the
        // insert; the directory reports that as `EmailTaken` too.
        let user = self
            .users
            .create(NewUser::with_password(email, input.name, password_hash))
            .await?;

        tracing::info!(user_id = %user.user_id, "User registered");

        self.issuer.output(user)
    }
}
