//! Collaborator Traits
//!
//! Persistence and external-provider interfaces. Implementations live in the
//! infrastructure layer; tests supply in-memory doubles.

use crate::domain::entity::{
    external_identity::ExternalIdentity,
    user::{NewUser, User},
};
use crate::domain::value_object::{email::Email, user_id::UserId};
use crate::error::AuthResult;

/// User lookup and creation
#[trait_variant::make(UserDirectory: Send)]
pub trait LocalUserDirectory {
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Insert a user. Fails with `AuthError::EmailTaken` when the email is
    /// already present, including when a concurrent insert won the race.
    async fn create(&self, user: NewUser) -> AuthResult<User>;
}

/// OAuth 2.0 authorization-code provider
#[trait_variant::make(OAuthProvider: Send)]
pub trait LocalOAuthProvider {
    /// Provider consent page URL carrying `state`
    fn authorize_url(&self, state: &str) -> String;

    /// Trade an authorization code for the user's profile
    async fn exchange_code(&self, code: &str) -> AuthResult<ExternalIdentity>;
}
