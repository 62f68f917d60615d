//! User Password Value Object
//!
//! Domain wrappers over `platform::password`. [`RawPassword`] is what a user
//! typed, [`UserPassword`] is the Argon2id hash stored on the user row.

use kernel::error::app_error::{AppError, AppResult};
use platform::password::{ClearTextPassword, HashedPassword, PasswordPolicyError};
use std::fmt;

/// Password from request input, zeroized on drop
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Validate a new password against the policy (registration)
    pub fn new(raw: String) -> AppResult<Self> {
        ClearTextPassword::new(raw)
            .map(Self)
            .map_err(policy_error)
    }

    /// Wrap a login attempt without applying the policy
    pub fn for_login(raw: String) -> Self {
        Self(ClearTextPassword::for_verification(raw))
    }

    fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

fn policy_error(err: PasswordPolicyError) -> AppError {
    let action = match err {
        PasswordPolicyError::TooShort { .. } => "Choose a longer password",
        PasswordPolicyError::TooLong { .. } => "Choose a shorter password",
        PasswordPolicyError::EmptyOrWhitespace => "Enter a password",
        PasswordPolicyError::InvalidCharacter => "Remove control characters from the password",
        PasswordPolicyError::CommonPattern => "Choose a less predictable password",
    };
    AppError::bad_request(err.to_string()).with_action(action)
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawPassword([REDACTED])")
    }
}

/// Stored password hash (PHC string)
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> AppResult<Self> {
        raw.inner()
            .hash(pepper)
            .map(Self)
            .map_err(|e| AppError::internal("Password hashing failed").with_source(e))
    }

    pub fn from_phc_string(phc_string: impl Into<String>) -> AppResult<Self> {
        HashedPassword::from_phc_string(phc_string)
            .map(Self)
            .map_err(|e| AppError::internal("Invalid password hash in database").with_source(e))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(raw.inner(), pepper)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UserPassword([HASH])")
    }
}
