//! Password policy and Argon2id hashing
//!
//! Raw input is NFKC-normalized, checked against the policy, and held in a
//! [`ClearTextPassword`] that is wiped on drop. Only the PHC string of a
//! [`HashedPassword`] is ever persisted. An optional application pepper is
//! appended to the password bytes before hashing and verification.

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Minimum length in Unicode code points
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum length in Unicode code points
pub const MAX_PASSWORD_LENGTH: usize = 128;

const KEYBOARD_RUNS: &[&str] = &["qwerty", "asdfgh", "zxcvbn", "qazwsx", "1qaz2wsx"];

const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "password123",
    "abcdefgh",
    "letmein1",
    "welcome1",
    "admin123",
    "iloveyou",
    "sunshine",
    "princess",
    "football",
    "baseball",
    "trustno1",
    "shopping",
    "shop1234",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,

    #[error("Password is too common or follows a predictable pattern")]
    CommonPattern,
}

#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

/// Policy-checked clear text password, zeroized on drop
///
/// Not `Clone`; `Debug` output is redacted.
///
/// ```rust
/// use platform::password::ClearTextPassword;
///
/// let password = ClearTextPassword::new("correct horse battery".to_string()).unwrap();
/// let hashed = password.hash(None).unwrap();
/// assert!(hashed.verify(&password, None));
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Normalize `raw` (NFKC) and enforce the password policy
    pub fn new(mut raw: String) -> Result<Self, PasswordPolicyError> {
        let normalized: String = raw.nfkc().collect();
        raw.zeroize();

        let password = Self(normalized);
        password.check_policy()?;
        Ok(password)
    }

    /// Skip the policy; for verifying input against an existing hash, where
    /// the policy in force at registration time may have been different
    pub fn for_verification(raw: String) -> Self {
        Self(raw.nfkc().collect())
    }

    fn check_policy(&self) -> Result<(), PasswordPolicyError> {
        let value = self.0.as_str();
        if value.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        let actual = value.chars().count();
        if actual < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual,
            });
        }
        if actual > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual,
            });
        }

        if value
            .chars()
            .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        if is_predictable(value) {
            return Err(PasswordPolicyError::CommonPattern);
        }
        Ok(())
    }

    fn peppered(&self, pepper: Option<&[u8]>) -> Zeroizing<Vec<u8>> {
        let mut bytes = Zeroizing::new(self.0.as_bytes().to_vec());
        if let Some(pepper) = pepper {
            bytes.extend_from_slice(pepper);
        }
        bytes
    }

    /// Argon2id hash with a fresh random salt
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedPassword, PasswordHashError> {
        let salt = SaltString::generate(OsRng);
        let hash = Argon2::default()
            .hash_password(&self.peppered(pepper), &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            phc: hash.to_string(),
        })
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClearTextPassword([REDACTED])")
    }
}

/// Argon2 hash in PHC string format (algorithm, params, salt and digest)
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    phc: String,
}

impl HashedPassword {
    /// Wrap a stored PHC string after checking that it parses
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let phc = s.into();
        PasswordHash::new(&phc).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { phc })
    }

    pub fn as_phc_string(&self) -> &str {
        &self.phc
    }

    /// `pepper` must match the one used when hashing
    pub fn verify(&self, password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.phc) else {
            return false;
        };
        Argon2::default()
            .verify_password(&password.peppered(pepper), &parsed)
            .is_ok()
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword([HASH])")
    }
}

fn is_predictable(password: &str) -> bool {
    let lower = password.to_lowercase();

    let mut chars = lower.chars();
    if let Some(first) = chars.next() {
        if chars.all(|c| c == first) {
            return true;
        }
    }

    if is_digit_run(&lower) {
        return true;
    }

    KEYBOARD_RUNS.iter().any(|run| lower.contains(run)) || COMMON_PASSWORDS.contains(&lower.as_str())
}

/// All-digit strings counting straight up or down, wrapping 9 <-> 0
fn is_digit_run(s: &str) -> bool {
    let digits: Vec<u32> = s.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() < 4 || digits.len() != s.chars().count() {
        return false;
    }

    let step = |a: u32, b: u32| (b + 10 - a) % 10;
    let ascending = digits.windows(2).all(|w| step(w[0], w[1]) == 1);
    let descending = digits.windows(2).all(|w| step(w[0], w[1]) == 9);
    ascending || descending
}
