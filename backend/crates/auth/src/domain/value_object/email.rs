//! Email Value Object
//!
//! Trimmed, lowercased address with a shape check. Uniqueness is keyed on
//! this normalized form, so `Alice@Shop.com` and `alice@shop.com` are the
//! same user.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// RFC 5321 path limit
const EMAIL_MAX_LENGTH: usize = 254;
const LOCAL_PART_MAX_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn new(email: impl AsRef<str>) -> AppResult<Self> {
        let email = email.as_ref().trim().to_lowercase();

        if email.is_empty() {
            return Err(AppError::bad_request("Email cannot be empty"));
        }
        if email.len() > EMAIL_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Email must be at most {} characters",
                EMAIL_MAX_LENGTH
            )));
        }

        let Some((local, domain)) = email.split_once('@') else {
            return Err(AppError::bad_request("Invalid email format"));
        };
        if !is_valid_local(local) || !is_valid_domain(domain) {
            return Err(AppError::bad_request("Invalid email format"));
        }

        Ok(Self(email))
    }

    /// Wrap a value read back from the database
    pub fn from_db(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Part before the `@`; the default display name for new accounts
    pub fn local_part(&self) -> &str {
        self.0.split_once('@').map_or(self.0.as_str(), |(local, _)| local)
    }

    pub fn domain(&self) -> &str {
        self.0.split_once('@').map_or("", |(_, domain)| domain)
    }
}

fn is_valid_local(local: &str) -> bool {
    !local.is_empty() && local.len() <= LOCAL_PART_MAX_LENGTH && !local.contains(char::is_whitespace)
}

fn is_valid_domain(domain: &str) -> bool {
    domain.contains('.')
        && domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        && !domain.starts_with(['.', '-'])
        && !domain.ends_with(['.', '-'])
        && !domain.contains("..")
}

impl FromStr for Email {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        Email::new(s)
    }
}

impl TryFrom<String> for Email {
    type Error = AppError;

    fn try_from(value: String) -> AppResult<Self> {
        Email::new(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_valid() {
        assert!(Email::new("buyer@example.com").is_ok());
        assert!(Email::new("first.last@shop.co.jp").is_ok());
        assert!(Email::new("owner+store@example.com").is_ok());
    }

    #[test]
    fn test_email_invalid() {
        assert!(Email::new("").is_err());
        assert!(Email::new("   ").is_err());
        assert!(Email::new("buyerexample.com").is_err());
        assert!(Email::new("buyer@").is_err());
        assert!(Email::new("@example.com").is_err());
        assert!(Email::new("buyer@@example.com").is_err());
        assert!(Email::new("buyer@example").is_err());
        assert!(Email::new("buyer@-example.com").is_err());
        assert!(Email::new("buyer@example..com").is_err());
        assert!(Email::new("bu yer@example.com").is_err());
    }

    #[test]
    fn test_email_normalization() {
        let email = Email::new("  Buyer@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "buyer@example.com");
    }

    #[test]
    fn test_email_parts() {
        let email = Email::new("jane.doe@example.com").unwrap();
        assert_eq!(email.local_part(), "jane.doe");
        assert_eq!(email.domain(), "example.com");
    }

    #[test]
    fn test_email_deserialize_validates() {
        let ok: Email = serde_json::from_str(r#""Jane@Example.com""#).unwrap();
        assert_eq!(ok.as_str(), "jane@example.com");
        assert!(serde_json::from_str::<Email>(r#""not-an-email""#).is_err());
    }
}
