//! External Identity
//!
//! Profile returned by an OAuth provider after a successful code exchange.

use crate::domain::value_object::email::Email;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalIdentity {
    /// Provider key, e.g. `google`
    pub provider: String,
    pub email: Email,
    pub name: Option<String>,
    pub picture: Option<String>,
}

impl ExternalIdentity {
    /// Provider name, falling back to the email local part
    pub fn display_name(&self) -> String {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| self.email.local_part())
            .to_string()
    }
}
