//! Cookie Management
//!
//! Builds the `Set-Cookie` values handed to an axum-extra [`CookieJar`].
//! A cookie is either *set* (value + absolute expiry derived from a TTL) or
//! *removed* (empty value, expiry at the Unix epoch).

use std::time::Duration;

use axum_extra::extract::cookie::{Cookie, CookieJar};
use time::OffsetDateTime;

pub use axum_extra::extract::cookie::SameSite;

/// Attributes shared by every `Set-Cookie` emitted for one cookie name
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    /// `Domain` attribute; `None` yields a host-only cookie
    pub domain: Option<String>,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    /// Lifetime used to compute `Expires` from the issuance instant
    pub ttl: Duration,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "session".to_string(),
            domain: None,
            path: "/".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            ttl: Duration::from_secs(24 * 3600),
        }
    }
}

impl CookieConfig {
    /// Cookie carrying `value`, expiring `ttl` after `issued_at`
    pub fn build(&self, value: impl Into<String>, issued_at: OffsetDateTime) -> Cookie<'static> {
        let mut cookie = self.base(value.into());
        cookie.set_expires(issued_at + self.ttl);
        cookie
    }

    /// Empty cookie with an expiry in the past, so the client drops it
    pub fn build_removal(&self) -> Cookie<'static> {
        let mut cookie = self.base(String::new());
        cookie.set_expires(OffsetDateTime::UNIX_EPOCH);
        cookie
    }

    /// Add the cookie to `jar`, issued now
    pub fn set(&self, jar: CookieJar, value: impl Into<String>) -> CookieJar {
        jar.add(self.build(value, OffsetDateTime::now_utc()))
    }

    /// Overwrite the cookie in `jar` with its removal form
    pub fn clear(&self, jar: CookieJar) -> CookieJar {
        jar.add(self.build_removal())
    }

    /// Non-empty value of this cookie in `jar`
    pub fn read<'a>(&self, jar: &'a CookieJar) -> Option<&'a str> {
        jar.get(&self.name)
            .map(|cookie| cookie.value())
            .filter(|value| !value.is_empty())
    }

    fn base(&self, value: String) -> Cookie<'static> {
        let mut cookie = Cookie::new(self.name.clone(), value);
        cookie.set_path(self.path.clone());
        cookie.set_http_only(self.http_only);
        cookie.set_secure(self.secure);
        cookie.set_same_site(self.same_site);
        if let Some(domain) = &self.domain {
            cookie.set_domain(domain.clone());
        }
        cookie
    }
}
