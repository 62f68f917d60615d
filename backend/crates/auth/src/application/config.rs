//! Application Configuration
//!
//! Token lifetimes, cookie attributes and secrets for the auth use cases.

use std::fmt;
use std::time::Duration;

use platform::cookie::CookieConfig;

pub use platform::cookie::SameSite;

#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub jwt_secret: Vec<u8>,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    pub refresh_cookie_name: String,
    /// Cookie lifetime, independent of `refresh_token_ttl`
    pub refresh_cookie_ttl: Duration,
    /// `Domain` for the refresh cookie; `None` keeps it host-only
    pub cookie_domain: Option<String>,
    pub cookie_secure: bool,
    pub cookie_same_site: SameSite,
    pub oauth_state_cookie_name: String,
    pub oauth_state_ttl: Duration,
    /// Front-end base URL the OAuth callback redirects to
    pub client_url: String,
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: Vec::new(),
            access_token_ttl: Duration::from_secs(3600),           // 1 hour
            refresh_token_ttl: Duration::from_secs(7 * 24 * 3600), // 7 days
            refresh_cookie_name: "refreshToken".to_string(),
            refresh_cookie_ttl: Duration::from_secs(24 * 3600), // 1 day
            cookie_domain: None,
            cookie_secure: true,
            cookie_same_site: SameSite::None,
            oauth_state_cookie_name: "oauthState".to_string(),
            oauth_state_ttl: Duration::from_secs(10 * 60),
            client_url: "http://localhost:3000".to_string(),
            password_pepper: None,
        }
    }
}

// Secrets are redacted
impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("refresh_cookie_name", &self.refresh_cookie_name)
            .field("refresh_cookie_ttl", &self.refresh_cookie_ttl)
            .field("cookie_domain", &self.cookie_domain)
            .field("cookie_secure", &self.cookie_secure)
            .field("cookie_same_site", &self.cookie_same_site)
            .field("oauth_state_cookie_name", &self.oauth_state_cookie_name)
            .field("oauth_state_ttl", &self.oauth_state_ttl)
            .field("client_url", &self.client_url)
            .field(
                "password_pepper",
                &self.password_pepper.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl AuthConfig {
    pub fn with_random_secret() -> Self {
        Self {
            jwt_secret: platform::crypto::random_bytes(32),
            ..Default::default()
        }
    }

    /// Random secret, host-only cookies. Cookies stay `Secure` because
    /// `SameSite=None` is rejected by browsers without it.
    pub fn development() -> Self {
        Self {
            cookie_domain: None,
            ..Self::with_random_secret()
        }
    }

    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    pub fn refresh_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.refresh_cookie_name.clone(),
            domain: self.cookie_domain.clone(),
            path: "/".to_string(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            ttl: self.refresh_cookie_ttl,
        }
    }

    /// Carries the OAuth `state` across the provider round trip. `Lax` so the
    /// browser sends it on the top-level redirect back from the provider.
    pub fn oauth_state_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.oauth_state_cookie_name.clone(),
            domain: None,
            path: "/".to_string(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: SameSite::Lax,
            ttl: self.oauth_state_ttl,
        }
    }

    /// Post-login landing page carrying the access token
    pub fn dashboard_redirect(&self, access_token: &str) -> String {
        format!(
            "{}/dashboard?accessToken={}",
            self.client_url.trim_end_matches('/'),
            access_token
        )
    }
}
