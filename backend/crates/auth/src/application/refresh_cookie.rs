//! Refresh cookie delivery
//!
//! The refresh token travels only in an HTTP-only cookie, never in a JSON
//! body.

use axum_extra::extract::cookie::CookieJar;

use crate::application::config::AuthConfig;

pub fn attach_refresh_cookie(config: &AuthConfig, jar: CookieJar, refresh_token: &str) -> CookieJar {
    config.refresh_cookie().set(jar, refresh_token)
}

/// Overwrite with an empty, already-expired cookie
pub fn clear_refresh_cookie(config: &AuthConfig, jar: CookieJar) -> CookieJar {
    config.refresh_cookie().clear(jar)
}

/// Non-empty refresh token sent by the client
pub fn read_refresh_cookie<'a>(config: &AuthConfig, jar: &'a CookieJar) -> Option<&'a str> {
    config.refresh_cookie().read(jar)
}
