//! Google OAuth 2.0 client
//!
//! Authorization-code flow: consent URL, code exchange at the token
//! endpoint, then a userinfo fetch with the returned access token.

use std::fmt;

use reqwest::Url;
use serde::Deserialize;

use crate::domain::entity::external_identity::ExternalIdentity;
use crate::domain::repository::OAuthProvider;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

const PROVIDER: &str = "google";
const SCOPE: &str = "openid email profile";

#[derive(Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Must match a redirect URI registered with Google
    pub redirect_uri: String,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
}

impl GoogleOAuthConfig {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            auth_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
            userinfo_url: "https://www.googleapis.com/oauth2/v3/userinfo".to_string(),
        }
    }
}

impl fmt::Debug for GoogleOAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleOAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .field("auth_url", &self.auth_url)
            .field("token_url", &self.token_url)
            .field("userinfo_url", &self.userinfo_url)
            .finish()
    }
}

#[derive(Clone)]
pub struct GoogleOAuthClient {
    http: reqwest::Client,
    config: GoogleOAuthConfig,
    auth_url: Url,
}

impl GoogleOAuthClient {
    pub fn new(config: GoogleOAuthConfig) -> AuthResult<Self> {
        let auth_url = Url::parse(&config.auth_url)
            .map_err(|e| AuthError::Internal(format!("Invalid Google auth URL: {}", e)))?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("storefront-auth/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AuthError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            config,
            auth_url,
        })
    }

    async fn fetch_access_token(&self, code: &str) -> AuthResult<String> {
        let params = [
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .http
            .post(&self.config.token_url)
            .form(&params)
            .send()
            .await
            .map_err(upstream)?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AuthError::OAuth(format!(
                "Token exchange failed ({}): {}",
                status, text
            )));
        }

        let token: TokenResponse = response.json().await.map_err(upstream)?;
        Ok(token.access_token)
    }

    async fn fetch_profile(&self, access_token: &str) -> AuthResult<UserInfo> {
        self.http
            .get(&self.config.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(upstream)?
            .json()
            .await
            .map_err(upstream)
    }
}

impl OAuthProvider for GoogleOAuthClient {
    fn authorize_url(&self, state: &str) -> String {
        let mut url = self.auth_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", SCOPE)
            .append_pair("state", state);
        url.into()
    }

    async fn exchange_code(&self, code: &str) -> AuthResult<ExternalIdentity> {
        let access_token = self.fetch_access_token(code).await?;
        let profile = self.fetch_profile(&access_token).await?;

        let email = profile
            .email
            .ok_or_else(|| AuthError::OAuth("Google profile has no email".to_string()))?;
        let email = Email::new(&email)
            .map_err(|_| AuthError::OAuth("Google profile email is invalid".to_string()))?;

        Ok(ExternalIdentity {
            provider: PROVIDER.to_string(),
            email,
            name: profile.name,
            picture: profile.picture,
        })
    }
}

fn upstream(err: reqwest::Error) -> AuthError {
    AuthError::OAuth(err.to_string())
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct UserInfo {
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}
