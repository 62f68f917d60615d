//! HTTP Handlers

use axum::Json;
use axum::extract::{Query, State};
use axum::response::Redirect;
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use platform::crypto::{constant_time_eq, random_token};

use crate::application::config::AuthConfig;
use crate::application::{
    AuthOutput, LoginInput, LoginUseCase, OAuthLoginUseCase, RefreshUseCase, RegisterInput,
    RegisterUseCase, attach_refresh_cookie, clear_refresh_cookie, read_refresh_cookie,
};
use crate::domain::repository::{OAuthProvider, UserDirectory};
use crate::domain::token::TokenCodec;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AuthResponse, LoginRequest, OAuthCallbackQuery, RegisterRequest, UserResponse,
};
use crate::presentation::middleware::AuthenticatedUser;

/// Random bytes in an OAuth `state` value
const OAUTH_STATE_BYTES: usize = 32;

/// Shared state for auth handlers
pub struct AuthAppState<U, C, O> {
    pub users: Arc<U>,
    pub codec: Arc<C>,
    pub oauth: Arc<O>,
    pub config: Arc<AuthConfig>,
}

impl<U, C, O> AuthAppState<U, C, O> {
    pub fn new(users: U, codec: C, oauth: O, config: AuthConfig) -> Self {
        Self {
            users: Arc::new(users),
            codec: Arc::new(codec),
            oauth: Arc::new(oauth),
            config: Arc::new(config),
        }
    }
}

// Manual impl: a derive would require `U: Clone` etc.
impl<U, C, O> Clone for AuthAppState<U, C, O> {
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
            codec: self.codec.clone(),
            oauth: self.oauth.clone(),
            config: self.config.clone(),
        }
    }
}

/// Set the refresh cookie and build the JSON body
fn respond(config: &AuthConfig, jar: CookieJar, output: AuthOutput) -> (CookieJar, Json<AuthResponse>) {
    let jar = attach_refresh_cookie(config, jar, &output.tokens.refresh_token);
    let body = AuthResponse {
        user: UserResponse::from(&output.user),
        access_token: output.tokens.access_token,
    };
    (jar, Json(body))
}

// ============================================================================
// Password login
// ============================================================================

/// POST /api/auth/login
pub async fn login<U, C, O>(
    State(state): State<AuthAppState<U, C, O>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> AuthResult<(CookieJar, Json<AuthResponse>)>
where
    U: UserDirectory + Send + Sync + 'static,
    C: TokenCodec + Send + Sync + 'static,
    O: OAuthProvider + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(state.users.clone(), state.codec.clone(), state.config.clone());

    let output = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(respond(&state.config, jar, output))
}

/// POST /api/auth/register
pub async fn register<U, C, O>(
    State(state): State<AuthAppState<U, C, O>>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<(CookieJar, Json<AuthResponse>)>
where
    U: UserDirectory + Send + Sync + 'static,
    C: TokenCodec + Send + Sync + 'static,
    O: OAuthProvider + Send + Sync + 'static,
{
    let use_case =
        RegisterUseCase::new(state.users.clone(), state.codec.clone(), state.config.clone());

    let output = use_case
        .execute(RegisterInput {
            email: req.email,
            password: req.password,
            name: req.name,
        })
        .await?;

    Ok(respond(&state.config, jar, output))
}

// ============================================================================
// Refresh / Logout
// ============================================================================

/// POST /api/auth/login/access-token
///
/// A request without the cookie also gets a clearing `Set-Cookie`.
pub async fn access_token<U, C, O>(
    State(state): State<AuthAppState<U, C, O>>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<AuthResponse>), (CookieJar, AuthError)>
where
    U: UserDirectory + Send + Sync + 'static,
    C: TokenCodec + Send + Sync + 'static,
    O: OAuthProvider + Send + Sync + 'static,
{
    let Some(refresh_token) = read_refresh_cookie(&state.config, &jar).map(str::to_owned) else {
        return Err((
            clear_refresh_cookie(&state.config, jar),
            AuthError::MissingRefreshToken,
        ));
    };

    let use_case =
        RefreshUseCase::new(state.users.clone(), state.codec.clone(), state.config.clone());

    match use_case.execute(&refresh_token).await {
        Ok(output) => Ok(respond(&state.config, jar, output)),
        Err(e) => Err((jar, e)),
    }
}

/// POST /api/auth/logout
pub async fn logout<U, C, O>(
    State(state): State<AuthAppState<U, C, O>>,
    jar: CookieJar,
) -> (CookieJar, Json<bool>)
where
    U: UserDirectory + Send + Sync + 'static,
    C: TokenCodec + Send + Sync + 'static,
    O: OAuthProvider + Send + Sync + 'static,
{
    (clear_refresh_cookie(&state.config, jar), Json(true))
}

// ============================================================================
// Google OAuth
// ============================================================================

/// GET /api/auth/google
pub async fn google_login<U, C, O>(
    State(state): State<AuthAppState<U, C, O>>,
    jar: CookieJar,
) -> (CookieJar, Redirect)
where
    U: UserDirectory + Send + Sync + 'static,
    C: TokenCodec + Send + Sync + 'static,
    O: OAuthProvider + Send + Sync + 'static,
{
    let oauth_state = random_token(OAUTH_STATE_BYTES);
    let jar = state.config.oauth_state_cookie().set(jar, oauth_state.clone());

    (jar, Redirect::to(&state.oauth.authorize_url(&oauth_state)))
}

/// GET /api/auth/google/callback
///
/// The state cookie is single-use: it is cleared whether or not the
/// login succeeds.
pub async fn google_callback<U, C, O>(
    State(state): State<AuthAppState<U, C, O>>,
    jar: CookieJar,
    Query(query): Query<OAuthCallbackQuery>,
) -> Result<(CookieJar, Redirect), (CookieJar, AuthError)>
where
    U: UserDirectory + Send + Sync + 'static,
    C: TokenCodec + Send + Sync + 'static,
    O: OAuthProvider + Send + Sync + 'static,
{
    let result = complete_google_login(&state, &jar, query).await;
    let jar = state.config.oauth_state_cookie().clear(jar);

    match result {
        Ok(output) => {
            let jar = attach_refresh_cookie(&state.config, jar, &output.tokens.refresh_token);
            let target = state.config.dashboard_redirect(&output.tokens.access_token);
            Ok((jar, Redirect::to(&target)))
        }
        Err(e) => Err((jar, e)),
    }
}

async fn complete_google_login<U, C, O>(
    state: &AuthAppState<U, C, O>,
    jar: &CookieJar,
    query: OAuthCallbackQuery,
) -> AuthResult<AuthOutput>
where
    U: UserDirectory + Send + Sync + 'static,
    C: TokenCodec + Send + Sync + 'static,
    O: OAuthProvider + Send + Sync + 'static,
{
    let state_matches = match (
        state.config.oauth_state_cookie().read(jar),
        query.state.as_deref(),
    ) {
        (Some(expected), Some(actual)) => constant_time_eq(expected.as_bytes(), actual.as_bytes()),
        _ => false,
    };
    if !state_matches {
        return Err(AuthError::OAuthStateMismatch);
    }

    if let Some(error) = query.error {
        return Err(AuthError::Validation(format!(
            "Google sign-in was not completed: {}",
            error
        )));
    }
    let code = query
        .code
        .ok_or_else(|| AuthError::Validation("Missing authorization code".to_string()))?;

    let identity = state.oauth.exchange_code(&code).await?;

    OAuthLoginUseCase::new(state.users.clone(), state.codec.clone(), state.config.clone())
        .execute(identity)
        .await
}

// ============================================================================
// Users
// ============================================================================

/// GET /api/users/profile
pub async fn profile<U, C, O>(
    State(state): State<AuthAppState<U, C, O>>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> AuthResult<Json<UserResponse>>
where
    U: UserDirectory + Send + Sync + 'static,
    C: TokenCodec + Send + Sync + 'static,
    O: OAuthProvider + Send + Sync + 'static,
{
    let user = state
        .users
        .find_by_id(&user_id)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    Ok(Json(UserResponse::from(&user)))
}
