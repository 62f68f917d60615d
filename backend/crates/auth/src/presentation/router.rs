//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::domain::repository::{OAuthProvider, UserDirectory};
use crate::domain::token::TokenCodec;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_access_token;

/// Routes nested under `/api/auth`
pub fn auth_router<U, C, O>(state: AuthAppState<U, C, O>) -> Router
where
    U: UserDirectory + Send + Sync + 'static,
    C: TokenCodec + Send + Sync + 'static,
    O: OAuthProvider + Send + Sync + 'static,
{
    Router::new()
        .route("/login", post(handlers::login::<U, C, O>))
        .route("/register", post(handlers::register::<U, C, O>))
        .route("/login/access-token", post(handlers::access_token::<U, C, O>))
        .route("/logout", post(handlers::logout::<U, C, O>))
        .route("/google", get(handlers::google_login::<U, C, O>))
        .route("/google/callback", get(handlers::google_callback::<U, C, O>))
        .with_state(state)
}

/// Routes nested under `/api/users`; every route requires an access token
pub fn users_router<U, C, O>(state: AuthAppState<U, C, O>) -> Router
where
    U: UserDirectory + Send + Sync + 'static,
    C: TokenCodec + Send + Sync + 'static,
    O: OAuthProvider + Send + Sync + 'static,
{
    Router::new()
        .route("/profile", get(handlers::profile::<U, C, O>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_access_token::<U, C, O>,
        ))
        .with_state(state)
}
