//! Auth Middleware
//!
//! Bearer access-token guard for protected routes.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::{header, request::Parts};
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::repository::{OAuthProvider, UserDirectory};
use crate::domain::token::TokenCodec;
use crate::domain::value_object::user_id::UserId;
use crate::error::AuthError;
use crate::presentation::handlers::AuthAppState;

/// Id of the access-token holder, inserted by [`require_access_token`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .copied()
            .ok_or(AuthError::InvalidAccessToken)
    }
}

/// Rejects the request with 401 unless it carries a valid
/// `Authorization: Bearer <access token>`
pub async fn require_access_token<U, C, O>(
    State(state): State<AuthAppState<U, C, O>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    U: UserDirectory + Send + Sync + 'static,
    C: TokenCodec + Send + Sync + 'static,
    O: OAuthProvider + Send + Sync + 'static,
{
    let token = bearer_token(req.headers()).ok_or(AuthError::InvalidAccessToken)?;

    let claims = state.codec.verify(token).await.map_err(|e| {
        tracing::debug!(error = %e, "Access token rejected");
        AuthError::InvalidAccessToken
    })?;
    let user_id = claims
        .user_id()
        .map_err(|_| AuthError::InvalidAccessToken)?;

    req.extensions_mut().insert(AuthenticatedUser(user_id));
    Ok(next.run(req).await)
}

fn bearer_token(headers: &axum::http::HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue};

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&headers("Bearer")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
