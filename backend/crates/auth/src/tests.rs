//! Scenario tests for the auth crate
//! In-memory directory and OAuth doubles, real JWT codec

#[cfg(test)]
mod support {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    use chrono::Utc;

    use crate::application::config::AuthConfig;
    use crate::domain::entity::{
        external_identity::ExternalIdentity,
        user::{NewUser, User},
    };
    use crate::domain::repository::{OAuthProvider, UserDirectory};
    use crate::domain::value_object::{email::Email, user_id::UserId};
    use crate::error::{AuthError, AuthResult};
    use crate::infra::jwt::JwtCodec;

    pub const PASSWORD: &str = "Checkout#Basket9";

    #[derive(Default)]
    pub struct InMemoryUsers {
        users: Mutex<Vec<User>>,
        /// Next create behaves as if a concurrent insert won the race
        pub race_next_create: AtomicBool,
        pub fail_next_create: AtomicBool,
    }

    impl InMemoryUsers {
        pub fn count(&self) -> usize {
            self.users.lock().unwrap().len()
        }

        pub fn remove(&self, user_id: &UserId) {
            self.users.lock().unwrap().retain(|u| &u.user_id != user_id);
        }

        pub fn get(&self, email: &str) -> Option<User> {
            self.users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.email.as_str() == email)
                .cloned()
        }
    }

    impl UserDirectory for InMemoryUsers {
        async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
            Ok(self.get(email.as_str()))
        }

        async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
            let users = self.users.lock().unwrap();
            Ok(users.iter().find(|u| &u.user_id == user_id).cloned())
        }

        async fn create(&self, user: NewUser) -> AuthResult<User> {
            if self.fail_next_create.swap(false, Ordering::SeqCst) {
                return Err(AuthError::Internal("connection reset".to_string()));
            }

            let mut users = self.users.lock().unwrap();
            if self.race_next_create.swap(false, Ordering::SeqCst) {
                users.push(user.into_user(Utc::now()));
                return Err(AuthError::EmailTaken);
            }
            if users.iter().any(|u| u.email == user.email) {
                return Err(AuthError::EmailTaken);
            }

            let user = user.into_user(Utc::now());
            users.push(user.clone());
            Ok(user)
        }
    }

    pub struct StubOAuth {
        pub identity: ExternalIdentity,
    }

    impl Default for StubOAuth {
        fn default() -> Self {
            Self {
                identity: google_identity(),
            }
        }
    }

    impl OAuthProvider for StubOAuth {
        fn authorize_url(&self, state: &str) -> String {
            format!("https://accounts.example.test/auth?state={}", state)
        }

        async fn exchange_code(&self, code: &str) -> AuthResult<ExternalIdentity> {
            match code {
                "good-code" => Ok(self.identity.clone()),
                _ => Err(AuthError::OAuth("invalid_grant".to_string())),
            }
        }
    }

    pub fn google_identity() -> ExternalIdentity {
        ExternalIdentity {
            provider: "google".to_string(),
            email: Email::new("jane@gmail.com").unwrap(),
            name: Some("Jane Doe".to_string()),
            picture: Some("https://lh3.googleusercontent.com/a/jane".to_string()),
        }
    }

    pub fn config() -> AuthConfig {
        AuthConfig {
            cookie_domain: Some("api.shop.test".to_string()),
            client_url: "https://shop.test".to_string(),
            ..AuthConfig::with_random_secret()
        }
    }

    pub fn codec(config: &AuthConfig) -> JwtCodec {
        JwtCodec::new(&config.jwt_secret)
    }
}

#[cfg(test)]
mod issuer_tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};

    use super::support::*;
    use crate::application::TokenIssuer;
    use crate::domain::token::TokenCodec;
    use crate::domain::value_object::user_id::UserId;

    #[tokio::test]
    async fn test_issued_tokens_carry_user_id() {
        let config = Arc::new(config());
        let codec = Arc::new(codec(&config));
        let issuer = TokenIssuer::new(codec.clone(), config);
        let user_id = UserId::new();

        let pair = issuer.issue(&user_id).unwrap();
        assert_ne!(pair.access_token, pair.refresh_token);

        let access = codec.verify(&pair.access_token).await.unwrap();
        let refresh = codec.verify(&pair.refresh_token).await.unwrap();
        assert_eq!(access.user_id().unwrap(), user_id);
        assert_eq!(refresh.user_id().unwrap(), user_id);
        assert_eq!(access.exp - access.iat, 3600);
        assert_eq!(refresh.exp - refresh.iat, 7 * 24 * 3600);
    }

    #[tokio::test]
    async fn test_access_token_expires_after_one_hour() {
        let config = Arc::new(config());
        let codec = Arc::new(codec(&config));
        let issuer = TokenIssuer::new(codec.clone(), config);

        let issued_at = Utc::now() - Duration::minutes(61);
        let pair = issuer.issue_at(&UserId::new(), issued_at).unwrap();

        assert!(codec.verify(&pair.access_token).await.is_err());
        assert!(codec.verify(&pair.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_access_token_valid_within_the_hour() {
        let config = Arc::new(config());
        let codec = Arc::new(codec(&config));
        let issuer = TokenIssuer::new(codec.clone(), config);

        let issued_at = Utc::now() - Duration::minutes(59);
        let pair = issuer.issue_at(&UserId::new(), issued_at).unwrap();
        assert!(codec.verify(&pair.access_token).await.is_ok());
    }
}

#[cfg(test)]
mod register_tests {
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    use super::support::*;
    use crate::application::{RegisterInput, RegisterUseCase};
    use crate::domain::token::TokenCodec;
    use crate::error::AuthError;
    use kernel::error::kind::ErrorKind;

    fn input(email: &str, password: &str) -> RegisterInput {
        RegisterInput {
            email: email.to_string(),
            password: password.to_string(),
            name: None,
        }
    }

    #[tokio::test]
    async fn test_register_new_email() {
        let config = Arc::new(config());
        let codec = Arc::new(codec(&config));
        let users = Arc::new(InMemoryUsers::default());
        let use_case = RegisterUseCase::new(users.clone(), codec.clone(), config);

        let output = use_case
            .execute(input("New.Buyer@Example.com", PASSWORD))
            .await
            .unwrap();

        assert_eq!(users.count(), 1);
        assert_eq!(output.user.email.as_str(), "new.buyer@example.com");
        assert_eq!(output.user.name, "new.buyer");
        assert!(output.user.has_password());

        let claims = codec.verify(&output.tokens.access_token).await.unwrap();
        assert_eq!(claims.user_id().unwrap(), output.user.user_id);
    }

    #[tokio::test]
    async fn test_register_uses_given_name() {
        let config = Arc::new(config());
        let use_case = RegisterUseCase::new(
            Arc::new(InMemoryUsers::default()),
            Arc::new(codec(&config)),
            config,
        );

        let output = use_case
            .execute(RegisterInput {
                name: Some("Corner Shop".to_string()),
                ..input("owner@example.com", PASSWORD)
            })
            .await
            .unwrap();
        assert_eq!(output.user.name, "Corner Shop");
    }

    #[tokio::test]
    async fn test_register_duplicate_is_conflict() {
        let config = Arc::new(config());
        let users = Arc::new(InMemoryUsers::default());
        let use_case = RegisterUseCase::new(users.clone(), Arc::new(codec(&config)), config);

        use_case.execute(input("dup@example.com", PASSWORD)).await.unwrap();
        let err = use_case
            .execute(input("DUP@example.com", "Another#Pass77"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::EmailTaken));
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(users.count(), 1);
    }

    #[tokio::test]
    async fn test_register_lost_race_is_conflict() {
        let config = Arc::new(config());
        let users = Arc::new(InMemoryUsers::default());
        users.race_next_create.store(true, Ordering::SeqCst);
        let use_case = RegisterUseCase::new(users.clone(), Arc::new(codec(&config)), config);

        let err = use_case
            .execute(input("race@example.com", PASSWORD))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(users.count(), 1);
    }

    #[tokio::test]
    async fn test_register_weak_password_rejected() {
        let config = Arc::new(config());
        let users = Arc::new(InMemoryUsers::default());
        let use_case = RegisterUseCase::new(users.clone(), Arc::new(codec(&config)), config);

        let err = use_case
            .execute(input("weak@example.com", "12345678"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::PasswordValidation(_)));
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(users.count(), 0);
    }

    #[tokio::test]
    async fn test_register_invalid_email_rejected() {
        let config = Arc::new(config());
        let use_case = RegisterUseCase::new(
            Arc::new(InMemoryUsers::default()),
            Arc::new(codec(&config)),
            config,
        );

        let err = use_case
            .execute(input("not-an-email", PASSWORD))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }
}

#[cfg(test)]
mod login_tests {
    use std::sync::Arc;

    use super::support::*;
    use crate::application::{
        LoginInput, LoginUseCase, OAuthLoginUseCase, RegisterInput, RegisterUseCase,
    };
    use crate::domain::token::TokenCodec;
    use crate::error::AuthError;
    use crate::infra::jwt::JwtCodec;
    use kernel::error::kind::ErrorKind;

    struct Fixture {
        users: Arc<InMemoryUsers>,
        codec: Arc<JwtCodec>,
        login: LoginUseCase<InMemoryUsers, JwtCodec>,
    }

    async fn registered(email: &str) -> Fixture {
        let config = Arc::new(config());
        let codec = Arc::new(codec(&config));
        let users = Arc::new(InMemoryUsers::default());

        RegisterUseCase::new(users.clone(), codec.clone(), config.clone())
            .execute(RegisterInput {
                email: email.to_string(),
                password: PASSWORD.to_string(),
                name: None,
            })
            .await
            .unwrap();

        let login = LoginUseCase::new(users.clone(), codec.clone(), config);
        Fixture {
            users,
            codec,
            login,
        }
    }

    fn input(email: &str, password: &str) -> LoginInput {
        LoginInput {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_valid_credentials() {
        let fx = registered("buyer@example.com").await;
        let expected = fx.users.get("buyer@example.com").unwrap().user_id;

        let output = fx
            .login
            .execute(input("Buyer@Example.com", PASSWORD))
            .await
            .unwrap();

        assert_eq!(output.user.user_id, expected);
        let claims = fx.codec.verify(&output.tokens.refresh_token).await.unwrap();
        assert_eq!(claims.user_id().unwrap(), expected);
    }

    #[tokio::test]
    async fn test_login_unknown_email_is_not_found() {
        let fx = registered("buyer@example.com").await;
        let err = fx
            .login
            .execute(input("ghost@example.com", PASSWORD))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_unauthorized() {
        let fx = registered("buyer@example.com").await;
        let err = fx
            .login
            .execute(input("buyer@example.com", "Checkout#Basket8"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn test_login_malformed_email_is_rejected_before_lookup() {
        let fx = registered("buyer@example.com").await;
        let err = fx
            .login
            .execute(input("ghost", PASSWORD))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }

    #[tokio::test]
    async fn test_login_oauth_only_account_is_unauthorized() {
        let config = Arc::new(config());
        let codec = Arc::new(codec(&config));
        let users = Arc::new(InMemoryUsers::default());
        OAuthLoginUseCase::new(users.clone(), codec.clone(), config.clone())
            .execute(google_identity())
            .await
            .unwrap();

        let err = LoginUseCase::new(users, codec, config)
            .execute(input("jane@gmail.com", PASSWORD))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }
}

#[cfg(test)]
mod refresh_tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};

    use super::support::*;
    use crate::application::{RefreshUseCase, RegisterInput, RegisterUseCase, TokenIssuer};
    use crate::domain::token::TokenCodec;
    use crate::error::AuthError;
    use kernel::error::kind::ErrorKind;

    #[tokio::test]
    async fn test_refresh_yields_new_pair_for_same_user() {
        let config = Arc::new(config());
        let codec = Arc::new(codec(&config));
        let users = Arc::new(InMemoryUsers::default());
        let registered = RegisterUseCase::new(users.clone(), codec.clone(), config.clone())
            .execute(RegisterInput {
                email: "buyer@example.com".to_string(),
                password: PASSWORD.to_string(),
                name: None,
            })
            .await
            .unwrap();

        let refresh = RefreshUseCase::new(users, codec.clone(), config);
        let output = refresh
            .execute(&registered.tokens.refresh_token)
            .await
            .unwrap();

        assert_eq!(output.user.user_id, registered.user.user_id);
        let claims = codec.verify(&output.tokens.access_token).await.unwrap();
        assert_eq!(claims.user_id().unwrap(), registered.user.user_id);

        // Rotation does not revoke the previous token
        assert!(refresh.execute(&registered.tokens.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_refresh_garbage_is_unauthorized() {
        let config = Arc::new(config());
        let refresh = RefreshUseCase::new(
            Arc::new(InMemoryUsers::default()),
            Arc::new(codec(&config)),
            config,
        );

        let err = refresh.execute("garbage").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidRefreshToken));
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn test_refresh_forged_token_is_unauthorized() {
        let config = Arc::new(config());
        let users = Arc::new(InMemoryUsers::default());
        let forger = Arc::new(crate::infra::jwt::JwtCodec::new(b"attacker-secret"));
        let forged = TokenIssuer::new(forger, config.clone())
            .issue(&crate::domain::value_object::user_id::UserId::new())
            .unwrap();

        let err = RefreshUseCase::new(users, Arc::new(codec(&config)), config)
            .execute(&forged.refresh_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidRefreshToken));
    }

    #[tokio::test]
    async fn test_refresh_expired_token_is_unauthorized() {
        let config = Arc::new(config());
        let codec = Arc::new(codec(&config));
        let users = Arc::new(InMemoryUsers::default());
        let user = RegisterUseCase::new(users.clone(), codec.clone(), config.clone())
            .execute(RegisterInput {
                email: "buyer@example.com".to_string(),
                password: PASSWORD.to_string(),
                name: None,
            })
            .await
            .unwrap()
            .user;

        let stale = TokenIssuer::new(codec.clone(), config.clone())
            .issue_at(&user.user_id, Utc::now() - Duration::days(8))
            .unwrap();

        let err = RefreshUseCase::new(users, codec, config)
            .execute(&stale.refresh_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidRefreshToken));
    }

    #[tokio::test]
    async fn test_refresh_for_deleted_user_is_bad_request() {
        let config = Arc::new(config());
        let codec = Arc::new(codec(&config));
        let users = Arc::new(InMemoryUsers::default());
        let registered = RegisterUseCase::new(users.clone(), codec.clone(), config.clone())
            .execute(RegisterInput {
                email: "gone@example.com".to_string(),
                password: PASSWORD.to_string(),
                name: None,
            })
            .await
            .unwrap();
        users.remove(&registered.user.user_id);

        let err = RefreshUseCase::new(users, codec, config)
            .execute(&registered.tokens.refresh_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::RefreshSubjectMissing));
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }
}

#[cfg(test)]
mod oauth_tests {
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    use super::support::*;
    use crate::application::OAuthLoginUseCase;
    use crate::error::AuthError;
    use kernel::error::kind::ErrorKind;

    #[tokio::test]
    async fn test_first_oauth_login_creates_user_from_profile() {
        let config = Arc::new(config());
        let users = Arc::new(InMemoryUsers::default());
        let use_case = OAuthLoginUseCase::new(users.clone(), Arc::new(codec(&config)), config);

        let output = use_case.execute(google_identity()).await.unwrap();

        assert_eq!(users.count(), 1);
        assert_eq!(output.user.email.as_str(), "jane@gmail.com");
        assert_eq!(output.user.name, "Jane Doe");
        assert_eq!(
            output.user.picture.as_deref(),
            Some("https://lh3.googleusercontent.com/a/jane")
        );
        assert!(!output.user.has_password());
    }

    #[tokio::test]
    async fn test_oauth_login_is_idempotent() {
        let config = Arc::new(config());
        let users = Arc::new(InMemoryUsers::default());
        let use_case = OAuthLoginUseCase::new(users.clone(), Arc::new(codec(&config)), config);

        let first = use_case.execute(google_identity()).await.unwrap();
        let second = use_case.execute(google_identity()).await.unwrap();

        assert_eq!(users.count(), 1);
        assert_eq!(first.user.user_id, second.user.user_id);
    }

    #[tokio::test]
    async fn test_oauth_lost_race_reuses_existing_user() {
        let config = Arc::new(config());
        let users = Arc::new(InMemoryUsers::default());
        users.race_next_create.store(true, Ordering::SeqCst);
        let use_case = OAuthLoginUseCase::new(users.clone(), Arc::new(codec(&config)), config);

        let output = use_case.execute(google_identity()).await.unwrap();

        assert_eq!(users.count(), 1);
        assert_eq!(
            users.get("jane@gmail.com").unwrap().user_id,
            output.user.user_id
        );
    }

    #[tokio::test]
    async fn test_oauth_create_failure_is_fatal() {
        let config = Arc::new(config());
        let users = Arc::new(InMemoryUsers::default());
        users.fail_next_create.store(true, Ordering::SeqCst);
        let use_case = OAuthLoginUseCase::new(users.clone(), Arc::new(codec(&config)), config);

        let err = use_case.execute(google_identity()).await.unwrap_err();
        assert!(matches!(err, AuthError::UserCreationFailed));
        assert_eq!(err.kind(), ErrorKind::InternalServerError);
        assert_eq!(users.count(), 0);
    }
}

#[cfg(test)]
mod error_tests {
    use crate::error::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use kernel::error::app_error::AppError;

    #[test]
    fn test_error_into_response_status_codes() {
        let test_cases: Vec<(AuthError, StatusCode)> = vec![
            (AuthError::UserNotFound, StatusCode::NOT_FOUND),
            (AuthError::EmailTaken, StatusCode::CONFLICT),
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidRefreshToken, StatusCode::UNAUTHORIZED),
            (AuthError::MissingRefreshToken, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidAccessToken, StatusCode::UNAUTHORIZED),
            (AuthError::RefreshSubjectMissing, StatusCode::BAD_REQUEST),
            (AuthError::OAuthStateMismatch, StatusCode::BAD_REQUEST),
            (
                AuthError::Validation("bad".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AuthError::PasswordValidation("weak".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AuthError::OAuth("upstream".into()),
                StatusCode::BAD_GATEWAY,
            ),
            (
                AuthError::UserCreationFailed,
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AuthError::Internal("test".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected_status) in test_cases {
            assert_eq!(error.status_code(), expected_status);
            let response = error.into_response();
            assert_eq!(response.status(), expected_status);
        }
    }

    #[test]
    fn test_internal_details_not_exposed() {
        let app_err = AuthError::Internal("pool timed out on host db-1".into()).to_app_error();
        assert!(!app_err.message().contains("db-1"));

        let app_err = AuthError::OAuth("invalid_client secret=abc".into()).to_app_error();
        assert!(!app_err.message().contains("secret"));
    }

    #[test]
    fn test_missing_refresh_token_message() {
        let app_err = AuthError::MissingRefreshToken.to_app_error();
        assert_eq!(app_err.message(), "Refresh token not passed");
        assert_eq!(app_err.action(), Some("Sign in again"));
    }

    #[test]
    fn test_bad_request_app_error_becomes_validation() {
        let err: AuthError = AppError::bad_request("Invalid email format").into();
        assert!(matches!(err, AuthError::Validation(ref m) if m == "Invalid email format"));

        let err: AuthError = AppError::internal("boom").into();
        assert!(matches!(err, AuthError::Internal(_)));
    }
}

#[cfg(test)]
mod config_tests {
    use crate::application::config::*;
    use std::time::Duration;

    #[test]
    fn test_default_config() {
        let config = AuthConfig::default();

        assert_eq!(config.access_token_ttl, Duration::from_secs(3600));
        assert_eq!(config.refresh_token_ttl, Duration::from_secs(7 * 24 * 3600));
        assert_eq!(config.refresh_cookie_ttl, Duration::from_secs(24 * 3600));
        assert_eq!(config.refresh_cookie_name, "refreshToken");
        assert!(config.cookie_secure);
        assert_eq!(config.cookie_same_site, SameSite::None);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = AuthConfig {
            jwt_secret: b"jwt-signing-secret".to_vec(),
            password_pepper: Some(b"pepper-value".to_vec()),
            ..AuthConfig::default()
        };
        let debug = format!("{:?}", config);

        assert!(!debug.contains("jwt-signing-secret"));
        assert!(!debug.contains("pepper-value"));
        // Raw bytes must not leak either
        assert!(!debug.contains(&format!("{:?}", b"jwt-signing-secret".to_vec())));
        assert!(debug.contains("refreshToken"));
    }

    #[test]
    fn test_with_random_secret() {
        let config1 = AuthConfig::with_random_secret();
        let config2 = AuthConfig::with_random_secret();

        assert_eq!(config1.jwt_secret.len(), 32);
        assert_ne!(config1.jwt_secret, config2.jwt_secret);
    }

    #[test]
    fn test_development_config_keeps_secure_cookie() {
        let config = AuthConfig::development();
        assert!(config.cookie_secure);
        assert!(config.cookie_domain.is_none());
        assert!(!config.jwt_secret.is_empty());
    }

    #[test]
    fn test_refresh_cookie_attributes() {
        let config = AuthConfig {
            cookie_domain: Some("api.shop.test".to_string()),
            ..AuthConfig::default()
        };
        let cookie = config.refresh_cookie();

        assert_eq!(cookie.name, "refreshToken");
        assert_eq!(cookie.domain.as_deref(), Some("api.shop.test"));
        assert_eq!(cookie.path, "/");
        assert!(cookie.http_only);
        assert_eq!(cookie.same_site, SameSite::None);
        assert_eq!(cookie.ttl, Duration::from_secs(24 * 3600));
    }

    #[test]
    fn test_dashboard_redirect() {
        let config = AuthConfig {
            client_url: "https://shop.test/".to_string(),
            ..AuthConfig::default()
        };
        assert_eq!(
            config.dashboard_redirect("a.b.c"),
            "https://shop.test/dashboard?accessToken=a.b.c"
        );
    }
}

#[cfg(test)]
mod router_tests {
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use tower::ServiceExt;

    use super::support::*;
    use crate::presentation::{AuthAppState, auth_router, users_router};

    fn app() -> Router {
        let config = config();
        let codec = codec(&config);
        let state = AuthAppState::new(InMemoryUsers::default(), codec, StubOAuth::default(), config);

        Router::new()
            .nest("/api/auth", auth_router(state.clone()))
            .nest("/api/users", users_router(state))
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn set_cookies(response: &Response) -> Vec<String> {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    fn cookie_value(set_cookies: &[String], name: &str) -> Option<String> {
        set_cookies.iter().find_map(|c| {
            let pair = c.split(';').next()?;
            let (n, v) = pair.split_once('=')?;
            (n == name).then(|| v.to_string())
        })
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn register(app: &Router, email: &str) -> Response {
        app.clone()
            .oneshot(post_json(
                "/api/auth/register",
                serde_json::json!({ "email": email, "password": PASSWORD }),
            ))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_register_sets_refresh_cookie_and_hides_it_from_body() {
        let app = app();
        let response = register(&app, "buyer@example.com").await;
        assert_eq!(response.status(), StatusCode::OK);

        let cookies = set_cookies(&response);
        let refresh = cookies.iter().find(|c| c.starts_with("refreshToken=")).unwrap();
        assert!(refresh.contains("HttpOnly"));
        assert!(refresh.contains("Secure"));
        assert!(refresh.contains("SameSite=None"));
        assert!(refresh.contains("Domain=api.shop.test"));

        let body = json_body(response).await;
        assert!(body["accessToken"].is_string());
        assert!(body.get("refreshToken").is_none());
        assert_eq!(body["user"]["email"], "buyer@example.com");
        assert_eq!(body["user"]["storeIds"], serde_json::json!([]));
        assert!(body["user"]["createdAt"].is_string());
    }

    #[tokio::test]
    async fn test_register_duplicate_returns_409() {
        let app = app();
        register(&app, "dup@example.com").await;
        let response = register(&app, "dup@example.com").await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = json_body(response).await;
        assert_eq!(body["status"], 409);
    }

    #[tokio::test]
    async fn test_login_unknown_email_returns_404() {
        let response = app()
            .oneshot(post_json(
                "/api/auth/login",
                serde_json::json!({ "email": "ghost@example.com", "password": PASSWORD }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_access_token_without_cookie_clears_and_401s() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/login/access-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let cookies = set_cookies(&response);
        assert_eq!(cookie_value(&cookies, "refreshToken").as_deref(), Some(""));

        let body = json_body(response).await;
        assert_eq!(body["detail"], "Refresh token not passed");
    }

    #[tokio::test]
    async fn test_access_token_with_cookie_rotates() {
        let app = app();
        let registered = register(&app, "buyer@example.com").await;
        let refresh = cookie_value(&set_cookies(&registered), "refreshToken").unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/login/access-token")
                    .header(header::COOKIE, format!("refreshToken={}", refresh))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(cookie_value(&set_cookies(&response), "refreshToken").is_some_and(|v| !v.is_empty()));
        let body = json_body(response).await;
        assert_eq!(body["user"]["email"], "buyer@example.com");
    }

    #[tokio::test]
    async fn test_access_token_with_invalid_cookie_401s() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/login/access-token")
                    .header(header::COOKIE, "refreshToken=forged.token.value")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_clears_cookie() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/logout")
                    .header(header::COOKIE, "refreshToken=anything")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookies = set_cookies(&response);
        let cleared = cookies.iter().find(|c| c.starts_with("refreshToken=")).unwrap();
        assert!(cleared.starts_with("refreshToken=;"));
        assert!(cleared.contains("1970"));
        assert_eq!(json_body(response).await, serde_json::json!(true));
    }

    #[tokio::test]
    async fn test_profile_requires_bearer_token() {
        let app = app();
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/users/profile")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = json_body(register(&app, "buyer@example.com").await).await;
        let access = body["accessToken"].as_str().unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/users/profile")
                    .header(header::AUTHORIZATION, format!("Bearer {}", access))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["email"], "buyer@example.com");
    }

    #[tokio::test]
    async fn test_google_redirects_with_state_cookie() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/auth/google")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let state = cookie_value(&set_cookies(&response), "oauthState").unwrap();
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        assert_eq!(
            location,
            format!("https://accounts.example.test/auth?state={}", state)
        );
    }

    #[tokio::test]
    async fn test_google_callback_state_mismatch_is_400() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/auth/google/callback?code=good-code&state=forged")
                    .header(header::COOKIE, "oauthState=expected")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let cookies = set_cookies(&response);
        assert_eq!(cookie_value(&cookies, "oauthState").as_deref(), Some(""));
        assert!(cookie_value(&cookies, "refreshToken").is_none());
    }

    #[tokio::test]
    async fn test_google_callback_logs_in_and_redirects() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/auth/google/callback?code=good-code&state=s3cr3t")
                    .header(header::COOKIE, "oauthState=s3cr3t")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        assert!(location.starts_with("https://shop.test/dashboard?accessToken="));

        let cookies = set_cookies(&response);
        assert!(cookie_value(&cookies, "refreshToken").is_some_and(|v| !v.is_empty()));
        assert_eq!(cookie_value(&cookies, "oauthState").as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_google_callback_bad_code_is_502() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/auth/google/callback?code=expired&state=s3cr3t")
                    .header(header::COOKIE, "oauthState=s3cr3t")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            cookie_value(&set_cookies(&response), "oauthState").as_deref(),
            Some("")
        );
    }

    #[tokio::test]
    async fn test_google_callback_declined_consent_clears_state() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/auth/google/callback?error=access_denied&state=s3cr3t")
                    .header(header::COOKIE, "oauthState=s3cr3t")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            cookie_value(&set_cookies(&response), "oauthState").as_deref(),
            Some("")
        );
    }
}
