//! API Server Entry Point
//!
//! Uses `anyhow` for startup errors; request-level errors are
//! `auth::AuthError` rendered through `kernel::error::AppError`.

mod config;

use auth::{AuthAppState, GoogleOAuthClient, JwtCodec, PgUserDirectory, auth_router, users_router};
use axum::{
    Router, http,
    http::{Method, header},
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront_api=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&settings.database_url)
        .await?;

    tracing::info!("Connected to database");

    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    if settings.google.client_id.is_empty() {
        tracing::warn!("GOOGLE_CLIENT_ID not set, Google sign-in will fail at the provider");
    }

    let codec = JwtCodec::new(&settings.auth.jwt_secret);
    let google = GoogleOAuthClient::new(settings.google)?;
    let state = AuthAppState::new(PgUserDirectory::new(pool), codec, google, settings.auth);

    let allowed_origins: Vec<http::HeaderValue> = settings
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    let app = Router::new()
        .nest("/api/auth", auth_router(state.clone()))
        .nest("/api/users", users_router(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        );

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
