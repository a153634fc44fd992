//! # trip-planner: backend for a travel itinerary planner
//!
//! `trip-planner` stores trips for registered users. A trip is an aggregate
//! of a header (destination, dates, group size) plus hotel stays, transport
//! legs and planned activities. Users register and log in with email and
//! password. The session is a signed JWT carried in an http-only cookie, and
//! every trip endpoint is scoped to the owner of the session.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for the HTTP layer and
//! uses PostgreSQL (through [SQLx](https://github.com/launchbadge/sqlx)) for persistence.
//!
//! ### Request Flow
//!
//! A request to `/api/trips/*` first passes the tracing and CORS layers, then
//! the [`CurrentUser`](api::models::users::CurrentUser) extractor verifies the
//! session cookie. The handler opens a transaction, resolves ownership through
//! [`auth::ownership`], and works on the tables through the repositories in
//! [`db::handlers`]. Errors bubble up as [`errors::Error`] and are rendered as
//! `{"message": ..}` JSON with a matching status code.
//!
//! ### Core Components
//!
//! - **API layer** ([`api`]): handlers, request/response models and extractors
//! - **Authentication** ([`auth`]): password hashing, JWT sessions, ownership
//! - **Database layer** ([`db`]): repositories over `users`, `trips`, `hotels`,
//!   `transports` and `activities`
//! - **Configuration** ([`config`]): YAML file plus `TRIPS_` environment overrides
//! - **Telemetry** ([`telemetry`]): `tracing` subscriber with optional OTLP export
//!
//! ## Getting Started
//!
//! ```bash
//! export DATABASE_URL=postgres://localhost/trips
//! export TRIPS_SECRET_KEY=change-me
//! trip-planner -f config.yaml
//! ```
//!
//! Run `trip-planner --validate` to check a configuration without starting the server.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod telemetry;
mod types;

pub use config::Config;

#[cfg(test)]
pub mod test_utils;

use std::{str::FromStr, time::Duration};

use crate::{config::CorsOrigin, openapi::ApiDoc};
use axum::{
    Router,
    http::{self, HeaderValue},
    routing::{get, patch, post, put},
};
use axum_prometheus::PrometheusMetricLayer;
use bon::Builder;
use sqlx::{
    ConnectOptions, PgPool,
    postgres::{PgConnectOptions, PgPoolOptions},
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info};
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

/// Application state shared across all request handlers.
///
/// Cloned into every handler by axum; both fields are cheap to clone.
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
}

/// Get the database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Connect to PostgreSQL using the configured pool settings and bring the
/// schema up to date.
async fn setup_database(config: &Config) -> anyhow::Result<PgPool> {
    let database = &config.database;
    let pool_settings = &database.pool;

    let connect_options = PgConnectOptions::from_str(&database.url)?.log_slow_statements(
        log::LevelFilter::Warn,
        Duration::from_millis(database.slow_statement_threshold_ms),
    );

    let pool = PgPoolOptions::new()
        .max_connections(pool_settings.max_connections)
        .min_connections(pool_settings.min_connections)
        .acquire_timeout(Duration::from_secs(pool_settings.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(pool_settings.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(pool_settings.max_lifetime_secs))
        .connect_with(connect_options)
        .await?;

    migrator().run(&pool).await?;
    info!("Database migrations applied");

    Ok(pool)
}

/// Build the CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let cors_config = &config.auth.security.cors;

    // A wildcard anywhere in the list allows every origin
    let allow_origin = if cors_config
        .allowed_origins
        .iter()
        .any(|origin| matches!(origin, CorsOrigin::Wildcard))
    {
        AllowOrigin::any()
    } else {
        let mut origins = Vec::new();
        for origin in &cors_config.allowed_origins {
            if let CorsOrigin::Url(url) = origin {
                origins.push(url.as_str().trim_end_matches('/').parse::<HeaderValue>()?);
            }
        }
        AllowOrigin::list(origins)
    };

    let mut cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([http::Method::GET, http::Method::POST, http::Method::PUT, http::Method::PATCH])
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_credentials(cors_config.allow_credentials);

    if let Some(max_age) = cors_config.max_age {
        cors = cors.max_age(Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the main application router with all endpoints and middleware.
///
/// - `/api/auth/*`: registration, login, logout, current user
/// - `/api/trips/*`: trip aggregates, activity completion, partial updates
/// - `/healthz`: liveness probe
/// - `/api/openapi.json` and `/api/docs`: API documentation
/// - `/internal/metrics`: Prometheus metrics, when enabled
///
/// Literal trip routes (`test-save`, `latest`, `hotels/..`, `transports/..`,
/// `activities/..`) take precedence over `/{trip_id}` in the route table.
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let auth_routes = Router::new()
        .route("/register", post(api::handlers::auth::register))
        .route("/login", post(api::handlers::auth::login))
        .route("/logout", post(api::handlers::auth::logout))
        .route("/me", get(api::handlers::auth::get_current_user));

    let trip_routes = Router::new()
        .route("/test-save", post(api::handlers::trips::create_trip))
        .route("/latest", get(api::handlers::trips::get_latest_trip))
        .route(
            "/activities/{activity_id}/toggle-completed",
            patch(api::handlers::trips::toggle_activity_completed),
        )
        .route("/hotels/{hotel_id}", patch(api::handlers::trips::patch_hotel))
        .route("/transports/{transport_id}", patch(api::handlers::trips::patch_transport))
        .route("/activities/{activity_id}", patch(api::handlers::trips::patch_activity))
        .route(
            "/{trip_id}",
            put(api::handlers::trips::replace_trip).patch(api::handlers::trips::patch_trip),
        );

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/trips", trip_routes)
        .with_state(state.clone());

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .nest("/api", api_routes)
        .merge(RapiDoc::with_openapi("/api/openapi.json", ApiDoc::openapi()).path("/api/docs"));

    // Create CORS layer from config
    let cors_layer = create_cors_layer(&state.config)?;
    let mut router = router.layer(cors_layer);

    // Add Prometheus metrics if enabled
    if state.config.enable_metrics {
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
        router = router
            .route("/internal/metrics", get(|| async move { metric_handle.render() }))
            .layer(prometheus_layer);
    }

    // Add tracing layer
    let router = router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// The HTTP server together with the resources it owns.
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance: connect, migrate, build the router
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!(
            "Starting trip planner on {} (registration enabled: {}, metrics: {})",
            config.bind_address(),
            config.auth.allow_registration,
            config.enable_metrics
        );

        let pool = setup_database(&config).await?;
        Self::new_with_pool(config, pool)
    }

    /// Create an application on an existing, already migrated pool
    pub fn new_with_pool(config: Config, pool: PgPool) -> anyhow::Result<Self> {
        let app_state = AppState::builder().db(pool.clone()).config(config.clone()).build();
        let router = build_router(app_state)?;

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router.into_make_service()).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "Trip planner listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        // Run the server with graceful shutdown
        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        // Close database connections
        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}
