//! Fixtures shared by the unit and HTTP tests.

use crate::{
    api::models::users::CurrentUser,
    auth::session,
    config::{AuthConfig, Config, PasswordConfig, PoolSettings},
    db::{
        handlers::{Repository, Trips, Users},
        models::{
            trips::{TripCreateDBRequest, TripDBResponse, TripFields},
            users::{UserCreateDBRequest, UserDBResponse},
        },
    },
    types::UserId,
};
use axum_test::TestServer;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

/// An HTTP test server over the full router, sharing `pool` with the test
pub async fn create_test_app(pool: PgPool) -> TestServer {
    let app = crate::Application::new_with_pool(create_test_config(), pool).expect("Failed to create application");
    app.into_test_server()
}

/// Default config with a signing key and cheap argon2 parameters
pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        secret_key: Some("test-secret-key-for-testing-only".to_string()),
        database: crate::config::DatabaseConfig {
            pool: PoolSettings {
                max_connections: 1,
                min_connections: 1,
                ..Default::default()
            },
            ..Default::default()
        },
        auth: AuthConfig {
            password: PasswordConfig {
                argon2_memory_kib: 1024,
                argon2_iterations: 1,
                argon2_parallelism: 1,
                ..Default::default()
            },
            ..Default::default()
        },
        enable_metrics: false,
        enable_otel_export: false,
        ..Default::default()
    }
}

/// Insert a user with a unique email. The password hash is a placeholder, so
/// this user cannot log in through `/api/auth/login`.
pub async fn create_test_user(pool: &PgPool) -> UserDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    let mut users_repo = Users::new(&mut conn);
    let suffix = Uuid::new_v4().simple();

    let user_create = UserCreateDBRequest {
        name: format!("Traveller {}", &suffix.to_string()[..8]),
        email: format!("traveller_{suffix}@example.com"),
        password_hash: "not-a-real-hash".to_string(),
    };

    users_repo.create(&user_create).await.expect("Failed to create test user")
}

/// Insert a bare trip (no hotels, transports or activities) owned by `user_id`
pub async fn create_test_trip(pool: &PgPool, user_id: UserId) -> TripDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    let mut trips_repo = Trips::new(&mut conn);

    let request = TripCreateDBRequest {
        user_id,
        fields: TripFields {
            destination: "lisbon".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 5, 1).expect("valid date"),
            end_date: NaiveDate::from_ymd_opt(2025, 5, 4).expect("valid date"),
            group_size: Some(2),
        },
    };

    trips_repo.create(&request).await.expect("Failed to create test trip")
}

/// A `Cookie` header value carrying a valid session for `user`
pub fn session_cookie_for(user: &UserDBResponse) -> String {
    let config = create_test_config();
    let current = CurrentUser::from(user.clone());
    let token = session::create_session_token(&current, &config).expect("Failed to sign session token");
    format!("{}={}", config.auth.session.cookie_name, token)
}
