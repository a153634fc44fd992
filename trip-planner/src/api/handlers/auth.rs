use axum::{Json, extract::State};
use tracing::info;

use crate::{
    AppState,
    api::{
        extract::ValidJson,
        models::{
            auth::{AuthResponse, AuthSuccessResponse, LoginRequest, LoginResponse, LogoutResponse, RegisterRequest, RegisterResponse},
            users::{CurrentUser, UserResponse},
        },
    },
    auth::{password, session},
    db::{
        handlers::{Repository, Users},
        models::users::UserCreateDBRequest,
    },
    errors::Error,
    types::abbrev_uuid,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";
// Widths of the `users.name` and `users.email` columns
const MAX_NAME_LENGTH: usize = 100;
const MAX_EMAIL_LENGTH: usize = 255;

fn invalid_credentials() -> Error {
    Error::Unauthenticated {
        message: Some(INVALID_CREDENTIALS.to_string()),
    }
}

/// Register a new user account
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    tag = "authentication",
    responses(
        (status = 201, description = "User registered successfully", body = AuthSuccessResponse),
        (status = 400, description = "Missing fields or password out of bounds"),
        (status = 403, description = "Registration is disabled"),
        (status = 409, description = "Email already registered"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn register(State(state): State<AppState>, ValidJson(request): ValidJson<RegisterRequest>) -> Result<RegisterResponse, Error> {
    if !state.config.auth.allow_registration {
        return Err(Error::forbidden("User registration is disabled"));
    }

    let name = request.name.trim();
    let email = request.email.trim().to_lowercase();
    if name.is_empty() || email.is_empty() || request.password.is_empty() {
        return Err(Error::bad_request("All fields are required."));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(Error::bad_request(format!("Name must be no more than {MAX_NAME_LENGTH} characters")));
    }
    if email.chars().count() > MAX_EMAIL_LENGTH {
        return Err(Error::bad_request(format!("Email must be no more than {MAX_EMAIL_LENGTH} characters")));
    }

    // Validate password length
    let password_config = &state.config.auth.password;
    let password_length = request.password.chars().count();
    if password_length < password_config.min_length {
        return Err(Error::bad_request(format!(
            "Password must be at least {} characters",
            password_config.min_length
        )));
    }
    if password_length > password_config.max_length {
        return Err(Error::bad_request(format!(
            "Password must be no more than {} characters",
            password_config.max_length
        )));
    }

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let mut user_repo = Users::new(&mut tx);
    if user_repo.get_user_by_email(&email).await?.is_some() {
        return Err(Error::Conflict {
            message: "Email already registered.".to_string(),
        });
    }

    // Hash the password on a blocking thread to avoid blocking async runtime
    let password = request.password;
    let params = password_config.argon2_params();
    let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&password, params))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password hashing task: {e}"),
        })??;

    // A concurrent registration can still win the race; the unique index then
    // reports the conflict.
    let created_user = user_repo
        .create(&UserCreateDBRequest {
            name: name.to_string(),
            email,
            password_hash,
        })
        .await?;

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;
    info!("Registered user {}", abbrev_uuid(&created_user.user_id));

    Ok(RegisterResponse {
        body: AuthSuccessResponse {
            message: "User registered successfully.".to_string(),
        },
    })
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    tag = "authentication",
    responses(
        (status = 200, description = "Login successful, session cookie set", body = AuthResponse),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(State(state): State<AppState>, ValidJson(request): ValidJson<LoginRequest>) -> Result<LoginResponse, Error> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(Error::bad_request("Email and password are required."));
    }

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    // Unknown email and wrong password are indistinguishable to the client
    let user = Users::new(&mut pool_conn)
        .get_user_by_email(&request.email)
        .await?
        .ok_or_else(invalid_credentials)?;

    // Verify password on a blocking thread to avoid blocking async runtime
    let password = request.password;
    let hash = user.password_hash.clone();
    let is_valid = tokio::task::spawn_blocking(move || password::verify_password(&password, &hash))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password verification task: {e}"),
        })??;

    if !is_valid {
        return Err(invalid_credentials());
    }

    let current_user = CurrentUser::from(user);
    let token = session::create_session_token(&current_user, &state.config)?;
    let cookie = session::session_cookie(&token, &state.config);

    Ok(LoginResponse {
        auth_response: AuthResponse {
            user: UserResponse::from(current_user),
        },
        cookie,
    })
}

/// Logout (clear session cookie)
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "authentication",
    responses(
        (status = 200, description = "Logout successful", body = AuthSuccessResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn logout(State(state): State<AppState>) -> LogoutResponse {
    LogoutResponse {
        auth_response: AuthSuccessResponse {
            message: "Logged out".to_string(),
        },
        cookie: session::cleared_session_cookie(&state.config),
    }
}

/// Get the user behind the current session
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "authentication",
    responses(
        (status = 200, description = "Authenticated user", body = AuthResponse),
        (status = 401, description = "No valid session"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_current_user(current_user: CurrentUser) -> Json<AuthResponse> {
    Json(AuthResponse {
        user: UserResponse::from(current_user),
    })
}
