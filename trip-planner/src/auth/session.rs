//! JWT session token creation and verification, plus the cookie that carries it.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};

use crate::{api::models::users::CurrentUser, config::Config, errors::Error, types::UserId};

/// JWT session claims
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: UserId,   // Subject (user ID)
    pub email: String, // User email
    pub name: String,  // Display name
    pub exp: i64,      // Expiration time
    pub iat: i64,      // Issued at
}

impl SessionClaims {
    pub fn new(user: &CurrentUser, config: &Config) -> Self {
        let now = Utc::now().timestamp();
        let lifetime = config.auth.security.jwt_expiry.as_secs() as i64;

        Self {
            sub: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            exp: now + lifetime,
            iat: now,
        }
    }
}

impl From<SessionClaims> for CurrentUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
        }
    }
}

fn secret_key(config: &Config) -> Result<&str, Error> {
    config
        .secret_key
        .as_deref()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| Error::Internal {
            operation: "JWT sessions: secret_key is required".to_string(),
        })
}

/// Create a signed JWT for a user session
pub fn create_session_token(user: &CurrentUser, config: &Config) -> Result<String, Error> {
    let claims = SessionClaims::new(user, config);
    let key = EncodingKey::from_secret(secret_key(config)?.as_bytes());

    encode(&Header::default(), &claims, &key).map_err(|e| Error::Internal {
        operation: format!("create JWT: {e}"),
    })
}

/// Verify and decode a JWT session token. Pure: no I/O, no side effects.
pub fn verify_session_token(token: &str, config: &Config) -> Result<CurrentUser, Error> {
    let key = DecodingKey::from_secret(secret_key(config)?.as_bytes());
    let mut validation = Validation::default();
    validation.leeway = 0;

    let token_data = decode::<SessionClaims>(token, &key, &validation).map_err(|e| match e.kind() {
        // Client errors (401) - malformed, tampered or expired tokens
        ErrorKind::InvalidToken
        | ErrorKind::InvalidSignature
        | ErrorKind::ExpiredSignature
        | ErrorKind::MissingRequiredClaim(_)
        | ErrorKind::ImmatureSignature
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_)
        | ErrorKind::InvalidAlgorithm => Error::Unauthenticated {
            message: Some("Invalid or expired session".to_string()),
        },

        // Anything else is a key or library problem on our side
        _ => Error::Internal {
            operation: format!("JWT verification: {e}"),
        },
    })?;

    Ok(CurrentUser::from(token_data.claims))
}

/// `Set-Cookie` value delivering a session token: http-only, scoped to the
/// whole site, expiring together with the token.
pub fn session_cookie(token: &str, config: &Config) -> String {
    let session = &config.auth.session;
    cookie(&session.cookie_name, token, config.auth.security.jwt_expiry.as_secs(), config)
}

/// `Set-Cookie` value that makes the browser drop the session cookie
pub fn cleared_session_cookie(config: &Config) -> String {
    cookie(&config.auth.session.cookie_name, "", 0, config)
}

fn cookie(name: &str, value: &str, max_age: u64, config: &Config) -> String {
    let session = &config.auth.session;
    let secure = if session.cookie_secure { "; Secure" } else { "" };
    format!(
        "{name}={value}; Path=/; HttpOnly; SameSite={}; Max-Age={max_age}{secure}",
        session.cookie_same_site
    )
}
