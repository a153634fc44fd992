use crate::db::errors::DbError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error as ThisError;
use tracing::Level;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Missing, invalid or expired session, or bad credentials
    #[error("Not authenticated")]
    Unauthenticated { message: Option<String> },

    /// Authenticated, but the resource belongs to someone else
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// Invalid request data or business rule violation
    #[error("{message}")]
    BadRequest { message: String },

    /// Requested resource not found
    #[error("{resource} with ID {id} not found")]
    NotFound { resource: String, id: String },

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Database operation error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),

    /// Conflict error, e.g. for unique constraint violations
    #[error("Conflict: {message}")]
    Conflict { message: String },
}

impl Error {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Error::BadRequest { message: message.into() }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Error::Forbidden { message: message.into() }
    }

    pub fn not_found(resource: impl Into<String>, id: impl ToString) -> Self {
        Error::NotFound {
            resource: resource.into(),
            id: id.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            Error::Forbidden { .. } => StatusCode::FORBIDDEN,
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Database(db_err) => match db_err {
                DbError::NotFound => StatusCode::NOT_FOUND,
                DbError::UniqueViolation { .. } => StatusCode::CONFLICT,
                DbError::ForeignKeyViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::CheckViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::ValueTooLong { .. } => StatusCode::BAD_REQUEST,
                DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Conflict { .. } => StatusCode::CONFLICT,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::Unauthenticated { message } => message.clone().unwrap_or_else(|| "Authentication required".to_string()),
            Error::Forbidden { message } => message.clone(),
            Error::BadRequest { message } => message.clone(),
            Error::NotFound { resource, .. } => format!("{resource} not found"),
            Error::Internal { .. } => "Internal server error".to_string(),
            Error::Database(db_err) => match db_err {
                DbError::NotFound => "Resource not found".to_string(),
                DbError::UniqueViolation { constraint, table, .. } => match (table.as_deref(), constraint.as_deref()) {
                    (Some("users"), Some(c)) if c.contains("email") => "Email already registered.".to_string(),
                    _ => "Resource already exists".to_string(),
                },
                DbError::ForeignKeyViolation { .. } => "Invalid reference to related resource".to_string(),
                DbError::CheckViolation { .. } => "Invalid data provided".to_string(),
                DbError::ValueTooLong { .. } => "A field value is too long.".to_string(),
                DbError::Other(_) => "Database error occurred".to_string(),
            },
            Error::Other(_) => "Internal server error".to_string(),
            Error::Conflict { message } => message.clone(),
        }
    }
}

impl Error {
    /// Severity used when the error is turned into a response: server faults
    /// at ERROR, rejected writes at WARN, missing and conflicting resources at
    /// INFO, malformed requests and missing sessions at DEBUG.
    pub fn log_level(&self) -> Level {
        match self {
            Error::Database(DbError::Other(_)) | Error::Internal { .. } | Error::Other(_) => Level::ERROR,
            Error::NotFound { .. }
            | Error::Conflict { .. }
            | Error::Database(DbError::NotFound)
            | Error::Database(DbError::UniqueViolation { .. }) => Level::INFO,
            Error::Database(_) | Error::Forbidden { .. } => Level::WARN,
            Error::Unauthenticated { .. } | Error::BadRequest { .. } => Level::DEBUG,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self.log_level() {
            Level::ERROR => tracing::error!("Internal service error: {:#}", self),
            Level::WARN => tracing::warn!("Request rejected: {}", self),
            Level::INFO => tracing::info!("Client error: {}", self),
            _ => tracing::debug!("Client error: {}", self),
        }

        let body = json!({ "message": self.user_message() });
        (self.status_code(), Json(body)).into_response()
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;
