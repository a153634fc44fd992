//! Database models for users.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::types::UserId;

/// Database entity model
#[derive(Debug, Clone, FromRow)]
pub struct UserDBResponse {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Database request for creating a new user
#[derive(Debug, Clone)]
pub struct UserCreateDBRequest {
    pub name: String,
    /// Normalized (trimmed, lowercased) email
    pub email: String,
    pub password_hash: String,
}

/// Database request for updating a user. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserUpdateDBRequest {
    pub name: Option<String>,
    pub password_hash: Option<String>,
}

/// Filter for listing users
#[derive(Debug, Clone)]
pub struct UserFilter {
    pub skip: i64,
    pub limit: i64,
}

impl UserFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self { skip, limit }
    }
}
