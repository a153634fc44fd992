//! Database models for trips.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use crate::api::models::trips::TripInput;
use crate::types::{TripId, UserId};

/// Database entity model
#[derive(Debug, Clone, FromRow)]
pub struct TripDBResponse {
    pub trip_id: TripId,
    pub user_id: UserId,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub group_size: Option<i32>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Columns a client may write on a trip. Ownership and completion are never
/// part of it.
#[derive(Debug, Clone, PartialEq)]
pub struct TripFields {
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub group_size: Option<i32>,
}

impl From<TripInput> for TripFields {
    fn from(input: TripInput) -> Self {
        Self {
            destination: input.destination.trim().to_string(),
            start_date: input.start_date,
            end_date: input.end_date,
            group_size: input.group_size,
        }
    }
}

/// Database request for creating a trip
#[derive(Debug, Clone)]
pub struct TripCreateDBRequest {
    /// Always the authenticated user; never taken from the request body
    pub user_id: UserId,
    pub fields: TripFields,
}

/// Database request for updating a trip (full column set)
pub type TripUpdateDBRequest = TripFields;

/// Filter for listing a user's trips, newest first
#[derive(Debug, Clone)]
pub struct TripFilter {
    pub user_id: UserId,
    pub skip: i64,
    pub limit: i64,
}

impl TripFilter {
    pub fn new(user_id: UserId, skip: i64, limit: i64) -> Self {
        Self { user_id, skip, limit }
    }
}

/// Filter shared by the child tables: every row belonging to one trip
#[derive(Debug, Clone, Copy)]
pub struct TripChildFilter {
    pub trip_id: TripId,
}

impl TripChildFilter {
    pub fn new(trip_id: TripId) -> Self {
        Self { trip_id }
    }
}
