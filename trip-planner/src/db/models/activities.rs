//! Database models for activities.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::api::models::trips::{ActivityInput, non_blank};
use crate::types::{ActivityId, TripId};

/// Database entity model
#[derive(Debug, Clone, FromRow)]
pub struct ActivityDBResponse {
    pub activity_id: ActivityId,
    pub trip_id: TripId,
    pub activity_name: String,
    pub activity_description: Option<String>,
    pub activity_datetime: DateTime<Utc>,
    pub pickup_location: Option<String>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityFields {
    pub activity_name: String,
    pub activity_description: Option<String>,
    pub activity_datetime: DateTime<Utc>,
    pub pickup_location: Option<String>,
    pub is_completed: bool,
}

impl From<ActivityInput> for ActivityFields {
    fn from(input: ActivityInput) -> Self {
        Self {
            activity_name: input.activity_name.trim().to_string(),
            activity_description: non_blank(input.activity_description),
            activity_datetime: input.activity_datetime,
            pickup_location: non_blank(input.pickup_location),
            is_completed: input.is_completed,
        }
    }
}

/// Database request for creating an activity
#[derive(Debug, Clone)]
pub struct ActivityCreateDBRequest {
    pub trip_id: TripId,
    pub fields: ActivityFields,
}

pub type ActivityUpdateDBRequest = ActivityFields;

/// A trip counts as complete once it has at least one activity and every
/// activity is both checked off and no longer in the future.
pub fn trip_is_complete(activities: &[ActivityDBResponse], now: DateTime<Utc>) -> bool {
    !activities.is_empty()
        && activities
            .iter()
            .all(|activity| activity.is_completed && activity.activity_datetime <= now)
}
