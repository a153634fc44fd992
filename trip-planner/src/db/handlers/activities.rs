//! Database repository for planned activities.

use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    db::{
        errors::Result,
        handlers::repository::Repository,
        models::{
            activities::{ActivityCreateDBRequest, ActivityDBResponse, ActivityUpdateDBRequest},
            trips::TripChildFilter,
        },
    },
    types::{ActivityId, TripId, abbrev_uuid},
};

const ACTIVITY_COLUMNS: &str =
    "activity_id, trip_id, activity_name, activity_description, activity_datetime, pickup_location, is_completed, created_at";

pub struct Activities<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Activities<'c> {
    type CreateRequest = ActivityCreateDBRequest;
    type UpdateRequest = ActivityUpdateDBRequest;
    type Response = ActivityDBResponse;
    type Id = ActivityId;
    type Filter = TripChildFilter;

    #[instrument(skip(self, request), fields(trip_id = %abbrev_uuid(&request.trip_id)), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let fields = &request.fields;
        let activity = sqlx::query_as::<_, ActivityDBResponse>(&format!(
            r#"
            INSERT INTO activities (
                activity_id, trip_id, activity_name, activity_description, activity_datetime, pickup_location, is_completed
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ACTIVITY_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(request.trip_id)
        .bind(&fields.activity_name)
        .bind(&fields.activity_description)
        .bind(fields.activity_datetime)
        .bind(&fields.pickup_location)
        .bind(fields.is_completed)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(activity)
    }

    #[instrument(skip(self), fields(activity_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let activity =
            sqlx::query_as::<_, ActivityDBResponse>(&format!("SELECT {ACTIVITY_COLUMNS} FROM activities WHERE activity_id = $1"))
                .bind(id)
                .fetch_optional(&mut *self.db)
                .await?;

        Ok(activity)
    }

    #[instrument(skip(self, filter), fields(trip_id = %abbrev_uuid(&filter.trip_id)), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let activities = sqlx::query_as::<_, ActivityDBResponse>(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities WHERE trip_id = $1 ORDER BY created_at, activity_id"
        ))
        .bind(filter.trip_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(activities)
    }

    #[instrument(skip(self), fields(activity_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM activities WHERE activity_id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(activity_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let activity = sqlx::query_as::<_, ActivityDBResponse>(&format!(
            r#"
            UPDATE activities SET
                activity_name = $2,
                activity_description = $3,
                activity_datetime = $4,
                pickup_location = $5,
                is_completed = $6
            WHERE activity_id = $1
            RETURNING {ACTIVITY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&request.activity_name)
        .bind(&request.activity_description)
        .bind(request.activity_datetime)
        .bind(&request.pickup_location)
        .bind(request.is_completed)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(activity)
    }
}

impl<'c> Activities<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Flip the completion flag in place and return the new row
    #[instrument(skip(self), fields(activity_id = %abbrev_uuid(&id)), err)]
    pub async fn toggle_completed(&mut self, id: ActivityId) -> Result<ActivityDBResponse> {
        let activity = sqlx::query_as::<_, ActivityDBResponse>(&format!(
            "UPDATE activities SET is_completed = NOT is_completed WHERE activity_id = $1 RETURNING {ACTIVITY_COLUMNS}"
        ))
        .bind(id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(activity)
    }

    /// Remove every activity of a trip, returning how many went
    #[instrument(skip(self), fields(trip_id = %abbrev_uuid(&trip_id)), err)]
    pub async fn delete_by_trip(&mut self, trip_id: TripId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM activities WHERE trip_id = $1")
            .bind(trip_id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected())
    }
}
