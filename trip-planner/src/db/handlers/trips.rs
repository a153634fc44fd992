//! Database repository for trips.

use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    db::{
        errors::Result,
        handlers::repository::Repository,
        models::trips::{TripCreateDBRequest, TripDBResponse, TripFilter, TripUpdateDBRequest},
    },
    types::{TripId, UserId, abbrev_uuid},
};

const TRIP_COLUMNS: &str = "trip_id, user_id, destination, start_date, end_date, group_size, is_completed, created_at";

pub struct Trips<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Trips<'c> {
    type CreateRequest = TripCreateDBRequest;
    type UpdateRequest = TripUpdateDBRequest;
    type Response = TripDBResponse;
    type Id = TripId;
    type Filter = TripFilter;

    #[instrument(skip(self, request), fields(user_id = %abbrev_uuid(&request.user_id)), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let fields = &request.fields;
        let trip = sqlx::query_as::<_, TripDBResponse>(&format!(
            r#"
            INSERT INTO trips (trip_id, user_id, destination, start_date, end_date, group_size)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TRIP_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(request.user_id)
        .bind(&fields.destination)
        .bind(fields.start_date)
        .bind(fields.end_date)
        .bind(fields.group_size)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(trip)
    }

    #[instrument(skip(self), fields(trip_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let trip = sqlx::query_as::<_, TripDBResponse>(&format!("SELECT {TRIP_COLUMNS} FROM trips WHERE trip_id = $1"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(trip)
    }

    #[instrument(skip(self, filter), fields(user_id = %abbrev_uuid(&filter.user_id), limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let trips = sqlx::query_as::<_, TripDBResponse>(&format!(
            r#"
            SELECT {TRIP_COLUMNS} FROM trips
            WHERE user_id = $1
            ORDER BY created_at DESC, trip_id DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(filter.user_id)
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(trips)
    }

    /// Children go with the trip (`ON DELETE CASCADE`)
    #[instrument(skip(self), fields(trip_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM trips WHERE trip_id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Rewrites the client-editable columns. Owner and completion flag are
    /// left alone.
    #[instrument(skip(self, request), fields(trip_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let trip = sqlx::query_as::<_, TripDBResponse>(&format!(
            r#"
            UPDATE trips SET
                destination = $2,
                start_date = $3,
                end_date = $4,
                group_size = $5
            WHERE trip_id = $1
            RETURNING {TRIP_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&request.destination)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(request.group_size)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(trip)
    }
}

impl<'c> Trips<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// The user's most recently created trip
    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&user_id)), err)]
    pub async fn latest_for_user(&mut self, user_id: UserId) -> Result<Option<TripDBResponse>> {
        Ok(self.list(&TripFilter::new(user_id, 0, 1)).await?.into_iter().next())
    }

    /// Fetch a trip and hold its row lock until the surrounding transaction
    /// ends. Serializes completion checks for the same trip.
    #[instrument(skip(self), fields(trip_id = %abbrev_uuid(&id)), err)]
    pub async fn get_for_update(&mut self, id: TripId) -> Result<Option<TripDBResponse>> {
        let trip = sqlx::query_as::<_, TripDBResponse>(&format!("SELECT {TRIP_COLUMNS} FROM trips WHERE trip_id = $1 FOR UPDATE"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(trip)
    }

    /// Set the completion flag. There is no way back to incomplete.
    #[instrument(skip(self), fields(trip_id = %abbrev_uuid(&id)), err)]
    pub async fn mark_completed(&mut self, id: TripId) -> Result<TripDBResponse> {
        let trip = sqlx::query_as::<_, TripDBResponse>(&format!(
            "UPDATE trips SET is_completed = TRUE WHERE trip_id = $1 RETURNING {TRIP_COLUMNS}"
        ))
        .bind(id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(trip)
    }
}
