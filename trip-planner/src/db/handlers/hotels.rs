//! Database repository for hotel stays.

use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    db::{
        errors::Result,
        handlers::repository::Repository,
        models::{
            hotels::{HotelCreateDBRequest, HotelDBResponse, HotelUpdateDBRequest},
            trips::TripChildFilter,
        },
    },
    types::{HotelId, TripId, abbrev_uuid},
};

const HOTEL_COLUMNS: &str = "hotel_id, trip_id, hotel_name, city, address, checkin_date, checkout_date, booking_ref, created_at";

pub struct Hotels<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Hotels<'c> {
    type CreateRequest = HotelCreateDBRequest;
    type UpdateRequest = HotelUpdateDBRequest;
    type Response = HotelDBResponse;
    type Id = HotelId;
    type Filter = TripChildFilter;

    #[instrument(skip(self, request), fields(trip_id = %abbrev_uuid(&request.trip_id)), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let fields = &request.fields;
        let hotel = sqlx::query_as::<_, HotelDBResponse>(&format!(
            r#"
            INSERT INTO hotels (hotel_id, trip_id, hotel_name, city, address, checkin_date, checkout_date, booking_ref)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {HOTEL_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(request.trip_id)
        .bind(&fields.hotel_name)
        .bind(&fields.city)
        .bind(&fields.address)
        .bind(fields.checkin_date)
        .bind(fields.checkout_date)
        .bind(&fields.booking_ref)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(hotel)
    }

    #[instrument(skip(self), fields(hotel_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let hotel = sqlx::query_as::<_, HotelDBResponse>(&format!("SELECT {HOTEL_COLUMNS} FROM hotels WHERE hotel_id = $1"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(hotel)
    }

    #[instrument(skip(self, filter), fields(trip_id = %abbrev_uuid(&filter.trip_id)), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let hotels = sqlx::query_as::<_, HotelDBResponse>(&format!(
            "SELECT {HOTEL_COLUMNS} FROM hotels WHERE trip_id = $1 ORDER BY created_at, hotel_id"
        ))
        .bind(filter.trip_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(hotels)
    }

    #[instrument(skip(self), fields(hotel_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM hotels WHERE hotel_id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(hotel_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let hotel = sqlx::query_as::<_, HotelDBResponse>(&format!(
            r#"
            UPDATE hotels SET
                hotel_name = $2,
                city = $3,
                address = $4,
                checkin_date = $5,
                checkout_date = $6,
                booking_ref = $7
            WHERE hotel_id = $1
            RETURNING {HOTEL_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&request.hotel_name)
        .bind(&request.city)
        .bind(&request.address)
        .bind(request.checkin_date)
        .bind(request.checkout_date)
        .bind(&request.booking_ref)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(hotel)
    }
}

impl<'c> Hotels<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Remove every hotel of a trip, returning how many went
    #[instrument(skip(self), fields(trip_id = %abbrev_uuid(&trip_id)), err)]
    pub async fn delete_by_trip(&mut self, trip_id: TripId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM hotels WHERE trip_id = $1")
            .bind(trip_id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected())
    }
}
