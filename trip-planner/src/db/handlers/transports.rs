//! Database repository for transport legs.

use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    db::{
        errors::Result,
        handlers::repository::Repository,
        models::{
            transports::{TransportCreateDBRequest, TransportDBResponse, TransportUpdateDBRequest},
            trips::TripChildFilter,
        },
    },
    types::{TransportId, TripId, abbrev_uuid},
};

const TRANSPORT_COLUMNS: &str = "transport_id, trip_id, transport_type, service_provider, vehicle_type, booking_ref, \
     transport_name, seat, boarding_time, departure_city, arrival_city, departure_date, arrival_date, created_at";

pub struct Transports<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Transports<'c> {
    type CreateRequest = TransportCreateDBRequest;
    type UpdateRequest = TransportUpdateDBRequest;
    type Response = TransportDBResponse;
    type Id = TransportId;
    type Filter = TripChildFilter;

    #[instrument(skip(self, request), fields(trip_id = %abbrev_uuid(&request.trip_id), transport_type = ?request.fields.transport_type), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let fields = &request.fields;
        let transport = sqlx::query_as::<_, TransportDBResponse>(&format!(
            r#"
            INSERT INTO transports (
                transport_id, trip_id, transport_type, service_provider, vehicle_type, booking_ref,
                transport_name, seat, boarding_time, departure_city, arrival_city, departure_date, arrival_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {TRANSPORT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(request.trip_id)
        .bind(fields.transport_type)
        .bind(&fields.service_provider)
        .bind(&fields.vehicle_type)
        .bind(&fields.booking_ref)
        .bind(&fields.transport_name)
        .bind(&fields.seat)
        .bind(fields.boarding_time)
        .bind(&fields.departure_city)
        .bind(&fields.arrival_city)
        .bind(fields.departure_date)
        .bind(fields.arrival_date)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(transport)
    }

    #[instrument(skip(self), fields(transport_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let transport =
            sqlx::query_as::<_, TransportDBResponse>(&format!("SELECT {TRANSPORT_COLUMNS} FROM transports WHERE transport_id = $1"))
                .bind(id)
                .fetch_optional(&mut *self.db)
                .await?;

        Ok(transport)
    }

    #[instrument(skip(self, filter), fields(trip_id = %abbrev_uuid(&filter.trip_id)), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let transports = sqlx::query_as::<_, TransportDBResponse>(&format!(
            "SELECT {TRANSPORT_COLUMNS} FROM transports WHERE trip_id = $1 ORDER BY created_at, transport_id"
        ))
        .bind(filter.trip_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(transports)
    }

    #[instrument(skip(self), fields(transport_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM transports WHERE transport_id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Writes the full column set, so switching variant clears the columns
    /// the new variant does not carry.
    #[instrument(skip(self, request), fields(transport_id = %abbrev_uuid(&id), transport_type = ?request.transport_type), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let transport = sqlx::query_as::<_, TransportDBResponse>(&format!(
            r#"
            UPDATE transports SET
                transport_type = $2,
                service_provider = $3,
                vehicle_type = $4,
                booking_ref = $5,
                transport_name = $6,
                seat = $7,
                boarding_time = $8,
                departure_city = $9,
                arrival_city = $10,
                departure_date = $11,
                arrival_date = $12
            WHERE transport_id = $1
            RETURNING {TRANSPORT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.transport_type)
        .bind(&request.service_provider)
        .bind(&request.vehicle_type)
        .bind(&request.booking_ref)
        .bind(&request.transport_name)
        .bind(&request.seat)
        .bind(request.boarding_time)
        .bind(&request.departure_city)
        .bind(&request.arrival_city)
        .bind(request.departure_date)
        .bind(request.arrival_date)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(transport)
    }
}

impl<'c> Transports<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Remove every transport leg of a trip, returning how many went
    #[instrument(skip(self), fields(trip_id = %abbrev_uuid(&trip_id)), err)]
    pub async fn delete_by_trip(&mut self, trip_id: TripId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM transports WHERE trip_id = $1")
            .bind(trip_id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::super::repository::Repository;
    use super::*;
    use crate::{
        db::models::transports::{TransportFields, TransportType},
        test_utils::{create_test_trip, create_test_user},
    };
    use chrono::NaiveTime;
    use sqlx::PgPool;

    fn flight() -> TransportFields {
        TransportFields {
            transport_type: TransportType::Plane,
            service_provider: Some("Air France".to_string()),
            vehicle_type: None,
            booking_ref: Some("AF-77".to_string()),
            transport_name: Some("AF1234".to_string()),
            seat: Some("14C".to_string()),
            boarding_time: NaiveTime::from_hms_opt(9, 45, 0),
            departure_city: Some("London".to_string()),
            arrival_city: Some("Paris".to_string()),
            departure_date: None,
            arrival_date: None,
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_transport_type_round_trips_through_enum_column(pool: PgPool) {
        let user = create_test_user(&pool).await;
        let trip = create_test_trip(&pool, user.user_id).await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Transports::new(&mut conn);

        let created = repo
            .create(&TransportCreateDBRequest {
                trip_id: trip.trip_id,
                fields: flight(),
            })
            .await
            .unwrap();

        let fetched = repo.get_by_id(created.transport_id).await.unwrap().unwrap();
        assert_eq!(fetched.transport_type, TransportType::Plane);
        assert_eq!(fetched.boarding_time, NaiveTime::from_hms_opt(9, 45, 0));
        assert_eq!(fetched.transport_name.as_deref(), Some("AF1234"));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_switching_variant_clears_flight_columns(pool: PgPool) {
        let user = create_test_user(&pool).await;
        let trip = create_test_trip(&pool, user.user_id).await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Transports::new(&mut conn);

        let created = repo
            .create(&TransportCreateDBRequest {
                trip_id: trip.trip_id,
                fields: flight(),
            })
            .await
            .unwrap();

        let car = TransportFields {
            transport_type: TransportType::Car,
            service_provider: Some("Hertz".to_string()),
            vehicle_type: Some("SUV".to_string()),
            booking_ref: None,
            transport_name: None,
            seat: None,
            boarding_time: None,
            ..flight()
        };
        let updated = repo.update(created.transport_id, &car).await.unwrap();

        assert_eq!(updated.transport_type, TransportType::Car);
        assert_eq!(updated.boarding_time, None);
        assert_eq!(updated.seat, None);
        assert_eq!(updated.departure_city.as_deref(), Some("London"));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_delete_by_trip(pool: PgPool) {
        let user = create_test_user(&pool).await;
        let trip = create_test_trip(&pool, user.user_id).await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Transports::new(&mut conn);

        let created = repo
            .create(&TransportCreateDBRequest {
                trip_id: trip.trip_id,
                fields: flight(),
            })
            .await
            .unwrap();

        assert_eq!(repo.delete_by_trip(trip.trip_id).await.unwrap(), 1);
        assert!(!repo.delete(created.transport_id).await.unwrap());
    }
}
