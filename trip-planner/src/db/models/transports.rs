//! Database models for transport legs.
//!
//! The API accepts a tagged variant per transport kind; storage collapses the
//! variants into one generic column set keyed by [`TransportType`].

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::api::models::trips::{TransportDetails, TransportInput, non_blank};
use crate::types::{TransportId, TripId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "transport_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransportType {
    Car,
    Bus,
    Train,
    Plane,
}

/// Database entity model
#[derive(Debug, Clone, FromRow)]
pub struct TransportDBResponse {
    pub transport_id: TransportId,
    pub trip_id: TripId,
    pub transport_type: TransportType,
    pub service_provider: Option<String>,
    pub vehicle_type: Option<String>,
    pub booking_ref: Option<String>,
    pub transport_name: Option<String>,
    pub seat: Option<String>,
    pub boarding_time: Option<NaiveTime>,
    pub departure_city: Option<String>,
    pub arrival_city: Option<String>,
    pub departure_date: Option<DateTime<Utc>>,
    pub arrival_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Generic column set shared by every transport kind
#[derive(Debug, Clone, PartialEq)]
pub struct TransportFields {
    pub transport_type: TransportType,
    pub service_provider: Option<String>,
    pub vehicle_type: Option<String>,
    pub booking_ref: Option<String>,
    /// Bus or train service name, or flight number
    pub transport_name: Option<String>,
    pub seat: Option<String>,
    /// Flights only
    pub boarding_time: Option<NaiveTime>,
    pub departure_city: Option<String>,
    pub arrival_city: Option<String>,
    pub departure_date: Option<DateTime<Utc>>,
    pub arrival_date: Option<DateTime<Utc>>,
}

impl From<TransportInput> for TransportFields {
    fn from(input: TransportInput) -> Self {
        let mut fields = Self {
            transport_type: input.details.transport_type(),
            service_provider: None,
            vehicle_type: None,
            booking_ref: None,
            transport_name: None,
            seat: None,
            boarding_time: None,
            departure_city: non_blank(input.departure_city),
            arrival_city: non_blank(input.arrival_city),
            departure_date: input.departure_date,
            arrival_date: input.arrival_date,
        };

        match input.details {
            TransportDetails::Car(car) => {
                fields.service_provider = non_blank(car.service_provider);
                fields.vehicle_type = non_blank(car.vehicle_type);
                fields.booking_ref = non_blank(car.booking_ref);
            }
            TransportDetails::Bus(service) | TransportDetails::Train(service) => {
                fields.service_provider = non_blank(service.service_provider);
                fields.transport_name = non_blank(service.transport_name);
                fields.booking_ref = non_blank(service.booking_ref);
                fields.seat = non_blank(service.seat);
            }
            TransportDetails::Plane(flight) => {
                fields.service_provider = non_blank(flight.service_provider);
                fields.transport_name = non_blank(flight.transport_name);
                fields.booking_ref = non_blank(flight.booking_ref);
                fields.seat = non_blank(flight.seat);
                fields.boarding_time = flight.boarding_time;
            }
        }

        fields
    }
}

/// Database request for creating a transport leg
#[derive(Debug, Clone)]
pub struct TransportCreateDBRequest {
    pub trip_id: TripId,
    pub fields: TransportFields,
}

pub type TransportUpdateDBRequest = TransportFields;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::trips::TransportInput;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> TransportInput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_car_keeps_vehicle_type_and_drops_flight_fields() {
        let fields = TransportFields::from(parse(json!({
            "transport_type": "car",
            "service_provider": "Hertz",
            "vehicle_type": "SUV",
            "booking_ref": "HZ-1",
            "seat": "12A",
            "boarding_time": "10:30",
            "departure_city": "Lyon",
            "arrival_city": ""
        })));

        assert_eq!(fields.transport_type, TransportType::Car);
        assert_eq!(fields.vehicle_type.as_deref(), Some("SUV"));
        assert_eq!(fields.seat, None);
        assert_eq!(fields.boarding_time, None);
        assert_eq!(fields.departure_city.as_deref(), Some("Lyon"));
        assert_eq!(fields.arrival_city, None);
    }

    #[test]
    fn test_plane_maps_flight_number_and_boarding_time() {
        let fields = TransportFields::from(parse(json!({
            "transport_type": "plane",
            "service_provider": "Air France",
            "transport_name": "AF123",
            "seat": "14C",
            "boarding_time": "07:45",
            "vehicle_type": null,
            "departure_date": "2026-05-01T08:30:00Z"
        })));

        assert_eq!(fields.transport_type, TransportType::Plane);
        assert_eq!(fields.transport_name.as_deref(), Some("AF123"));
        assert_eq!(fields.boarding_time, NaiveTime::from_hms_opt(7, 45, 0));
        assert_eq!(fields.vehicle_type, None);
        assert!(fields.departure_date.is_some());
    }

    #[test]
    fn test_train_and_bus_share_service_fields() {
        for kind in ["bus", "train"] {
            let fields = TransportFields::from(parse(json!({
                "transport_type": kind,
                "transport_name": "Eurostar 9001",
                "seat": "42",
                "vehicle_type": "ignored"
            })));
            assert_eq!(fields.transport_name.as_deref(), Some("Eurostar 9001"));
            assert_eq!(fields.seat.as_deref(), Some("42"));
            assert_eq!(fields.vehicle_type, None);
        }
    }
}
