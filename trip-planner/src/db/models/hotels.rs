//! Database models for hotels.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use crate::api::models::trips::{HotelInput, non_blank};
use crate::types::{HotelId, TripId};

/// Database entity model
#[derive(Debug, Clone, FromRow)]
pub struct HotelDBResponse {
    pub hotel_id: HotelId,
    pub trip_id: TripId,
    pub hotel_name: String,
    pub city: Option<String>,
    pub address: Option<String>,
    pub checkin_date: Option<NaiveDate>,
    pub checkout_date: Option<NaiveDate>,
    pub booking_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HotelFields {
    pub hotel_name: String,
    pub city: Option<String>,
    pub address: Option<String>,
    pub checkin_date: Option<NaiveDate>,
    pub checkout_date: Option<NaiveDate>,
    pub booking_ref: Option<String>,
}

impl From<HotelInput> for HotelFields {
    fn from(input: HotelInput) -> Self {
        Self {
            hotel_name: input.hotel_name.trim().to_string(),
            city: non_blank(input.city),
            address: non_blank(input.address),
            checkin_date: input.checkin_date,
            checkout_date: input.checkout_date,
            booking_ref: non_blank(input.booking_ref),
        }
    }
}

/// Database request for creating a hotel
#[derive(Debug, Clone)]
pub struct HotelCreateDBRequest {
    pub trip_id: TripId,
    pub fields: HotelFields,
}

pub type HotelUpdateDBRequest = HotelFields;
