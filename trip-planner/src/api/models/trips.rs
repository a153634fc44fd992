//! API request/response models for trips and their hotels, transport legs and activities.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use utoipa::ToSchema;

use crate::db::models::{
    activities::ActivityDBResponse,
    hotels::HotelDBResponse,
    transports::{TransportDBResponse, TransportFields, TransportType},
    trips::TripDBResponse,
};
use crate::errors::Error;
use crate::types::{ActivityId, HotelId, TransportId, TripId, UserId};

/// Treat missing, empty and whitespace-only strings alike.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn require(value: &str, field: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::bad_request(format!("{field} is required.")));
    }
    Ok(())
}

/// Text values must fit the `VARCHAR(n)` column they are stored in.
fn within(value: Option<&str>, field: &str, limit: usize) -> Result<(), Error> {
    match value {
        Some(v) if v.trim().chars().count() > limit => Err(Error::bad_request(format!(
            "{field} must be at most {limit} characters."
        ))),
        _ => Ok(()),
    }
}

/// Boarding times arrive as `HH:MM` from time pickers, or `HH:MM:SS`.
mod boarding_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, de::Error as _};

    pub fn parse(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
        NaiveTime::parse_from_str(raw, "%H:%M:%S%.f").or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => parse(s).map(Some).map_err(D::Error::custom),
        }
    }

    /// Patch flavour: absent stays `None` via `#[serde(default)]`, present null clears.
    pub fn deserialize_patch<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Option<NaiveTime>>, D::Error> {
        deserialize(deserializer).map(Some)
    }
}

// Trip request models
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TripInput {
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub group_size: Option<i32>,
}

impl TripInput {
    pub fn validate(&self) -> Result<(), Error> {
        require(&self.destination, "destination")?;
        within(Some(&self.destination), "destination", 255)?;
        if self.end_date < self.start_date {
            return Err(Error::bad_request("end_date must not be before start_date."));
        }
        if matches!(self.group_size, Some(n) if n < 1) {
            return Err(Error::bad_request("group_size must be at least 1."));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HotelInput {
    pub hotel_name: String,
    pub city: Option<String>,
    pub address: Option<String>,
    pub checkin_date: Option<NaiveDate>,
    pub checkout_date: Option<NaiveDate>,
    pub booking_ref: Option<String>,
}

impl HotelInput {
    pub fn validate(&self) -> Result<(), Error> {
        require(&self.hotel_name, "hotel_name")?;
        within(Some(&self.hotel_name), "hotel_name", 255)?;
        within(self.city.as_deref(), "city", 100)?;
        within(self.booking_ref.as_deref(), "booking_ref", 100)?;
        if let (Some(checkin), Some(checkout)) = (self.checkin_date, self.checkout_date)
            && checkout < checkin
        {
            return Err(Error::bad_request("checkout_date must not be before checkin_date."));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CarDetails {
    /// Rental company
    pub service_provider: Option<String>,
    pub vehicle_type: Option<String>,
    pub booking_ref: Option<String>,
}

/// Scheduled bus or train service
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ServiceDetails {
    pub service_provider: Option<String>,
    /// Train or bus name/number
    pub transport_name: Option<String>,
    pub booking_ref: Option<String>,
    pub seat: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct FlightDetails {
    /// Airline
    pub service_provider: Option<String>,
    /// Flight number
    pub transport_name: Option<String>,
    pub booking_ref: Option<String>,
    pub seat: Option<String>,
    #[serde(default, deserialize_with = "boarding_time::deserialize")]
    #[schema(value_type = Option<String>, example = "07:45")]
    pub boarding_time: Option<NaiveTime>,
}

/// Kind-specific transport fields, tagged by `transport_type`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "transport_type", rename_all = "lowercase")]
pub enum TransportDetails {
    Car(CarDetails),
    Bus(ServiceDetails),
    Train(ServiceDetails),
    Plane(FlightDetails),
}

impl TransportDetails {
    fn validate(&self) -> Result<(), Error> {
        let (service_provider, booking_ref) = match self {
            TransportDetails::Car(car) => {
                within(car.vehicle_type.as_deref(), "vehicle_type", 100)?;
                (&car.service_provider, &car.booking_ref)
            }
            TransportDetails::Bus(service) | TransportDetails::Train(service) => {
                within(service.transport_name.as_deref(), "transport_name", 255)?;
                within(service.seat.as_deref(), "seat", 20)?;
                (&service.service_provider, &service.booking_ref)
            }
            TransportDetails::Plane(flight) => {
                within(flight.transport_name.as_deref(), "transport_name", 255)?;
                within(flight.seat.as_deref(), "seat", 20)?;
                (&flight.service_provider, &flight.booking_ref)
            }
        };
        within(service_provider.as_deref(), "service_provider", 255)?;
        within(booking_ref.as_deref(), "booking_ref", 100)
    }

    pub fn transport_type(&self) -> TransportType {
        match self {
            TransportDetails::Car(_) => TransportType::Car,
            TransportDetails::Bus(_) => TransportType::Bus,
            TransportDetails::Train(_) => TransportType::Train,
            TransportDetails::Plane(_) => TransportType::Plane,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransportInput {
    #[serde(flatten)]
    pub details: TransportDetails,
    pub departure_city: Option<String>,
    pub arrival_city: Option<String>,
    pub departure_date: Option<DateTime<Utc>>,
    pub arrival_date: Option<DateTime<Utc>>,
}

impl TransportInput {
    pub fn validate(&self) -> Result<(), Error> {
        self.details.validate()?;
        within(self.departure_city.as_deref(), "departure_city", 100)?;
        within(self.arrival_city.as_deref(), "arrival_city", 100)?;
        if let (Some(departure), Some(arrival)) = (self.departure_date, self.arrival_date)
            && arrival < departure
        {
            return Err(Error::bad_request("arrival_date must not be before departure_date."));
        }
        Ok(())
    }
}

/// Reshape stored columns into the variant for their `transport_type`.
/// Columns the variant does not carry are dropped.
impl From<TransportFields> for TransportInput {
    fn from(fields: TransportFields) -> Self {
        let details = match fields.transport_type {
            TransportType::Car => TransportDetails::Car(CarDetails {
                service_provider: fields.service_provider,
                vehicle_type: fields.vehicle_type,
                booking_ref: fields.booking_ref,
            }),
            TransportType::Bus | TransportType::Train => {
                let service = ServiceDetails {
                    service_provider: fields.service_provider,
                    transport_name: fields.transport_name,
                    booking_ref: fields.booking_ref,
                    seat: fields.seat,
                };
                if fields.transport_type == TransportType::Bus {
                    TransportDetails::Bus(service)
                } else {
                    TransportDetails::Train(service)
                }
            }
            TransportType::Plane => TransportDetails::Plane(FlightDetails {
                service_provider: fields.service_provider,
                transport_name: fields.transport_name,
                booking_ref: fields.booking_ref,
                seat: fields.seat,
                boarding_time: fields.boarding_time,
            }),
        };

        Self {
            details,
            departure_city: fields.departure_city,
            arrival_city: fields.arrival_city,
            departure_date: fields.departure_date,
            arrival_date: fields.arrival_date,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActivityInput {
    pub activity_name: String,
    pub activity_description: Option<String>,
    pub activity_datetime: DateTime<Utc>,
    pub pickup_location: Option<String>,
    /// Honoured on create and replace only; use the toggle endpoint afterwards
    #[serde(default)]
    pub is_completed: bool,
}

impl ActivityInput {
    pub fn validate(&self) -> Result<(), Error> {
        require(&self.activity_name, "activity_name")?;
        within(Some(&self.activity_name), "activity_name", 255)?;
        within(self.pickup_location.as_deref(), "pickup_location", 255)
    }
}

/// A trip with its children, as submitted by the planner wizard.
///
/// On create a missing child list means "none"; on replace it means "leave
/// the existing rows alone".
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TripAggregateRequest {
    pub trip: TripInput,
    pub hotels: Option<Vec<HotelInput>>,
    pub transports: Option<Vec<TransportInput>>,
    pub activities: Option<Vec<ActivityInput>>,
}

impl TripAggregateRequest {
    pub fn validate(&self) -> Result<(), Error> {
        self.trip.validate()?;

        fn each<T>(items: &Option<Vec<T>>, kind: &str, check: impl Fn(&T) -> Result<(), Error>) -> Result<(), Error> {
            for (i, item) in items.iter().flatten().enumerate() {
                check(item).map_err(|e| Error::bad_request(format!("{kind}[{i}]: {}", e.user_message())))?;
            }
            Ok(())
        }

        each(&self.hotels, "hotels", HotelInput::validate)?;
        each(&self.transports, "transports", TransportInput::validate)?;
        each(&self.activities, "activities", ActivityInput::validate)?;
        Ok(())
    }
}

// Patch request models. Absent fields are left unchanged; an explicit null
// clears a nullable column. Completion flags, owners and parent ids are not
// patchable and are ignored if sent.

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TripPatch {
    pub destination: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// None = no change, Some(None) = clear, Some(n) = set
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub group_size: Option<Option<i32>>,
}

impl TripPatch {
    /// Merge onto the stored row, yielding a full input to validate again
    pub fn apply(self, current: &TripDBResponse) -> TripInput {
        TripInput {
            destination: self.destination.unwrap_or_else(|| current.destination.clone()),
            start_date: self.start_date.unwrap_or(current.start_date),
            end_date: self.end_date.unwrap_or(current.end_date),
            group_size: self.group_size.unwrap_or(current.group_size),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct HotelPatch {
    pub hotel_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub city: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub address: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub checkin_date: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub checkout_date: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub booking_ref: Option<Option<String>>,
}

impl HotelPatch {
    pub fn apply(self, current: &HotelDBResponse) -> HotelInput {
        HotelInput {
            hotel_name: self.hotel_name.unwrap_or_else(|| current.hotel_name.clone()),
            city: self.city.unwrap_or_else(|| current.city.clone()),
            address: self.address.unwrap_or_else(|| current.address.clone()),
            checkin_date: self.checkin_date.unwrap_or(current.checkin_date),
            checkout_date: self.checkout_date.unwrap_or(current.checkout_date),
            booking_ref: self.booking_ref.unwrap_or_else(|| current.booking_ref.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TransportPatch {
    /// Changing the type drops the fields the new kind does not carry
    pub transport_type: Option<TransportType>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub service_provider: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub vehicle_type: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub booking_ref: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub transport_name: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub seat: Option<Option<String>>,
    #[serde(default, skip_serializing, deserialize_with = "boarding_time::deserialize_patch")]
    #[schema(value_type = Option<String>, example = "07:45")]
    pub boarding_time: Option<Option<NaiveTime>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub departure_city: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub arrival_city: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub departure_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub arrival_date: Option<Option<DateTime<Utc>>>,
}

impl TransportPatch {
    pub fn apply(self, current: &TransportDBResponse) -> TransportInput {
        TransportInput::from(TransportFields {
            transport_type: self.transport_type.unwrap_or(current.transport_type),
            service_provider: self.service_provider.unwrap_or_else(|| current.service_provider.clone()),
            vehicle_type: self.vehicle_type.unwrap_or_else(|| current.vehicle_type.clone()),
            booking_ref: self.booking_ref.unwrap_or_else(|| current.booking_ref.clone()),
            transport_name: self.transport_name.unwrap_or_else(|| current.transport_name.clone()),
            seat: self.seat.unwrap_or_else(|| current.seat.clone()),
            boarding_time: self.boarding_time.unwrap_or(current.boarding_time),
            departure_city: self.departure_city.unwrap_or_else(|| current.departure_city.clone()),
            arrival_city: self.arrival_city.unwrap_or_else(|| current.arrival_city.clone()),
            departure_date: self.departure_date.unwrap_or(current.departure_date),
            arrival_date: self.arrival_date.unwrap_or(current.arrival_date),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ActivityPatch {
    pub activity_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub activity_description: Option<Option<String>>,
    pub activity_datetime: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub pickup_location: Option<Option<String>>,
}

impl ActivityPatch {
    pub fn apply(self, current: &ActivityDBResponse) -> ActivityInput {
        ActivityInput {
            activity_name: self.activity_name.unwrap_or_else(|| current.activity_name.clone()),
            activity_description: self
                .activity_description
                .unwrap_or_else(|| current.activity_description.clone()),
            activity_datetime: self.activity_datetime.unwrap_or(current.activity_datetime),
            pickup_location: self.pickup_location.unwrap_or_else(|| current.pickup_location.clone()),
            is_completed: current.is_completed,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TripPatchRequest {
    pub trip: TripPatch,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct HotelPatchRequest {
    pub hotel: HotelPatch,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TransportPatchRequest {
    pub transport: TransportPatch,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ActivityPatchRequest {
    pub activity: ActivityPatch,
}

// Trip response models
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TripResponse {
    #[schema(value_type = String, format = "uuid")]
    pub trip_id: TripId,
    #[schema(value_type = String, format = "uuid")]
    pub user_id: UserId,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub group_size: Option<i32>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<TripDBResponse> for TripResponse {
    fn from(db: TripDBResponse) -> Self {
        Self {
            trip_id: db.trip_id,
            user_id: db.user_id,
            destination: db.destination,
            start_date: db.start_date,
            end_date: db.end_date,
            group_size: db.group_size,
            is_completed: db.is_completed,
            created_at: db.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HotelResponse {
    #[schema(value_type = String, format = "uuid")]
    pub hotel_id: HotelId,
    #[schema(value_type = String, format = "uuid")]
    pub trip_id: TripId,
    pub hotel_name: String,
    pub city: Option<String>,
    pub address: Option<String>,
    pub checkin_date: Option<NaiveDate>,
    pub checkout_date: Option<NaiveDate>,
    pub booking_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<HotelDBResponse> for HotelResponse {
    fn from(db: HotelDBResponse) -> Self {
        Self {
            hotel_id: db.hotel_id,
            trip_id: db.trip_id,
            hotel_name: db.hotel_name,
            city: db.city,
            address: db.address,
            checkin_date: db.checkin_date,
            checkout_date: db.checkout_date,
            booking_ref: db.booking_ref,
            created_at: db.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransportResponse {
    #[schema(value_type = String, format = "uuid")]
    pub transport_id: TransportId,
    #[schema(value_type = String, format = "uuid")]
    pub trip_id: TripId,
    pub transport_type: TransportType,
    pub service_provider: Option<String>,
    pub vehicle_type: Option<String>,
    pub booking_ref: Option<String>,
    pub transport_name: Option<String>,
    pub seat: Option<String>,
    #[schema(value_type = Option<String>, example = "07:45:00")]
    pub boarding_time: Option<NaiveTime>,
    pub departure_city: Option<String>,
    pub arrival_city: Option<String>,
    pub departure_date: Option<DateTime<Utc>>,
    pub arrival_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<TransportDBResponse> for TransportResponse {
    fn from(db: TransportDBResponse) -> Self {
        Self {
            transport_id: db.transport_id,
            trip_id: db.trip_id,
            transport_type: db.transport_type,
            service_provider: db.service_provider,
            vehicle_type: db.vehicle_type,
            booking_ref: db.booking_ref,
            transport_name: db.transport_name,
            seat: db.seat,
            boarding_time: db.boarding_time,
            departure_city: db.departure_city,
            arrival_city: db.arrival_city,
            departure_date: db.departure_date,
            arrival_date: db.arrival_date,
            created_at: db.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActivityResponse {
    #[schema(value_type = String, format = "uuid")]
    pub activity_id: ActivityId,
    #[schema(value_type = String, format = "uuid")]
    pub trip_id: TripId,
    pub activity_name: String,
    pub activity_description: Option<String>,
    pub activity_datetime: DateTime<Utc>,
    pub pickup_location: Option<String>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ActivityDBResponse> for ActivityResponse {
    fn from(db: ActivityDBResponse) -> Self {
        Self {
            activity_id: db.activity_id,
            trip_id: db.trip_id,
            activity_name: db.activity_name,
            activity_description: db.activity_description,
            activity_datetime: db.activity_datetime,
            pickup_location: db.pickup_location,
            is_completed: db.is_completed,
            created_at: db.created_at,
        }
    }
}

/// A trip with every child row
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TripAggregateResponse {
    pub trip: TripResponse,
    pub hotels: Vec<HotelResponse>,
    pub transports: Vec<TransportResponse>,
    pub activities: Vec<ActivityResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TripSavedResponse {
    pub message: String,
    #[schema(value_type = String, format = "uuid")]
    pub trip_id: TripId,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActivityToggleResponse {
    pub message: String,
    pub activity: ActivityResponse,
    /// Completion state of the parent trip after the toggle
    #[serde(rename = "tripCompleted")]
    pub trip_completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TripPatchResponse {
    pub message: String,
    pub trip: TripResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HotelPatchResponse {
    pub message: String,
    pub hotel: HotelResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransportPatchResponse {
    pub message: String,
    pub transport: TransportResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActivityPatchResponse {
    pub message: String,
    pub activity: ActivityResponse,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn stored_transport() -> TransportDBResponse {
        TransportDBResponse {
            transport_id: Uuid::new_v4(),
            trip_id: Uuid::new_v4(),
            transport_type: TransportType::Plane,
            service_provider: Some("KLM".to_string()),
            vehicle_type: None,
            booking_ref: Some("XYZ".to_string()),
            transport_name: Some("KL1234".to_string()),
            seat: Some("3A".to_string()),
            boarding_time: NaiveTime::from_hms_opt(9, 0, 0),
            departure_city: Some("Amsterdam".to_string()),
            arrival_city: Some("Paris".to_string()),
            departure_date: None,
            arrival_date: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_trip_input_rejects_blank_destination_and_inverted_dates() {
        let mut input: TripInput = serde_json::from_value(json!({
            "destination": "  ",
            "start_date": "2026-05-01",
            "end_date": "2026-05-07",
            "group_size": null
        }))
        .unwrap();
        assert!(input.validate().is_err());

        input.destination = "PARIS".to_string();
        assert!(input.validate().is_ok());

        input.end_date = NaiveDate::from_ymd_opt(2026, 4, 30).unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_aggregate_ignores_client_owner_and_timestamps() {
        let request: TripAggregateRequest = serde_json::from_value(json!({
            "trip": {
                "user_id": 99,
                "destination": "PARIS",
                "start_date": "2026-05-01",
                "end_date": "2026-05-07",
                "group_size": 2,
                "created_at": "2026-04-01T00:00:00.000Z"
            },
            "hotels": [{ "hotel_name": "Le Bristol", "city": "Paris", "created_at": "2026-04-01T00:00:00.000Z" }]
        }))
        .unwrap();

        assert!(request.validate().is_ok());
        assert_eq!(request.hotels.as_ref().map(Vec::len), Some(1));
        assert!(request.transports.is_none());
    }

    #[test]
    fn test_aggregate_validation_names_the_failing_child() {
        let request: TripAggregateRequest = serde_json::from_value(json!({
            "trip": { "destination": "ROME", "start_date": "2026-05-01", "end_date": "2026-05-02" },
            "activities": [
                { "activity_name": "Colosseum", "activity_datetime": "2026-05-01T09:00:00Z" },
                { "activity_name": "", "activity_datetime": "2026-05-01T15:00:00Z" }
            ]
        }))
        .unwrap();

        let err = request.validate().unwrap_err();
        assert!(err.user_message().starts_with("activities[1]"));
    }

    #[test]
    fn test_text_longer_than_its_column_is_rejected() {
        let transport: TransportInput = serde_json::from_value(json!({
            "transport_type": "train",
            "seat": "A".repeat(21)
        }))
        .unwrap();
        assert_eq!(transport.validate().unwrap_err().user_message(), "seat must be at most 20 characters.");

        let fits: TransportInput = serde_json::from_value(json!({
            "transport_type": "plane",
            "seat": "A".repeat(20),
            "arrival_city": "é".repeat(100)
        }))
        .unwrap();
        assert!(fits.validate().is_ok());

        let hotel: HotelInput = serde_json::from_value(json!({
            "hotel_name": "Ritz",
            "city": "x".repeat(101)
        }))
        .unwrap();
        assert!(hotel.validate().is_err());
    }

    #[test]
    fn test_patch_merge_is_length_checked() {
        let patch: TransportPatch = serde_json::from_value(json!({ "seat": "B".repeat(25) })).unwrap();
        assert!(patch.apply(&stored_transport()).validate().is_err());
    }

    #[test]
    fn test_unknown_transport_type_is_rejected() {
        let result = serde_json::from_value::<TransportInput>(json!({ "transport_type": "boat" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_boarding_time_accepts_short_and_long_forms() {
        assert_eq!(boarding_time::parse("07:45").unwrap(), NaiveTime::from_hms_opt(7, 45, 0).unwrap());
        assert_eq!(boarding_time::parse("07:45:30").unwrap(), NaiveTime::from_hms_opt(7, 45, 30).unwrap());
        assert!(boarding_time::parse("7 o'clock").is_err());
    }

    #[test]
    fn test_trip_patch_distinguishes_absent_from_null() {
        let current = TripDBResponse {
            trip_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            destination: "LISBON".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 6, 5).unwrap(),
            group_size: Some(3),
            is_completed: false,
            created_at: Utc::now(),
        };

        let untouched: TripPatch = serde_json::from_value(json!({ "destination": "PORTO" })).unwrap();
        let merged = untouched.apply(&current);
        assert_eq!(merged.destination, "PORTO");
        assert_eq!(merged.group_size, Some(3));

        let cleared: TripPatch = serde_json::from_value(json!({ "group_size": null })).unwrap();
        assert_eq!(cleared.apply(&current).group_size, None);
    }

    #[test]
    fn test_transport_patch_switching_type_drops_foreign_fields() {
        let patch: TransportPatch = serde_json::from_value(json!({
            "transport_type": "car",
            "vehicle_type": "Convertible"
        }))
        .unwrap();

        let fields = TransportFields::from(patch.apply(&stored_transport()));
        assert_eq!(fields.transport_type, TransportType::Car);
        assert_eq!(fields.vehicle_type.as_deref(), Some("Convertible"));
        assert_eq!(fields.service_provider.as_deref(), Some("KLM"));
        assert_eq!(fields.seat, None);
        assert_eq!(fields.boarding_time, None);
        assert_eq!(fields.transport_name, None);
    }

    #[test]
    fn test_transport_patch_clears_boarding_time_with_null() {
        let patch: TransportPatch = serde_json::from_value(json!({ "boarding_time": null })).unwrap();
        assert_eq!(patch.boarding_time, Some(None));

        let absent: TransportPatch = serde_json::from_value(json!({ "seat": "4B" })).unwrap();
        let fields = TransportFields::from(absent.apply(&stored_transport()));
        assert_eq!(fields.boarding_time, NaiveTime::from_hms_opt(9, 0, 0));
        assert_eq!(fields.seat.as_deref(), Some("4B"));
    }

    #[test]
    fn test_activity_patch_cannot_change_completion() {
        let current = ActivityDBResponse {
            activity_id: Uuid::new_v4(),
            trip_id: Uuid::new_v4(),
            activity_name: "Louvre".to_string(),
            activity_description: None,
            activity_datetime: Utc::now(),
            pickup_location: None,
            is_completed: true,
            created_at: Utc::now(),
        };

        let patch: ActivityPatch = serde_json::from_value(json!({ "is_completed": false, "pickup_location": "Hotel lobby" })).unwrap();
        let merged = patch.apply(&current);
        assert!(merged.is_completed);
        assert_eq!(merged.pickup_location.as_deref(), Some("Hotel lobby"));
    }

    #[test]
    fn test_toggle_response_uses_camel_case_flag() {
        let response = ActivityToggleResponse {
            message: "Activity completion toggled".to_string(),
            activity: ActivityResponse {
                activity_id: Uuid::new_v4(),
                trip_id: Uuid::new_v4(),
                activity_name: "Louvre".to_string(),
                activity_description: None,
                activity_datetime: Utc::now(),
                pickup_location: None,
                is_completed: true,
                created_at: Utc::now(),
            },
            trip_completed: true,
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["tripCompleted"], json!(true));
    }
}
