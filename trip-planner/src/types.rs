//! Common type definitions.
//!
//! All entity IDs are UUIDs wrapped in type aliases so signatures say which
//! table an identifier belongs to:
//!
//! - [`UserId`]: User account identifier
//! - [`TripId`]: Trip identifier
//! - [`HotelId`], [`TransportId`], [`ActivityId`]: Trip child identifiers
//!
//! [`abbrev_uuid`] shortens UUIDs to their first 8 characters for logging.

use uuid::Uuid;

// Type aliases for IDs
pub type UserId = Uuid;
pub type TripId = Uuid;
pub type HotelId = Uuid;
pub type TransportId = Uuid;
pub type ActivityId = Uuid;

/// Abbreviate a UUID to its first 8 characters for more readable logs and traces
/// Example: "550e8400-e29b-41d4-a716-446655440000" -> "550e8400"
pub fn abbrev_uuid(uuid: &Uuid) -> String {
    uuid.to_string().chars().take(8).collect()
}
