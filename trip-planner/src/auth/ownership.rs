//! Trip ownership checks.
//!
//! Every trip-scoped write resolves the trip first and compares its owner
//! with the authenticated user. A trip addressed directly answers the same
//! way whether it is missing or foreign, so trip ids cannot be probed.

use sqlx::PgConnection;
use tracing::debug;

use crate::{
    api::models::users::CurrentUser,
    db::{
        handlers::{Repository, Trips},
        models::trips::TripDBResponse,
    },
    errors::{Error, Result},
    types::{TripId, abbrev_uuid},
};

const TRIP_FORBIDDEN: &str = "Forbidden or trip not found.";
const CHILD_FORBIDDEN: &str = "Forbidden.";

/// Load a trip addressed by the client, requiring that `user` owns it.
/// Missing and foreign trips both yield 403.
pub async fn owned_trip(conn: &mut PgConnection, trip_id: TripId, user: &CurrentUser) -> Result<TripDBResponse> {
    match Trips::new(conn).get_by_id(trip_id).await? {
        Some(trip) if trip.user_id == user.id => Ok(trip),
        Some(_) => {
            debug!("User {} denied access to trip {}", abbrev_uuid(&user.id), abbrev_uuid(&trip_id));
            Err(Error::forbidden(TRIP_FORBIDDEN))
        }
        None => Err(Error::forbidden(TRIP_FORBIDDEN)),
    }
}

/// Owner check on an already loaded (and possibly locked) trip row
pub fn check_owner(trip: &TripDBResponse, user: &CurrentUser) -> Result<()> {
    if trip.user_id != user.id {
        debug!("User {} denied access to trip {}", abbrev_uuid(&user.id), abbrev_uuid(&trip.trip_id));
        return Err(Error::forbidden(CHILD_FORBIDDEN));
    }
    Ok(())
}

/// Check the parent trip of a hotel, transport or activity. The child itself
/// was already found, so any failure here is an ownership failure.
pub async fn ensure_trip_owner(conn: &mut PgConnection, trip_id: TripId, user: &CurrentUser) -> Result<()> {
    let trip = Trips::new(conn)
        .get_by_id(trip_id)
        .await?
        .ok_or_else(|| Error::forbidden(CHILD_FORBIDDEN))?;
    check_owner(&trip, user)
}
