use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use sqlx::PgConnection;
use tracing::info;

use crate::{
    AppState,
    api::{
        extract::ValidJson,
        models::{
            trips::{
                ActivityInput, ActivityPatchRequest, ActivityPatchResponse, ActivityToggleResponse, HotelInput, HotelPatchRequest,
                HotelPatchResponse, MessageResponse, TransportInput, TransportPatchRequest, TransportPatchResponse, TripAggregateRequest,
                TripAggregateResponse, TripPatchRequest, TripPatchResponse, TripSavedResponse,
            },
            users::CurrentUser,
        },
    },
    auth::ownership::{check_owner, ensure_trip_owner, owned_trip},
    db::{
        handlers::{Activities, Hotels, Repository, Transports, Trips, Users},
        models::{
            activities::{ActivityCreateDBRequest, ActivityFields, trip_is_complete},
            hotels::{HotelCreateDBRequest, HotelFields},
            transports::{TransportCreateDBRequest, TransportFields},
            trips::{TripChildFilter, TripCreateDBRequest, TripDBResponse, TripFields},
        },
    },
    errors::Error,
    types::{ActivityId, HotelId, TransportId, TripId, UserId, abbrev_uuid},
};

async fn insert_hotels(conn: &mut PgConnection, trip_id: TripId, hotels: Vec<HotelInput>) -> Result<(), Error> {
    let mut repo = Hotels::new(conn);
    for hotel in hotels {
        repo.create(&HotelCreateDBRequest {
            trip_id,
            fields: hotel.into(),
        })
        .await?;
    }
    Ok(())
}

async fn insert_transports(conn: &mut PgConnection, trip_id: TripId, transports: Vec<TransportInput>) -> Result<(), Error> {
    let mut repo = Transports::new(conn);
    for transport in transports {
        repo.create(&TransportCreateDBRequest {
            trip_id,
            fields: transport.into(),
        })
        .await?;
    }
    Ok(())
}

async fn insert_activities(conn: &mut PgConnection, trip_id: TripId, activities: Vec<ActivityInput>) -> Result<(), Error> {
    let mut repo = Activities::new(conn);
    for activity in activities {
        repo.create(&ActivityCreateDBRequest {
            trip_id,
            fields: activity.into(),
        })
        .await?;
    }
    Ok(())
}

async fn load_aggregate(conn: &mut PgConnection, trip: TripDBResponse) -> Result<TripAggregateResponse, Error> {
    let filter = TripChildFilter::new(trip.trip_id);
    let hotels = Hotels::new(&mut *conn).list(&filter).await?;
    let transports = Transports::new(&mut *conn).list(&filter).await?;
    let activities = Activities::new(&mut *conn).list(&filter).await?;

    Ok(TripAggregateResponse {
        trip: trip.into(),
        hotels: hotels.into_iter().map(Into::into).collect(),
        transports: transports.into_iter().map(Into::into).collect(),
        activities: activities.into_iter().map(Into::into).collect(),
    })
}

/// Insert a trip and its children on `conn`. Every write must share one
/// transaction so a failing child leaves no trip behind.
async fn save_aggregate(conn: &mut PgConnection, user_id: UserId, request: TripAggregateRequest) -> Result<TripDBResponse, Error> {
    let TripAggregateRequest {
        trip,
        hotels,
        transports,
        activities,
    } = request;

    let trip = Trips::new(&mut *conn)
        .create(&TripCreateDBRequest {
            user_id,
            fields: trip.into(),
        })
        .await?;

    insert_hotels(&mut *conn, trip.trip_id, hotels.unwrap_or_default()).await?;
    insert_transports(&mut *conn, trip.trip_id, transports.unwrap_or_default()).await?;
    insert_activities(&mut *conn, trip.trip_id, activities.unwrap_or_default()).await?;

    Ok(trip)
}

/// Overwrite a trip's fields and swap out each child list present in `request`
async fn replace_aggregate(conn: &mut PgConnection, trip_id: TripId, request: TripAggregateRequest) -> Result<(), Error> {
    let TripAggregateRequest {
        trip,
        hotels,
        transports,
        activities,
    } = request;

    Trips::new(&mut *conn).update(trip_id, &TripFields::from(trip)).await?;

    if let Some(hotels) = hotels {
        Hotels::new(&mut *conn).delete_by_trip(trip_id).await?;
        insert_hotels(&mut *conn, trip_id, hotels).await?;
    }
    if let Some(transports) = transports {
        Transports::new(&mut *conn).delete_by_trip(trip_id).await?;
        insert_transports(&mut *conn, trip_id, transports).await?;
    }
    if let Some(activities) = activities {
        Activities::new(&mut *conn).delete_by_trip(trip_id).await?;
        insert_activities(&mut *conn, trip_id, activities).await?;
    }

    Ok(())
}

/// Save a new trip with its hotels, transport legs and activities
#[utoipa::path(
    post,
    path = "/trips/test-save",
    request_body = TripAggregateRequest,
    tag = "trips",
    responses(
        (status = 201, description = "Trip saved", body = TripSavedResponse),
        (status = 400, description = "Invalid trip data"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "User no longer exists"),
    )
)]
#[tracing::instrument(skip_all, fields(user_id = %abbrev_uuid(&current_user.id)))]
pub async fn create_trip(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidJson(request): ValidJson<TripAggregateRequest>,
) -> Result<(StatusCode, Json<TripSavedResponse>), Error> {
    request.validate()?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    if Users::new(&mut tx).get_by_id(current_user.id).await?.is_none() {
        return Err(Error::not_found("User", current_user.id));
    }

    let trip = save_aggregate(&mut tx, current_user.id, request).await?;

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;
    info!("Saved trip {} to {}", abbrev_uuid(&trip.trip_id), trip.destination);

    Ok((
        StatusCode::CREATED,
        Json(TripSavedResponse {
            message: "Trip saved".to_string(),
            trip_id: trip.trip_id,
        }),
    ))
}

/// Get the most recently created trip of the current user, with every child row
#[utoipa::path(
    get,
    path = "/trips/latest",
    tag = "trips",
    responses(
        (status = 200, description = "Latest trip", body = TripAggregateResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "The user has no trips"),
    )
)]
#[tracing::instrument(skip_all, fields(user_id = %abbrev_uuid(&current_user.id)))]
pub async fn get_latest_trip(State(state): State<AppState>, current_user: CurrentUser) -> Result<Json<TripAggregateResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let trip = Trips::new(&mut conn)
        .latest_for_user(current_user.id)
        .await?
        .ok_or_else(|| Error::not_found("Trip", current_user.id))?;

    Ok(Json(load_aggregate(&mut conn, trip).await?))
}

/// Flip an activity between done and not done, completing the trip when
/// every activity is done and in the past
#[utoipa::path(
    patch,
    path = "/trips/activities/{activity_id}/toggle-completed",
    tag = "trips",
    params(
        ("activity_id" = uuid::Uuid, Path, description = "Activity ID"),
    ),
    responses(
        (status = 200, description = "Activity toggled", body = ActivityToggleResponse),
        (status = 400, description = "Malformed activity id"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Activity belongs to another user's trip"),
        (status = 404, description = "Activity not found"),
    )
)]
#[tracing::instrument(skip_all, fields(activity_id = %abbrev_uuid(&activity_id)))]
pub async fn toggle_activity_completed(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(activity_id): Path<ActivityId>,
) -> Result<Json<ActivityToggleResponse>, Error> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let activity = Activities::new(&mut tx)
        .get_by_id(activity_id)
        .await?
        .ok_or_else(|| Error::not_found("Activity", activity_id))?;

    // Lock the trip so concurrent toggles on the same trip see each other's writes
    let trip = Trips::new(&mut tx)
        .get_for_update(activity.trip_id)
        .await?
        .ok_or_else(|| Error::not_found("Trip", activity.trip_id))?;
    check_owner(&trip, &current_user)?;

    let activity = Activities::new(&mut tx).toggle_completed(activity_id).await?;

    // Completion is one-way: an already completed trip stays completed
    let mut trip_completed = trip.is_completed;
    if !trip_completed {
        let siblings = Activities::new(&mut tx).list(&TripChildFilter::new(trip.trip_id)).await?;
        if trip_is_complete(&siblings, Utc::now()) {
            Trips::new(&mut tx).mark_completed(trip.trip_id).await?;
            trip_completed = true;
            info!("Trip {} completed", abbrev_uuid(&trip.trip_id));
        }
    }

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(Json(ActivityToggleResponse {
        message: "Activity completion toggled.".to_string(),
        activity: activity.into(),
        trip_completed,
    }))
}

/// Replace a trip and, for each child list present, all of its rows of that kind
#[utoipa::path(
    put,
    path = "/trips/{trip_id}",
    request_body = TripAggregateRequest,
    tag = "trips",
    params(
        ("trip_id" = uuid::Uuid, Path, description = "Trip ID"),
    ),
    responses(
        (status = 200, description = "Trip replaced", body = MessageResponse),
        (status = 400, description = "Invalid trip data"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Trip missing or owned by another user"),
    )
)]
#[tracing::instrument(skip_all, fields(trip_id = %abbrev_uuid(&trip_id)))]
pub async fn replace_trip(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(trip_id): Path<TripId>,
    ValidJson(request): ValidJson<TripAggregateRequest>,
) -> Result<Json<MessageResponse>, Error> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    owned_trip(&mut tx, trip_id, &current_user).await?;
    request.validate()?;

    replace_aggregate(&mut tx, trip_id, request).await?;

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;
    info!("Replaced trip {}", abbrev_uuid(&trip_id));

    Ok(Json(MessageResponse::new("Trip updated successfully")))
}

/// Update some fields of a trip
#[utoipa::path(
    patch,
    path = "/trips/{trip_id}",
    request_body = TripPatchRequest,
    tag = "trips",
    params(
        ("trip_id" = uuid::Uuid, Path, description = "Trip ID"),
    ),
    responses(
        (status = 200, description = "Trip updated", body = TripPatchResponse),
        (status = 400, description = "Invalid trip data"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Trip missing or owned by another user"),
    )
)]
#[tracing::instrument(skip_all, fields(trip_id = %abbrev_uuid(&trip_id)))]
pub async fn patch_trip(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(trip_id): Path<TripId>,
    ValidJson(request): ValidJson<TripPatchRequest>,
) -> Result<Json<TripPatchResponse>, Error> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let current = owned_trip(&mut tx, trip_id, &current_user).await?;
    let merged = request.trip.apply(&current);
    merged.validate()?;

    let trip = Trips::new(&mut tx).update(trip_id, &TripFields::from(merged)).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(Json(TripPatchResponse {
        message: "Trip updated successfully.".to_string(),
        trip: trip.into(),
    }))
}

/// Update some fields of a hotel stay
#[utoipa::path(
    patch,
    path = "/trips/hotels/{hotel_id}",
    request_body = HotelPatchRequest,
    tag = "trips",
    params(
        ("hotel_id" = uuid::Uuid, Path, description = "Hotel ID"),
    ),
    responses(
        (status = 200, description = "Hotel updated", body = HotelPatchResponse),
        (status = 400, description = "Invalid hotel data"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Hotel belongs to another user's trip"),
        (status = 404, description = "Hotel not found"),
    )
)]
#[tracing::instrument(skip_all, fields(hotel_id = %abbrev_uuid(&hotel_id)))]
pub async fn patch_hotel(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(hotel_id): Path<HotelId>,
    ValidJson(request): ValidJson<HotelPatchRequest>,
) -> Result<Json<HotelPatchResponse>, Error> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let current = Hotels::new(&mut tx)
        .get_by_id(hotel_id)
        .await?
        .ok_or_else(|| Error::not_found("Hotel", hotel_id))?;
    ensure_trip_owner(&mut tx, current.trip_id, &current_user).await?;

    let merged = request.hotel.apply(&current);
    merged.validate()?;

    let hotel = Hotels::new(&mut tx).update(hotel_id, &HotelFields::from(merged)).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(Json(HotelPatchResponse {
        message: "Hotel updated successfully.".to_string(),
        hotel: hotel.into(),
    }))
}

/// Update some fields of a transport leg, possibly switching its kind
#[utoipa::path(
    patch,
    path = "/trips/transports/{transport_id}",
    request_body = TransportPatchRequest,
    tag = "trips",
    params(
        ("transport_id" = uuid::Uuid, Path, description = "Transport ID"),
    ),
    responses(
        (status = 200, description = "Transport updated", body = TransportPatchResponse),
        (status = 400, description = "Invalid transport data"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Transport belongs to another user's trip"),
        (status = 404, description = "Transport not found"),
    )
)]
#[tracing::instrument(skip_all, fields(transport_id = %abbrev_uuid(&transport_id)))]
pub async fn patch_transport(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(transport_id): Path<TransportId>,
    ValidJson(request): ValidJson<TransportPatchRequest>,
) -> Result<Json<TransportPatchResponse>, Error> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let current = Transports::new(&mut tx)
        .get_by_id(transport_id)
        .await?
        .ok_or_else(|| Error::not_found("Transport", transport_id))?;
    ensure_trip_owner(&mut tx, current.trip_id, &current_user).await?;

    let merged = request.transport.apply(&current);
    merged.validate()?;

    let transport = Transports::new(&mut tx)
        .update(transport_id, &TransportFields::from(merged))
        .await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(Json(TransportPatchResponse {
        message: "Transport updated successfully.".to_string(),
        transport: transport.into(),
    }))
}

/// Update some fields of an activity. Completion is changed through the toggle endpoint only.
#[utoipa::path(
    patch,
    path = "/trips/activities/{activity_id}",
    request_body = ActivityPatchRequest,
    tag = "trips",
    params(
        ("activity_id" = uuid::Uuid, Path, description = "Activity ID"),
    ),
    responses(
        (status = 200, description = "Activity updated", body = ActivityPatchResponse),
        (status = 400, description = "Invalid activity data"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Activity belongs to another user's trip"),
        (status = 404, description = "Activity not found"),
    )
)]
#[tracing::instrument(skip_all, fields(activity_id = %abbrev_uuid(&activity_id)))]
pub async fn patch_activity(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(activity_id): Path<ActivityId>,
    ValidJson(request): ValidJson<ActivityPatchRequest>,
) -> Result<Json<ActivityPatchResponse>, Error> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let current = Activities::new(&mut tx)
        .get_by_id(activity_id)
        .await?
        .ok_or_else(|| Error::not_found("Activity", activity_id))?;
    ensure_trip_owner(&mut tx, current.trip_id, &current_user).await?;

    let merged = request.activity.apply(&current);
    merged.validate()?;

    let activity = Activities::new(&mut tx)
        .update(activity_id, &ActivityFields::from(merged))
        .await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(Json(ActivityPatchResponse {
        message: "Activity updated successfully.".to_string(),
        activity: activity.into(),
    }))
}
