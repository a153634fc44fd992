//! OpenAPI documentation for the `/api` surface.
//!
//! The document is served at `/api/openapi.json` and rendered with RapiDoc at
//! `/api/docs`.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};

use crate::api;

struct SessionCookieAddon;

impl Modify for SessionCookieAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "SessionCookie".to_string(),
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "token",
                    "Session JWT set by `POST /api/auth/login`",
                ))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    servers(
        (url = "/api", description = "Trip planner API")
    ),
    modifiers(&SessionCookieAddon),
    security(("SessionCookie" = [])),
    paths(
        api::handlers::auth::register,
        api::handlers::auth::login,
        api::handlers::auth::logout,
        api::handlers::auth::get_current_user,
        api::handlers::trips::create_trip,
        api::handlers::trips::get_latest_trip,
        api::handlers::trips::toggle_activity_completed,
        api::handlers::trips::replace_trip,
        api::handlers::trips::patch_trip,
        api::handlers::trips::patch_hotel,
        api::handlers::trips::patch_transport,
        api::handlers::trips::patch_activity,
    ),
    components(
        schemas(
            api::models::auth::RegisterRequest,
            api::models::auth::LoginRequest,
            api::models::auth::AuthResponse,
            api::models::auth::AuthSuccessResponse,
            api::models::users::UserResponse,
            api::models::trips::TripInput,
            api::models::trips::HotelInput,
            api::models::trips::TransportInput,
            api::models::trips::TransportDetails,
            api::models::trips::CarDetails,
            api::models::trips::ServiceDetails,
            api::models::trips::FlightDetails,
            api::models::trips::ActivityInput,
            api::models::trips::TripAggregateRequest,
            api::models::trips::TripPatch,
            api::models::trips::HotelPatch,
            api::models::trips::TransportPatch,
            api::models::trips::ActivityPatch,
            api::models::trips::TripPatchRequest,
            api::models::trips::HotelPatchRequest,
            api::models::trips::TransportPatchRequest,
            api::models::trips::ActivityPatchRequest,
            api::models::trips::TripResponse,
            api::models::trips::HotelResponse,
            api::models::trips::TransportResponse,
            api::models::trips::ActivityResponse,
            api::models::trips::TripAggregateResponse,
            api::models::trips::TripSavedResponse,
            api::models::trips::MessageResponse,
            api::models::trips::ActivityToggleResponse,
            api::models::trips::TripPatchResponse,
            api::models::trips::HotelPatchResponse,
            api::models::trips::TransportPatchResponse,
            api::models::trips::ActivityPatchResponse,
            crate::db::models::transports::TransportType,
        )
    ),
    tags(
        (name = "authentication", description = "Accounts and cookie sessions"),
        (name = "trips", description = "Trips with their hotels, transport legs and activities"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();

        for expected in [
            "/auth/register",
            "/auth/login",
            "/auth/logout",
            "/auth/me",
            "/trips/test-save",
            "/trips/latest",
            "/trips/activities/{activity_id}/toggle-completed",
            "/trips/{trip_id}",
            "/trips/hotels/{hotel_id}",
            "/trips/transports/{transport_id}",
            "/trips/activities/{activity_id}",
        ] {
            assert!(paths.iter().any(|p| p == expected), "missing {expected} in {paths:?}");
        }
    }
}
