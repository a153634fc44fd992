use crate::{
    AppState,
    api::models::users::CurrentUser,
    auth::session,
    config::Config,
    errors::{Error, Result},
};
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::{debug, instrument, trace};

/// Find the session token among the request cookies.
/// Returns `Ok(None)` when no session cookie is present.
fn session_token_from_cookies<'a>(parts: &'a Parts, config: &Config) -> Result<Option<&'a str>> {
    let cookie_name = &config.auth.session.cookie_name;

    for cookie_header in parts.headers.get_all(header::COOKIE) {
        let cookie_str = cookie_header.to_str().map_err(|e| Error::BadRequest {
            message: format!("Invalid cookie header: {e}"),
        })?;

        for cookie in cookie_str.split(';') {
            if let Some((name, value)) = cookie.trim().split_once('=')
                && name == cookie_name
                && !value.is_empty()
            {
                return Ok(Some(value));
            }
        }
    }

    Ok(None)
}

/// Authenticates every protected route: the session cookie must be present
/// and carry a valid, unexpired token. The decoded identity is handed to the
/// handler; no database lookup happens here.
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    #[instrument(skip(parts, state))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let Some(token) = session_token_from_cookies(parts, &state.config)? else {
            trace!("No session cookie on request");
            return Err(Error::Unauthenticated {
                message: Some("Not authenticated".to_string()),
            });
        };

        let user = session::verify_session_token(token, &state.config)?;
        debug!("Found JWT session authenticated user: {}", user.id);
        Ok(user)
    }
}
