//! Request body extractor with the API's error shape.
//!
//! axum's `Json` answers malformed bodies with 415/422 and a plain-text body.
//! [`ValidJson`] turns every body rejection into a 400 carrying the usual
//! `{"message": ..}` JSON, so clients see one shape for all input errors.

use axum::{
    Json,
    body::Body,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;

use crate::errors::Error;

pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = Error;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(Error::bad_request(rejection.body_text())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, http::StatusCode, routing::post};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Greeting {
        name: String,
    }

    async fn greet(ValidJson(body): ValidJson<Greeting>) -> String {
        format!("hello {}", body.name)
    }

    fn server() -> axum_test::TestServer {
        axum_test::TestServer::new(Router::new().route("/greet", post(greet))).unwrap()
    }

    #[tokio::test]
    async fn test_valid_body_passes_through() {
        let response = server().post("/greet").json(&json!({ "name": "Ann" })).await;
        response.assert_status_ok();
        response.assert_text("hello Ann");
    }

    #[tokio::test]
    async fn test_wrong_shape_is_bad_request_json() {
        let response = server().post("/greet").json(&json!({ "name": 42 })).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: serde_json::Value = response.json();
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_non_json_body_is_bad_request() {
        let response = server().post("/greet").text("name=Ann").await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
