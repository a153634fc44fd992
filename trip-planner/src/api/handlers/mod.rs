//! HTTP request handlers for all API endpoints.
//!
//! Each handler is responsible for:
//! - Request validation and deserialization
//! - Authentication (via the [`CurrentUser`](crate::api::models::users::CurrentUser) extractor) and ownership checks
//! - Business logic execution via database repositories
//! - Response serialization
//!
//! # Handler Modules
//!
//! - [`auth`]: Registration, login, logout and the current session user
//! - [`trips`]: Saving, reading, replacing and patching trips and their children
//!
//! # Error Handling
//!
//! Handlers return [`crate::errors::Error`] which automatically converts to
//! appropriate HTTP status codes and JSON error responses.

pub mod auth;
pub mod trips;
