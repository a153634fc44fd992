//! API request and response data models.
//!
//! These structures define the public JSON contract. Request types are
//! deserialized and validated at the HTTP boundary, then converted into the
//! database request types in [`crate::db::models`]; response types are built
//! from database records through `From` conversions. All models carry
//! `utoipa` annotations for the generated OpenAPI document.
//!
//! - [`auth`]: Registration, login and session payloads
//! - [`users`]: User profiles and the authenticated identity
//! - [`trips`]: Trip aggregates, child inputs, patches and responses

pub mod auth;
pub mod trips;
pub mod users;
