//! Database record models matching table schemas.
//!
//! Each table has an entity struct deriving `sqlx::FromRow` that doubles as the
//! repository response type, plus plain request structs carrying the columns a
//! write needs. Request structs are built from validated API inputs through
//! `From` conversions, so nothing reaches the database without passing the
//! boundary checks in [`crate::api::models`].
//!
//! - [`users`]: User accounts and password hashes
//! - [`trips`]: Trips owned by a user
//! - [`hotels`], [`transports`], [`activities`]: Children of a trip

pub mod activities;
pub mod hotels;
pub mod transports;
pub mod trips;
pub mod users;
