//! Repository implementations for database access.
//!
//! Each repository wraps a borrowed SQLx connection or transaction and exposes
//! strongly-typed operations on one table, returning models from
//! [`crate::db::models`]. All of them implement [`Repository`].
//!
//! # Available Repositories
//!
//! - [`Users`]: Accounts and credential lookup
//! - [`Trips`]: Trip headers, newest-first lookup, completion flag
//! - [`Hotels`], [`Transports`], [`Activities`]: Rows belonging to a trip
//!
//! # Common Pattern
//!
//! ```ignore
//! use trip_planner::db::handlers::{Repository, Trips};
//!
//! async fn example(pool: &sqlx::PgPool, user_id: uuid::Uuid) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut tx = pool.begin().await?;
//!
//!     let latest = Trips::new(&mut tx).latest_for_user(user_id).await?;
//!
//!     tx.commit().await?;
//!     Ok(())
//! }
//! ```
//!
//! Repositories borrow the connection mutably, so use one at a time and
//! re-create them as needed inside a transaction.

pub mod activities;
pub mod hotels;
pub mod repository;
pub mod transports;
pub mod trips;
pub mod users;

pub use activities::Activities;
pub use hotels::Hotels;
pub use repository::Repository;
pub use transports::Transports;
pub use trips::Trips;
pub use users::Users;
