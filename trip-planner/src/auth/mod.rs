//! Authentication and ownership checks.
//!
//! Sessions are stateless: a successful login signs a JWT embedding the user
//! id, email and name, and delivers it in an http-only, same-site cookie
//! (named `token` by default). Every protected handler takes a
//! [`CurrentUser`](crate::api::models::users::CurrentUser) argument, whose
//! extractor verifies that cookie. Logging out only expires the cookie; there
//! is no server-side revocation list.
//!
//! Authorization is ownership only: a trip belongs to exactly one user, and
//! hotels, transport legs and activities are reached through their trip.
//!
//! # Modules
//!
//! - [`current_user`]: Extractor for the authenticated user in handlers
//! - [`ownership`]: Trip ownership checks used before every read or write
//! - [`password`]: Password hashing and verification using Argon2
//! - [`session`]: JWT creation/verification and session cookies
//!
//! # Usage in Handlers
//!
//! ```ignore
//! use trip_planner::api::models::users::CurrentUser;
//!
//! async fn protected_handler(current_user: CurrentUser) -> String {
//!     format!("Hello, {}!", current_user.name)
//! }
//! ```

pub mod current_user;
pub mod ownership;
pub mod password;
pub mod session;
