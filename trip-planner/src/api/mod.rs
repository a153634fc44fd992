//! API layer for HTTP request handling and data models.
//!
//! This module contains the REST API implementation, organized into:
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//! - **[`extract`]**: Body extractor mapping malformed JSON to 400 responses
//!
//! # API Structure
//!
//! - **Authentication** (`/api/auth/*`): Register, login, logout, current user
//! - **Trips** (`/api/trips/*`): Trip aggregates, activity completion, partial updates
//!
//! # OpenAPI Documentation
//!
//! All endpoints are documented with OpenAPI annotations using `utoipa`.
//! The document is served at `/api/openapi.json` and browsable at `/api/docs`.

pub mod extract;
pub mod handlers;
pub mod models;
