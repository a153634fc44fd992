//! Database layer for data persistence and access.
//!
//! This module implements the data access layer using SQLx with PostgreSQL.
//! It follows the Repository pattern to provide clean abstractions over database operations.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  (API request handlers)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │ Repositories│  (db::handlers - queries over one table each)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │   Models    │  (db::models - database records)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │  PostgreSQL │
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`handlers`]: Repository implementations for CRUD operations
//! - [`models`]: Database record structures matching table schemas
//! - [`errors`]: Database-specific error types
//!
//! # Transactions
//!
//! Writes that touch more than one row of a trip (saving a whole trip,
//! replacing it, toggling an activity and re-checking completion) run in a
//! single transaction. Repositories are built on that transaction:
//!
//! ```ignore
//! let mut tx = pool.begin().await?;
//! let trip = Trips::new(&mut tx).create(&request).await?;
//! Hotels::new(&mut tx).create(&hotel).await?;
//! tx.commit().await?;
//! ```
//!
//! Read-only paths may use a plain pooled connection instead.
//!
//! # Migrations
//!
//! Database migrations are managed by SQLx and located in the `migrations/` directory.
//! The [`crate::migrator`] function provides access to the migrator:
//!
//! ```ignore
//! trip_planner::migrator().run(&pool).await?;
//! ```

pub mod errors;
pub mod handlers;
pub mod models;
