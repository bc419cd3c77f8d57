//! # zonefare-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement `ProfileRepository` from `zonefare-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (sqlx embedded migrations)
//! - Map between domain types and database rows; area, location and radius
//!   table are stored as JSON text next to the profile
//!
//! ## Dependency rule
//! Depends on `zonefare-app` (for port traits) and `zonefare-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod error;
mod pool;
mod profile_repo;

pub use error::StorageError;
pub use pool::{Config, Database};
pub use profile_repo::SqliteProfileRepository;
