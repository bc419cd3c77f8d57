//! # zonefare-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a JSON API under `/api` for delivery profiles: CRUD, area,
//!   location and charge-style edits, and the radius pricing table
//! - Map HTTP requests into `ProfileService` calls (driving adapter)
//! - Map [`ZonefareError`](zonefare_domain::error::ZonefareError) into status
//!   codes, hiding internal failures behind a generic message
//! - Format money amounts for the display table ([`PlainAmountFormatter`])
//!
//! ## Dependency rule
//! Depends on `zonefare-app` (for port traits and services) and
//! `zonefare-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod format;
pub mod router;
pub mod state;

pub use format::PlainAmountFormatter;

#[cfg(test)]
pub(crate) mod test_support;
