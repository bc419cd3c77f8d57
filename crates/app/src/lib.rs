//! # zonefare-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `ProfileRepository`: load and save delivery profiles with an
//!     optimistic version check
//!   - `AreaGeometry`: farthest-vertex distance between a location and an area
//!   - `AmountFormatter`: display formatting for money amounts
//! - Define **driving/inbound ports** as use-case structs:
//!   - `ProfileService`: profile CRUD, area/location/style edits with radius
//!     reconciliation, pricing edits, display table
//! - Provide **in-process infrastructure** that doesn't need IO
//!   (`SphericalGeometry`)
//!
//! ## Dependency rule
//! Depends on `zonefare-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod geometry;
pub mod ports;
pub mod services;
