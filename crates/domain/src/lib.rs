//! # zonefare-domain
//!
//! Pure domain model for merchant delivery profiles.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **charge styles** (how a merchant bills a delivery)
//! - Define **geometry** value types (delivery area polygon, reference location)
//!   and the farthest-vertex distance computation
//! - Define the **radius table** (per-kilometer pricing bands)
//! - Implement **reconciliation** of a radius table against a new max radius
//! - Define the **delivery profile** aggregate tying all of the above together
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod charge_style;
pub mod geometry;
pub mod profile;
pub mod radius;
pub mod reconcile;
