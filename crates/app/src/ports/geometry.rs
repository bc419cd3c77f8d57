//! Geometry port: distance queries against a delivery area.

use std::future::Future;

use zonefare_domain::error::ZonefareError;
use zonefare_domain::geometry::{DeliveryArea, Location};

/// Answers the one spatial question the application asks.
///
/// Implementations may run in-process or query a spatial database; either
/// way the call is a single request with no partial results.
pub trait AreaGeometry {
    /// Distance in meters from `location` to the farthest vertex of `area`.
    ///
    /// Fails with [`ZonefareError::Geometry`] on malformed input.
    fn max_boundary_distance(
        &self,
        location: &Location,
        area: &DeliveryArea,
    ) -> impl Future<Output = Result<f64, ZonefareError>> + Send;
}
