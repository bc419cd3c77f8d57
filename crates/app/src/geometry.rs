//! In-process spherical geometry backend.

use std::future::Future;

use zonefare_domain::error::ZonefareError;
use zonefare_domain::geometry::{DeliveryArea, Location, farthest_vertex_distance};

use crate::ports::AreaGeometry;

/// Computes farthest-vertex distances on a sphere, without IO.
#[derive(Debug, Clone, Copy, Default)]
pub struct SphericalGeometry;

impl SphericalGeometry {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl AreaGeometry for SphericalGeometry {
    fn max_boundary_distance(
        &self,
        location: &Location,
        area: &DeliveryArea,
    ) -> impl Future<Output = Result<f64, ZonefareError>> + Send {
        let meters = farthest_vertex_distance(location.as_point(), area.as_polygon());
        tracing::trace!(meters, vertices = area.vertex_count(), "computed farthest vertex");
        async move { Ok(meters) }
    }
}
