//! Geometry value types and the farthest-vertex distance.
//!
//! Coordinates are WGS84 `(longitude, latitude)` pairs, matching `GeoJSON`.
//! The spatial reference is otherwise opaque to the rest of the domain: the
//! only question ever asked of a delivery area is how far its farthest
//! vertex lies from the merchant.

use geo::{Coord, CoordsIter, Distance, Haversine, LineString, Point, Polygon};
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// A `[longitude, latitude]` pair as it appears on the wire.
pub type Position = [f64; 2];

fn checked_coord([longitude, latitude]: Position) -> Result<Coord<f64>, GeometryError> {
    let in_range = longitude.is_finite()
        && latitude.is_finite()
        && (-180.0..=180.0).contains(&longitude)
        && (-90.0..=90.0).contains(&latitude);
    if !in_range {
        return Err(GeometryError::OutOfRange {
            longitude,
            latitude,
        });
    }
    Ok(Coord {
        x: longitude,
        y: latitude,
    })
}

fn checked_ring(index: usize, positions: Vec<Position>) -> Result<LineString<f64>, GeometryError> {
    let coords = positions
        .into_iter()
        .map(checked_coord)
        .collect::<Result<Vec<_>, _>>()?;
    let distinct = match (coords.first(), coords.last()) {
        (Some(first), Some(last)) if coords.len() > 1 && first == last => coords.len() - 1,
        _ => coords.len(),
    };
    if distinct < 3 {
        return Err(GeometryError::TooFewVertices {
            ring: index,
            vertices: distinct,
        });
    }
    Ok(LineString::from(coords))
}

/// The merchant's reference point, distances are measured from here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LocationRepr", into = "LocationRepr")]
pub struct Location(Point<f64>);

#[derive(Serialize, Deserialize)]
struct LocationRepr {
    latitude: f64,
    longitude: f64,
}

impl Location {
    /// Build a location from latitude and longitude in degrees.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::OutOfRange`] for non-finite or out-of-range
    /// values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeometryError> {
        checked_coord([longitude, latitude]).map(|c| Self(Point::from(c)))
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.0.y()
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.0.x()
    }

    /// Borrow the underlying point.
    #[must_use]
    pub fn as_point(&self) -> &Point<f64> {
        &self.0
    }
}

impl TryFrom<LocationRepr> for Location {
    type Error = GeometryError;

    fn try_from(value: LocationRepr) -> Result<Self, Self::Error> {
        Self::new(value.latitude, value.longitude)
    }
}

impl From<Location> for LocationRepr {
    fn from(value: Location) -> Self {
        Self {
            latitude: value.latitude(),
            longitude: value.longitude(),
        }
    }
}

/// A merchant's delivery area: one exterior ring plus optional holes.
///
/// Serialized as `GeoJSON` polygon coordinates, `[[[lng, lat], ...], ...]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Position>>", into = "Vec<Vec<Position>>")]
pub struct DeliveryArea(Polygon<f64>);

impl DeliveryArea {
    /// Build an area from rings of positions, the first ring being the
    /// exterior. Open rings are closed.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] when there are no rings, when a ring has
    /// fewer than three distinct vertices, or when a coordinate is out of
    /// range.
    pub fn from_rings(rings: Vec<Vec<Position>>) -> Result<Self, GeometryError> {
        let mut rings = rings
            .into_iter()
            .enumerate()
            .map(|(index, positions)| checked_ring(index, positions));

        let exterior = rings.next().ok_or(GeometryError::NoRings)??;
        let interiors = rings.collect::<Result<Vec<_>, _>>()?;
        Ok(Self(Polygon::new(exterior, interiors)))
    }

    /// Rings as closed position lists, exterior first.
    #[must_use]
    pub fn to_rings(&self) -> Vec<Vec<Position>> {
        std::iter::once(self.0.exterior())
            .chain(self.0.interiors())
            .map(|ring| ring.coords().map(|c| [c.x, c.y]).collect())
            .collect()
    }

    /// Number of vertices over every ring, closing vertices included.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.0.coords_count()
    }

    /// Borrow the underlying polygon.
    #[must_use]
    pub fn as_polygon(&self) -> &Polygon<f64> {
        &self.0
    }
}

impl TryFrom<Vec<Vec<Position>>> for DeliveryArea {
    type Error = GeometryError;

    fn try_from(value: Vec<Vec<Position>>) -> Result<Self, Self::Error> {
        Self::from_rings(value)
    }
}

impl From<DeliveryArea> for Vec<Vec<Position>> {
    fn from(value: DeliveryArea) -> Self {
        value.to_rings()
    }
}

/// Largest great-circle distance, in meters, between any point of
/// `reference` and any vertex of `area`.
///
/// Only vertices are sampled, never the edges between them, so this is the
/// distance to the farthest *vertex*. Every radius count ever stored was
/// derived this way. Returns `0.0` when either side has no coordinates.
pub fn farthest_vertex_distance<R, A>(reference: &R, area: &A) -> f64
where
    R: CoordsIter<Scalar = f64>,
    A: CoordsIter<Scalar = f64>,
{
    reference
        .coords_iter()
        .flat_map(|from| {
            area.coords_iter()
                .map(move |to| Haversine::distance(Point::from(from), Point::from(to)))
        })
        .fold(0.0, f64::max)
}

/// Max boundary distance from a merchant location to its delivery area.
///
/// An absent area is the "no area set yet" state and yields `0.0`.
#[must_use]
pub fn max_boundary_distance(location: &Location, area: Option<&DeliveryArea>) -> f64 {
    area.map_or(0.0, |area| {
        farthest_vertex_distance(location.as_point(), area.as_polygon())
    })
}
