//! Rectangular query regions.

use crate::geo::EARTH_RADIUS_M;
use crate::{CoreError, CoreResult, GeoPoint};

/// A rectangular region in WGS-84 degrees.
///
/// The expected shape is `west < east` and `south < north`, but construction
/// does not enforce it: a malformed box is handed to the data provider as-is
/// and the provider's rejection is surfaced instead.  Call
/// [`validate`](Self::validate) where no provider sits in between.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub west:  f64,
    pub south: f64,
    pub east:  f64,
    pub north: f64,
}

impl BoundingBox {
    /// Argument order matches the usual `(west, south, east, north)` tuple.
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self { west, south, east, north }
    }

    /// Check the box is well-formed and lies within WGS-84 ranges.
    pub fn validate(&self) -> CoreResult<()> {
        let ordered = self.west < self.east && self.south < self.north;
        let in_range = (-180.0..=180.0).contains(&self.west)
            && (-180.0..=180.0).contains(&self.east)
            && (-90.0..=90.0).contains(&self.south)
            && (-90.0..=90.0).contains(&self.north);
        if ordered && in_range {
            Ok(())
        } else {
            Err(CoreError::InvalidBoundingBox {
                west:  self.west,
                south: self.south,
                east:  self.east,
                north: self.north,
            })
        }
    }

    /// `true` if `p` lies inside the box or on its edge.
    #[inline]
    pub fn contains(&self, p: GeoPoint) -> bool {
        p.lat >= self.south && p.lat <= self.north && p.lon >= self.west && p.lon <= self.east
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new((self.south + self.north) * 0.5, (self.west + self.east) * 0.5)
    }

    /// Grow the box by `metres` on every side.
    ///
    /// The longitude margin uses the cosine of the box's centre latitude, so
    /// the result is approximate near the poles.
    pub fn buffered(&self, metres: f64) -> BoundingBox {
        if metres <= 0.0 {
            return *self;
        }
        let d_lat = (metres / EARTH_RADIUS_M).to_degrees();
        let cos_lat = self.center().lat.to_radians().cos().max(1e-6);
        let d_lon = (metres / (EARTH_RADIUS_M * cos_lat)).to_degrees();
        BoundingBox {
            west:  (self.west - d_lon).max(-180.0),
            south: (self.south - d_lat).max(-90.0),
            east:  (self.east + d_lon).min(180.0),
            north: (self.north + d_lat).min(90.0),
        }
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[W {:.6}, S {:.6}, E {:.6}, N {:.6}]",
            self.west, self.south, self.east, self.north
        )
    }
}
