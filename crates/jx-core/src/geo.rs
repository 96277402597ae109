//! Geographic coordinate types and spatial utilities.
//!
//! `GeoPoint` uses `f64` latitude/longitude.  Junction files carry six
//! fractional digits on three-digit longitudes, which is beyond what `f32`
//! can represent exactly.

/// Mean Earth radius in metres, shared by haversine and local projection.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// Project onto a local tangent plane centred on `reference`.
    ///
    /// Equirectangular approximation: `x` grows east, `y` grows north, both
    /// in metres.  Error stays well under a metre across a city district,
    /// which is the scale junction files cover.
    pub fn to_local(self, reference: GeoPoint) -> LocalPoint {
        let phi0  = reference.lat.to_radians();
        let d_lat = (self.lat - reference.lat).to_radians();
        let d_lon = (self.lon - reference.lon).to_radians();
        LocalPoint {
            x: EARTH_RADIUS_M * d_lon * phi0.cos(),
            y: EARTH_RADIUS_M * d_lat,
        }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// A position in metres on a local plane (see [`GeoPoint::to_local`]).
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalPoint {
    pub x: f64,
    pub y: f64,
}

impl LocalPoint {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Straight-line distance in metres.
    #[inline]
    pub fn distance(self, other: LocalPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}
