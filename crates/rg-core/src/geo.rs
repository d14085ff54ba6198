//! Geographic coordinate type and great-circle distance.
//!
//! Unlike a simulation-scale point type, `GeoPoint` keeps full `f64`
//! precision: the coordinates are written back out verbatim in the
//! serialized graph and must survive a round trip unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mean Earth radius in statute miles, the default for [`GeoPoint::distance_miles`].
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// A WGS-84 geographic coordinate in degrees.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance in miles on a sphere of
    /// [`EARTH_RADIUS_MILES`].
    #[inline]
    pub fn distance_miles(self, other: GeoPoint) -> f64 {
        self.distance_on_sphere(other, EARTH_RADIUS_MILES)
    }

    /// Haversine great-circle distance on a sphere of `radius`.
    ///
    /// The result is in the same unit as `radius`.  NaN coordinates produce a
    /// NaN distance; nothing is rejected here.
    pub fn distance_on_sphere(self, other: GeoPoint, radius: f64) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        radius * c
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}
