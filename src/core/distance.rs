use crate::models::Coordinates;
use geo::{GeodesicDistance, Point};

/// Geodesic distance between two points in kilometers
///
/// Measured on the WGS-84 ellipsoid (Karney's algorithm), so long distances
/// do not drift the way a spherical haversine would.
///
/// # Arguments
/// * `a` - First point
/// * `b` - Second point
///
/// # Returns
/// Distance in kilometers, symmetric and zero only for identical points
#[inline]
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    if a == b {
        return 0.0;
    }

    let from = Point::new(a.longitude, a.latitude);
    let to = Point::new(b.longitude, b.latitude);

    from.geodesic_distance(&to) / 1000.0
}

/// Round a distance to two decimal places for presentation
#[inline]
pub fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}
