//! Geographic utilities: haversine distance, track length, ascent.

use crate::GpsPoint;

/// Earth radius in meters (spherical model).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculate the haversine (great-circle) distance between two points in meters.
///
/// Treats the Earth as a sphere of radius 6,371,000 m. Always non-negative;
/// identical points yield 0, antipodal points roughly R * pi.
///
/// # Example
/// ```
/// use routescout::GpsPoint;
/// use routescout::geo::haversine_distance;
///
/// let london = GpsPoint::new(51.5074, -0.1278);
/// let paris = GpsPoint::new(48.8566, 2.3522);
/// let dist = haversine_distance(&london, &paris);
/// assert!((dist - 343_560.0).abs() < 5_000.0);
/// ```
pub fn haversine_distance(p1: &GpsPoint, p2: &GpsPoint) -> f64 {
    let lat1 = p1.latitude.to_radians();
    let lat2 = p2.latitude.to_radians();
    let dlat = (p2.latitude - p1.latitude).to_radians();
    let dlon = (p2.longitude - p1.longitude).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Total length of a track in meters (sum of consecutive segment distances).
pub fn track_distance(points: &[GpsPoint]) -> f64 {
    points
        .windows(2)
        .map(|w| haversine_distance(&w[0], &w[1]))
        .sum()
}

/// Total ascent of a track in meters (sum of positive elevation deltas).
///
/// Points without elevation are skipped; a track with no elevation data
/// has an ascent of 0.
pub fn total_ascent(points: &[GpsPoint]) -> f64 {
    points
        .iter()
        .filter_map(|p| p.elevation)
        .collect::<Vec<_>>()
        .windows(2)
        .map(|w| (w[1] - w[0]).max(0.0))
        .sum()
}

/// Convert a distance in meters to approximate degrees at a given latitude.
///
/// Uses the longitude scale (shrinks toward the poles); useful for map
/// padding and for laying out synthetic test tracks.
pub fn meters_to_degrees(meters: f64, latitude: f64) -> f64 {
    let meters_per_degree = 111_320.0 * latitude.to_radians().cos();
    meters / meters_per_degree
}
