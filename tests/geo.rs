//! Tests for the geo module

use routescout::geo::*;
use routescout::GpsPoint;

fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

#[test]
fn test_haversine_distance_same_point() {
    let p = GpsPoint::new(51.5074, -0.1278);
    assert_eq!(haversine_distance(&p, &p), 0.0);
}

#[test]
fn test_haversine_distance_known_value() {
    // London to Paris is approximately 344 km
    let london = GpsPoint::new(51.5074, -0.1278);
    let paris = GpsPoint::new(48.8566, 2.3522);
    let dist = haversine_distance(&london, &paris);
    assert!(approx_eq(dist, 343_560.0, 5000.0)); // Within 5km
}

#[test]
fn test_haversine_distance_symmetry() {
    let a = GpsPoint::new(52.1634, 0.5069);
    let b = GpsPoint::new(-33.8688, 151.2093);
    assert_eq!(haversine_distance(&a, &b), haversine_distance(&b, &a));
}

#[test]
fn test_haversine_distance_antipodal() {
    // Antipodal points are half the Earth's circumference apart: R * pi
    let a = GpsPoint::new(0.0, 0.0);
    let b = GpsPoint::new(0.0, 180.0);
    let dist = haversine_distance(&a, &b);
    assert!(approx_eq(dist, EARTH_RADIUS_M * std::f64::consts::PI, 1.0));
}

#[test]
fn test_haversine_triangle_inequality() {
    let a = GpsPoint::new(51.5074, -0.1278);
    let b = GpsPoint::new(48.8566, 2.3522);
    let c = GpsPoint::new(52.5200, 13.4050);
    let direct = haversine_distance(&a, &c);
    let via_b = haversine_distance(&a, &b) + haversine_distance(&b, &c);
    assert!(direct <= via_b + 1e-6);
}

#[test]
fn test_track_distance() {
    // Three points spaced ~0.01 degrees of latitude (~1.1km each)
    let points = vec![
        GpsPoint::new(51.50, -0.12),
        GpsPoint::new(51.51, -0.12),
        GpsPoint::new(51.52, -0.12),
    ];
    let dist = track_distance(&points);
    assert!(approx_eq(dist, 2_224.0, 50.0));
}

#[test]
fn test_track_distance_degenerate() {
    assert_eq!(track_distance(&[]), 0.0);
    assert_eq!(track_distance(&[GpsPoint::new(51.5, -0.1)]), 0.0);
}

#[test]
fn test_total_ascent() {
    let points = vec![
        GpsPoint::with_elevation(51.50, -0.12, 100.0),
        GpsPoint::with_elevation(51.51, -0.12, 150.0),
        GpsPoint::with_elevation(51.52, -0.12, 120.0),
        GpsPoint::with_elevation(51.53, -0.12, 160.0),
    ];
    // +50 then -30 (ignored) then +40
    assert!(approx_eq(total_ascent(&points), 90.0, 1e-9));
}

#[test]
fn test_total_ascent_no_elevation() {
    let points = vec![GpsPoint::new(51.50, -0.12), GpsPoint::new(51.51, -0.12)];
    assert_eq!(total_ascent(&points), 0.0);
}

#[test]
fn test_meters_to_degrees() {
    // At the equator, 111.32km = 1 degree
    let deg = meters_to_degrees(111_320.0, 0.0);
    assert!(approx_eq(deg, 1.0, 0.01));

    // At higher latitude, same distance = more degrees of longitude
    let deg_45 = meters_to_degrees(111_320.0, 45.0);
    assert!(deg_45 > 1.0);
}
