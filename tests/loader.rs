//! Tests for GPX directory loading

use std::fs;
use std::path::Path;

use routescout::{load_tracks, parse_gpx, RouteScoutError};
use tempfile::TempDir;

fn write_gpx(dir: &Path, filename: &str, name: &str, points: &[(f64, f64, Option<f64>)]) {
    let mut body = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="routescout-test" xmlns="http://www.topografix.com/GPX/1/1">
"#,
    );
    body.push_str(&format!(
        "  <metadata>\n    <name>{name}</name>\n    <link href=\"https://example.com/routes/1\"><text>route</text></link>\n  </metadata>\n"
    ));
    body.push_str(&format!("  <trk>\n    <name>{name}</name>\n    <trkseg>\n"));
    for (lat, lon, ele) in points {
        match ele {
            Some(e) => body.push_str(&format!(
                "      <trkpt lat=\"{lat}\" lon=\"{lon}\"><ele>{e}</ele></trkpt>\n"
            )),
            None => body.push_str(&format!("      <trkpt lat=\"{lat}\" lon=\"{lon}\"/>\n")),
        }
    }
    body.push_str("    </trkseg>\n  </trk>\n</gpx>\n");
    fs::write(dir.join(filename), body).unwrap();
}

#[test]
fn test_load_tracks_from_directory() {
    let dir = TempDir::new().unwrap();
    write_gpx(
        dir.path(),
        "36216168.gpx",
        "Back to Brinkley",
        &[(52.16, 0.50, Some(21.0)), (52.17, 0.51, Some(34.0))],
    );
    write_gpx(
        dir.path(),
        "evening_loop.gpx",
        "Evening Loop",
        &[(52.20, 0.52, None), (52.21, 0.53, None)],
    );

    let mut tracks = load_tracks(dir.path());
    tracks.sort_by(|a, b| a.id.cmp(&b.id));

    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].id, "36216168");
    assert_eq!(tracks[0].name, "Back to Brinkley");
    assert_eq!(tracks[1].id, "evening_loop");
    assert_eq!(tracks[0].points.len(), 2);
}

#[test]
fn test_load_tracks_missing_directory() {
    let tracks = load_tracks(Path::new("/definitely/not/a/real/dir"));
    assert!(tracks.is_empty());
}

#[test]
fn test_load_tracks_ignores_non_gpx_and_bad_files() {
    let dir = TempDir::new().unwrap();
    write_gpx(
        dir.path(),
        "good.gpx",
        "Good",
        &[(52.16, 0.50, None), (52.17, 0.51, None)],
    );
    fs::write(dir.path().join("notes.txt"), "not a track").unwrap();
    fs::write(dir.path().join("broken.gpx"), "<gpx this is not xml").unwrap();

    let tracks = load_tracks(dir.path());
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].id, "good");
}

#[test]
fn test_parse_gpx_extracts_metadata() {
    let dir = TempDir::new().unwrap();
    write_gpx(
        dir.path(),
        "ride.gpx",
        "Sunday Ride",
        &[(52.16, 0.50, Some(10.0)), (52.17, 0.51, Some(42.0))],
    );

    let track = parse_gpx(&dir.path().join("ride.gpx")).unwrap();
    assert_eq!(track.id, "ride");
    assert_eq!(track.name, "Sunday Ride");
    assert_eq!(track.link.as_deref(), Some("https://example.com/routes/1"));
    assert_eq!(track.points[0].latitude, 52.16);
    assert_eq!(track.points[0].longitude, 0.50);
    assert_eq!(track.points[0].elevation, Some(10.0));
    assert!(track.total_ascent() > 0.0);
}

#[test]
fn test_parse_gpx_rejects_empty_track() {
    let dir = TempDir::new().unwrap();
    write_gpx(dir.path(), "empty.gpx", "Empty", &[]);

    let result = parse_gpx(&dir.path().join("empty.gpx"));
    assert!(matches!(result, Err(RouteScoutError::GpxParse { .. })));
}

#[test]
fn test_parse_gpx_missing_file() {
    let result = parse_gpx(Path::new("/no/such/file.gpx"));
    assert!(matches!(result, Err(RouteScoutError::Io { .. })));
}
