//! Tests for the RWGPS payload handling (no network required)
#![cfg(feature = "http")]

use std::collections::HashSet;
use std::fs;

use routescout::http::{existing_route_stems, routes_to_fetch, RouteListResponse, RouteSummary};
use tempfile::TempDir;

#[test]
fn test_public_listing_is_a_bare_array() {
    let payload = r#"[
        {"id": 36216168, "name": "Back to Brinkley"},
        {"id": 32408351}
    ]"#;
    let routes: Vec<RouteSummary> = serde_json::from_str(payload).unwrap();
    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].id, 36216168);
    assert_eq!(routes[0].name.as_deref(), Some("Back to Brinkley"));
    assert_eq!(routes[1].name, None);
}

#[test]
fn test_authenticated_listing_is_wrapped_in_results() {
    let payload = r#"{"results": [{"id": 11764387, "name": "Commute"}]}"#;
    let response: RouteListResponse = serde_json::from_str(payload).unwrap();
    assert_eq!(response.results.len(), 1);
    assert_eq!(response.results[0].id, 11764387);
}

#[test]
fn test_routes_to_fetch_skips_cached() {
    let existing: HashSet<String> = ["36216168".to_string(), "11764387".to_string()]
        .into_iter()
        .collect();
    let routes = vec![
        RouteSummary {
            id: 36216168,
            name: None,
        },
        RouteSummary {
            id: 99999999,
            name: None,
        },
        RouteSummary {
            id: 11764387,
            name: None,
        },
    ];

    assert_eq!(routes_to_fetch(&existing, &routes), vec![99999999]);
}

#[test]
fn test_existing_route_stems() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("36216168.gpx"), "x").unwrap();
    fs::write(dir.path().join("Back_to_Brinkley.gpx"), "x").unwrap();
    fs::write(dir.path().join("readme.txt"), "x").unwrap();

    let stems = existing_route_stems(dir.path());
    assert_eq!(stems.len(), 2);
    assert!(stems.contains("36216168"));
    assert!(stems.contains("Back_to_Brinkley"));
}

#[test]
fn test_existing_route_stems_missing_dir() {
    let stems = existing_route_stems(std::path::Path::new("/no/such/cache"));
    assert!(stems.is_empty());
}
