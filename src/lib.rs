//! # routescout
//!
//! Find GPS tracks that pass near a location.
//!
//! This library provides:
//! - Haversine great-circle distance calculations
//! - Proximity search over collections of GPS tracks
//! - GPX directory loading
//! - Interactive HTML map rendering for matched tracks
//! - Optional track cache refresh from the Ride with GPS API
//!
//! ## Features
//!
//! - **`parallel`** - Enable parallel per-track scanning with rayon
//! - **`http`** - Enable the RWGPS cache refresh client (default)
//!
//! ## Quick Start
//!
//! ```rust
//! use routescout::{GpsPoint, Track, SearchConfig, find_close_routes};
//!
//! let tracks = vec![Track::new(
//!     "morning-loop",
//!     vec![
//!         GpsPoint::new(51.5074, -0.1278),
//!         GpsPoint::new(51.5080, -0.1290),
//!     ],
//! )];
//!
//! let target = GpsPoint::new(51.5075, -0.1280);
//! let matches = find_close_routes(&tracks, target, &SearchConfig::default());
//!
//! for m in matches.iter() {
//!     println!("{} passes within {:.0}m", m.track_id, m.distance);
//! }
//! ```

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{Result, RouteScoutError};

// Geographic utilities (haversine distance, track length, ascent)
pub mod geo;

// Proximity search (the core matcher)
pub mod matcher;
#[cfg(feature = "parallel")]
pub use matcher::find_close_routes_parallel;
pub use matcher::{find_close_routes, find_close_routes_with_progress};
pub use matcher::{AtomicProgressTracker, NoopProgress, ScanProgressCallback};

// GPX directory loading
pub mod loader;
pub use loader::{load_tracks, parse_gpx};

// HTML map rendering for matched tracks
pub mod render;
pub use render::{render_map, MapOptions};

// HTTP client for route cache refresh from RWGPS
#[cfg(feature = "http")]
pub mod http;
#[cfg(feature = "http")]
pub use http::RwgpsClient;

// ============================================================================
// Core Types
// ============================================================================

/// A GPS coordinate with latitude and longitude.
///
/// # Example
/// ```
/// use routescout::GpsPoint;
/// let point = GpsPoint::new(51.5074, -0.1278); // London
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Elevation in meters (optional; planned routes often omit it)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
}

impl GpsPoint {
    /// Create a new GPS point without elevation.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation: None,
        }
    }

    /// Create a new GPS point with elevation.
    pub fn with_elevation(latitude: f64, longitude: f64, elevation: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation: Some(elevation),
        }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// Bounding box for a track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Create bounds from GPS points. Returns `None` for an empty slice.
    pub fn from_points(points: &[GpsPoint]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut min_lat = f64::MAX;
        let mut max_lat = f64::MIN;
        let mut min_lng = f64::MAX;
        let mut max_lng = f64::MIN;

        for p in points {
            min_lat = min_lat.min(p.latitude);
            max_lat = max_lat.max(p.latitude);
            min_lng = min_lng.min(p.longitude);
            max_lng = max_lng.max(p.longitude);
        }

        Some(Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        })
    }

    /// Get the center point of the bounds.
    pub fn center(&self) -> GpsPoint {
        GpsPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }
}

/// A named GPS track: an identifier plus its points in on-track order.
///
/// The identifier is derived from the source filename with the extension
/// stripped. Tracks are read-only inputs to the matcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Stable identifier (source file stem)
    pub id: String,
    /// Display name from GPX metadata, falls back to the identifier
    pub name: String,
    /// Link to the route's origin (e.g. its RWGPS page), if the GPX carries one
    pub link: Option<String>,
    /// Track points in recorded order
    pub points: Vec<GpsPoint>,
}

impl Track {
    /// Create a track with its identifier doubling as the display name.
    pub fn new(id: &str, points: Vec<GpsPoint>) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            link: None,
            points,
        }
    }

    /// Total track length in meters (sum of consecutive point distances).
    pub fn total_distance(&self) -> f64 {
        geo::track_distance(&self.points)
    }

    /// Total ascent in meters (sum of positive elevation deltas).
    pub fn total_ascent(&self) -> f64 {
        geo::total_ascent(&self.points)
    }

    /// First point of the track, if any.
    pub fn start_point(&self) -> Option<GpsPoint> {
        self.points.first().copied()
    }

    /// Middle point of the track (by index), if any.
    pub fn midpoint(&self) -> Option<GpsPoint> {
        self.points.get(self.points.len() / 2).copied()
    }

    /// Bounding box of the track.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(&self.points)
    }
}

/// A qualifying track paired with its minimum observed distance to the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteMatch {
    /// Identifier of the matched track
    pub track_id: String,
    /// Minimum distance in meters from any track point to the target
    pub distance: f64,
}

/// The result of a proximity search.
///
/// Entries are sorted ascending by distance, every entry's distance is
/// strictly below the search threshold, and at most `max_routes` entries
/// are retained.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchSet {
    matches: Vec<RouteMatch>,
    /// True if more tracks qualified than `max_routes` allowed
    pub truncated: bool,
}

impl MatchSet {
    pub(crate) fn new(matches: Vec<RouteMatch>, truncated: bool) -> Self {
        Self { matches, truncated }
    }

    /// Iterate over matches, closest first.
    pub fn iter(&self) -> impl Iterator<Item = &RouteMatch> {
        self.matches.iter()
    }

    /// Matched track identifiers, closest first.
    pub fn track_ids(&self) -> Vec<String> {
        self.matches.iter().map(|m| m.track_id.clone()).collect()
    }

    /// Number of matches.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Check whether no track matched.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Access the underlying matches.
    pub fn as_slice(&self) -> &[RouteMatch] {
        &self.matches
    }
}

impl<'a> IntoIterator for &'a MatchSet {
    type Item = &'a RouteMatch;
    type IntoIter = std::slice::Iter<'a, RouteMatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.iter()
    }
}

/// Configuration for proximity searches.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum qualifying distance in meters. A point matches only if its
    /// distance to the target is strictly below this value.
    /// Default: 800.0 meters
    pub distance_threshold: f64,

    /// Maximum number of tracks to return. When more tracks qualify, the
    /// closest ones are kept.
    /// Default: 10
    pub max_routes: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            distance_threshold: 800.0,
            max_routes: 10,
        }
    }
}
