//! HTML map rendering for matched tracks.
//!
//! Writes a self-contained Leaflet page: one polyline per matched track,
//! a start marker per track, a marker at the search target, and a layer
//! control to toggle individual tracks. The page pulls Leaflet itself from
//! the public CDN; everything else is inlined.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use geo::{Coord, LineString, Simplify};
use log::{info, warn};

use crate::error::{Result, RouteScoutError};
use crate::{GpsPoint, MatchSet, Track};

/// Polyline colors, cycled per track.
const TRACK_COLORS: [&str; 7] = ["red", "blue", "green", "orange", "purple", "gray", "pink"];

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

/// Options for map rendering.
#[derive(Debug, Clone)]
pub struct MapOptions {
    /// Initial zoom level. Default: 12
    pub zoom: u8,

    /// Tooltip text shown on the target marker.
    pub marker_text: String,

    /// Douglas-Peucker tolerance in degrees for embedded polylines.
    /// Smaller values preserve more detail. Default: 0.0001 (~11 meters)
    pub simplify_tolerance: f64,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            zoom: 12,
            marker_text: String::new(),
            simplify_tolerance: 0.0001,
        }
    }
}

/// Render matched tracks to an interactive HTML map at `path`.
///
/// Tracks are looked up by identifier in match order (closest first), so
/// color assignment is stable across runs. A match whose track is missing
/// from `tracks` is skipped with a warning. An empty match set writes
/// nothing and returns `Ok` - presenting "no matches" is the caller's job.
pub fn render_map(
    path: &Path,
    tracks: &[Track],
    matches: &MatchSet,
    target: GpsPoint,
    options: &MapOptions,
) -> Result<()> {
    let mut matched: Vec<(&Track, f64)> = Vec::new();
    for m in matches.iter() {
        match tracks.iter().find(|t| t.id == m.track_id) {
            Some(track) if !track.points.is_empty() => matched.push((track, m.distance)),
            Some(_) | None => warn!("matched track {} has nothing to draw - skipping", m.track_id),
        }
    }

    if matched.is_empty() {
        warn!("no matched tracks to render - skipping {}", path.display());
        return Ok(());
    }

    let html = build_page(&matched, target, options);
    fs::write(path, html).map_err(|e| RouteScoutError::io(path, e))?;
    info!("wrote map with {} tracks to {}", matched.len(), path.display());
    Ok(())
}

/// Assemble the full HTML document.
fn build_page(matched: &[(&Track, f64)], target: GpsPoint, options: &MapOptions) -> String {
    // Center where the closest track starts
    let center = matched[0]
        .0
        .start_point()
        .unwrap_or(target);

    let mut page = String::new();
    let _ = write!(
        page,
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Matched routes</title>
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<link rel="stylesheet" href="{LEAFLET_CSS}">
<script src="{LEAFLET_JS}"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
var map = L.map('map').setView([{:.6}, {:.6}], {});
L.tileLayer('https://tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{
  maxZoom: 19,
  attribution: '&copy; OpenStreetMap contributors'
}}).addTo(map);
var overlays = {{}};
"#,
        center.latitude, center.longitude, options.zoom
    );

    for (i, (track, distance)) in matched.iter().enumerate() {
        let color = TRACK_COLORS[i % TRACK_COLORS.len()];
        let coords = polyline_coords(&track.points, options.simplify_tolerance);
        let popup = track_popup(track, *distance);
        let start = track.points[0];

        let _ = write!(
            page,
            r#"var track{i} = L.featureGroup();
L.polyline({coords}, {{color: '{color}', weight: 4.5, opacity: 0.5}})
  .bindPopup({popup}).addTo(track{i});
L.circleMarker([{:.6}, {:.6}], {{radius: 9, color: '{color}', weight: 1, fillColor: '{color}', fillOpacity: 1}})
  .bindPopup({popup}).addTo(track{i});
track{i}.addTo(map);
overlays[{label}] = track{i};
"#,
            start.latitude,
            start.longitude,
            label = js_string(&format!(
                "<span style=\"color: {color};\">{} ({:.1}k)</span>",
                escape_html(&track.name),
                track.total_distance() / 1000.0
            )),
        );
    }

    let _ = write!(
        page,
        r#"L.marker([{:.6}, {:.6}]).bindTooltip({}).addTo(map);
L.control.layers(null, overlays, {{collapsed: false}}).addTo(map);
</script>
</body>
</html>
"#,
        target.latitude,
        target.longitude,
        js_string(&escape_html(&options.marker_text)),
    );

    page
}

/// Build the `[[lat, lng], ...]` coordinate literal for a polyline,
/// Douglas-Peucker simplified to keep the page small.
fn polyline_coords(points: &[GpsPoint], tolerance: f64) -> String {
    let line = LineString::new(
        points
            .iter()
            .map(|p| Coord {
                x: p.longitude,
                y: p.latitude,
            })
            .collect(),
    );
    let simplified = if points.len() > 2 && tolerance > 0.0 {
        line.simplify(&tolerance)
    } else {
        line
    };

    let coords: Vec<String> = simplified
        .0
        .iter()
        .map(|c| format!("[{:.6}, {:.6}]", c.y, c.x))
        .collect();
    format!("[{}]", coords.join(", "))
}

/// Popup HTML for one track, as a quoted JS string.
fn track_popup(track: &Track, distance: f64) -> String {
    let name = escape_html(&track.name);
    let title = match &track.link {
        Some(link) => format!("<a href=\"{}\">{name}</a>", escape_html(link)),
        None => name,
    };
    let ascent = track.total_ascent();
    let mut html = format!(
        "<span style=\"white-space: nowrap;\">{title}<br>Length: {:.1}k<br>",
        track.total_distance() / 1000.0
    );
    if ascent > 0.0 {
        let _ = write!(html, "Climb: {ascent:.0}m<br>");
    }
    let _ = write!(
        html,
        "Closest point: {distance:.0}m<br>File: {}.gpx</span>",
        escape_html(&track.id)
    );
    js_string(&html)
}

/// Quote a string as a JavaScript single-quoted literal.
fn js_string(s: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace("</", "<\\/");
    format!("'{escaped}'")
}

/// Escape HTML special characters.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
