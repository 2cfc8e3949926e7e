//! GPX directory loading.
//!
//! Turns a directory of `.gpx` files into [`Track`] values. The matcher does
//! not care where points came from; this module is the file-based supplier.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use gpx::Gpx;
use log::{debug, warn};

use crate::error::{Result, RouteScoutError};
use crate::{GpsPoint, Track};

/// Load all GPX tracks from a directory.
///
/// A missing or empty directory yields an empty vec, not an error - the
/// matcher treats that as "zero tracks". Files that are not `.gpx`, fail to
/// parse, or contain no points are skipped with a log message.
pub fn load_tracks(dir: &Path) -> Vec<Track> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("cannot read track directory {}: {e}", dir.display());
            return Vec::new();
        }
    };

    let mut tracks = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() || !path.extension().map_or(false, |ext| ext == "gpx") {
            continue;
        }

        match parse_gpx(&path) {
            Ok(track) => {
                debug!(
                    "loaded {} - {} points, {:.1}km",
                    track.id,
                    track.points.len(),
                    track.total_distance() / 1000.0
                );
                tracks.push(track);
            }
            Err(e) => warn!("skipping {}: {e}", path.display()),
        }
    }

    debug!("loaded {} tracks from {}", tracks.len(), dir.display());
    tracks
}

/// Parse a single GPX file into a [`Track`].
///
/// The track identifier is the file stem (extension stripped). The display
/// name comes from GPX metadata, then the first track's name, then the
/// identifier. Fails if the file cannot be read, is not valid GPX, or
/// contains no track points.
pub fn parse_gpx(path: &Path) -> Result<Track> {
    let file = File::open(path).map_err(|e| RouteScoutError::io(path, e))?;
    let reader = BufReader::new(file);
    let gpx: Gpx = gpx::read(reader).map_err(|e| RouteScoutError::GpxParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let id = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string();

    let name = gpx
        .metadata
        .as_ref()
        .and_then(|m| m.name.clone())
        .or_else(|| gpx.tracks.first().and_then(|t| t.name.clone()))
        .unwrap_or_else(|| id.clone());

    let link = gpx
        .metadata
        .as_ref()
        .and_then(|m| m.links.first())
        .map(|l| l.href.clone());

    let mut points = Vec::new();
    for track in &gpx.tracks {
        for segment in &track.segments {
            for pt in &segment.points {
                let p = pt.point();
                points.push(GpsPoint {
                    latitude: p.y(),
                    longitude: p.x(),
                    elevation: pt.elevation,
                });
            }
        }
    }

    if points.is_empty() {
        return Err(RouteScoutError::GpxParse {
            path: path.to_path_buf(),
            message: "no track points found".to_string(),
        });
    }

    Ok(Track {
        id,
        name,
        link,
        points,
    })
}
