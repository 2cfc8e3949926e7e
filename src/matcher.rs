//! Proximity search over GPS tracks.
//!
//! This module provides the core matching functionality:
//! - Per-track minimum distance to a target coordinate
//! - Threshold filtering with strict `<` semantics
//! - Closest-first ordering, capped at a maximum result count
//!
//! Every point of every track is visited; with track sets of tens to low
//! hundreds of files this is fast enough that no spatial index is needed.

use log::{debug, warn};
use std::sync::atomic::{AtomicU32, Ordering};

use crate::geo::haversine_distance;
use crate::{GpsPoint, MatchSet, RouteMatch, SearchConfig, Track};

/// Trait for receiving progress updates during a track scan.
///
/// `on_track` is called after each track completes. With the `parallel`
/// feature, calls come from rayon worker threads, so implementations must
/// be thread-safe.
pub trait ScanProgressCallback: Send + Sync {
    /// Called after completing one track. `completed` counts finished tracks
    /// out of `total`.
    fn on_track(&self, completed: u32, total: u32);
}

/// No-op implementation for callers that don't report progress.
pub struct NoopProgress;

impl ScanProgressCallback for NoopProgress {
    fn on_track(&self, _completed: u32, _total: u32) {}
}

/// Atomic progress tracker that can be polled from another thread.
/// Useful for testing and as a reference implementation.
#[derive(Default)]
pub struct AtomicProgressTracker {
    pub completed: AtomicU32,
    pub total: AtomicU32,
}

impl AtomicProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of tracks scanned, in [0, 1].
    pub fn fraction(&self) -> f64 {
        let total = self.total.load(Ordering::SeqCst);
        if total == 0 {
            return 0.0;
        }
        f64::from(self.completed.load(Ordering::SeqCst)) / f64::from(total)
    }
}

impl ScanProgressCallback for AtomicProgressTracker {
    fn on_track(&self, completed: u32, total: u32) {
        self.completed.store(completed, Ordering::SeqCst);
        self.total.store(total, Ordering::SeqCst);
    }
}

/// Minimum haversine distance from any point of a track to the target.
///
/// Returns `None` for an empty track; a track with no points can never match.
pub fn track_min_distance(points: &[GpsPoint], target: &GpsPoint) -> Option<f64> {
    points
        .iter()
        .map(|p| haversine_distance(target, p))
        .min_by(f64::total_cmp)
}

/// Find the tracks that pass within `config.distance_threshold` meters of
/// `target`, closest first.
///
/// A track qualifies if at least one of its points lies *strictly* closer
/// than the threshold; its reported distance is the minimum over all of its
/// points. At most `config.max_routes` tracks are returned; when more
/// qualify, the overflow is logged and reflected in [`MatchSet::truncated`].
/// Ties in distance are broken by identifier (lexicographic).
///
/// An empty track collection, a zero threshold, or no qualifying track all
/// yield an empty [`MatchSet`] - never an error.
///
/// # Example
/// ```
/// use routescout::{GpsPoint, Track, SearchConfig, find_close_routes};
///
/// let track = Track::new("local", vec![GpsPoint::new(51.5074, -0.1278)]);
/// let target = GpsPoint::new(51.5075, -0.1278);
///
/// let matches = find_close_routes(&[track], target, &SearchConfig::default());
/// assert_eq!(matches.track_ids(), vec!["local"]);
/// ```
pub fn find_close_routes(tracks: &[Track], target: GpsPoint, config: &SearchConfig) -> MatchSet {
    find_close_routes_with_progress(tracks, target, config, &NoopProgress)
}

/// Like [`find_close_routes`], reporting per-track scan progress through
/// `progress`. The callback is a pure observability hook; it does not affect
/// the result.
pub fn find_close_routes_with_progress(
    tracks: &[Track],
    target: GpsPoint,
    config: &SearchConfig,
    progress: &dyn ScanProgressCallback,
) -> MatchSet {
    debug!(
        "scanning {} tracks for points within {}m of lat:{}, lon:{}",
        tracks.len(),
        config.distance_threshold,
        target.latitude,
        target.longitude
    );

    let total = tracks.len() as u32;
    let mut candidates = Vec::new();

    for (i, track) in tracks.iter().enumerate() {
        if let Some(distance) = track_min_distance(&track.points, &target) {
            if distance < config.distance_threshold {
                candidates.push(RouteMatch {
                    track_id: track.id.clone(),
                    distance,
                });
            }
        }
        progress.on_track(i as u32 + 1, total);
    }

    finish_search(candidates, config)
}

/// Parallel variant of [`find_close_routes`]: per-track minima are computed
/// on the rayon thread pool. Tracks are read-only and the distance function
/// is pure, so only the candidate aggregation is a shared step.
///
/// Returns the same result as the sequential search.
#[cfg(feature = "parallel")]
pub fn find_close_routes_parallel(
    tracks: &[Track],
    target: GpsPoint,
    config: &SearchConfig,
) -> MatchSet {
    use rayon::prelude::*;

    let candidates: Vec<RouteMatch> = tracks
        .par_iter()
        .filter_map(|track| {
            let distance = track_min_distance(&track.points, &target)?;
            (distance < config.distance_threshold).then(|| RouteMatch {
                track_id: track.id.clone(),
                distance,
            })
        })
        .collect();

    finish_search(candidates, config)
}

/// Sort candidates closest-first and cap the result at `max_routes`.
fn finish_search(mut candidates: Vec<RouteMatch>, config: &SearchConfig) -> MatchSet {
    candidates.sort_by(|a, b| {
        a.distance
            .total_cmp(&b.distance)
            .then_with(|| a.track_id.cmp(&b.track_id))
    });

    let truncated = candidates.len() > config.max_routes;
    if truncated {
        warn!(
            "{} tracks matched - output restricted to the closest {}",
            candidates.len(),
            config.max_routes
        );
        candidates.truncate(config.max_routes);
    }

    MatchSet::new(candidates, truncated)
}
