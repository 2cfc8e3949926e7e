//! Unified error handling for routescout.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, refreshing or rendering tracks.
///
/// The proximity search itself is total and never fails; errors come from
/// the I/O edges (file system, GPX parsing, HTTP).
#[derive(Debug, Error)]
pub enum RouteScoutError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse GPX file {path}: {message}")]
    GpxParse { path: PathBuf, message: String },

    #[error("coordinate out of range: lat {latitude}, lon {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[cfg(feature = "http")]
    #[error("RWGPS request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[cfg(feature = "http")]
    #[error("RWGPS returned status {status} for {url}")]
    HttpStatus { status: u16, url: String },
}

impl RouteScoutError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience result type used throughout the crate.
pub type Result<T> = std::result::Result<T, RouteScoutError>;
