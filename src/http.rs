//! HTTP client for refreshing the local track cache from Ride with GPS.
//!
//! The public API returns a user's most recent routes (~25); with an API key
//! and auth token the paginated endpoint returns up to 500. Routes already
//! present in the cache directory are not downloaded again.
//!
//! See <https://ridewithgps.com/api> for endpoint details.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use log::{info, warn};
use serde::Deserialize;

use crate::error::{Result, RouteScoutError};

const RWGPS_BASE_URL: &str = "https://ridewithgps.com";

/// One route entry from the RWGPS route listing.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteSummary {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
}

/// Envelope returned by the authenticated listing endpoint.
#[derive(Debug, Deserialize)]
pub struct RouteListResponse {
    pub results: Vec<RouteSummary>,
}

/// API credentials for the authenticated listing endpoint.
#[derive(Debug, Clone)]
struct Credentials {
    api_key: String,
    auth_token: String,
}

/// Client for downloading a user's routes from Ride with GPS.
pub struct RwgpsClient {
    user: u64,
    credentials: Option<Credentials>,
    client: reqwest::blocking::Client,
}

impl RwgpsClient {
    /// Client using the public listing (most recent ~25 routes).
    pub fn new(user: u64) -> Self {
        Self {
            user,
            credentials: None,
            client: default_client(),
        }
    }

    /// Client using the authenticated listing (up to 500 routes).
    pub fn with_credentials(user: u64, api_key: &str, auth_token: &str) -> Self {
        Self {
            user,
            credentials: Some(Credentials {
                api_key: api_key.to_string(),
                auth_token: auth_token.to_string(),
            }),
            client: default_client(),
        }
    }

    /// Refresh the GPX cache in `dir`, downloading any route not already
    /// present. Creates the directory if needed. A single failed download is
    /// logged and skipped; a failed route listing is an error.
    ///
    /// Returns the GPX filenames now present for the listed routes.
    pub fn refresh_routes(&self, dir: &Path) -> Result<Vec<String>> {
        fs::create_dir_all(dir).map_err(|e| RouteScoutError::io(dir, e))?;

        let existing = existing_route_stems(dir);
        info!("found {} existing routes in {}", existing.len(), dir.display());

        let routes = self.list_routes()?;
        info!("checking {} routes from RWGPS for missing files", routes.len());

        let mut downloaded = HashSet::new();
        for id in routes_to_fetch(&existing, &routes) {
            info!("route {id} not cached - downloading");
            let filename = format!("{id}.gpx");
            match self.download_route(id, &dir.join(&filename)) {
                Ok(()) => {
                    downloaded.insert(id);
                }
                Err(e) => warn!("failed to download route {id}: {e}"),
            }
        }

        Ok(routes
            .iter()
            .filter(|r| existing.contains(&r.id.to_string()) || downloaded.contains(&r.id))
            .map(|r| format!("{}.gpx", r.id))
            .collect())
    }

    /// Fetch the route listing for the configured user.
    pub fn list_routes(&self) -> Result<Vec<RouteSummary>> {
        let url = format!("{RWGPS_BASE_URL}/users/{}/routes.json", self.user);

        let request = match &self.credentials {
            Some(creds) => self.client.get(&url).query(&[
                ("offset", "0"),
                ("limit", "500"),
                ("version", "2"),
                ("apikey", creds.api_key.as_str()),
                ("auth_token", creds.auth_token.as_str()),
            ]),
            None => self.client.get(&url),
        };

        let response = request.send()?;
        if !response.status().is_success() {
            return Err(RouteScoutError::HttpStatus {
                status: response.status().as_u16(),
                url,
            });
        }

        // The authenticated endpoint wraps the list in a `results` field
        if self.credentials.is_some() {
            Ok(response.json::<RouteListResponse>()?.results)
        } else {
            Ok(response.json::<Vec<RouteSummary>>()?)
        }
    }

    /// Download a single route's GPX into `path`.
    fn download_route(&self, id: u64, path: &Path) -> Result<()> {
        let url = format!("{RWGPS_BASE_URL}/routes/{id}.gpx");
        let response = self.client.get(&url).send()?;
        if !response.status().is_success() {
            return Err(RouteScoutError::HttpStatus {
                status: response.status().as_u16(),
                url,
            });
        }

        let body = response.bytes()?;
        fs::write(path, &body).map_err(|e| RouteScoutError::io(path, e))?;
        Ok(())
    }
}

fn default_client() -> reqwest::blocking::Client {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(concat!("routescout/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_default()
}

/// Stems of the `.gpx` files already present in a cache directory.
pub fn existing_route_stems(dir: &Path) -> HashSet<String> {
    let mut stems = HashSet::new();
    let Ok(entries) = fs::read_dir(dir) else {
        return stems;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == "gpx") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                stems.insert(stem.to_string());
            }
        }
    }
    stems
}

/// Route ids from `routes` that are not yet present in `existing` (stems).
pub fn routes_to_fetch(existing: &HashSet<String>, routes: &[RouteSummary]) -> Vec<u64> {
    routes
        .iter()
        .filter(|r| !existing.contains(&r.id.to_string()))
        .map(|r| r.id)
        .collect()
}
