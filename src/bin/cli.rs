//! routescout CLI - find GPX tracks passing near a location
//!
//! Usage:
//!   routescout --location 52.1634 0.5069 [--path tracks] [--dist 800] [--max 10]
//!   routescout --refresh --user 657096 [--api-key KEY --auth-token TOKEN]
//!
//! Scans a directory of GPX files for tracks with at least one point within
//! the given distance of the target, prints the closest matches and writes
//! them to an interactive HTML map. With `--refresh`, the track directory is
//! first topped up from the Ride with GPS API.

use std::io::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use routescout::{
    find_close_routes_with_progress, load_tracks, render_map, GpsPoint, MapOptions, RwgpsClient,
    ScanProgressCallback, SearchConfig,
};

#[derive(Parser)]
#[command(name = "routescout")]
#[command(about = "Find tracks/routes that pass within a given distance of a location")]
struct Cli {
    /// Directory containing GPX tracks/routes
    #[arg(short, long, default_value = "tracks")]
    path: PathBuf,

    /// Latitude and longitude of the target
    #[arg(short, long, num_args = 2, value_names = ["LAT", "LON"], allow_negative_numbers = true)]
    location: Option<Vec<f64>>,

    /// Maximum distance in meters a track may be from the target to match
    #[arg(short, long, default_value_t = 800.0)]
    dist: f64,

    /// Return at most this many of the closest routes
    #[arg(short, long, default_value_t = 10)]
    max: usize,

    /// Output HTML file for the map
    #[arg(short, long, default_value = "routes.html")]
    output: PathBuf,

    /// Refresh the track directory from RWGPS before searching
    #[arg(short, long)]
    refresh: bool,

    /// RWGPS user id to refresh routes from
    #[arg(long, requires = "refresh")]
    user: Option<u64>,

    /// RWGPS API key (with --auth-token, lists up to 500 routes)
    #[arg(long, requires = "auth_token")]
    api_key: Option<String>,

    /// RWGPS auth token
    #[arg(long, requires = "api_key")]
    auth_token: Option<String>,

    /// Enable verbose debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> routescout::Result<()> {
    if cli.refresh {
        let user = cli.user.unwrap_or(657_096);
        let client = match (&cli.api_key, &cli.auth_token) {
            (Some(key), Some(token)) => RwgpsClient::with_credentials(user, key, token),
            _ => RwgpsClient::new(user),
        };
        let files = client.refresh_routes(&cli.path)?;
        println!("Cache holds {} routes for user {user}", files.len());
    }

    let Some(location) = &cli.location else {
        if !cli.refresh {
            println!("Nothing to do: pass --location LAT LON to search, or --refresh");
        }
        return Ok(());
    };

    let target = GpsPoint::new(location[0], location[1]);
    if !target.is_valid() {
        return Err(routescout::RouteScoutError::InvalidCoordinate {
            latitude: target.latitude,
            longitude: target.longitude,
        });
    }

    let tracks = load_tracks(&cli.path);
    println!(
        "Checking {} tracks for points within {:.0}m of lat:{}, lon:{}",
        tracks.len(),
        cli.dist,
        target.latitude,
        target.longitude
    );

    let config = SearchConfig {
        distance_threshold: cli.dist,
        max_routes: cli.max,
    };
    let matches = find_close_routes_with_progress(&tracks, target, &config, &ConsoleProgress::new());
    println!();

    if matches.is_empty() {
        println!("No matches");
        return Ok(());
    }

    if matches.truncated {
        println!(
            "More than {} routes matched - keeping the closest {}",
            cli.max, cli.max
        );
    }

    println!("Matched tracks:");
    for m in matches.iter() {
        println!("  {} - {:.0}m", m.track_id, m.distance);
    }

    let options = MapOptions {
        marker_text: format!(
            "Closest {} routes within {:.0}m of here (lat:{:.4}, lon:{:.4})",
            matches.len(),
            cli.dist,
            target.latitude,
            target.longitude
        ),
        ..MapOptions::default()
    };
    render_map(&cli.output, &tracks, &matches, target, &options)?;
    println!("Map {} created", cli.output.display());

    Ok(())
}

/// Progress reporter that rewrites a single console line with the scan
/// percentage, like a download progress bar.
struct ConsoleProgress {
    last_percent: Mutex<u32>,
}

impl ConsoleProgress {
    fn new() -> Self {
        Self {
            last_percent: Mutex::new(u32::MAX),
        }
    }
}

impl ScanProgressCallback for ConsoleProgress {
    fn on_track(&self, completed: u32, total: u32) {
        if total == 0 {
            return;
        }
        let percent = completed * 100 / total;
        let mut last = match self.last_percent.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if *last != percent {
            *last = percent;
            print!("\rChecking tracks: {completed}/{total} - {percent}%");
            let _ = std::io::stdout().flush();
        }
    }
}
