use clap::{Parser, Subcommand};
use std::path::PathBuf;
use walkdiary::geo::gpsd::{GpsdSource, DEFAULT_GPSD_PORT};
use walkdiary::geo::Position;

/// Returns the version string, including the git hash for non-release builds.
/// Format: "0.1.0" for releases, "0.1.0@abc1234" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{}", VERSION, GIT_HASH)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "walkdiary", version = get_version())]
#[command(about = "A diary for walks: notes, photos and recorded trails", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (debug logs on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Where positions come from. Without either flag, the gpsd daemon from
/// config.json is used.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct LocationArgs {
    /// Use a fixed position instead of asking gpsd (LAT,LNG)
    #[arg(long, value_parser = parse_lat_lng, conflicts_with = "gpsd")]
    pub at: Option<Position>,

    /// gpsd daemon to ask for positions (HOST or HOST:PORT)
    #[arg(long, value_parser = parse_gpsd)]
    pub gpsd: Option<GpsdSource>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a diary note, optionally with a photo
    #[command(alias = "n")]
    Note {
        /// Text of the note
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Attach a photo (downscaled and stored as JPEG)
        #[arg(long)]
        photo: Option<PathBuf>,

        /// Do not record where the note was written
        #[arg(long, conflicts_with_all = ["at", "gpsd"])]
        no_location: bool,

        #[command(flatten)]
        location: LocationArgs,
    },

    /// List notes, newest first
    #[command(alias = "ls")]
    List,

    /// List recorded trails, newest first
    Trails,

    /// Record a trail until Ctrl-C
    #[command(alias = "rec")]
    Record {
        #[command(flatten)]
        location: LocationArgs,

        /// Seconds between samples
        #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u64).range(1..))]
        every: u64,
    },

    /// Export everything to a JSON file
    Export {
        /// Directory to write into (defaults to export_dir from config, then the current directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Replace everything with the contents of an export file
    Import { path: PathBuf },

    /// Get or set preferences (unit, photo-max-px)
    Prefs {
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Suggest something to do on the walk
    Nudge,

    /// Delete all notes, trails and preferences
    Reset {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

fn parse_lat_lng(s: &str) -> Result<Position, String> {
    let (lat, lng) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG, got '{}'", s))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude '{}'", lat.trim()))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude '{}'", lng.trim()))?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(format!("position out of range: {},{}", lat, lng));
    }
    Ok(Position {
        lat,
        lng,
        acc: None,
    })
}

fn parse_gpsd(s: &str) -> Result<GpsdSource, String> {
    match s.rsplit_once(':') {
        Some((host, port)) => {
            let port: u16 = port
                .parse()
                .map_err(|_| format!("invalid gpsd port '{}'", port))?;
            Ok(GpsdSource::new(host, port))
        }
        None => Ok(GpsdSource::new(s, DEFAULT_GPSD_PORT)),
    }
}
