//! Satellite Tracker CLI
//!
//! Positions, passes, ground tracks and ground coverage for a constellation
//! read from a JSON array of `{name, norad_id, tle_line1, tle_line2}` records.
//!
//! Usage:
//!   sat-tracker position --satellites data/starlink.json
//!   sat-tracker passes --satellites data/starlink.json --city "tel aviv" --hours 12
//!   sat-tracker coverage --satellites data/starlink.json --lat 47.6 --lon -122.3
//!   sat-tracker tracks --satellites data/starlink.json --hours 3 --segments

mod loader;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use coverage_analysis::{
    city_coverage, ground_tracks, predict_constellation_passes, track_segments, Observer,
    ScanConfig, CITIES,
};
use orbital_mechanics::{position_at, SatPosition};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use loader::ScanOverrides;

#[derive(Parser, Debug)]
#[command(
    name = "sat-tracker",
    about = "Satellite positions, passes and ground coverage from two-line element sets"
)]
struct Cli {
    /// Write JSON here instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Geodetic position of every satellite
    Position {
        #[command(flatten)]
        input: SatelliteArgs,

        /// Instant to evaluate (RFC 3339), defaults to now
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Passes over an observer, sorted by rise time
    Passes {
        #[command(flatten)]
        input: SatelliteArgs,
        #[command(flatten)]
        observer: ObserverArgs,
        #[command(flatten)]
        scan: ScanArgs,
    },
    /// Ground tracks keyed by satellite name
    Tracks {
        #[command(flatten)]
        input: SatelliteArgs,
        #[command(flatten)]
        scan: ScanArgs,

        /// Split each track at antimeridian crossings
        #[arg(long)]
        segments: bool,
    },
    /// Coverage statistics for an observer
    Coverage {
        #[command(flatten)]
        input: SatelliteArgs,
        #[command(flatten)]
        observer: ObserverArgs,
        #[command(flatten)]
        scan: ScanArgs,
    },
    /// List the built-in observer locations
    Cities,
}

#[derive(Args, Debug)]
struct SatelliteArgs {
    /// Path to satellite records JSON file
    #[arg(short, long, default_value = "data/satellites.json")]
    satellites: PathBuf,
}

#[derive(Args, Debug)]
struct ObserverArgs {
    /// Built-in observer location (see `cities`)
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    city: Option<String>,

    /// Observer latitude in degrees
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Observer longitude in degrees
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Observer height above the WGS84 ellipsoid in km
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    alt_km: f64,
}

impl ObserverArgs {
    fn resolve(&self) -> Result<(String, Observer)> {
        match (&self.city, self.lat, self.lon) {
            (Some(city), _, _) => {
                let observer = Observer::city(city)?.with_altitude(self.alt_km)?;
                Ok((city.trim().to_lowercase(), observer))
            }
            (None, Some(lat), Some(lon)) => {
                let observer = Observer::new(lat, lon)?.with_altitude(self.alt_km)?;
                Ok((format!("{:.4}, {:.4}", lat, lon), observer))
            }
            _ => bail!("an observer is required: pass --city or both --lat and --lon"),
        }
    }
}

#[derive(Args, Debug)]
struct ScanArgs {
    /// Scan settings JSON file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scan horizon in hours
    #[arg(long)]
    hours: Option<f64>,

    /// Sampling step in seconds
    #[arg(long)]
    step: Option<u32>,

    /// Minimum peak elevation in degrees
    #[arg(long, allow_negative_numbers = true)]
    min_elevation: Option<f64>,

    /// Scan start (RFC 3339), defaults to now
    #[arg(long)]
    start: Option<DateTime<Utc>>,
}

impl ScanArgs {
    fn resolve(&self, base: ScanConfig) -> Result<(DateTime<Utc>, ScanConfig)> {
        let mut config = base;
        if let Some(path) = &self.config {
            config = loader::load_scan_overrides(path)?.apply(config);
        }
        let flags = ScanOverrides {
            hours: self.hours,
            step_seconds: self.step,
            min_elevation_deg: self.min_elevation,
        };
        config = flags.apply(config);
        config.validate()?;

        Ok((self.start.unwrap_or_else(Utc::now), config))
    }
}

#[derive(Serialize)]
struct CityEntry {
    name: &'static str,
    latitude: f64,
    longitude: f64,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("sat_tracker=info,coverage_analysis=info"))
    };

    // JSON goes to stdout, logs to stderr
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn write_json<T: Serialize>(output: Option<&Path>, value: &T) -> Result<()> {
    match output {
        Some(path) => {
            info!("Writing output to {:?}", path);
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, value)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let output = cli.output.as_deref();

    match cli.command {
        Command::Position { input, at } => {
            let satellites = loader::load_satellites(&input.satellites)?;
            let at = at.unwrap_or_else(Utc::now);

            let positions: Vec<SatPosition> = satellites
                .iter()
                .filter_map(|sat| position_at(sat, at))
                .collect();
            info!(
                "{} of {} satellites positioned at {}",
                positions.len(),
                satellites.len(),
                at
            );
            write_json(output, &positions)
        }
        Command::Passes {
            input,
            observer,
            scan,
        } => {
            let satellites = loader::load_satellites(&input.satellites)?;
            let (name, observer) = observer.resolve()?;
            let (start, config) = scan.resolve(ScanConfig::passes())?;

            info!("Predicting passes over {} from {}", name, start);
            let passes = predict_constellation_passes(&satellites, &observer, start, &config)?;
            write_json(output, &passes)
        }
        Command::Tracks {
            input,
            scan,
            segments,
        } => {
            let satellites = loader::load_satellites(&input.satellites)?;
            let (start, config) = scan.resolve(ScanConfig::ground_track())?;
            let tracks = ground_tracks(&satellites, start, &config)?;

            if segments {
                let split: BTreeMap<&str, Vec<_>> = tracks
                    .iter()
                    .map(|(name, track)| (name.as_str(), track_segments(track)))
                    .collect();
                write_json(output, &split)
            } else {
                write_json(output, &tracks)
            }
        }
        Command::Coverage {
            input,
            observer,
            scan,
        } => {
            let satellites = loader::load_satellites(&input.satellites)?;
            let (name, observer) = observer.resolve()?;
            let (start, config) = scan.resolve(ScanConfig::passes())?;

            let report = city_coverage(&satellites, &name, &observer, start, &config)?;
            write_json(output, &report)
        }
        Command::Cities => {
            let cities: Vec<CityEntry> = CITIES
                .iter()
                .map(|&(name, latitude, longitude)| CityEntry {
                    name,
                    latitude,
                    longitude,
                })
                .collect();
            write_json(output, &cities)
        }
    }
}
