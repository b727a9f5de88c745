//! Data loading from JSON files

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use coverage_analysis::ScanConfig;
use orbital_mechanics::Satellite;
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Raw satellite record from JSON
#[derive(Debug, Deserialize)]
struct RawSatellite {
    name: Option<String>,
    norad_id: Option<u32>,
    tle_line1: Option<String>,
    tle_line2: Option<String>,
}

/// Partial scan settings. Absent fields leave the base configuration alone.
#[derive(Debug, Default, Clone, Copy, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScanOverrides {
    pub hours: Option<f64>,
    pub step_seconds: Option<u32>,
    pub min_elevation_deg: Option<f64>,
}

impl ScanOverrides {
    pub fn apply(&self, mut config: ScanConfig) -> ScanConfig {
        if let Some(hours) = self.hours {
            config.hours = hours;
        }
        if let Some(step) = self.step_seconds {
            config.step_seconds = step;
        }
        if let Some(min_el) = self.min_elevation_deg {
            config.min_elevation_deg = min_el;
        }
        config
    }
}

fn non_empty(line: Option<String>) -> Option<String> {
    line.map(|l| l.trim_end().to_string()).filter(|l| !l.is_empty())
}

/// Load a JSON array of satellite records.
///
/// Records without a catalog number or without both element lines are
/// skipped. A missing name falls back to the catalog number.
pub fn load_satellites(path: impl AsRef<Path>) -> Result<Vec<Satellite>> {
    let path = path.as_ref();
    info!("Loading satellites from {:?}", path);

    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let records: Vec<RawSatellite> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing satellite records in {}", path.display()))?;

    let mut satellites = Vec::with_capacity(records.len());
    let mut skipped = 0;

    for (i, record) in records.into_iter().enumerate() {
        let (norad_id, line1, line2) = match (
            record.norad_id,
            non_empty(record.tle_line1),
            non_empty(record.tle_line2),
        ) {
            (Some(id), Some(l1), Some(l2)) => (id, l1, l2),
            _ => {
                debug!("record {} is missing its catalog number or element lines", i);
                skipped += 1;
                continue;
            }
        };

        let name = record
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("NORAD {}", norad_id));

        satellites.push(Satellite::new(name, norad_id, line1, line2));
    }

    if skipped > 0 {
        warn!("Skipped {} incomplete satellite records", skipped);
    }
    info!("Loaded {} satellites", satellites.len());

    Ok(satellites)
}

/// Load scan settings from a JSON object such as `{"hours": 6, "step_seconds": 10}`.
pub fn load_scan_overrides(path: impl AsRef<Path>) -> Result<ScanOverrides> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing scan settings in {}", path.display()))
}
