use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use geo::MultiPolygon;
use tracing::info;

use crate::{attr::Record, io, map::{RegionShape, read_outlines}};

/// Read attribute records from a CSV file with a `name` column.
pub fn read_records(path: &Path) -> Result<Vec<Record>> {
    io::csv::read_records(path)
}

/// Parse attribute records from CSV text.
pub fn read_records_str(csv: &str) -> Result<Vec<Record>> {
    io::csv::read_records_str(csv)
}

/// Input files for a session.
#[derive(Clone, Debug, Default)]
pub struct Sources {
    /// CSV of attribute records.
    pub data: PathBuf,
    /// GeoJSON or TopoJSON of the region shapes.
    pub states: PathBuf,
    /// TopoJSON object holding the regions (defaults to the first object).
    pub states_object: Option<String>,
    /// Optional context outlines drawn beneath the regions.
    pub countries: Option<PathBuf>,
    pub countries_object: Option<String>,
}

impl Sources {
    pub fn new(data: impl Into<PathBuf>, states: impl Into<PathBuf>) -> Self {
        Self { data: data.into(), states: states.into(), ..Self::default() }
    }

    pub fn with_countries(mut self, countries: impl Into<PathBuf>) -> Self {
        self.countries = Some(countries.into());
        self
    }
}

/// Everything loaded from [`Sources`], before joining.
#[derive(Clone, Debug)]
pub struct Dataset {
    pub records: Vec<Record>,
    pub regions: Vec<RegionShape>,
    pub countries: Vec<MultiPolygon<f64>>,
}

impl Dataset {
    /// Load all sources concurrently. Fails if any one of them fails; no partial dataset is returned.
    pub fn load(sources: &Sources) -> Result<Self> {
        let (records, (regions, countries)) = rayon::join(
            || read_records(&sources.data),
            || rayon::join(
                || RegionShape::read(&sources.states, sources.states_object.as_deref()),
                || match &sources.countries {
                    Some(path) => read_outlines(path, sources.countries_object.as_deref()),
                    None => Ok(Vec::new()),
                },
            ),
        );

        let records = records
            .with_context(|| format!("[session::load] Failed to load records from {}", sources.data.display()))?;
        let regions = regions
            .with_context(|| format!("[session::load] Failed to load regions from {}", sources.states.display()))?;
        let countries = countries.context("[session::load] Failed to load country outlines")?;

        info!(records = records.len(), regions = regions.len(), countries = countries.len(), "dataset loaded");
        Ok(Self { records, regions, countries })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const CSV: &str = "name,Cost Index\nTexas,91.6\n";
    const STATES: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"name":"Texas"},
         "geometry":{"type":"Polygon","coordinates":[[[-100,30],[-95,30],[-95,35],[-100,30]]]}}]}"#;

    #[test]
    fn loads_all_sources() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("data.csv"), CSV).unwrap();
        fs::write(dir.path().join("states.json"), STATES).unwrap();
        fs::write(dir.path().join("countries.json"), STATES).unwrap();

        let sources = Sources::new(dir.path().join("data.csv"), dir.path().join("states.json"))
            .with_countries(dir.path().join("countries.json"));
        let dataset = Dataset::load(&sources).unwrap();
        assert_eq!(dataset.records.len(), 1);
        assert_eq!(dataset.regions.len(), 1);
        assert_eq!(dataset.countries.len(), 1);
    }

    #[test]
    fn any_missing_source_fails_the_load() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("data.csv"), CSV).unwrap();
        fs::write(dir.path().join("states.json"), STATES).unwrap();

        let missing_states = Sources::new(dir.path().join("data.csv"), dir.path().join("nope.json"));
        assert!(Dataset::load(&missing_states).is_err());

        let missing_countries = Sources::new(dir.path().join("data.csv"), dir.path().join("states.json"))
            .with_countries(dir.path().join("nope.json"));
        assert!(Dataset::load(&missing_countries).is_err());
    }
}
