//! IO module for format-specific reading and writing operations.
//!
//! - `csv` - tabular attribute records
//! - `geojson` - GeoJSON features (read and write)
//! - `topojson` - TopoJSON topologies (read)
//! - `svg` - SVG writers and path building for the rendered view

pub(crate) mod csv;
pub(crate) mod geojson;
pub(crate) mod svg;
pub(crate) mod topojson;

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result, bail};
use geo::MultiPolygon;
use serde_json::{Map, Value};

use crate::common;

/// A polygonal feature read from a geometry file.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct GeoFeature {
    pub(crate) properties: Map<String, Value>,
    pub(crate) geometry: MultiPolygon<f64>,
}

impl GeoFeature {
    /// The feature's `name` property, if it is a string.
    pub(crate) fn name(&self) -> Option<&str> {
        self.properties.get("name").and_then(Value::as_str)
    }
}

/// Read polygonal features from a GeoJSON or TopoJSON file.
/// For TopoJSON, `object` selects the named object (default: first in key order).
pub(crate) fn read_features(path: &Path, object: Option<&str>) -> Result<Vec<GeoFeature>> {
    common::require_file_exists(path)?;
    let file = File::open(path)
        .with_context(|| format!("[io] Failed to open geometry file: {}", path.display()))?;
    let value: Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("[io] Failed to parse JSON from {}", path.display()))?;

    features_from_value(&value, object)
        .with_context(|| format!("[io] Failed to decode geometry from {}", path.display()))
}

/// Decode polygonal features from an already-parsed GeoJSON or TopoJSON document.
pub(crate) fn features_from_value(value: &Value, object: Option<&str>) -> Result<Vec<GeoFeature>> {
    match value.get("type").and_then(Value::as_str) {
        Some("Topology") => topojson::features_from_topology(value, object),
        Some("FeatureCollection" | "Feature") => geojson::features_from_geojson(value),
        Some(other) => bail!("[io] unsupported geometry document type {other:?}"),
        None => bail!("[io] geometry document has no 'type' member"),
    }
}
