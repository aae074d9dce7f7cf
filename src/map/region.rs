use std::path::Path;

use anyhow::{Context, Result};
use geo::MultiPolygon;
use serde_json::{Map, Value, json};
use tracing::warn;

use crate::{attr::{Attribute, AttributeValues}, io::{self, GeoFeature}};

/// A region's geometry keyed by `name`, carrying attribute values once joined.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionShape {
    pub name: String,
    pub geometry: MultiPolygon<f64>,
    /// Source properties other than attribute values.
    pub properties: Map<String, Value>,
    /// Attribute values copied from the matching record; all invalid before a join.
    pub values: AttributeValues,
}

impl RegionShape {
    pub fn new(name: impl Into<String>, geometry: MultiPolygon<f64>) -> Self {
        Self { name: name.into(), geometry, properties: Map::new(), values: AttributeValues::empty() }
    }

    #[inline] pub fn value(&self, attr: Attribute) -> Option<f64> { self.values.get(attr) }

    /// Read region shapes from a GeoJSON or TopoJSON file.
    /// Features without a string `name` property are skipped.
    pub fn read(path: &Path, object: Option<&str>) -> Result<Vec<Self>> {
        let features = io::read_features(path, object)?;
        Ok(Self::from_features(features))
    }

    /// Read region shapes from GeoJSON or TopoJSON text.
    pub fn read_str(json: &str, object: Option<&str>) -> Result<Vec<Self>> {
        let value: Value = serde_json::from_str(json).context("[map::region] invalid JSON")?;
        Ok(Self::from_features(io::features_from_value(&value, object)?))
    }

    fn from_features(features: Vec<GeoFeature>) -> Vec<Self> {
        features.into_iter()
            .filter_map(|feature| {
                let Some(name) = feature.name().map(str::to_string) else {
                    warn!(properties = ?feature.properties, "skipping region without a name");
                    return None
                };
                Some(Self { name, geometry: feature.geometry, properties: feature.properties, values: AttributeValues::empty() })
            })
            .collect()
    }

    /// Export as a GeoJSON feature with every attribute value as a property (null when invalid).
    pub fn to_geojson(&self) -> Value {
        let mut properties = self.properties.clone();
        properties.insert("name".to_string(), json!(self.name));
        for (attr, value) in self.values.iter() {
            properties.insert(attr.name().to_string(), value.map_or(Value::Null, |v| json!(v)));
        }
        io::geojson::feature(properties, &self.geometry)
    }
}

/// Export regions as a GeoJSON FeatureCollection.
pub fn regions_to_geojson(regions: &[RegionShape]) -> Value {
    json!({
        "type": "FeatureCollection",
        "features": regions.iter().map(RegionShape::to_geojson).collect::<Vec<_>>(),
    })
}

/// Read country outlines (context only, no attributes) from a GeoJSON or TopoJSON file.
pub fn read_outlines(path: &Path, object: Option<&str>) -> Result<Vec<MultiPolygon<f64>>> {
    Ok(io::read_features(path, object)?.into_iter().map(|feature| feature.geometry).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "properties": { "name": "Texas", "postal": "TX" },
              "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]] } },
            { "type": "Feature", "properties": { "postal": "??" },
              "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]] } }
        ]
    }"#;

    #[test]
    fn unnamed_features_are_skipped() {
        let regions = RegionShape::read_str(STATES, None).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].name, "Texas");
        assert_eq!(regions[0].properties.get("postal"), Some(&json!("TX")));
        assert!(!regions[0].values.any_valid());
    }

    #[test]
    fn geojson_export_includes_attribute_properties() {
        let mut region = RegionShape::read_str(STATES, None).unwrap().remove(0);
        region.values.set(Attribute::Cost, Some(91.6));

        let feature = region.to_geojson();
        assert_eq!(feature["properties"]["Cost Index"], json!(91.6));
        assert_eq!(feature["properties"]["Housing Cost Index"], Value::Null);
        assert_eq!(feature["properties"]["postal"], json!("TX"));

        let collection = regions_to_geojson(&[region]);
        assert_eq!(collection["features"].as_array().map(Vec::len), Some(1));
    }
}
