//! GeoJSON decoding of polygonal features, and export of joined regions.

use anyhow::{Context, Result, anyhow, bail};
use geo::{Coord, CoordsIter, LineString, MultiPolygon, Polygon};
use serde_json::{Map, Value, json};
use tracing::debug;

use super::GeoFeature;

/// Decode a GeoJSON `FeatureCollection` (or single `Feature`) into polygonal features.
/// Features whose geometry is not polygonal are skipped; a null geometry yields an empty shape.
pub(crate) fn features_from_geojson(value: &Value) -> Result<Vec<GeoFeature>> {
    let features = match value.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => value.get("features")
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("[io::geojson] FeatureCollection has no 'features' array"))?
            .iter()
            .collect::<Vec<_>>(),
        Some("Feature") => vec![value],
        other => bail!("[io::geojson] expected Feature or FeatureCollection, found {other:?}"),
    };

    let mut out = Vec::with_capacity(features.len());
    for (i, feature) in features.into_iter().enumerate() {
        let properties = feature.get("properties")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        let geometry = match feature.get("geometry") {
            None | Some(Value::Null) => Some(MultiPolygon::new(vec![])),
            Some(geometry) => geometry_to_multipolygon(geometry)
                .with_context(|| format!("[io::geojson] bad geometry in feature {i}"))?,
        };

        match geometry {
            Some(geometry) => out.push(GeoFeature { properties, geometry }),
            None => debug!(feature = i, "skipping non-polygonal feature"),
        }
    }
    Ok(out)
}

/// Convert a GeoJSON geometry object into a MultiPolygon.
/// Returns `None` for non-polygonal geometry types.
fn geometry_to_multipolygon(geometry: &Value) -> Result<Option<MultiPolygon<f64>>> {
    let coordinates = || geometry.get("coordinates")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("[io::geojson] geometry has no 'coordinates' array"));

    match geometry.get("type").and_then(Value::as_str) {
        Some("Polygon") => Ok(Some(MultiPolygon::new(vec![parse_polygon(coordinates()?)?]))),
        Some("MultiPolygon") => {
            let polygons = coordinates()?.iter()
                .map(|polygon| {
                    let rings = polygon.as_array()
                        .ok_or_else(|| anyhow!("[io::geojson] polygon is not an array of rings"))?;
                    parse_polygon(rings)
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Some(MultiPolygon::new(polygons)))
        }
        Some("GeometryCollection") => {
            let mut polygons = Vec::new();
            for member in geometry.get("geometries").and_then(Value::as_array).into_iter().flatten() {
                if let Some(mp) = geometry_to_multipolygon(member)? { polygons.extend(mp.0) }
            }
            Ok(Some(MultiPolygon::new(polygons)))
        }
        _ => Ok(None),
    }
}

/// Parse `[[ [x, y], ... ], ...]` into a polygon (first ring exterior, rest holes).
fn parse_polygon(rings: &[Value]) -> Result<Polygon<f64>> {
    let mut rings = rings.iter().map(|ring| {
        let positions = ring.as_array()
            .ok_or_else(|| anyhow!("[io::geojson] ring is not an array of positions"))?;
        positions.iter().map(parse_position).collect::<Result<Vec<_>>>().map(LineString::new)
    });

    let exterior = rings.next().transpose()?.unwrap_or_else(|| LineString::new(vec![]));
    let interiors = rings.collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

/// Parse a `[x, y, ...]` position.
pub(crate) fn parse_position(position: &Value) -> Result<Coord<f64>> {
    let xy = position.as_array()
        .filter(|xy| xy.len() >= 2)
        .ok_or_else(|| anyhow!("[io::geojson] position must be an array of at least two numbers"))?;
    let x = xy[0].as_f64().ok_or_else(|| anyhow!("[io::geojson] non-numeric x coordinate"))?;
    let y = xy[1].as_f64().ok_or_else(|| anyhow!("[io::geojson] non-numeric y coordinate"))?;
    Ok(Coord { x, y })
}

/// Serialize a MultiPolygon as a GeoJSON geometry object.
pub(crate) fn multipolygon_to_geojson(shape: &MultiPolygon<f64>) -> Value {
    let ring = |ring: &LineString<f64>| ring.coords_iter()
        .map(|c| json!([c.x, c.y]))
        .collect::<Vec<_>>();

    let polygons = shape.0.iter()
        .map(|polygon| std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .map(ring)
            .collect::<Vec<_>>())
        .collect::<Vec<_>>();

    json!({ "type": "MultiPolygon", "coordinates": polygons })
}

/// Build a GeoJSON `Feature` value.
pub(crate) fn feature(properties: Map<String, Value>, shape: &MultiPolygon<f64>) -> Value {
    json!({
        "type": "Feature",
        "properties": properties,
        "geometry": multipolygon_to_geojson(shape),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_polygons_and_multipolygons() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "name": "Colorado" },
                    "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [4, 0], [4, 3], [0, 3], [0, 0]]] }
                },
                {
                    "type": "Feature",
                    "properties": { "name": "Hawaii" },
                    "geometry": { "type": "MultiPolygon", "coordinates": [
                        [[[0, 0], [1, 0], [1, 1], [0, 0]]],
                        [[[5, 5], [6, 5], [6, 6], [5, 5]]]
                    ] }
                },
                {
                    "type": "Feature",
                    "properties": { "name": "Capital" },
                    "geometry": { "type": "Point", "coordinates": [1, 1] }
                }
            ]
        });

        let features = features_from_geojson(&doc).unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].name(), Some("Colorado"));
        assert_eq!(features[0].geometry.0[0].exterior().0.len(), 5);
        assert_eq!(features[1].geometry.0.len(), 2);
    }

    #[test]
    fn null_geometry_keeps_the_feature() {
        let doc = json!({ "type": "Feature", "properties": { "name": "Nowhere" }, "geometry": null });
        let features = features_from_geojson(&doc).unwrap();
        assert_eq!(features.len(), 1);
        assert!(features[0].geometry.0.is_empty());
    }

    #[test]
    fn malformed_positions_are_errors() {
        let doc = json!({
            "type": "Feature",
            "properties": {},
            "geometry": { "type": "Polygon", "coordinates": [[[0, "a"], [1, 1], [0, 0]]] }
        });
        assert!(features_from_geojson(&doc).is_err());
    }

    #[test]
    fn exported_feature_reads_back() {
        let doc = json!({
            "type": "Feature",
            "properties": { "name": "Iowa" },
            "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [2, 0], [2, 1], [0, 0]]] }
        });
        let shape = &features_from_geojson(&doc).unwrap()[0];
        let exported = feature(shape.properties.clone(), &shape.geometry);
        let again = features_from_geojson(&exported).unwrap();
        assert_eq!(again[0], *shape);
    }
}
