//! TopoJSON decoding: shared arcs, optional quantization, polygonal objects.

use anyhow::{Context, Result, anyhow, bail, ensure};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::{Map, Value};
use tracing::debug;

use super::{GeoFeature, geojson::parse_position};

/// Decode the polygonal geometries of one topology object into features.
/// `object` names the entry under `objects`; without it the first key is used.
pub(crate) fn features_from_topology(topology: &Value, object: Option<&str>) -> Result<Vec<GeoFeature>> {
    let objects = topology.get("objects")
        .and_then(Value::as_object)
        .ok_or_else(|| anyhow!("[io::topojson] topology has no 'objects' member"))?;

    let (name, object) = match object {
        Some(name) => (name, objects.get(name)
            .ok_or_else(|| anyhow!("[io::topojson] no object named {name:?}"))?),
        None => objects.iter().next()
            .map(|(name, object)| (name.as_str(), object))
            .ok_or_else(|| anyhow!("[io::topojson] topology has no objects"))?,
    };

    let arcs = decode_arcs(topology)?;

    let mut features = Vec::new();
    collect_features(object, &arcs, &mut features)
        .with_context(|| format!("[io::topojson] failed to decode object {name:?}"))?;

    debug!(object = name, arcs = arcs.len(), features = features.len(), "topology decoded");
    Ok(features)
}

/// Decode all arcs to absolute coordinates, undoing delta encoding when quantized.
fn decode_arcs(topology: &Value) -> Result<Vec<Vec<Coord<f64>>>> {
    let transform = match topology.get("transform") {
        Some(transform) => {
            let pair = |key: &str| -> Result<Coord<f64>> {
                transform.get(key)
                    .ok_or_else(|| anyhow!("[io::topojson] transform has no {key:?}"))
                    .and_then(parse_position)
            };
            Some((pair("scale")?, pair("translate")?))
        }
        None => None,
    };

    let arcs = topology.get("arcs")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("[io::topojson] topology has no 'arcs' array"))?;

    arcs.iter().enumerate().map(|(i, arc)| {
        let positions = arc.as_array()
            .ok_or_else(|| anyhow!("[io::topojson] arc {i} is not an array"))?;
        let mut points = Vec::with_capacity(positions.len());
        let mut cursor = Coord { x: 0.0, y: 0.0 };
        for position in positions {
            let p = parse_position(position)?;
            points.push(match transform {
                Some((scale, translate)) => {
                    cursor = Coord { x: cursor.x + p.x, y: cursor.y + p.y };
                    Coord { x: cursor.x * scale.x + translate.x, y: cursor.y * scale.y + translate.y }
                }
                None => p,
            });
        }
        Ok(points)
    }).collect()
}

/// Walk a geometry object, appending polygonal features.
fn collect_features(object: &Value, arcs: &[Vec<Coord<f64>>], out: &mut Vec<GeoFeature>) -> Result<()> {
    let properties = || object.get("properties")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    let arc_refs = || object.get("arcs")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("[io::topojson] polygonal geometry has no 'arcs'"));

    match object.get("type").and_then(Value::as_str) {
        Some("GeometryCollection") => {
            for member in object.get("geometries").and_then(Value::as_array).into_iter().flatten() {
                collect_features(member, arcs, out)?;
            }
        }
        Some("Polygon") => {
            let geometry = MultiPolygon::new(vec![polygon(arc_refs()?, arcs)?]);
            out.push(GeoFeature { properties: with_id(properties(), object), geometry });
        }
        Some("MultiPolygon") => {
            let polygons = arc_refs()?.iter()
                .map(|rings| polygon(as_array(rings)?, arcs))
                .collect::<Result<Vec<_>>>()?;
            out.push(GeoFeature { properties: with_id(properties(), object), geometry: MultiPolygon::new(polygons) });
        }
        None => {
            out.push(GeoFeature { properties: with_id(properties(), object), geometry: MultiPolygon::new(vec![]) });
        }
        Some(other) => debug!(geometry = other, "skipping non-polygonal geometry"),
    }
    Ok(())
}

/// Carry a top-level `id` into the properties when no property of that name exists.
fn with_id(mut properties: Map<String, Value>, object: &Value) -> Map<String, Value> {
    if let Some(id) = object.get("id") {
        properties.entry("id").or_insert_with(|| id.clone());
    }
    properties
}

fn as_array(value: &Value) -> Result<&Vec<Value>> {
    value.as_array().ok_or_else(|| anyhow!("[io::topojson] expected an array"))
}

/// Build a polygon from rings of arc indices.
fn polygon(rings: &[Value], arcs: &[Vec<Coord<f64>>]) -> Result<Polygon<f64>> {
    let mut rings = rings.iter().map(|ring| stitch_ring(as_array(ring)?, arcs));
    let exterior = rings.next().transpose()?.unwrap_or_else(|| LineString::new(vec![]));
    let interiors = rings.collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

/// Concatenate arcs into one ring. A negative index `i` refers to arc `!i` reversed;
/// consecutive arcs share an endpoint, which is kept once.
fn stitch_ring(indices: &[Value], arcs: &[Vec<Coord<f64>>]) -> Result<LineString<f64>> {
    let mut coords: Vec<Coord<f64>> = Vec::new();
    for index in indices {
        let index = index.as_i64().ok_or_else(|| anyhow!("[io::topojson] arc index is not an integer"))?;
        let (arc, reversed) = if index < 0 { (!index, true) } else { (index, false) };
        let arc = usize::try_from(arc).ok()
            .and_then(|i| arcs.get(i))
            .ok_or_else(|| anyhow!("[io::topojson] arc index {index} out of range"))?;
        ensure!(!arc.is_empty(), "[io::topojson] arc {index} is empty");

        let skip = usize::from(!coords.is_empty());
        if reversed {
            coords.extend(arc.iter().rev().skip(skip));
        } else {
            coords.extend(arc.iter().skip(skip));
        }
    }
    if coords.len() == 1 { bail!("[io::topojson] degenerate ring with one point") }
    Ok(LineString::new(coords))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    /// Two unit squares side by side sharing the arc x = 1.
    fn topology() -> Value {
        json!({
            "type": "Topology",
            "arcs": [
                [[1, 0], [1, 1]],
                [[1, 1], [0, 1], [0, 0], [1, 0]],
                [[1, 0], [2, 0], [2, 1], [1, 1]]
            ],
            "objects": {
                "states": {
                    "type": "GeometryCollection",
                    "geometries": [
                        { "type": "Polygon", "arcs": [[0, 1]], "properties": { "name": "West" } },
                        { "type": "Polygon", "arcs": [[2, -1]], "properties": { "name": "East" }, "id": "E" }
                    ]
                }
            }
        })
    }

    #[test]
    fn stitches_shared_arcs() {
        let features = features_from_topology(&topology(), Some("states")).unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].name(), Some("West"));

        let west = features[0].geometry.0[0].exterior();
        assert_eq!(west.0.first(), west.0.last());
        assert_eq!(west.0.len(), 5);

        let east = features[1].geometry.0[0].exterior();
        assert_eq!(east.0, vec![
            Coord { x: 1.0, y: 0.0 }, Coord { x: 2.0, y: 0.0 }, Coord { x: 2.0, y: 1.0 },
            Coord { x: 1.0, y: 1.0 }, Coord { x: 1.0, y: 0.0 },
        ]);
        assert_eq!(features[1].properties.get("id"), Some(&json!("E")));
    }

    #[test]
    fn defaults_to_first_object() {
        let features = features_from_topology(&topology(), None).unwrap();
        assert_eq!(features.len(), 2);
        assert!(features_from_topology(&topology(), Some("counties")).is_err());
    }

    #[test]
    fn applies_quantization_transform() {
        let doc = json!({
            "type": "Topology",
            "transform": { "scale": [0.5, 2.0], "translate": [10.0, 20.0] },
            "arcs": [[[0, 0], [2, 0], [0, 1], [-2, 0], [0, -1]]],
            "objects": { "box": { "type": "Polygon", "arcs": [[0]] } }
        });
        let features = features_from_topology(&doc, None).unwrap();
        let ring = &features[0].geometry.0[0].exterior().0;
        assert_eq!(ring[0], Coord { x: 10.0, y: 20.0 });
        assert_eq!(ring[1], Coord { x: 11.0, y: 20.0 });
        assert_eq!(ring[2], Coord { x: 11.0, y: 22.0 });
        assert_eq!(ring[3], Coord { x: 10.0, y: 22.0 });
    }

    #[test]
    fn bad_arc_reference_is_an_error() {
        let doc = json!({
            "type": "Topology",
            "arcs": [[[0, 0], [1, 0], [0, 0]]],
            "objects": { "x": { "type": "Polygon", "arcs": [[4]] } }
        });
        assert!(features_from_topology(&doc, None).is_err());
    }
}
