//! Path-string building for projected geometries.

use geo::{CoordsIter, LineString, MultiPolygon};

/// Build a compact SVG path string for a MultiPolygon (exteriors + holes).
pub(crate) fn multipolygon_to_path(shape: &MultiPolygon<f64>) -> String {
    let mut out = String::new();

    for polygon in &shape.0 {
        out.push_str(&ring_to_path(polygon.exterior(), true));
        for interior in polygon.interiors() {
            out.push_str(&ring_to_path(interior, true));
        }
    }

    out
}

/// Build an SVG path string for an open polyline.
pub(crate) fn linestring_to_path(line: &LineString<f64>) -> String {
    ring_to_path(line, false)
}

/// Build a compact SVG path string for a LineString, closing it with `Z` if `closed`.
fn ring_to_path(ring: &LineString<f64>, closed: bool) -> String {
    let mut out = String::new();

    let mut coords = ring.coords_iter();
    if let Some(first) = coords.next() {
        out.push_str(&format!(" M{:.3},{:.3}", first.x, first.y));
        for c in coords {
            out.push_str(&format!(" L{:.3},{:.3}", c.x, c.y));
        }
        if closed { out.push('Z') }
    }

    out
}
