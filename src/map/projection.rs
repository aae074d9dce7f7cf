use anyhow::{Context, Result, anyhow};
use geo::{BoundingRect, Coord, LineString, MultiPolygon, Polygon, Rect};
use proj4rs::{proj::Proj as Proj4, transform::transform};
use serde::{Deserialize, Serialize};

/// Geographic source CRS on the unit sphere (degrees → radians handled in code).
const LONLAT_PROJ4: &str = "+proj=longlat +a=1 +b=1 +no_defs";

/// Conic equal-area projection for the contiguous United States on the unit sphere.
const ALBERS_USA_PROJ4: &str = "+proj=aea +lat_1=29.5 +lat_2=45.5 +lat_0=38.7 +lon_0=-96.6 +x_0=0 +y_0=0 +a=1 +b=1 +no_defs";

/// Longitude at the centre of the Albers projection.
const ALBERS_CENTRAL_MERIDIAN: f64 = -96.6;

/// How lon/lat coordinates are placed on the map surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Projection {
    /// Albers equal-area conic, `scale` pixels per unit-sphere radian, centred on the map.
    Albers { scale: f64 },
    /// Linear lon/lat scaling that fits the regions' bounds inside the map with a margin.
    Fit { margin: f64 },
}

impl Default for Projection {
    fn default() -> Self { Projection::Albers { scale: 850.0 } }
}

enum Kind {
    Albers { from: Proj4, to: Proj4, scale: f64 },
    Fit { bounds: Rect<f64>, scale: f64 },
}

/// Projection function: lon/lat -> map pixel coords (x right, y down).
pub struct Projector {
    kind: Kind,
    width: f64,
    height: f64,
}

impl Projector {
    /// Build a projector for a `width` × `height` map. `bounds` (lon/lat) are only used
    /// by `Projection::Fit`; without bounds it falls back to the whole globe.
    pub fn new(projection: Projection, width: f64, height: f64, bounds: Option<Rect<f64>>) -> Result<Self> {
        let kind = match projection {
            Projection::Albers { scale } => {
                let from = Proj4::from_proj_string(LONLAT_PROJ4)
                    .map_err(|e| anyhow!("[map::projection] failed to build source PROJ.4 ({e:?}): {LONLAT_PROJ4}"))?;
                let to = Proj4::from_proj_string(ALBERS_USA_PROJ4)
                    .map_err(|e| anyhow!("[map::projection] failed to build target PROJ.4 ({e:?}): {ALBERS_USA_PROJ4}"))?;
                Kind::Albers { from, to, scale }
            }
            Projection::Fit { margin } => {
                let bounds = bounds.unwrap_or_else(|| Rect::new(Coord { x: -180.0, y: -90.0 }, Coord { x: 180.0, y: 90.0 }));
                let span_x = bounds.width().max(f64::EPSILON);
                let span_y = bounds.height().max(f64::EPSILON);
                let scale = ((width - 2.0 * margin) / span_x).min((height - 2.0 * margin) / span_y).max(0.0);
                Kind::Fit { bounds, scale }
            }
        };
        Ok(Self { kind, width, height })
    }

    /// Longitude the projection is centred on.
    pub fn central_meridian(&self) -> f64 {
        match &self.kind {
            Kind::Albers { .. } => ALBERS_CENTRAL_MERIDIAN,
            Kind::Fit { bounds, .. } => bounds.center().x,
        }
    }

    /// Project one lon/lat coordinate (degrees) to map pixels.
    pub fn project(&self, coord: Coord<f64>) -> Result<Coord<f64>> {
        let (cx, cy) = (self.width / 2.0, self.height / 2.0);
        match &self.kind {
            Kind::Albers { from, to, scale } => {
                let mut point = (coord.x.to_radians(), coord.y.to_radians(), 0.0);
                transform(from, to, &mut point)
                    .map_err(|e| anyhow!("[map::projection] CRS transform failed at ({}, {}): {e:?}", coord.x, coord.y))?;
                Ok(Coord { x: cx + point.0 * scale, y: cy - point.1 * scale })
            }
            Kind::Fit { bounds, scale } => {
                // Centre the fitted bounds, Y inverted.
                let center = bounds.center();
                Ok(Coord { x: cx + (coord.x - center.x) * scale, y: cy - (coord.y - center.y) * scale })
            }
        }
    }

    pub fn project_linestring(&self, line: &LineString<f64>) -> Result<LineString<f64>> {
        line.0.iter().map(|&c| self.project(c)).collect::<Result<Vec<_>>>().map(LineString::new)
    }

    pub fn project_multipolygon(&self, shape: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>> {
        shape.0.iter()
            .map(|polygon| Ok(Polygon::new(
                self.project_linestring(polygon.exterior())?,
                polygon.interiors().iter().map(|ring| self.project_linestring(ring)).collect::<Result<Vec<_>>>()?,
            )))
            .collect::<Result<Vec<_>>>()
            .map(MultiPolygon::new)
            .context("[map::projection] failed to project shape")
    }
}

/// Bounding rectangle of a set of shapes, if any has coordinates.
pub(crate) fn bounds_of<'a>(shapes: impl IntoIterator<Item = &'a MultiPolygon<f64>>) -> Option<Rect<f64>> {
    shapes.into_iter()
        .filter_map(|shape| shape.bounding_rect())
        .reduce(|a, b| Rect::new(
            Coord { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
            Coord { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
        ))
}

#[cfg(test)]
mod tests {
    use geo::polygon;

    use super::*;

    #[test]
    fn albers_centre_maps_to_map_centre() {
        let projector = Projector::new(Projection::Albers { scale: 850.0 }, 600.0, 500.0, None).unwrap();
        let c = projector.project(Coord { x: -96.6, y: 38.7 }).unwrap();
        assert!((c.x - 300.0).abs() < 1e-6);
        assert!((c.y - 250.0).abs() < 1e-6);
    }

    #[test]
    fn albers_keeps_orientation() {
        let projector = Projector::new(Projection::default(), 600.0, 500.0, None).unwrap();
        let west = projector.project(Coord { x: -120.0, y: 38.7 }).unwrap();
        let north = projector.project(Coord { x: -96.6, y: 48.0 }).unwrap();
        assert!(west.x < 300.0);
        assert!(north.y < 250.0);
    }

    #[test]
    fn fit_places_bounds_inside_margins() {
        let shape = MultiPolygon::new(vec![polygon![(x: -10.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 5.0), (x: -10.0, y: 5.0)]]);
        let bounds = bounds_of([&shape]);
        let projector = Projector::new(Projection::Fit { margin: 10.0 }, 220.0, 120.0, bounds).unwrap();

        let projected = projector.project_multipolygon(&shape).unwrap();
        let rect = projected.bounding_rect().unwrap();
        assert!((rect.min().x - 10.0).abs() < 1e-9);
        assert!((rect.max().x - 210.0).abs() < 1e-9);
        assert!((rect.height() - 50.0).abs() < 1e-9);
        assert_eq!(projector.central_meridian(), 0.0);
    }

    #[test]
    fn bounds_of_nothing_is_none() {
        assert!(bounds_of(std::iter::empty()).is_none());
    }
}
