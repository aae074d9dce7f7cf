use geo::{Coord, LineString, Polygon};

/// Sampling interval along graticule lines, in degrees.
const PRECISION: f64 = 2.5;

/// Latitude limit for meridians and parallels.
const LINE_EXTENT: f64 = 80.0;

/// Offset keeping the outline off the antimeridian seam.
const SEAM: f64 = 1e-6;

/// Meridians and parallels every `step` degrees, plus the globe outline,
/// laid out around a central meridian so no line crosses the projection's seam.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Graticule {
    step: f64,
    central_meridian: f64,
}

impl Graticule {
    pub fn new(step: f64, central_meridian: f64) -> Self {
        Self { step: step.max(PRECISION), central_meridian }
    }

    /// Values from `start` to `end` inclusive at `step`.
    fn range(start: f64, end: f64, step: f64) -> impl Iterator<Item = f64> {
        let n = ((end - start) / step).floor() as usize;
        (0..=n).map(move |i| start + i as f64 * step)
    }

    /// Meridians from -180 to 180 and parallels from -80 to 80, every `step` degrees.
    pub fn lines(&self) -> Vec<LineString<f64>> {
        let west = self.central_meridian - 180.0 + SEAM;
        let east = self.central_meridian + 180.0 - SEAM;

        // Wrap every meridian into (west, east); -180 and 180 coincide.
        let mut lons = Self::range(-180.0, 180.0, self.step)
            .map(|lon| west + (lon - west).rem_euclid(360.0))
            .filter(|&lon| lon > west && lon < east)
            .collect::<Vec<_>>();
        lons.sort_by(f64::total_cmp);
        lons.dedup_by(|a, b| (*a - *b).abs() < 1e-9);

        let meridians = lons.into_iter()
            .map(|lon| Self::range(-LINE_EXTENT, LINE_EXTENT, PRECISION)
                .map(|lat| Coord { x: lon, y: lat })
                .collect::<LineString<f64>>());

        let parallels = Self::range(-LINE_EXTENT, LINE_EXTENT, self.step)
            .map(|lat| Self::range(west, east, PRECISION)
                .chain(std::iter::once(east))
                .map(|lon| Coord { x: lon, y: lat })
                .collect::<LineString<f64>>());

        meridians.chain(parallels).collect()
    }

    /// Closed outline of the whole globe.
    pub fn outline(&self) -> Polygon<f64> {
        let west = self.central_meridian - 180.0 + SEAM;
        let east = self.central_meridian + 180.0 - SEAM;

        let mut ring = Vec::new();
        ring.extend(Self::range(-90.0, 90.0, PRECISION).map(|lat| Coord { x: west, y: lat }));
        ring.extend(Self::range(west, east, PRECISION).map(|lon| Coord { x: lon, y: 90.0 }));
        ring.extend(Self::range(-90.0, 90.0, PRECISION).map(|lat| Coord { x: east, y: -lat }));
        ring.extend(Self::range(west, east, PRECISION).map(|lon| Coord { x: west + east - lon, y: -90.0 }));
        Polygon::new(LineString::new(ring), vec![])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_degree_lines() {
        let graticule = Graticule::new(10.0, 0.0);
        let lines = graticule.lines();
        // 35 meridians strictly inside the seam (-170..170) and 17 parallels (-80..80).
        assert_eq!(lines.len(), 35 + 17);
        assert!(lines.iter().all(|line| line.0.len() >= 2));
    }

    #[test]
    fn lines_stay_clear_of_the_seam() {
        let graticule = Graticule::new(10.0, -96.6);
        for line in graticule.lines() {
            for c in line.0 {
                assert!(c.x > -276.6 && c.x < 83.4);
            }
        }
        // Meridians 90E..170E reappear west of the seam as -270..-190.
        let meridians = graticule.lines().iter().filter(|line| line.0[0].x == line.0[1].x).count();
        assert_eq!(meridians, 36);
    }

    #[test]
    fn outline_is_closed() {
        let outline = Graticule::new(10.0, -96.6).outline();
        let ring = &outline.exterior().0;
        assert_eq!(ring.first(), ring.last());
        assert!(ring.len() > 100);
    }
}
