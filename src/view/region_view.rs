use std::{cmp::Ordering, time::Duration};

use anyhow::Result;
use geo::{Coord, MultiPolygon};
use tracing::debug;

use crate::{
    attr::{Attribute, AttributeValues, Record},
    classify::ClassificationScheme,
    common::Rgb,
    config::{ChartConfig, MapConfig, Outline, TimingConfig, ViewConfig},
    io::svg::{linestring_to_path, multipolygon_to_path},
    map::{Graticule, Projector, RegionShape},
};

use super::{Animated, Interpolate, hit::HitIndex};

/// Pixel rectangle of one bar, in chart coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BarGeometry {
    /// Bottom edge; stays on the chart baseline for every value.
    #[inline] pub fn bottom(&self) -> f64 { self.y + self.height }

    /// True if `point` lies inside the rectangle (negative heights extend downward).
    pub fn contains(&self, point: Coord<f64>) -> bool {
        let (top, bottom) = if self.height >= 0.0 { (self.y, self.bottom()) } else { (self.bottom(), self.y) };
        point.x >= self.x && point.x <= self.x + self.width && point.y >= top && point.y <= bottom
    }
}

impl Interpolate for BarGeometry {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        BarGeometry {
            x: self.x.interpolate(&to.x, t),
            y: self.y.interpolate(&to.y, t),
            width: self.width.interpolate(&to.width, t),
            height: self.height.interpolate(&to.height, t),
        }
    }
}

/// Linear bar scale over the chart's fixed value domain. Values outside the
/// domain are not clamped.
#[derive(Clone, Debug, PartialEq)]
pub struct BarScale {
    chart: ChartConfig,
}

impl BarScale {
    pub fn new(chart: ChartConfig) -> Self { Self { chart } }

    /// Map a value onto the pixel range.
    pub fn y(&self, value: f64) -> f64 {
        let [d0, d1] = self.chart.domain;
        let [r0, r1] = self.chart.range;
        if d1 == d0 { return r0 }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Chart baseline every bar stands on.
    #[inline] pub fn baseline(&self) -> f64 { self.chart.height - self.chart.top_bottom_padding }

    /// Rectangle for the bar at `rank` (0 = leftmost) of `count`.
    /// Invalid values get a zero-height bar on the baseline.
    pub fn geometry(&self, rank: usize, count: usize, value: Option<f64>) -> BarGeometry {
        let slot = self.chart.inner_width() / count.max(1) as f64;
        let x = rank as f64 * slot + self.chart.left_padding;
        let width = (slot - self.chart.gutter).max(0.0);
        match value {
            Some(v) => {
                let y = self.y(v);
                BarGeometry { x, y: y - self.chart.top_bottom_padding, width, height: self.chart.height - y }
            }
            None => BarGeometry { x, y: self.baseline(), width, height: 0.0 },
        }
    }
}

/// A region shape drawn on the map.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionElement {
    pub name: String,
    pub values: AttributeValues,
    /// Projected geometry, in map pixels.
    pub shape: MultiPolygon<f64>,
    pub path: String,
    pub fill: Animated<Rgb>,
    /// Outline captured when the element was drawn.
    pub default_outline: Outline,
    pub outline: Outline,
}

/// A bar drawn on the chart.
#[derive(Clone, Debug, PartialEq)]
pub struct BarElement {
    pub name: String,
    pub values: AttributeValues,
    /// Position of the source record, used to order equal values.
    pub source_index: usize,
    pub geometry: Animated<BarGeometry>,
    pub fill: Animated<Rgb>,
    /// Outline captured when the element was drawn.
    pub default_outline: Outline,
    pub outline: Outline,
}

/// Context layers drawn beneath the regions, as SVG path strings.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ContextLayers {
    pub(crate) graticule_outline: Option<String>,
    pub(crate) graticule_lines: Vec<String>,
    pub(crate) countries: Option<String>,
}

/// Map regions and chart bars for the selected attribute.
///
/// Fill colors and bar rectangles are always recomputed from the element's
/// values, the attribute and the scheme passed to `update`; targets are
/// applied immediately and transitions only animate toward them.
pub struct RegionView {
    map: MapConfig,
    chart: ChartConfig,
    timing: TimingConfig,
    scale: BarScale,
    attribute: Attribute,
    revision: u64,
    context: ContextLayers,
    regions: Vec<RegionElement>,
    /// In display order: index is the bar's rank from the left.
    bars: Vec<BarElement>,
    hit: HitIndex,
}

impl RegionView {
    pub fn new(config: &ViewConfig, attribute: Attribute) -> Self {
        Self {
            map: config.map.clone(),
            chart: config.chart.clone(),
            timing: config.timing.clone(),
            scale: BarScale::new(config.chart.clone()),
            attribute,
            revision: 0,
            context: ContextLayers::default(),
            regions: Vec::new(),
            bars: Vec::new(),
            hit: HitIndex::default(),
        }
    }

    #[inline] pub fn attribute(&self) -> Attribute { self.attribute }

    /// State revision the view was last updated for.
    #[inline] pub fn revision(&self) -> u64 { self.revision }

    #[inline] pub fn regions(&self) -> &[RegionElement] { &self.regions }

    /// Bars in display order, leftmost first.
    #[inline] pub fn bars(&self) -> &[BarElement] { &self.bars }

    #[inline] pub fn map_config(&self) -> &MapConfig { &self.map }

    #[inline] pub fn chart_config(&self) -> &ChartConfig { &self.chart }

    #[inline] pub fn scale(&self) -> &BarScale { &self.scale }

    #[inline] pub(crate) fn context(&self) -> &ContextLayers { &self.context }

    /// Names of the bars, leftmost first.
    pub fn bar_order(&self) -> Vec<&str> { self.bars.iter().map(|bar| bar.name.as_str()).collect() }

    /// Chart title for the selected attribute.
    pub fn title(&self) -> String { format!("{} by State", self.attribute) }

    /// Top-left corner of the chart surface in document coordinates.
    pub fn chart_origin(&self) -> Coord<f64> { Coord { x: self.map.width, y: 0.0 } }

    /// Draw the graticule and the country outlines beneath the regions.
    pub fn draw_context(&mut self, countries: &[MultiPolygon<f64>], projector: &Projector) -> Result<()> {
        let mut context = ContextLayers::default();

        if let Some(step) = self.map.graticule_step {
            let graticule = Graticule::new(step, projector.central_meridian());
            let outline = MultiPolygon::new(vec![graticule.outline()]);
            context.graticule_outline = Some(multipolygon_to_path(&projector.project_multipolygon(&outline)?));
            context.graticule_lines = graticule.lines().iter()
                .map(|line| projector.project_linestring(line).map(|line| linestring_to_path(&line)))
                .collect::<Result<Vec<_>>>()?;
        }

        if !countries.is_empty() {
            let mut path = String::new();
            for country in countries {
                path.push_str(&multipolygon_to_path(&projector.project_multipolygon(country)?));
            }
            context.countries = Some(path);
        }

        self.context = context;
        Ok(())
    }

    /// Draw one element per region, filled by classifying its value of the scheme's attribute.
    pub fn draw_map(&mut self, shapes: &[RegionShape], projector: &Projector, scheme: &ClassificationScheme) -> Result<()> {
        let attribute = scheme.attribute();
        self.regions = shapes.iter()
            .map(|shape| {
                let projected = projector.project_multipolygon(&shape.geometry)?;
                Ok(RegionElement {
                    name: shape.name.clone(),
                    values: shape.values,
                    path: multipolygon_to_path(&projected),
                    shape: projected,
                    fill: Animated::new(scheme.fill(shape.value(attribute))),
                    default_outline: self.map.region_outline,
                    outline: self.map.region_outline,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        self.hit = HitIndex::new(self.regions.iter().map(|region| &region.shape));
        self.attribute = attribute;
        debug!(regions = self.regions.len(), attribute = %attribute, "map drawn");
        Ok(())
    }

    /// Draw one bar per record, sorted descending by the scheme's attribute.
    pub fn draw_chart(&mut self, records: &[Record], scheme: &ClassificationScheme) {
        let attribute = scheme.attribute();
        let outline = self.chart.bar_outline;
        self.bars = records.iter().enumerate()
            .map(|(source_index, record)| BarElement {
                name: record.name.clone(),
                values: record.values,
                source_index,
                geometry: Animated::new(BarGeometry { x: 0.0, y: 0.0, width: 0.0, height: 0.0 }),
                fill: Animated::new(scheme.fill(record.value(attribute))),
                default_outline: outline,
                outline,
            })
            .collect();

        sort_bars(&mut self.bars, attribute);
        let count = self.bars.len();
        for (rank, bar) in self.bars.iter_mut().enumerate() {
            bar.geometry = Animated::new(self.scale.geometry(rank, count, bar.values.get(attribute)));
        }

        self.attribute = attribute;
        debug!(bars = count, attribute = %attribute, "chart drawn");
    }

    /// Recompute every fill, bar rectangle and bar position for `attribute`,
    /// animating from what is displayed at `now`. `revision` records which
    /// state change this update applies.
    pub fn update(&mut self, attribute: Attribute, scheme: &ClassificationScheme, revision: u64, now: Duration) {
        debug_assert_eq!(attribute, scheme.attribute(), "scheme built for a different attribute");

        for region in &mut self.regions {
            let fill = scheme.fill(region.values.get(attribute));
            region.fill.animate_to(fill, now, Duration::ZERO, self.timing.region());
        }

        sort_bars(&mut self.bars, attribute);
        let count = self.bars.len();
        for (rank, bar) in self.bars.iter_mut().enumerate() {
            let value = bar.values.get(attribute);
            let delay = self.timing.bar_delay(rank);
            bar.fill.animate_to(scheme.fill(value), now, delay, self.timing.bar());
            bar.geometry.animate_to(self.scale.geometry(rank, count, value), now, delay, self.timing.bar());
        }

        self.attribute = attribute;
        self.revision = revision;
        debug!(attribute = %attribute, revision, "view updated");
    }

    /// Complete all transitions.
    pub fn settle(&mut self) {
        for region in &mut self.regions { region.fill.settle() }
        for bar in &mut self.bars {
            bar.fill.settle();
            bar.geometry.settle();
        }
    }

    /// True when no element is animating at `now`.
    pub fn is_settled(&self, now: Duration) -> bool {
        self.regions.iter().all(|region| region.fill.is_settled(now))
            && self.bars.iter().all(|bar| bar.fill.is_settled(now) && bar.geometry.is_settled(now))
    }

    /// Values of the element named `name`, from the map or else the chart.
    pub fn values_of(&self, name: &str) -> Option<AttributeValues> {
        self.regions.iter().find(|region| region.name == name).map(|region| region.values)
            .or_else(|| self.bars.iter().find(|bar| bar.name == name).map(|bar| bar.values))
    }

    /// Apply `outline` to every element named `name`; returns how many matched.
    pub fn set_outline(&mut self, name: &str, outline: Outline) -> usize {
        let mut count = 0;
        for region in self.regions.iter_mut().filter(|region| region.name == name) {
            region.outline = outline;
            count += 1;
        }
        for bar in self.bars.iter_mut().filter(|bar| bar.name == name) {
            bar.outline = outline;
            count += 1;
        }
        count
    }

    /// Restore every element named `name` to the outline it was drawn with.
    pub fn restore_outline(&mut self, name: &str) -> usize {
        let mut count = 0;
        for region in self.regions.iter_mut().filter(|region| region.name == name) {
            region.outline = region.default_outline;
            count += 1;
        }
        for bar in self.bars.iter_mut().filter(|bar| bar.name == name) {
            bar.outline = bar.default_outline;
            count += 1;
        }
        count
    }

    /// Name of the region under `point` (map pixels).
    pub fn region_at(&self, point: Coord<f64>) -> Option<&str> {
        self.hit.locate(point, |idx| &self.regions[idx].shape).map(|idx| self.regions[idx].name.as_str())
    }

    /// Name of the bar under `point` (chart pixels), using final bar positions.
    pub fn bar_at(&self, point: Coord<f64>) -> Option<&str> {
        self.bars.iter()
            .find(|bar| bar.geometry.target().contains(point))
            .map(|bar| bar.name.as_str())
    }

    /// Name of the element under `point` in document coordinates (map, then chart).
    pub fn element_at(&self, point: Coord<f64>) -> Option<&str> {
        if point.x < self.map.width && point.y < self.map.height {
            return self.region_at(point)
        }
        let origin = self.chart_origin();
        let local = Coord { x: point.x - origin.x, y: point.y - origin.y };
        if local.x >= 0.0 && local.x <= self.chart.width && local.y >= 0.0 && local.y <= self.chart.height {
            return self.bar_at(local)
        }
        None
    }
}

/// Order bars by descending value of `attribute`; invalid values last, ties by source order.
fn sort_bars(bars: &mut [BarElement], attribute: Attribute) {
    bars.sort_by(|a, b| {
        let by_value = match (a.values.get(attribute), b.values.get(attribute)) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_value.then(a.source_index.cmp(&b.source_index))
    });
}
