//! View configuration: layout, palette, outlines, timing and label placement.

use std::{fs::File, io::BufReader, path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{classify::Palette, common::{self, Rgb}, map::Projection};

/// Stroke style of a drawn element; `stroke: None` renders as `none`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    pub stroke: Option<Rgb>,
    pub width: f64,
}

impl Outline {
    pub const fn new(stroke: Option<Rgb>, width: f64) -> Self { Self { stroke, width } }

    /// SVG attributes for this outline.
    pub fn svg_attrs(&self) -> String {
        match self.stroke {
            Some(color) => format!(r#"stroke="{color}" stroke-width="{}""#, self.width),
            None => format!(r#"stroke="none" stroke-width="{}""#, self.width),
        }
    }
}

/// Map surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub width: f64,
    pub height: f64,
    pub projection: Projection,
    /// Graticule spacing in degrees; `None` disables the graticule.
    pub graticule_step: Option<f64>,
    pub region_outline: Outline,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 500.0,
            projection: Projection::default(),
            graticule_step: Some(10.0),
            region_outline: Outline::new(Some(Rgb::new(0xff, 0xff, 0xff)), 0.25),
        }
    }
}

/// Bar chart surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
    pub left_padding: f64,
    pub right_padding: f64,
    pub top_bottom_padding: f64,
    /// Horizontal gap subtracted from each bar's slot width.
    pub gutter: f64,
    /// Fixed value domain of the bar scale.
    pub domain: [f64; 2],
    /// Pixel range the domain maps onto (first entry for `domain[0]`).
    pub range: [f64; 2],
    /// Spacing of the value axis ticks.
    pub tick_step: f64,
    pub bar_outline: Outline,
    /// Source attribution lines drawn beneath the chart.
    pub caption: Vec<String>,
}

impl ChartConfig {
    #[inline] pub fn inner_width(&self) -> f64 { self.width - self.left_padding - self.right_padding }

    #[inline] pub fn inner_height(&self) -> f64 { self.height - self.top_bottom_padding * 2.0 }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 816.0,
            height: 450.0,
            left_padding: 25.0,
            right_padding: 2.0,
            top_bottom_padding: 3.0,
            gutter: 1.0,
            domain: [0.0, 200.0],
            range: [463.0, 0.0],
            tick_step: 20.0,
            bar_outline: Outline::new(None, 0.0),
            caption: vec![
                "For more information about the 2019 Cost of Living Index, visit".to_string(),
                "http://worldpopulationreview.com/states/cost-of-living-index-by-state/".to_string(),
            ],
        }
    }
}

/// Transition timing, in milliseconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub region_ms: u64,
    pub bar_ms: u64,
    pub bar_stagger_ms: u64,
}

impl TimingConfig {
    #[inline] pub fn region(&self) -> Duration { Duration::from_millis(self.region_ms) }
    #[inline] pub fn bar(&self) -> Duration { Duration::from_millis(self.bar_ms) }
    #[inline] pub fn bar_delay(&self, rank: usize) -> Duration { Duration::from_millis(self.bar_stagger_ms * rank as u64) }
}

impl Default for TimingConfig {
    fn default() -> Self { Self { region_ms: 1000, bar_ms: 500, bar_stagger_ms: 20 } }
}

/// Hover highlight and floating label placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub highlight: Outline,
    /// Viewport the label must stay inside.
    pub viewport: [f64; 2],
    /// Offset right of the pointer in the default position.
    pub offset_x: f64,
    /// Offset above the pointer in the default position.
    pub offset_above: f64,
    /// Offset below the pointer when flipped down.
    pub offset_below: f64,
    /// Extra clearance kept from the right edge.
    pub right_clearance: f64,
    /// Pointer distance from the top edge below which the label flips down.
    pub top_threshold: f64,
    /// Approximate glyph advance used to size the label, in px.
    pub glyph_width: f64,
    pub padding: f64,
    pub line_height: f64,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            highlight: Outline::new(Some(Rgb::new(0xfe, 0xd9, 0x76)), 2.0),
            viewport: [1920.0, 1080.0],
            offset_x: 10.0,
            offset_above: 50.0,
            offset_below: 25.0,
            right_clearance: 20.0,
            top_threshold: 50.0,
            glyph_width: 8.0,
            padding: 10.0,
            line_height: 20.0,
        }
    }
}

/// All view parameters. Every field has a default; a JSON file may override any subset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub map: MapConfig,
    pub chart: ChartConfig,
    pub palette: Palette,
    pub timing: TimingConfig,
    pub label: LabelConfig,
}

impl ViewConfig {
    /// Load a configuration from a JSON file, filling unspecified fields with defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        common::require_file_exists(path)?;
        let file = File::open(path)
            .with_context(|| format!("[config] Failed to open {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("[config] Failed to parse {}", path.display()))
    }

    /// Parse a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("[config] Failed to parse configuration")
    }
}
