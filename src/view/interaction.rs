use geo::Coord;
use tracing::debug;

use crate::config::LabelConfig;

use super::{RegionView, ViewState};

/// Region names use `_` between words.
pub fn format_name(name: &str) -> String { name.replace('_', " ") }

/// Label text for a value; invalid values read "No data".
pub fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v}"),
        None => "No data".to_string(),
    }
}

/// Where the label sits relative to the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quadrant {
    UpperRight,
    UpperLeft,
    LowerRight,
    LowerLeft,
}

/// The floating label shown while a region is hovered.
#[derive(Clone, Debug, PartialEq)]
pub struct InfoLabel {
    pub id: String,
    /// Region the label describes.
    pub region: String,
    /// Selected-attribute value, formatted.
    pub title: String,
    /// Formatted region name.
    pub body: String,
    pub width: f64,
    pub height: f64,
    /// Top-left corner in viewport coordinates.
    pub position: Coord<f64>,
    pub quadrant: Quadrant,
}

/// Hover handling shared by the map and the chart. Elements are linked only by
/// name, and every hover reads the selected attribute from the current state.
#[derive(Clone, Debug)]
pub struct InteractionController {
    config: LabelConfig,
    hovered: Option<String>,
    label: Option<InfoLabel>,
    /// Last pointer position seen, in viewport coordinates.
    pointer: Option<Coord<f64>>,
}

impl InteractionController {
    pub fn new(config: LabelConfig) -> Self {
        Self { config, hovered: None, label: None, pointer: None }
    }

    #[inline] pub fn hovered(&self) -> Option<&str> { self.hovered.as_deref() }

    #[inline] pub fn label(&self) -> Option<&InfoLabel> { self.label.as_ref() }

    /// Highlight every element named `name` and show its label.
    /// Returns the number of highlighted elements (0 if the name is unknown).
    pub fn on_hover_enter(&mut self, view: &mut RegionView, state: &ViewState, name: &str) -> usize {
        if let Some(previous) = self.hovered.clone().filter(|previous| previous != name) {
            self.on_hover_exit(view, &previous);
        }

        let Some(values) = view.values_of(name) else { return 0 };
        let count = view.set_outline(name, self.config.highlight);

        let mut label = InfoLabel {
            id: format!("{name}_label"),
            region: name.to_string(),
            title: format_value(values.get(state.get())),
            body: format_name(name),
            width: 0.0,
            height: 0.0,
            position: Coord { x: 0.0, y: 0.0 },
            quadrant: Quadrant::UpperRight,
        };
        self.fit(&mut label);
        self.label = Some(label);
        self.hovered = Some(name.to_string());
        debug!(region = name, elements = count, "hover enter");
        count
    }

    /// Restore each element named `name` to its own default outline and remove the label.
    pub fn on_hover_exit(&mut self, view: &mut RegionView, name: &str) {
        view.restore_outline(name);
        if self.hovered.as_deref() == Some(name) {
            self.hovered = None;
        }
        if self.label.as_ref().is_some_and(|label| label.region == name) {
            self.label = None;
        }
        debug!(region = name, "hover exit");
    }

    /// Place the label next to `pointer` (viewport coordinates), flipping left near the
    /// right edge and below the pointer near the top edge.
    pub fn on_move(&mut self, pointer: Coord<f64>) {
        self.pointer = Some(pointer);
        if let Some(mut label) = self.label.take() {
            self.place(&mut label, pointer);
            self.label = Some(label);
        }
    }

    /// Size `label` for its text and, if the pointer has been seen, place it.
    fn fit(&self, label: &mut InfoLabel) {
        let chars = label.title.chars().count().max(label.body.chars().count()) as f64;
        label.width = chars * self.config.glyph_width + 2.0 * self.config.padding;
        label.height = 2.0 * self.config.line_height + 2.0 * self.config.padding;
        if let Some(pointer) = self.pointer {
            self.place(label, pointer);
        }
    }

    fn place(&self, label: &mut InfoLabel, pointer: Coord<f64>) {
        let config = &self.config;

        let flip_left = pointer.x > config.viewport[0] - label.width - config.right_clearance;
        let flip_down = pointer.y < config.top_threshold;

        let x = if flip_left { pointer.x - label.width - config.offset_x } else { pointer.x + config.offset_x };
        let y = if flip_down { pointer.y + config.offset_below } else { pointer.y - config.offset_above };

        label.position = Coord { x, y };
        label.quadrant = match (flip_left, flip_down) {
            (false, false) => Quadrant::UpperRight,
            (true, false) => Quadrant::UpperLeft,
            (false, true) => Quadrant::LowerRight,
            (true, true) => Quadrant::LowerLeft,
        };
    }

    /// Resolve the element under `pointer` and dispatch exit / enter / move accordingly.
    pub fn pointer_moved(&mut self, view: &mut RegionView, state: &ViewState, pointer: Coord<f64>) {
        let target = view.element_at(pointer).map(str::to_string);
        match (self.hovered.clone(), target) {
            (Some(current), Some(target)) if current == target => {}
            (current, target) => {
                if let Some(current) = current { self.on_hover_exit(view, &current) }
                if let Some(target) = target { self.on_hover_enter(view, state, &target); }
            }
        }
        self.on_move(pointer);
    }

    /// Re-read the label's value after the selected attribute changed.
    pub fn refresh_label(&mut self, view: &RegionView, state: &ViewState) {
        let Some(mut label) = self.label.take() else { return };
        if let Some(values) = view.values_of(&label.region) {
            label.title = format_value(values.get(state.get()));
        }
        self.fit(&mut label);
        self.label = Some(label);
    }
}
