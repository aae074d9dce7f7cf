//! View model: selected-attribute state, the map + chart elements, transitions and hover interaction.

mod hit;
mod interaction;
mod region_view;
mod selector;
mod state;
mod svg;
mod transition;

pub use interaction::{InfoLabel, InteractionController, Quadrant, format_name, format_value};
pub use region_view::{BarElement, BarGeometry, BarScale, RegionElement, RegionView};
pub use selector::{PLACEHOLDER, Selector, SelectorOption};
pub use state::{SelectionError, StateChange, ViewState};
pub(crate) use svg::write_document;
pub use transition::{Animated, Interpolate, Transition};
