#![doc = "Choropleth map and bar chart of per-state cost indices"]
mod attr;
mod classify;
mod common;
mod config;
mod io;
mod map;
mod session;
mod view;

#[doc(inline)]
pub use attr::{Attribute, AttributeValues, Record, parse_value};

#[doc(inline)]
pub use classify::{CLASS_COUNT, Class, ClassificationScheme, Palette, build_scale, ckmeans};

#[doc(inline)]
pub use common::Rgb;

#[doc(inline)]
pub use config::{ChartConfig, LabelConfig, MapConfig, Outline, TimingConfig, ViewConfig};

#[doc(inline)]
pub use map::{Graticule, Projection, Projector, RegionShape, join, read_outlines, regions_to_geojson};

#[doc(inline)]
pub use session::{Dataset, Session, Sources, read_records, read_records_str};

#[doc(inline)]
pub use view::{
    Animated, BarElement, BarGeometry, BarScale, InfoLabel, InteractionController, Interpolate, PLACEHOLDER,
    Quadrant, RegionElement, RegionView, SelectionError, Selector, SelectorOption, StateChange, Transition,
    ViewState, format_name, format_value,
};
