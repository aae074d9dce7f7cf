//! Value classification for choropleth coloring.

mod ckmeans;
mod scheme;

pub use ckmeans::ckmeans;
pub use scheme::{CLASS_COUNT, Class, ClassificationScheme, Palette, build_scale};
