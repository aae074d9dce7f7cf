//! SVG format writing operations for the rendered view.

mod path;
mod writer;

pub(crate) use path::*;
pub(crate) use writer::*;
