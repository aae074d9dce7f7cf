mod color;
mod fs;

pub use color::Rgb;
pub(crate) use fs::*;
