mod graticule;
mod join;
mod projection;
mod region;

pub use graticule::Graticule;
pub use join::join;
pub(crate) use projection::bounds_of;
pub use projection::{Projection, Projector};
pub use region::{RegionShape, read_outlines, regions_to_geojson};
