mod attribute;
mod record;

pub use attribute::Attribute;
pub use record::{AttributeValues, Record, parse_value};
