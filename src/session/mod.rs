mod dataset;
mod session;

pub use dataset::{Dataset, Sources, read_records, read_records_str};
pub use session::Session;
