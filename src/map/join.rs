use ahash::AHashMap;
use tracing::debug;

use crate::attr::{AttributeValues, Record};

use super::RegionShape;

/// Merge record attribute values onto region shapes by exact `name` equality.
///
/// Each shape receives a copy of every attribute value of the record with the
/// same name; a shape without a matching record ends up with no valid values.
/// Unmatched shapes and unmatched records are not errors. When several records
/// share a name, the last one wins. The merge is pure: running it again with
/// the same records yields the same shapes.
pub fn join(shapes: Vec<RegionShape>, records: &[Record]) -> Vec<RegionShape> {
    let by_name = records.iter()
        .map(|record| (record.name.as_str(), &record.values))
        .collect::<AHashMap<_, _>>();

    let mut matched = 0;
    let joined = shapes.into_iter()
        .map(|mut shape| {
            shape.values = match by_name.get(shape.name.as_str()) {
                Some(&&values) => { matched += 1; values }
                None => AttributeValues::empty(),
            };
            shape
        })
        .collect::<Vec<_>>();

    debug!(
        shapes = joined.len(),
        records = records.len(),
        matched,
        unmatched_shapes = joined.len() - matched,
        "records joined onto regions"
    );
    joined
}
