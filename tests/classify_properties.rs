//! Property tests for classification and joining.

use std::collections::BTreeMap;

use choropleth::{Attribute, AttributeValues, CLASS_COUNT, Class, ClassificationScheme, Palette, Record, RegionShape, join};
use geo::MultiPolygon;
use proptest::prelude::*;

fn scheme(values: &[f64]) -> ClassificationScheme {
    ClassificationScheme::from_values(Attribute::Cost, values.iter().copied().map(Some), Palette::default())
}

fn value_strategy() -> impl Strategy<Value = f64> {
    (-50_000i32..250_000).prop_map(|v| v as f64 / 1000.0)
}

fn attribute_values() -> impl Strategy<Value = AttributeValues> {
    proptest::collection::vec(proptest::option::of(value_strategy()), Attribute::COUNT)
        .prop_map(|values| Attribute::ALL.into_iter().zip(values).collect())
}

proptest! {
    #[test]
    fn five_distinct_values_give_four_increasing_breaks(values in proptest::collection::vec(value_strategy(), 1..60)) {
        let scheme = scheme(&values);
        let mut distinct = values.clone();
        distinct.sort_by(f64::total_cmp);
        distinct.dedup();

        prop_assert!(scheme.breaks().windows(2).all(|w| w[0] < w[1]));
        if distinct.len() >= CLASS_COUNT {
            prop_assert_eq!(scheme.breaks().len(), CLASS_COUNT - 1);
        } else {
            prop_assert!(scheme.num_classes() <= distinct.len().max(1));
        }
    }

    #[test]
    fn classify_is_monotonic(values in proptest::collection::vec(value_strategy(), 1..40), a in value_strategy(), b in value_strategy()) {
        let scheme = scheme(&values);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let (Class::Bucket(lo), Class::Bucket(hi)) = (scheme.classify(Some(lo)), scheme.classify(Some(hi))) else {
            return Err(TestCaseError::fail("finite values must land in a bucket"));
        };
        prop_assert!(lo <= hi);
        prop_assert!(hi < CLASS_COUNT);
    }

    #[test]
    fn invalid_values_always_classify_invalid(values in proptest::collection::vec(value_strategy(), 0..40)) {
        let scheme = scheme(&values);
        for invalid in [None, Some(f64::NAN), Some(f64::INFINITY), Some(f64::NEG_INFINITY)] {
            prop_assert_eq!(scheme.classify(invalid), Class::Invalid);
            prop_assert_eq!(scheme.fill(invalid), Palette::default().invalid);
        }
    }

    #[test]
    fn join_is_an_order_independent_idempotent_merge(
        table in proptest::collection::btree_map("[A-E][a-z]{0,3}", attribute_values(), 0..8),
        shape_names in proptest::collection::vec("[A-E][a-z]{0,3}", 0..8),
    ) {
        let records = table.iter().map(|(name, values)| Record::new(name.clone(), *values)).collect::<Vec<_>>();
        let mut reversed = records.clone();
        reversed.reverse();
        let shapes = shape_names.iter()
            .map(|name| RegionShape::new(name.clone(), MultiPolygon::new(vec![])))
            .collect::<Vec<_>>();

        let joined = join(shapes.clone(), &records);
        prop_assert_eq!(&joined, &join(shapes.clone(), &reversed));
        prop_assert_eq!(&joined, &join(joined.clone(), &records));

        let expected: BTreeMap<_, _> = table;
        for shape in &joined {
            let values = expected.get(&shape.name).copied().unwrap_or_default();
            prop_assert_eq!(shape.values, values);
        }
    }
}
