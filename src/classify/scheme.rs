use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{attr::{Attribute, Record}, common::Rgb};

use super::ckmeans;

/// Number of display classes requested from the clustering step.
pub const CLASS_COUNT: usize = 5;

/// Result of classifying one value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Class {
    /// Index of the class whose range contains the value.
    Bucket(usize),
    /// Missing or non-numeric value.
    Invalid,
}

/// Sequential class colors plus the neutral color for invalid values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub classes: [Rgb; CLASS_COUNT],
    pub invalid: Rgb,
}

impl Default for Palette {
    /// Light-to-dark blues (ColorBrewer), grey for invalid.
    fn default() -> Self {
        Self {
            classes: [
                Rgb::new(0x9e, 0xca, 0xe1),
                Rgb::new(0x6b, 0xae, 0xd6),
                Rgb::new(0x42, 0x92, 0xc6),
                Rgb::new(0x21, 0x71, 0xb5),
                Rgb::new(0x08, 0x45, 0x94),
            ],
            invalid: Rgb::new(0xcc, 0xcc, 0xcc),
        }
    }
}

/// Threshold classification for one attribute.
///
/// `breaks` are strictly increasing; `breaks.len() + 1` classes result.
/// A value below `breaks[0]` falls in class 0, a value `v` with
/// `breaks[i-1] <= v < breaks[i]` in class `i`, and anything at or above the
/// last break in the final class. Schemes are rebuilt, never edited.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassificationScheme {
    attribute: Attribute,
    breaks: Vec<f64>,
    palette: Palette,
}

impl ClassificationScheme {
    /// Build a scheme from raw values: natural-breaks clustering into at most
    /// `CLASS_COUNT` classes, breaks taken as the minimum of every cluster but the first.
    pub fn from_values(attribute: Attribute, values: impl IntoIterator<Item = Option<f64>>, palette: Palette) -> Self {
        let valid = values.into_iter().flatten().filter(|v| v.is_finite()).collect::<Vec<_>>();

        let mut breaks = ckmeans(&valid, CLASS_COUNT).iter()
            .skip(1)
            .filter_map(|cluster| cluster.first().copied())
            .collect::<Vec<_>>();
        breaks.dedup();

        debug!(attribute = %attribute, values = valid.len(), ?breaks, "classification scheme built");
        Self { attribute, breaks, palette }
    }

    #[inline] pub fn attribute(&self) -> Attribute { self.attribute }

    #[inline] pub fn breaks(&self) -> &[f64] { &self.breaks }

    #[inline] pub fn palette(&self) -> &Palette { &self.palette }

    /// Number of effective classes (one more than the number of breaks).
    #[inline] pub fn num_classes(&self) -> usize { self.breaks.len() + 1 }

    /// Classify a value; `None` and non-finite numbers are `Class::Invalid`.
    pub fn classify(&self, value: Option<f64>) -> Class {
        match value {
            Some(v) if v.is_finite() => Class::Bucket(self.breaks.partition_point(|&b| b <= v)),
            _ => Class::Invalid,
        }
    }

    /// Display color for a class.
    pub fn color(&self, class: Class) -> Rgb {
        match class {
            Class::Bucket(i) => self.palette.classes[i.min(CLASS_COUNT - 1)],
            Class::Invalid => self.palette.invalid,
        }
    }

    /// Display color for a value.
    #[inline] pub fn fill(&self, value: Option<f64>) -> Rgb { self.color(self.classify(value)) }
}

/// Build the classification scheme for `attribute` over all records.
pub fn build_scale(records: &[Record], attribute: Attribute, palette: &Palette) -> ClassificationScheme {
    ClassificationScheme::from_values(
        attribute,
        records.iter().map(|record| record.value(attribute)),
        palette.clone(),
    )
}
