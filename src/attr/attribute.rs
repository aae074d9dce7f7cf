use std::{fmt, str::FromStr};

use crate::view::SelectionError;

/// One of the six selectable cost-of-living indices.
/// The set is fixed and ordered; `Attribute::ALL[0]` is the default selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attribute {
    Cost,
    Grocery,
    Housing,
    Utilities,
    Transportation,
    Miscellaneous,
}

impl Attribute {
    /// Number of attributes in the set.
    pub const COUNT: usize = 6;

    /// All attributes, in display order.
    pub const ALL: [Attribute; Self::COUNT] = [
        Attribute::Cost,
        Attribute::Grocery,
        Attribute::Housing,
        Attribute::Utilities,
        Attribute::Transportation,
        Attribute::Miscellaneous,
    ];

    /// Column / display name, e.g. "Grocery Cost Index".
    pub fn name(self) -> &'static str {
        match self {
            Attribute::Cost => "Cost Index",
            Attribute::Grocery => "Grocery Cost Index",
            Attribute::Housing => "Housing Cost Index",
            Attribute::Utilities => "Utilities Cost Index",
            Attribute::Transportation => "Transportation Cost Index",
            Attribute::Miscellaneous => "Miscellaneous Cost Index",
        }
    }

    /// Position within `Attribute::ALL`.
    #[inline] pub fn index(self) -> usize { self as usize }

    /// Look up an attribute by its exact (case-sensitive) name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|attr| attr.name() == name)
    }
}

impl Default for Attribute {
    fn default() -> Self { Self::ALL[0] }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Attribute {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| SelectionError::UnknownAttribute(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::Attribute;

    #[test]
    fn names_round_trip_through_lookup() {
        for (i, attr) in Attribute::ALL.into_iter().enumerate() {
            assert_eq!(attr.index(), i);
            assert_eq!(Attribute::from_name(attr.name()), Some(attr));
        }
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(Attribute::from_name("cost index"), None);
        assert!("Rent Index".parse::<Attribute>().is_err());
    }

    #[test]
    fn default_is_first_member() {
        assert_eq!(Attribute::default(), Attribute::Cost);
        assert_eq!(Attribute::default().name(), "Cost Index");
    }
}
