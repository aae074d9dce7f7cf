use super::Attribute;

/// Parse a cell of source text into an attribute value.
/// Empty, non-numeric and non-finite text all map to `None` ("invalid").
pub fn parse_value(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Per-attribute numeric values; `None` marks an invalid / missing value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AttributeValues([Option<f64>; Attribute::COUNT]);

impl AttributeValues {
    /// Values with every attribute invalid.
    #[inline] pub fn empty() -> Self { Self::default() }

    #[inline] pub fn get(&self, attr: Attribute) -> Option<f64> { self.0[attr.index()] }

    /// Store a value, normalizing non-finite numbers to invalid.
    #[inline]
    pub fn set(&mut self, attr: Attribute, value: Option<f64>) {
        self.0[attr.index()] = value.filter(|v| v.is_finite());
    }

    /// True if at least one attribute holds a valid number.
    pub fn any_valid(&self) -> bool { self.0.iter().any(Option::is_some) }

    /// Iterate `(attribute, value)` pairs in attribute order.
    pub fn iter(&self) -> impl Iterator<Item = (Attribute, Option<f64>)> + '_ {
        Attribute::ALL.into_iter().map(|attr| (attr, self.get(attr)))
    }
}

impl FromIterator<(Attribute, Option<f64>)> for AttributeValues {
    fn from_iter<I: IntoIterator<Item = (Attribute, Option<f64>)>>(iter: I) -> Self {
        let mut values = Self::empty();
        for (attr, value) in iter { values.set(attr, value) }
        values
    }
}

/// One row of tabular data: a region name and its attribute values.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub name: String,
    pub values: AttributeValues,
}

impl Record {
    pub fn new(name: impl Into<String>, values: AttributeValues) -> Self {
        Self { name: name.into(), values }
    }

    /// Build a record from `(attribute name, source text)` cells.
    /// Cells naming no known attribute are ignored.
    pub fn from_text<'a>(name: impl Into<String>, cells: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let values = cells.into_iter()
            .filter_map(|(column, text)| Attribute::from_name(column).map(|attr| (attr, parse_value(text))))
            .collect();
        Self::new(name, values)
    }

    #[inline] pub fn value(&self, attr: Attribute) -> Option<f64> { self.values.get(attr) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_numbers_and_rejects_text() {
        assert_eq!(parse_value("104.3"), Some(104.3));
        assert_eq!(parse_value("  87 "), Some(87.0));
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("n/a"), None);
        assert_eq!(parse_value("NaN"), None);
        assert_eq!(parse_value("inf"), None);
    }

    #[test]
    fn record_from_text_marks_bad_cells_invalid() {
        let record = Record::from_text("New_York", [
            ("Cost Index", "139.1"),
            ("Grocery Cost Index", "abc"),
            ("Population", "19000000"),
        ]);
        assert_eq!(record.value(Attribute::Cost), Some(139.1));
        assert_eq!(record.value(Attribute::Grocery), None);
        assert_eq!(record.value(Attribute::Housing), None);
        assert!(record.values.any_valid());
    }

    #[test]
    fn set_normalizes_non_finite() {
        let mut values = AttributeValues::empty();
        values.set(Attribute::Housing, Some(f64::NAN));
        assert_eq!(values.get(Attribute::Housing), None);
        assert!(!values.any_valid());
    }
}
