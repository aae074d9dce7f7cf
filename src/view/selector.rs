use crate::attr::Attribute;

use super::SelectionError;

/// Text of the disabled first option.
pub const PLACEHOLDER: &str = "Select Attribute";

/// One entry of the attribute selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectorOption {
    pub label: &'static str,
    /// `None` for the non-selectable placeholder.
    pub attribute: Option<Attribute>,
}

impl SelectorOption {
    #[inline] pub fn is_selectable(&self) -> bool { self.attribute.is_some() }
}

/// The attribute selector: a disabled placeholder followed by every attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    options: Vec<SelectorOption>,
    /// Index of the option currently shown.
    shown: usize,
}

impl Default for Selector {
    fn default() -> Self { Self::new() }
}

impl Selector {
    pub fn new() -> Self {
        let options = std::iter::once(SelectorOption { label: PLACEHOLDER, attribute: None })
            .chain(Attribute::ALL.into_iter().map(|attr| SelectorOption { label: attr.name(), attribute: Some(attr) }))
            .collect();
        Self { options, shown: 0 }
    }

    #[inline] pub fn options(&self) -> &[SelectorOption] { &self.options }

    /// The option currently shown (the placeholder until something is chosen).
    #[inline] pub fn shown(&self) -> &SelectorOption { &self.options[self.shown] }

    /// Choose the option at `index`.
    pub fn choose(&mut self, index: usize) -> Result<Attribute, SelectionError> {
        let attribute = self.options.get(index)
            .and_then(|option| option.attribute)
            .ok_or(SelectionError::NotSelectable(index))?;
        self.shown = index;
        Ok(attribute)
    }

    /// Choose the option labelled `name`.
    pub fn choose_name(&mut self, name: &str) -> Result<Attribute, SelectionError> {
        let index = self.options.iter()
            .position(|option| option.is_selectable() && option.label == name)
            .ok_or_else(|| SelectionError::UnknownAttribute(name.to_string()))?;
        self.choose(index)
    }

    /// Show the option for `attribute` without going through a choice.
    pub fn show(&mut self, attribute: Attribute) {
        if let Some(index) = self.options.iter().position(|option| option.attribute == Some(attribute)) {
            self.shown = index;
        }
    }
}
