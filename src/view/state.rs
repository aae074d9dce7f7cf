use thiserror::Error;
use tracing::info;

use crate::attr::Attribute;

/// Why an attribute selection was rejected. The current selection is left unchanged.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("unknown attribute: {0:?}")]
    UnknownAttribute(String),
    #[error("selector option {0} is not selectable")]
    NotSelectable(usize),
}

/// Notification that the selected attribute changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateChange {
    pub previous: Attribute,
    pub current: Attribute,
    /// Revision of the state after the change.
    pub revision: u64,
}

/// The currently selected attribute, for the lifetime of a session.
///
/// Every effective change bumps `revision`, so a view can tell whether it was
/// rendered against the latest selection. Re-selecting the current attribute
/// is a no-op and produces no notification.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewState {
    selected: Attribute,
    revision: u64,
}

impl ViewState {
    /// State selecting the first attribute.
    pub fn new() -> Self { Self::default() }

    #[inline] pub fn get(&self) -> Attribute { self.selected }

    #[inline] pub fn revision(&self) -> u64 { self.revision }

    /// Select `attribute`; returns the change, or `None` if it was already selected.
    pub fn set(&mut self, attribute: Attribute) -> Option<StateChange> {
        if attribute == self.selected { return None }

        let previous = std::mem::replace(&mut self.selected, attribute);
        self.revision += 1;
        info!(from = %previous, to = %attribute, revision = self.revision, "attribute selected");
        Some(StateChange { previous, current: attribute, revision: self.revision })
    }

    /// Select an attribute by its display name. Unknown names are rejected.
    pub fn set_name(&mut self, name: &str) -> Result<Option<StateChange>, SelectionError> {
        Ok(self.set(name.parse()?))
    }
}
