//! Session Models

use rustc_hash::FxHashMap;
use serde::Serialize;
use tender::{
    methods::PaymentMethodId,
    selection::{CHOSEN_METHOD_KEY, SELECTED_METHOD_KEY, SUBMITTED_MARKER_KEY, SelectionSources},
};

/// Stored value of the submission marker.
pub(crate) const SUBMITTED_MARKER_VALUE: &str = "yes";

/// The selection state held in a checkout session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionSelection {
    /// Primary ("selected") key.
    pub selected: Option<PaymentMethodId>,

    /// Secondary ("chosen") key.
    pub chosen: Option<PaymentMethodId>,

    /// Whether the checkout has been submitted.
    pub submitted: bool,
}

impl SessionSelection {
    /// Read the selection out of raw session values.
    pub(crate) fn from_values(values: &FxHashMap<String, String>) -> Self {
        let method = |key: &str| PaymentMethodId::parse_opt(values.get(key).map(String::as_str));

        Self {
            selected: method(SELECTED_METHOD_KEY),
            chosen: method(CHOSEN_METHOD_KEY),
            submitted: values
                .get(SUBMITTED_MARKER_KEY)
                .is_some_and(|value| value == SUBMITTED_MARKER_VALUE),
        }
    }

    /// Selection sources for a recalculation, given the method submitted with the
    /// current request, if any.
    #[must_use]
    pub fn sources(&self, submitted: Option<PaymentMethodId>) -> SelectionSources {
        SelectionSources {
            session_selected: self.selected.clone(),
            submitted,
            session_chosen: self.chosen.clone(),
        }
    }
}

/// Result of a selection write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionWrite {
    /// Session state before the write.
    pub before: SessionSelection,

    /// Whether the write changed the session.
    pub applied: bool,
}
