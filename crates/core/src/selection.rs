//! Selected payment method
//!
//! The selected method lives in the checkout session under two keys, written together by
//! three triggers: the asynchronous selection notification, the checkout's order-review
//! update and the checkout submission. Recalculation reads it back through a fallback
//! chain because it can run before any of those writes have landed.

use serde::{Deserialize, Serialize};

use crate::{methods::PaymentMethodId, rules::RuleSet};

/// Session key holding the primary selection.
pub const SELECTED_METHOD_KEY: &str = "selected_payment_method";

/// Session key holding the secondary ("chosen") selection.
pub const CHOSEN_METHOD_KEY: &str = "chosen_payment_method";

/// Session key set once the checkout has been submitted.
pub const SUBMITTED_MARKER_KEY: &str = "payment_method_submitted";

/// Everything recalculation can consult to find the selected method.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSources {
    /// Session "selected" key.
    pub session_selected: Option<PaymentMethodId>,

    /// Payment method submitted with the current request, if any.
    pub submitted: Option<PaymentMethodId>,

    /// Session "chosen" key.
    pub session_chosen: Option<PaymentMethodId>,
}

impl SelectionSources {
    /// The selected method: session selection, then the request's submitted value, then
    /// the session's chosen value.
    pub fn resolve(&self) -> Option<&PaymentMethodId> {
        self.session_selected
            .as_ref()
            .or(self.submitted.as_ref())
            .or(self.session_chosen.as_ref())
    }
}

/// Which trigger is writing the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionSource {
    /// Asynchronous notification from the payment-method radio buttons.
    Notification,

    /// The checkout form's order-review refresh payload.
    OrderReview,

    /// The checkout submission.
    Submission,
}

/// What a selection write does to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteDecision {
    /// Write both keys and set the submission marker to `submitted`.
    Apply {
        /// New value of the submission marker.
        submitted: bool,
    },

    /// Leave the session untouched.
    Ignore,
}

impl SelectionSource {
    /// Decide how a write from this source applies given the current submission marker.
    ///
    /// A submission always wins and sets the marker. Notifications are dropped once the
    /// checkout has been submitted, so one that arrives late cannot replace the submitted
    /// method. An order-review payload is a snapshot of the form on screen, so it always
    /// applies and clears the marker.
    pub const fn decide(self, submitted: bool) -> WriteDecision {
        match self {
            Self::Submission => WriteDecision::Apply { submitted: true },
            Self::OrderReview => WriteDecision::Apply { submitted: false },
            Self::Notification if submitted => WriteDecision::Ignore,
            Self::Notification => WriteDecision::Apply { submitted: false },
        }
    }
}

/// Hint returned to the client after a selection notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationOutcome {
    /// Whether the client should trigger a full checkout refresh.
    pub discount_applied: bool,

    /// Whether the newly selected method has an active rule.
    pub has_discount: bool,

    /// Whether the previously stored method had an active rule.
    pub previous_had_discount: bool,
}

impl NotificationOutcome {
    /// Compare the previous and new selections against the rule set.
    pub fn evaluate(
        rules: &RuleSet,
        previous: Option<&PaymentMethodId>,
        current: &PaymentMethodId,
    ) -> Self {
        let has_discount = rules.has_discount(Some(current));
        let previous_had_discount = rules.has_discount(previous);
        let changed = previous != Some(current);

        Self {
            discount_applied: has_discount || previous_had_discount || changed,
            has_discount,
            previous_had_discount,
        }
    }

    /// Outcome for a notification that was not written because the checkout was already
    /// submitted.
    ///
    /// The session keeps `held`. When the shopper asked for a different method a refresh
    /// is still requested: its order-review payload carries the method on screen and
    /// clears the submission marker, so a checkout left open after a failed submission
    /// does not stay pinned to the submitted method.
    pub fn ignored(
        rules: &RuleSet,
        held: Option<&PaymentMethodId>,
        requested: &PaymentMethodId,
    ) -> Self {
        let has_discount = rules.has_discount(held);

        Self {
            discount_applied: held != Some(requested),
            has_discount,
            previous_had_discount: has_discount,
        }
    }
}
