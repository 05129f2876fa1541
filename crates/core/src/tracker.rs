//! Client-side selection tracker
//!
//! Mirrors what the checkout page does when the shopper clicks between payment methods:
//! at most one notification is in flight, repeats of the current selection are dropped,
//! and a failed notification reverts to the previous selection.

use crate::methods::PaymentMethodId;

/// What the caller should do after a selection change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerAction {
    /// Send a selection notification for this method.
    Notify(PaymentMethodId),

    /// Nothing to do: the method is already the current selection.
    Ignore,

    /// A notification is in flight; the method will be sent once it completes.
    Queued,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Idle,
    Updating {
        previous: Option<PaymentMethodId>,
        pending: Option<PaymentMethodId>,
    },
}

/// Tracks the shopper's payment-method selection between notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionTracker {
    current: Option<PaymentMethodId>,
    state: State,
}

impl Default for SelectionTracker {
    fn default() -> Self {
        Self::new(None)
    }
}

impl SelectionTracker {
    /// Start tracking with the method rendered as selected on page load.
    pub fn new(initial: Option<PaymentMethodId>) -> Self {
        Self {
            current: initial,
            state: State::Idle,
        }
    }

    /// The method the tracker currently considers selected.
    pub fn current(&self) -> Option<&PaymentMethodId> {
        self.current.as_ref()
    }

    /// Whether a notification is in flight.
    pub fn is_updating(&self) -> bool {
        matches!(self.state, State::Updating { .. })
    }

    /// Record a selection change.
    ///
    /// While a notification is in flight the latest differing selection is queued; any
    /// earlier queued selection is replaced. Re-selecting the in-flight method clears the
    /// queue.
    pub fn select(&mut self, method: PaymentMethodId) -> TrackerAction {
        match &mut self.state {
            State::Idle => {
                if self.current.as_ref() == Some(&method) {
                    return TrackerAction::Ignore;
                }

                let previous = self.current.replace(method.clone());

                self.state = State::Updating {
                    previous,
                    pending: None,
                };

                TrackerAction::Notify(method)
            }
            State::Updating { pending, .. } => {
                if self.current.as_ref() == Some(&method) {
                    *pending = None;

                    return TrackerAction::Ignore;
                }

                *pending = Some(method);

                TrackerAction::Queued
            }
        }
    }

    /// Record that the in-flight notification finished.
    ///
    /// On failure the selection reverts to the method held before the notification was
    /// sent. Returns the next method to notify when one was queued.
    pub fn complete(&mut self, success: bool) -> Option<PaymentMethodId> {
        let State::Updating { previous, pending } =
            std::mem::replace(&mut self.state, State::Idle)
        else {
            return None;
        };

        if !success {
            self.current = previous;
        }

        match self.select(pending?) {
            TrackerAction::Notify(method) => Some(method),
            TrackerAction::Ignore | TrackerAction::Queued => None,
        }
    }
}
