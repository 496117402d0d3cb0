//! Lifecycle of a single flow step
//!
//! Every form screen moves through the same states: the user edits fields,
//! submits, and either sees an error or advances to the next screen. The
//! phase is derived from the step's own fields rather than stored, so it can
//! never disagree with them.

use serde::{Deserialize, Serialize};

/// Phase of a flow step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepPhase {
    /// Waiting for input
    Editing,

    /// A remote operation is in flight
    Submitting,

    /// The last submission failed validation or was rejected
    Error,

    /// A child step is presented; control has moved on
    Advancing,
}

impl StepPhase {
    /// Derive the phase from a step's loading flag, error and destination
    ///
    /// A presented destination wins over everything else, then an in-flight
    /// request, then a pending error message.
    pub fn derive(is_loading: bool, has_error: bool, has_destination: bool) -> Self {
        if has_destination {
            StepPhase::Advancing
        } else if is_loading {
            StepPhase::Submitting
        } else if has_error {
            StepPhase::Error
        } else {
            StepPhase::Editing
        }
    }

    /// Whether the primary action may be triggered in this phase
    pub fn accepts_submit(&self) -> bool {
        matches!(self, StepPhase::Editing | StepPhase::Error)
    }
}

/// Implemented by every form step state
pub trait FlowStep {
    /// Current phase of the step
    fn phase(&self) -> StepPhase;
}
