//! Optional child presentation
//!
//! A screen presents at most one child at a time. The child's state lives in
//! an `Option` field on the parent (`destination`), typed as a sum of the
//! screens reachable from there. This module holds the plumbing shared by all
//! presenters:
//!
//! - [`PresentationAction`] wraps actions addressed to the presented child,
//!   plus the view-driven `Dismiss`.
//! - [`FlowOutcome`] is the single result channel of a flow. A child signals
//!   completion by dispatching its own `Finished` action; only its immediate
//!   parent observes it, clears the destination and, for completed flows,
//!   reports its own `Finished` upward.
//! - [`present`] runs the child reducer and applies those rules.

use serde::{Deserialize, Serialize};

use crate::effect::Effect;
use crate::reducer::Reducer;

/// Action routed to an optional child
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresentationAction<A> {
    /// Action for the presented child
    Presented(A),

    /// The view dismissed the child (back gesture, close button)
    Dismiss,
}

/// How a flow ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowOutcome {
    /// The flow reached its goal; ancestors unwind too
    Completed,

    /// The user backed out; only the immediate presenter reacts
    Cancelled,
}

impl FlowOutcome {
    /// Whether a parent must propagate this outcome to its own parent
    pub fn bubbles(&self) -> bool {
        matches!(self, FlowOutcome::Completed)
    }
}

/// Actions that may signal the end of a flow
pub trait FlowAction {
    /// `Some` when this action is the flow's terminal `Finished` signal
    fn outcome(&self) -> Option<FlowOutcome> {
        None
    }
}

impl<A: FlowAction> FlowAction for PresentationAction<A> {
    fn outcome(&self) -> Option<FlowOutcome> {
        match self {
            PresentationAction::Presented(action) => action.outcome(),
            PresentationAction::Dismiss => None,
        }
    }
}

/// Result of routing an action to a presented child
#[derive(Debug)]
pub struct Presentation<A> {
    /// Effects produced by the child, lifted into [`PresentationAction`]
    pub effect: Effect<PresentationAction<A>>,

    /// Set when the child finished and was removed
    pub outcome: Option<FlowOutcome>,
}

impl<A: Send + 'static> Presentation<A> {
    fn idle() -> Self {
        Self {
            effect: Effect::None,
            outcome: None,
        }
    }

    /// Outcome the parent must re-emit as its own `Finished`, if any
    pub fn bubbled(&self) -> Option<FlowOutcome> {
        self.outcome.filter(FlowOutcome::bubbles)
    }
}

/// Route `action` to the child held in `slot`
///
/// - `Dismiss` clears the slot and tears the child down.
/// - `Presented(a)` reduces the child. When `a` is the child's `Finished`
///   signal, the slot is cleared afterwards and the outcome returned.
/// - Actions arriving for a child that is no longer presented, or addressed
///   to another variant than the presented one, are dropped.
pub fn present<R>(
    router: &R,
    slot: &mut Option<R::State>,
    action: PresentationAction<R::Action>,
) -> Presentation<R::Action>
where
    R: Reducer,
    R::Action: FlowAction + std::fmt::Debug,
{
    match action {
        PresentationAction::Dismiss => match slot.take() {
            Some(child) => {
                tracing::debug!("destination dismissed");
                Presentation {
                    effect: router.teardown(&child).map(PresentationAction::Presented),
                    outcome: None,
                }
            }
            None => Presentation::idle(),
        },
        PresentationAction::Presented(action) => {
            let Some(child) = slot.as_mut() else {
                tracing::debug!(?action, "action for a dismissed destination ignored");
                return Presentation::idle();
            };
            if !router.targets(child, &action) {
                tracing::debug!(?action, "action for another destination ignored");
                return Presentation::idle();
            }

            let outcome = action.outcome();
            let mut effect = router.reduce(child, action);

            if let Some(outcome) = outcome {
                if let Some(child) = slot.take() {
                    tracing::debug!(?outcome, "destination finished");
                    effect = effect.merge(router.teardown(&child));
                }
            }

            Presentation {
                effect: effect.map(PresentationAction::Presented),
                outcome,
            }
        }
    }
}
