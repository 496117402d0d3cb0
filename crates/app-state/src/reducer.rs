//! The reducer contract

use crate::effect::Effect;

/// Pure state transition function for one feature
///
/// `reduce` mutates the state synchronously and describes any follow-up work
/// as an [`Effect`]. It must not block or perform I/O.
pub trait Reducer: Send + Sync + 'static {
    /// Feature state
    type State: Send + 'static;

    /// Everything that can happen to the feature
    type Action: Send + 'static;

    /// Apply `action` to `state`
    fn reduce(&self, state: &mut Self::State, action: Self::Action) -> Effect<Self::Action>;

    /// Whether `action` is addressed to `state`
    ///
    /// Routers over a sum of screens return `false` when the action belongs
    /// to a variant other than the active one; [`crate::present`] then drops
    /// it without touching the slot.
    fn targets(&self, _state: &Self::State, _action: &Self::Action) -> bool {
        true
    }

    /// Effects to run when `state` is about to be destroyed
    ///
    /// Presenters call this when they clear a destination so that timers and
    /// in-flight requests owned by the child (and its own children) stop.
    fn teardown(&self, _state: &Self::State) -> Effect<Self::Action> {
        Effect::None
    }
}
