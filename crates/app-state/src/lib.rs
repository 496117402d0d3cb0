//! Application state management for ClickConsultas
//!
//! This crate provides the unidirectional state container used by every
//! screen: reducers, effects, a serial store runtime, and the optional-child
//! presentation model with its flow-result channel.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod effect;
pub mod phase;
pub mod presentation;
pub mod reducer;
pub mod store;

pub use effect::{Effect, EffectId};
pub use phase::{FlowStep, StepPhase};
pub use presentation::{present, FlowAction, FlowOutcome, Presentation, PresentationAction};
pub use reducer::Reducer;
pub use store::{Store, StoreError};
