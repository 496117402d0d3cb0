//! Sign-up: CPF

use app_core::cpf;
use app_state::{Effect, FlowAction, FlowOutcome, FlowStep, PresentationAction, Reducer, StepPhase};

use super::{documents, forward, teardown_destination, Environment};
use crate::navigation::{Route, Screen};

/// CPF screen state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    /// Email from the first step
    pub email: String,
    /// Masked CPF, `XXX.XXX.XXX-XX`
    pub cpf: String,
    /// Message under the form
    pub error_message: Option<String>,
    /// Presented child
    pub destination: Option<Destination>,
}

impl State {
    /// CPF step for `email`
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            cpf: String::new(),
            error_message: None,
            destination: None,
        }
    }
}

impl FlowStep for State {
    fn phase(&self) -> StepPhase {
        StepPhase::derive(false, self.error_message.is_some(), self.destination.is_some())
    }
}

impl Screen for State {
    fn route(&self) -> Route {
        Route::Cpf
    }

    fn presented(&self) -> Option<&dyn Screen> {
        self.destination.as_ref().map(Destination::screen)
    }
}

/// CPF screen actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Screen became visible
    OnAppear,
    /// CPF field edited; the mask is applied again
    CpfChanged(String),
    /// Primary button
    ContinueTapped,
    /// Back button
    BackTapped,
    /// The flow ended
    Finished(FlowOutcome),
    /// Action for the presented child
    Destination(PresentationAction<DestinationAction>),
}

impl FlowAction for Action {
    fn outcome(&self) -> Option<FlowOutcome> {
        match self {
            Action::Finished(outcome) => Some(*outcome),
            _ => None,
        }
    }
}

/// Screens reachable from the CPF step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// First and last name
    Documents(documents::State),
}

impl Destination {
    fn screen(&self) -> &dyn Screen {
        match self {
            Destination::Documents(state) => state,
        }
    }
}

/// Actions for [`Destination`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationAction {
    /// Documents screen action
    Documents(documents::Action),
}

impl FlowAction for DestinationAction {
    fn outcome(&self) -> Option<FlowOutcome> {
        match self {
            DestinationAction::Documents(action) => action.outcome(),
        }
    }
}

/// Reducer for [`Destination`]
#[derive(Debug, Clone)]
pub struct DestinationReducer {
    feature: documents::Feature,
}

impl Reducer for DestinationReducer {
    type State = Destination;
    type Action = DestinationAction;

    fn reduce(&self, state: &mut Destination, action: DestinationAction) -> Effect<DestinationAction> {
        match (state, action) {
            (Destination::Documents(state), DestinationAction::Documents(action)) => {
                self.feature.reduce(state, action).map(DestinationAction::Documents)
            }
        }
    }

    fn teardown(&self, state: &Destination) -> Effect<DestinationAction> {
        match state {
            Destination::Documents(state) => {
                self.feature.teardown(state).map(DestinationAction::Documents)
            }
        }
    }
}

/// CPF screen reducer
#[derive(Debug, Clone)]
pub struct Feature {
    destination: DestinationReducer,
}

impl Feature {
    /// Create the reducer
    pub fn new(env: Environment) -> Self {
        Self {
            destination: DestinationReducer {
                feature: documents::Feature::new(env),
            },
        }
    }
}

impl Reducer for Feature {
    type State = State;
    type Action = Action;

    fn reduce(&self, state: &mut State, action: Action) -> Effect<Action> {
        match action {
            Action::OnAppear | Action::Finished(_) => Effect::none(),

            Action::CpfChanged(value) => {
                state.cpf = cpf::format(&value);
                state.error_message = None;
                Effect::none()
            }

            Action::ContinueTapped => {
                if let Err(error) = cpf::validate(&state.cpf) {
                    state.error_message = Some(error.to_string());
                    return Effect::none();
                }
                state.error_message = None;
                state.destination = Some(Destination::Documents(documents::State::new(
                    state.email.clone(),
                    state.cpf.clone(),
                )));
                Effect::none()
            }

            Action::BackTapped => Effect::send(Action::Finished(FlowOutcome::Cancelled)),

            Action::Destination(action) => forward(
                &self.destination,
                &mut state.destination,
                action,
                Action::Destination,
                Action::Finished,
            ),
        }
    }

    fn teardown(&self, state: &State) -> Effect<Action> {
        teardown_destination(&self.destination, &state.destination, Action::Destination)
    }
}
