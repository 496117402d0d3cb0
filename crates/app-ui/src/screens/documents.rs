//! Sign-up: first and last name

use app_core::validation;
use app_state::{Effect, FlowAction, FlowOutcome, FlowStep, PresentationAction, Reducer, StepPhase};

use super::{forward, phone, teardown_destination, Environment};
use crate::navigation::{Route, Screen};

/// Documents screen state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    /// Email from the first step
    pub email: String,
    /// Masked CPF
    pub cpf: String,
    /// First name field
    pub first_name: String,
    /// Last name field
    pub last_name: String,
    /// Message under the form
    pub error_message: Option<String>,
    /// Presented child
    pub destination: Option<Destination>,
}

impl State {
    /// Name step for `email` and `cpf`
    pub fn new(email: impl Into<String>, cpf: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            cpf: cpf.into(),
            first_name: String::new(),
            last_name: String::new(),
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
        Route::Documents
    }

    fn presented(&self) -> Option<&dyn Screen> {
        self.destination.as_ref().map(Destination::screen)
    }
}

/// Documents screen actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Screen became visible
    OnAppear,
    /// First name edited
    FirstNameChanged(String),
    /// Last name edited
    LastNameChanged(String),
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

/// Screens reachable from the name step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Phone number
    Phone(phone::State),
}

impl Destination {
    fn screen(&self) -> &dyn Screen {
        match self {
            Destination::Phone(state) => state,
        }
    }
}

/// Actions for [`Destination`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationAction {
    /// Phone screen action
    Phone(phone::Action),
}

impl FlowAction for DestinationAction {
    fn outcome(&self) -> Option<FlowOutcome> {
        match self {
            DestinationAction::Phone(action) => action.outcome(),
        }
    }
}

/// Reducer for [`Destination`]
#[derive(Debug, Clone)]
pub struct DestinationReducer {
    feature: phone::Feature,
}

impl Reducer for DestinationReducer {
    type State = Destination;
    type Action = DestinationAction;

    fn reduce(&self, state: &mut Destination, action: DestinationAction) -> Effect<DestinationAction> {
        match (state, action) {
            (Destination::Phone(state), DestinationAction::Phone(action)) => {
                self.feature.reduce(state, action).map(DestinationAction::Phone)
            }
        }
    }

    fn teardown(&self, state: &Destination) -> Effect<DestinationAction> {
        match state {
            Destination::Phone(state) => self.feature.teardown(state).map(DestinationAction::Phone),
        }
    }
}

/// Documents screen reducer
#[derive(Debug, Clone)]
pub struct Feature {
    destination: DestinationReducer,
}

impl Feature {
    /// Create the reducer
    pub fn new(env: Environment) -> Self {
        Self {
            destination: DestinationReducer {
                feature: phone::Feature::new(env),
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

            Action::FirstNameChanged(value) => {
                state.first_name = value;
                state.error_message = None;
                Effect::none()
            }

            Action::LastNameChanged(value) => {
                state.last_name = value;
                state.error_message = None;
                Effect::none()
            }

            Action::ContinueTapped => {
                if let Err(error) = validation::validate_names(&state.first_name, &state.last_name) {
                    state.error_message = Some(error.to_string());
                    return Effect::none();
                }
                state.error_message = None;
                state.destination = Some(Destination::Phone(phone::State::new(
                    state.email.clone(),
                    state.cpf.clone(),
                    state.first_name.trim(),
                    state.last_name.trim(),
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
