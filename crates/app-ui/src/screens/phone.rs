//! Sign-up: phone number

use app_core::auth::AccountDraft;
use app_core::phone;
use app_state::{Effect, FlowAction, FlowOutcome, FlowStep, PresentationAction, Reducer, StepPhase};

use super::{forward, new_password, teardown_destination, Environment};
use crate::navigation::{Route, Screen};

/// Phone screen state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    /// Email from the first step
    pub email: String,
    /// Masked CPF
    pub cpf: String,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Masked phone, `(DD) NNNNN-NNNN`
    pub phone: String,
    /// Message under the form
    pub error_message: Option<String>,
    /// Presented child
    pub destination: Option<Destination>,
}

impl State {
    /// Phone step carrying the data collected so far
    pub fn new(
        email: impl Into<String>,
        cpf: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            cpf: cpf.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: String::new(),
            error_message: None,
            destination: None,
        }
    }

    /// Everything collected by the sign-up flow
    pub fn draft(&self) -> AccountDraft {
        AccountDraft {
            email: self.email.clone(),
            cpf: self.cpf.clone(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            phone: self.phone.clone(),
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
        Route::Phone
    }

    fn presented(&self) -> Option<&dyn Screen> {
        self.destination.as_ref().map(Destination::screen)
    }
}

/// Phone screen actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Screen became visible
    OnAppear,
    /// Phone field edited; the mask is applied again
    PhoneChanged(String),
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

/// Screens reachable from the phone step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Choose a password
    NewPassword(new_password::State),
}

impl Destination {
    fn screen(&self) -> &dyn Screen {
        match self {
            Destination::NewPassword(state) => state,
        }
    }
}

/// Actions for [`Destination`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationAction {
    /// New password screen action
    NewPassword(new_password::Action),
}

impl FlowAction for DestinationAction {
    fn outcome(&self) -> Option<FlowOutcome> {
        match self {
            DestinationAction::NewPassword(action) => action.outcome(),
        }
    }
}

/// Reducer for [`Destination`]
#[derive(Debug, Clone)]
pub struct DestinationReducer {
    feature: new_password::Feature,
}

impl Reducer for DestinationReducer {
    type State = Destination;
    type Action = DestinationAction;

    fn reduce(&self, state: &mut Destination, action: DestinationAction) -> Effect<DestinationAction> {
        match (state, action) {
            (Destination::NewPassword(state), DestinationAction::NewPassword(action)) => self
                .feature
                .reduce(state, action)
                .map(DestinationAction::NewPassword),
        }
    }

    fn teardown(&self, state: &Destination) -> Effect<DestinationAction> {
        match state {
            Destination::NewPassword(state) => self
                .feature
                .teardown(state)
                .map(DestinationAction::NewPassword),
        }
    }
}

/// Phone screen reducer
#[derive(Debug, Clone)]
pub struct Feature {
    destination: DestinationReducer,
}

impl Feature {
    /// Create the reducer
    pub fn new(env: Environment) -> Self {
        Self {
            destination: DestinationReducer {
                feature: new_password::Feature::new(env),
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

            Action::PhoneChanged(value) => {
                state.phone = phone::format(&value);
                state.error_message = None;
                Effect::none()
            }

            Action::ContinueTapped => {
                if let Err(error) = phone::validate(&state.phone) {
                    state.error_message = Some(error.to_string());
                    return Effect::none();
                }
                state.error_message = None;
                state.destination = Some(Destination::NewPassword(
                    new_password::State::create_account(state.draft()),
                ));
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
