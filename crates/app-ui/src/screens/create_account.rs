//! Sign-up: email, first step of account creation
//!
//! The flow continues through CPF, names, phone, password and terms. When the
//! success screen at the end is dismissed, every step unwinds and this screen
//! reports completion to the login screen.

use app_core::validation::{self, EMAIL_SUGGESTIONS};
use app_state::{Effect, FlowAction, FlowOutcome, FlowStep, PresentationAction, Reducer, StepPhase};

use super::{cpf, forward, teardown_destination, Environment};
use crate::navigation::{Route, Screen};

/// Create account screen state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct State {
    /// Email field
    pub email: String,
    /// Domain badges are visible
    pub should_show_email_suggestions: bool,
    /// Message under the form
    pub error_message: Option<String>,
    /// Presented child
    pub destination: Option<Destination>,
}

impl State {
    /// Domain badges
    pub fn email_suggestions(&self) -> &'static [&'static str] {
        &EMAIL_SUGGESTIONS
    }
}

impl FlowStep for State {
    fn phase(&self) -> StepPhase {
        StepPhase::derive(false, self.error_message.is_some(), self.destination.is_some())
    }
}

impl Screen for State {
    fn route(&self) -> Route {
        Route::CreateAccount
    }

    fn presented(&self) -> Option<&dyn Screen> {
        self.destination.as_ref().map(Destination::screen)
    }
}

/// Create account screen actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Screen became visible
    OnAppear,
    /// Email field edited
    EmailChanged(String),
    /// A domain badge was tapped
    EmailSuggestionTapped(String),
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

/// Screens reachable from the email step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// CPF step
    Cpf(cpf::State),
}

impl Destination {
    fn screen(&self) -> &dyn Screen {
        match self {
            Destination::Cpf(state) => state,
        }
    }
}

/// Actions for [`Destination`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationAction {
    /// CPF screen action
    Cpf(cpf::Action),
}

impl FlowAction for DestinationAction {
    fn outcome(&self) -> Option<FlowOutcome> {
        match self {
            DestinationAction::Cpf(action) => action.outcome(),
        }
    }
}

/// Reducer for [`Destination`]
#[derive(Debug, Clone)]
pub struct DestinationReducer {
    feature: cpf::Feature,
}

impl Reducer for DestinationReducer {
    type State = Destination;
    type Action = DestinationAction;

    fn reduce(&self, state: &mut Destination, action: DestinationAction) -> Effect<DestinationAction> {
        match (state, action) {
            (Destination::Cpf(state), DestinationAction::Cpf(action)) => {
                self.feature.reduce(state, action).map(DestinationAction::Cpf)
            }
        }
    }

    fn teardown(&self, state: &Destination) -> Effect<DestinationAction> {
        match state {
            Destination::Cpf(state) => self.feature.teardown(state).map(DestinationAction::Cpf),
        }
    }
}

/// Create account screen reducer
#[derive(Debug, Clone)]
pub struct Feature {
    destination: DestinationReducer,
}

impl Feature {
    /// Create the reducer
    pub fn new(env: Environment) -> Self {
        Self {
            destination: DestinationReducer {
                feature: cpf::Feature::new(env),
            },
        }
    }
}

impl Reducer for Feature {
    type State = State;
    type Action = Action;

    fn reduce(&self, state: &mut State, action: Action) -> Effect<Action> {
        match action {
            Action::OnAppear => Effect::none(),

            Action::EmailChanged(value) => {
                state.should_show_email_suggestions = validation::should_suggest_domains(&value);
                state.email = value;
                state.error_message = None;
                Effect::none()
            }

            Action::EmailSuggestionTapped(suggestion) => {
                state.email = validation::apply_email_suggestion(&state.email, &suggestion);
                state.should_show_email_suggestions =
                    validation::should_suggest_domains(&state.email);
                state.error_message = None;
                Effect::none()
            }

            Action::ContinueTapped => {
                if let Err(error) = validation::validate_email(&state.email) {
                    state.error_message = Some(error.to_string());
                    return Effect::none();
                }
                state.error_message = None;
                state.destination = Some(Destination::Cpf(cpf::State::new(state.email.trim())));
                Effect::none()
            }

            Action::BackTapped => Effect::send(Action::Finished(FlowOutcome::Cancelled)),

            Action::Finished(outcome) => {
                tracing::debug!(?outcome, "Create account flow finished");
                Effect::none()
            }

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
