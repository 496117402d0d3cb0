//! Terms of use, last step of sign-up
//!
//! Accepting the terms and tapping the button registers the account; the
//! success screen follows.

use app_core::auth::{AccountDraft, BackendRequest};
use app_core::validation::ValidationError;
use app_state::{
    Effect, EffectId, FlowAction, FlowOutcome, FlowStep, PresentationAction, Reducer, StepPhase,
};
use uuid::Uuid;

use super::{forward, success, teardown_destination, Environment};
use crate::navigation::{Route, Screen};

/// Name of the in-flight registration request
pub const CREATE_ACCOUNT_REQUEST: &str = "create-account";

/// Term screen state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    /// Identity of this presentation; scopes the registration request
    pub flow_id: Uuid,
    /// Personal data collected so far
    pub draft: AccountDraft,
    /// Password chosen on the previous step
    pub password: String,
    /// Checkbox
    pub accepted_terms: bool,
    /// Account creation in flight
    pub is_loading: bool,
    /// Message under the form
    pub error_message: Option<String>,
    /// Presented child
    pub destination: Option<Destination>,
}

impl State {
    /// Terms for `draft`, registered with `password`
    pub fn new(draft: AccountDraft, password: impl Into<String>) -> Self {
        Self {
            flow_id: Uuid::new_v4(),
            draft,
            password: password.into(),
            accepted_terms: false,
            is_loading: false,
            error_message: None,
            destination: None,
        }
    }

    /// Key of the registration request
    pub fn request_id(&self) -> EffectId {
        EffectId::new(CREATE_ACCOUNT_REQUEST, self.flow_id)
    }
}

impl FlowStep for State {
    fn phase(&self) -> StepPhase {
        StepPhase::derive(
            self.is_loading,
            self.error_message.is_some(),
            self.destination.is_some(),
        )
    }
}

impl Screen for State {
    fn route(&self) -> Route {
        Route::Term
    }

    fn presented(&self) -> Option<&dyn Screen> {
        self.destination.as_ref().map(Destination::screen)
    }
}

/// Term screen actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Screen became visible
    OnAppear,
    /// Checkbox toggled
    AcceptedTermsToggled,
    /// Primary button
    CreateAccountTapped,
    /// Registration finished
    AccountCreated,
    /// Registration failed with a user-facing message
    CreateAccountFailed(String),
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

/// Screens reachable from Term
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Account created
    Success(success::State),
}

impl Destination {
    fn screen(&self) -> &dyn Screen {
        match self {
            Destination::Success(state) => state,
        }
    }
}

/// Actions for [`Destination`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationAction {
    /// Success screen action
    Success(success::Action),
}

impl FlowAction for DestinationAction {
    fn outcome(&self) -> Option<FlowOutcome> {
        match self {
            DestinationAction::Success(action) => action.outcome(),
        }
    }
}

/// Reducer for [`Destination`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DestinationReducer;

impl Reducer for DestinationReducer {
    type State = Destination;
    type Action = DestinationAction;

    fn reduce(&self, state: &mut Destination, action: DestinationAction) -> Effect<DestinationAction> {
        match (state, action) {
            (Destination::Success(state), DestinationAction::Success(action)) => {
                success::Feature.reduce(state, action).map(DestinationAction::Success)
            }
        }
    }
}

/// Term screen reducer
#[derive(Debug, Clone)]
pub struct Feature {
    env: Environment,
}

impl Feature {
    /// Create the reducer
    pub fn new(env: Environment) -> Self {
        Self { env }
    }
}

impl Reducer for Feature {
    type State = State;
    type Action = Action;

    fn reduce(&self, state: &mut State, action: Action) -> Effect<Action> {
        match action {
            Action::OnAppear | Action::Finished(_) => Effect::none(),

            Action::AcceptedTermsToggled => {
                state.accepted_terms = !state.accepted_terms;
                if state.accepted_terms {
                    state.error_message = None;
                }
                Effect::none()
            }

            Action::CreateAccountTapped => {
                if !state.phase().accepts_submit() {
                    return Effect::none();
                }
                if !state.accepted_terms {
                    state.error_message = Some(ValidationError::TermsNotAccepted.to_string());
                    return Effect::none();
                }

                state.is_loading = true;
                state.error_message = None;
                let request = BackendRequest::CreateAccount {
                    account: state.draft.clone(),
                    password: state.password.clone(),
                };
                self.env
                    .request(request, |result| match result {
                        Ok(_) => Action::AccountCreated,
                        Err(error) => Action::CreateAccountFailed(error.user_message()),
                    })
                    .cancellable(state.request_id())
            }

            Action::AccountCreated => {
                state.is_loading = false;
                state.destination = Some(Destination::Success(success::State::account_created()));
                tracing::info!(email = %state.draft.email, "Account created");
                Effect::none()
            }

            Action::CreateAccountFailed(message) => {
                state.is_loading = false;
                state.error_message = Some(message);
                Effect::none()
            }

            Action::BackTapped => Effect::send(Action::Finished(FlowOutcome::Cancelled)),

            Action::Destination(action) => forward(
                &DestinationReducer,
                &mut state.destination,
                action,
                Action::Destination,
                Action::Finished,
            ),
        }
    }

    fn teardown(&self, state: &State) -> Effect<Action> {
        Effect::cancel(state.request_id()).merge(teardown_destination(
            &DestinationReducer,
            &state.destination,
            Action::Destination,
        ))
    }
}
