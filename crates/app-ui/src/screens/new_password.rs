//! New password form
//!
//! Shared by sign-up and password recovery. During sign-up the chosen password
//! is carried to the terms step; during recovery it is sent to the backend
//! and the success screen follows.

use app_core::auth::{AccountDraft, BackendRequest};
use app_core::password::{self, PasswordStrength};
use app_state::{
    Effect, EffectId, FlowAction, FlowOutcome, FlowStep, PresentationAction, Reducer, StepPhase,
};
use uuid::Uuid;

use super::{forward, success, teardown_destination, term, Environment};
use crate::navigation::{Route, Screen};

/// What the new password is for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Sign-up; the draft moves on to the terms step
    CreateAccount(AccountDraft),
    /// Recovery of the account registered under `email`
    Reset {
        /// Account email
        email: String,
    },
}

impl Mode {
    /// Account email
    pub fn email(&self) -> &str {
        match self {
            Mode::CreateAccount(draft) => &draft.email,
            Mode::Reset { email } => email,
        }
    }
}

/// Name of the in-flight password update
pub const UPDATE_PASSWORD_REQUEST: &str = "update-password";

/// New password screen state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    /// Identity of this presentation; scopes the password update
    pub flow_id: Uuid,
    /// Flow this step belongs to
    pub mode: Mode,
    /// Password field
    pub new_password: String,
    /// Confirmation field
    pub confirm_password: String,
    /// Show the password in clear text
    pub is_new_password_visible: bool,
    /// Show the confirmation in clear text
    pub is_confirm_password_visible: bool,
    /// Strength of `new_password`
    pub password_strength: PasswordStrength,
    /// Password update in flight
    pub is_loading: bool,
    /// Message under the form
    pub error_message: Option<String>,
    /// Presented child
    pub destination: Option<Destination>,
}

impl State {
    /// Empty form for `mode`
    pub fn new(mode: Mode) -> Self {
        Self {
            flow_id: Uuid::new_v4(),
            mode,
            new_password: String::new(),
            confirm_password: String::new(),
            is_new_password_visible: false,
            is_confirm_password_visible: false,
            password_strength: PasswordStrength::Weak,
            is_loading: false,
            error_message: None,
            destination: None,
        }
    }

    /// Sign-up form
    pub fn create_account(draft: AccountDraft) -> Self {
        Self::new(Mode::CreateAccount(draft))
    }

    /// Recovery form
    pub fn reset(email: impl Into<String>) -> Self {
        Self::new(Mode::Reset {
            email: email.into(),
        })
    }

    /// Whether the primary button is enabled
    pub fn can_update_password(&self) -> bool {
        password::can_submit(&self.new_password, &self.confirm_password)
    }

    /// Key of the password update request
    pub fn request_id(&self) -> EffectId {
        EffectId::new(UPDATE_PASSWORD_REQUEST, self.flow_id)
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
        Route::NewPassword
    }

    fn presented(&self) -> Option<&dyn Screen> {
        self.destination.as_ref().map(Destination::screen)
    }
}

/// New password screen actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Screen became visible
    OnAppear,
    /// Password field edited
    NewPasswordChanged(String),
    /// Confirmation field edited
    ConfirmPasswordChanged(String),
    /// Eye button of the password field
    ToggleNewPasswordVisibility,
    /// Eye button of the confirmation field
    ToggleConfirmPasswordVisibility,
    /// Primary button
    SubmitTapped,
    /// Recovery: the backend accepted the new password
    PasswordUpdated,
    /// Recovery: the update failed with a user-facing message
    UpdatePasswordFailed(String),
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

/// Screens reachable from the new password form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Sign-up continues with the terms
    Term(term::State),
    /// Recovery done
    Success(success::State),
}

impl Destination {
    fn screen(&self) -> &dyn Screen {
        match self {
            Destination::Term(state) => state,
            Destination::Success(state) => state,
        }
    }
}

/// Actions for [`Destination`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationAction {
    /// Term screen action
    Term(term::Action),
    /// Success screen action
    Success(success::Action),
}

impl FlowAction for DestinationAction {
    fn outcome(&self) -> Option<FlowOutcome> {
        match self {
            DestinationAction::Term(action) => action.outcome(),
            DestinationAction::Success(action) => action.outcome(),
        }
    }
}

/// Reducer for [`Destination`]
#[derive(Debug, Clone)]
pub struct DestinationReducer {
    env: Environment,
}

impl Reducer for DestinationReducer {
    type State = Destination;
    type Action = DestinationAction;

    fn reduce(&self, state: &mut Destination, action: DestinationAction) -> Effect<DestinationAction> {
        match (state, action) {
            (Destination::Term(state), DestinationAction::Term(action)) => term::Feature::new(self.env.clone())
                .reduce(state, action)
                .map(DestinationAction::Term),
            (Destination::Success(state), DestinationAction::Success(action)) => {
                success::Feature.reduce(state, action).map(DestinationAction::Success)
            }
            (_, action) => {
                tracing::debug!(?action, "action for another destination ignored");
                Effect::none()
            }
        }
    }

    fn targets(&self, state: &Destination, action: &DestinationAction) -> bool {
        matches!(
            (state, action),
            (Destination::Term(_), DestinationAction::Term(_))
                | (Destination::Success(_), DestinationAction::Success(_))
        )
    }

    fn teardown(&self, state: &Destination) -> Effect<DestinationAction> {
        match state {
            Destination::Term(state) => term::Feature::new(self.env.clone())
                .teardown(state)
                .map(DestinationAction::Term),
            Destination::Success(_) => Effect::none(),
        }
    }
}

/// New password screen reducer
#[derive(Debug, Clone)]
pub struct Feature {
    env: Environment,
}

impl Feature {
    /// Create the reducer
    pub fn new(env: Environment) -> Self {
        Self { env }
    }

    fn destination(&self) -> DestinationReducer {
        DestinationReducer {
            env: self.env.clone(),
        }
    }
}

impl Reducer for Feature {
    type State = State;
    type Action = Action;

    fn reduce(&self, state: &mut State, action: Action) -> Effect<Action> {
        match action {
            Action::OnAppear | Action::Finished(_) => Effect::none(),

            Action::NewPasswordChanged(value) => {
                state.password_strength = PasswordStrength::of(&value);
                state.new_password = value;
                state.error_message = None;
                Effect::none()
            }

            Action::ConfirmPasswordChanged(value) => {
                state.confirm_password = value;
                state.error_message = None;
                Effect::none()
            }

            Action::ToggleNewPasswordVisibility => {
                state.is_new_password_visible = !state.is_new_password_visible;
                Effect::none()
            }

            Action::ToggleConfirmPasswordVisibility => {
                state.is_confirm_password_visible = !state.is_confirm_password_visible;
                Effect::none()
            }

            Action::SubmitTapped => {
                if !state.phase().accepts_submit() {
                    return Effect::none();
                }
                if let Err(error) =
                    password::validate_new_password(&state.new_password, &state.confirm_password)
                {
                    state.error_message = Some(error.to_string());
                    return Effect::none();
                }
                state.error_message = None;

                match &state.mode {
                    Mode::CreateAccount(draft) => {
                        state.destination = Some(Destination::Term(term::State::new(
                            draft.clone(),
                            state.new_password.clone(),
                        )));
                        Effect::none()
                    }
                    Mode::Reset { email } => {
                        state.is_loading = true;
                        let request = BackendRequest::UpdatePassword {
                            email: email.clone(),
                            password: state.new_password.clone(),
                        };
                        self.env
                            .request(request, |result| match result {
                                Ok(_) => Action::PasswordUpdated,
                                Err(error) => Action::UpdatePasswordFailed(error.user_message()),
                            })
                            .cancellable(state.request_id())
                    }
                }
            }

            Action::PasswordUpdated => {
                state.is_loading = false;
                state.destination = Some(Destination::Success(success::State::password_updated()));
                tracing::info!(email = %state.mode.email(), "Password updated");
                Effect::none()
            }

            Action::UpdatePasswordFailed(message) => {
                state.is_loading = false;
                state.error_message = Some(message);
                Effect::none()
            }

            Action::BackTapped => Effect::send(Action::Finished(FlowOutcome::Cancelled)),

            Action::Destination(action) => forward(
                &self.destination(),
                &mut state.destination,
                action,
                Action::Destination,
                Action::Finished,
            ),
        }
    }

    fn teardown(&self, state: &State) -> Effect<Action> {
        Effect::cancel(state.request_id()).merge(teardown_destination(
            &self.destination(),
            &state.destination,
            Action::Destination,
        ))
    }
}
