//! Password recovery: verification code
//!
//! The code sent by email is typed one digit per box and verified as soon as
//! the last box is filled. A countdown gates the resend button; it runs as a
//! timer effect keyed by this screen's `flow_id`, so dismissing the screen (or
//! any ancestor) stops it.

use app_core::auth::BackendRequest;
use app_core::config::OtpConfig;
use app_core::otp::OtpCode;
use app_core::validation::ValidationError;
use app_state::{
    Effect, EffectId, FlowAction, FlowOutcome, FlowStep, PresentationAction, Reducer, StepPhase,
};
use std::time::Duration;
use uuid::Uuid;

use super::{forward, new_password, teardown_destination, Environment};
use crate::navigation::{Route, Screen};

/// Name of the resend countdown timer
pub const RESEND_TIMER: &str = "otp-resend";

/// Name of the in-flight verification request
pub const VERIFY_REQUEST: &str = "otp-verify";

/// OTP screen state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    /// Identity of this presentation; scopes the timer
    pub flow_id: Uuid,
    /// Address the code was sent to
    pub email: String,
    /// Digits typed so far
    pub code: OtpCode,
    /// Seconds until a new code may be requested
    pub remaining_seconds: u32,
    /// Countdown start value
    pub resend_after_secs: u32,
    /// The resend button is enabled
    pub can_resend: bool,
    /// The countdown is running
    pub is_timer_active: bool,
    /// Verification in flight
    pub is_loading: bool,
    /// Message under the form
    pub error_message: Option<String>,
    /// Last code sent for verification
    pub last_submitted: Option<String>,
    /// Presented child
    pub destination: Option<Destination>,
}

impl State {
    /// Code entry for `email`
    pub fn new(email: impl Into<String>, config: &OtpConfig) -> Self {
        Self {
            flow_id: Uuid::new_v4(),
            email: email.into(),
            code: OtpCode::new(config.code_length),
            remaining_seconds: config.resend_after_secs,
            resend_after_secs: config.resend_after_secs,
            can_resend: config.resend_after_secs == 0,
            is_timer_active: config.resend_after_secs > 0,
            is_loading: false,
            error_message: None,
            last_submitted: None,
            destination: None,
        }
    }

    /// Key of the countdown timer
    pub fn timer_id(&self) -> EffectId {
        EffectId::new(RESEND_TIMER, self.flow_id)
    }

    fn verify_id(&self) -> EffectId {
        EffectId::new(VERIFY_REQUEST, self.flow_id)
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
        Route::OtpCode
    }

    fn presented(&self) -> Option<&dyn Screen> {
        self.destination.as_ref().map(Destination::screen)
    }
}

/// OTP screen actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Screen became visible; starts the countdown
    OnAppear,
    /// Box `index` now contains `value`
    DigitChanged {
        /// Box index
        index: usize,
        /// Text in the box
        value: String,
    },
    /// A whole code was pasted
    CodePasted(String),
    /// The user moved focus to a box
    FocusChanged(usize),
    /// Verify button, or the code was completed
    VerifyTapped,
    /// The code was accepted
    VerifySucceeded,
    /// The code was refused, with a user-facing message
    VerifyFailed(String),
    /// Resend button
    ResendTapped,
    /// A new code was sent
    ResendSucceeded,
    /// Sending a new code failed, with a user-facing message
    ResendFailed(String),
    /// One second elapsed
    TimerTicked,
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

/// Screens reachable from the code step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Choose the new password
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

/// OTP screen reducer
#[derive(Debug, Clone)]
pub struct Feature {
    env: Environment,
    destination: DestinationReducer,
}

impl Feature {
    /// Create the reducer
    pub fn new(env: Environment) -> Self {
        Self {
            destination: DestinationReducer {
                feature: new_password::Feature::new(env.clone()),
            },
            env,
        }
    }

    fn start_timer(state: &State) -> Effect<Action> {
        Effect::timer(state.timer_id(), Duration::from_secs(1), || Action::TimerTicked)
    }

    /// Verify a freshly completed code, once per distinct code
    fn auto_verify(state: &State) -> Effect<Action> {
        match state.code.complete_code() {
            Some(code) if state.last_submitted.as_ref() != Some(&code) && !state.is_loading => {
                Effect::send(Action::VerifyTapped)
            }
            _ => Effect::none(),
        }
    }
}

impl Reducer for Feature {
    type State = State;
    type Action = Action;

    fn reduce(&self, state: &mut State, action: Action) -> Effect<Action> {
        match action {
            Action::OnAppear => {
                if state.is_timer_active && state.destination.is_none() {
                    Self::start_timer(state)
                } else {
                    Effect::none()
                }
            }

            Action::DigitChanged { index, value } => {
                state.code.input(index, &value);
                state.error_message = None;
                Self::auto_verify(state)
            }

            Action::CodePasted(value) => {
                state.code.paste(&value);
                state.error_message = None;
                Self::auto_verify(state)
            }

            Action::FocusChanged(index) => {
                state.code.set_focus(index);
                Effect::none()
            }

            Action::VerifyTapped => {
                if !state.phase().accepts_submit() {
                    return Effect::none();
                }
                let Some(code) = state.code.complete_code() else {
                    state.error_message = Some(ValidationError::IncompleteCode.to_string());
                    return Effect::none();
                };

                state.last_submitted = Some(code.clone());
                state.is_loading = true;
                state.error_message = None;
                let request = BackendRequest::VerifyOtp {
                    email: state.email.clone(),
                    code,
                };
                self.env
                    .request(request, |result| match result {
                        Ok(_) => Action::VerifySucceeded,
                        Err(error) => Action::VerifyFailed(error.user_message()),
                    })
                    .cancellable(state.verify_id())
            }

            Action::VerifySucceeded => {
                state.is_loading = false;
                state.is_timer_active = false;
                state.destination = Some(Destination::NewPassword(new_password::State::reset(
                    state.email.clone(),
                )));
                Effect::cancel(state.timer_id())
            }

            Action::VerifyFailed(message) => {
                state.is_loading = false;
                state.error_message = Some(message);
                Effect::none()
            }

            Action::ResendTapped => {
                if !state.can_resend || state.is_loading {
                    return Effect::none();
                }
                state.remaining_seconds = state.resend_after_secs;
                state.can_resend = false;
                state.is_timer_active = true;
                state.code.reset();
                state.last_submitted = None;
                state.error_message = None;

                let request = BackendRequest::SendOtp {
                    email: state.email.clone(),
                };
                Self::start_timer(state).merge(self.env.request(request, |result| match result {
                    Ok(_) => Action::ResendSucceeded,
                    Err(error) => Action::ResendFailed(error.user_message()),
                }))
            }

            Action::ResendSucceeded => {
                tracing::debug!(email = %state.email, "Verification code sent again");
                Effect::none()
            }

            Action::ResendFailed(message) => {
                state.error_message = Some(message);
                state.can_resend = true;
                state.is_timer_active = false;
                Effect::cancel(state.timer_id())
            }

            Action::TimerTicked => {
                if !state.is_timer_active {
                    return Effect::none();
                }
                state.remaining_seconds = state.remaining_seconds.saturating_sub(1);
                if state.remaining_seconds == 0 {
                    state.can_resend = true;
                    state.is_timer_active = false;
                    return Effect::cancel(state.timer_id());
                }
                Effect::none()
            }

            Action::BackTapped => Effect::send(Action::Finished(FlowOutcome::Cancelled)),

            Action::Finished(_) => Effect::none(),

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
        Effect::cancel(state.timer_id())
            .merge(Effect::cancel(state.verify_id()))
            .merge(teardown_destination(
                &self.destination,
                &state.destination,
                Action::Destination,
            ))
    }
}
