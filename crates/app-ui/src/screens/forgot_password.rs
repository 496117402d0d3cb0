//! Password recovery: email, first step
//!
//! Sends a verification code to the address and moves on to code entry. The
//! flow continues with a new password and a success screen; dismissing that
//! screen unwinds back to the login form.

use app_core::auth::BackendRequest;
use app_core::validation::{self, EMAIL_SUGGESTIONS};
use app_state::{
    Effect, EffectId, FlowAction, FlowOutcome, FlowStep, PresentationAction, Reducer, StepPhase,
};
use uuid::Uuid;

use super::{forward, otp_code, teardown_destination, Environment};
use crate::navigation::{Route, Screen};

/// Name of the in-flight code request
pub const SEND_OTP_REQUEST: &str = "send-otp";

/// Forgot password screen state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    /// Identity of this presentation; scopes the code request
    pub flow_id: Uuid,
    /// Email field
    pub email: String,
    /// Domain badges are visible
    pub should_show_email_suggestions: bool,
    /// Code request in flight
    pub is_loading: bool,
    /// Message under the form
    pub error_message: Option<String>,
    /// Confirmation that a code was sent
    pub success_message: Option<String>,
    /// Presented child
    pub destination: Option<Destination>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            flow_id: Uuid::new_v4(),
            email: String::new(),
            should_show_email_suggestions: false,
            is_loading: false,
            error_message: None,
            success_message: None,
            destination: None,
        }
    }
}

impl State {
    /// Domain badges
    pub fn email_suggestions(&self) -> &'static [&'static str] {
        &EMAIL_SUGGESTIONS
    }

    /// Key of the code request
    pub fn request_id(&self) -> EffectId {
        EffectId::new(SEND_OTP_REQUEST, self.flow_id)
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
        Route::ForgotPassword
    }

    fn presented(&self) -> Option<&dyn Screen> {
        self.destination.as_ref().map(Destination::screen)
    }
}

/// Forgot password screen actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Screen became visible
    OnAppear,
    /// Email field edited
    EmailChanged(String),
    /// A domain badge was tapped
    EmailSuggestionTapped(String),
    /// Primary button
    SendOtpTapped,
    /// The code was sent
    SendOtpSucceeded,
    /// Sending failed, with a user-facing message
    SendOtpFailed(String),
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

/// Screens reachable from the recovery email step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Code entry
    OtpCode(otp_code::State),
}

impl Destination {
    fn screen(&self) -> &dyn Screen {
        match self {
            Destination::OtpCode(state) => state,
        }
    }
}

/// Actions for [`Destination`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationAction {
    /// OTP screen action
    OtpCode(otp_code::Action),
}

impl FlowAction for DestinationAction {
    fn outcome(&self) -> Option<FlowOutcome> {
        match self {
            DestinationAction::OtpCode(action) => action.outcome(),
        }
    }
}

/// Reducer for [`Destination`]
#[derive(Debug, Clone)]
pub struct DestinationReducer {
    feature: otp_code::Feature,
}

impl Reducer for DestinationReducer {
    type State = Destination;
    type Action = DestinationAction;

    fn reduce(&self, state: &mut Destination, action: DestinationAction) -> Effect<DestinationAction> {
        match (state, action) {
            (Destination::OtpCode(state), DestinationAction::OtpCode(action)) => {
                self.feature.reduce(state, action).map(DestinationAction::OtpCode)
            }
        }
    }

    fn teardown(&self, state: &Destination) -> Effect<DestinationAction> {
        match state {
            Destination::OtpCode(state) => {
                self.feature.teardown(state).map(DestinationAction::OtpCode)
            }
        }
    }
}

/// Forgot password screen reducer
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
                feature: otp_code::Feature::new(env.clone()),
            },
            env,
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

            Action::SendOtpTapped => {
                if !state.phase().accepts_submit() {
                    return Effect::none();
                }
                if let Err(error) = validation::validate_email(&state.email) {
                    state.error_message = Some(error.to_string());
                    return Effect::none();
                }

                state.is_loading = true;
                state.error_message = None;
                state.success_message = None;
                let request = BackendRequest::SendOtp {
                    email: state.email.trim().to_string(),
                };
                self.env
                    .request(request, |result| match result {
                        Ok(_) => Action::SendOtpSucceeded,
                        Err(error) => Action::SendOtpFailed(error.user_message()),
                    })
                    .cancellable(state.request_id())
            }

            Action::SendOtpSucceeded => {
                let email = state.email.trim().to_string();
                state.is_loading = false;
                state.success_message = Some(format!("Enviamos um código para {}", email));
                state.destination = Some(Destination::OtpCode(otp_code::State::new(
                    email,
                    &self.env.otp,
                )));
                Effect::none()
            }

            Action::SendOtpFailed(message) => {
                state.is_loading = false;
                state.error_message = Some(message);
                Effect::none()
            }

            Action::BackTapped => Effect::send(Action::Finished(FlowOutcome::Cancelled)),

            Action::Finished(outcome) => {
                tracing::debug!(?outcome, "Password recovery flow finished");
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
        Effect::cancel(state.request_id()).merge(teardown_destination(
            &self.destination,
            &state.destination,
            Action::Destination,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::test_support::{
        accepting_env, rejecting_env, run_effects, unused_env, MockBackend,
    };
    use app_core::auth::BackendResponse;
    use mockall::predicate::eq;
    use std::sync::Arc;

    async fn send(feature: &Feature, state: &mut State) {
        let effect = feature.reduce(state, Action::SendOtpTapped);
        for action in run_effects(effect).await {
            feature.reduce(state, action);
        }
    }

    #[test]
    fn test_invalid_email_rejected() {
        let feature = Feature::new(unused_env());
        let mut state = State::default();
        feature.reduce(&mut state, Action::EmailChanged("ana".to_string()));
        let effect = feature.reduce(&mut state, Action::SendOtpTapped);
        assert!(effect.is_none());
        assert!(!state.is_loading);
        assert_eq!(
            state.error_message.as_deref(),
            Some("Por favor, insira um email válido")
        );
    }

    #[tokio::test]
    async fn test_sent_code_presents_otp() {
        let feature = Feature::new(accepting_env());
        let mut state = State::default();
        feature.reduce(&mut state, Action::EmailChanged("ana@gm".to_string()));
        feature.reduce(
            &mut state,
            Action::EmailSuggestionTapped("@gmail.com".to_string()),
        );
        send(&feature, &mut state).await;

        assert!(!state.is_loading);
        assert_eq!(
            state.success_message.as_deref(),
            Some("Enviamos um código para ana@gmail.com")
        );
        match &state.destination {
            Some(Destination::OtpCode(otp)) => {
                assert_eq!(otp.email, "ana@gmail.com");
                assert_eq!(otp.code.len(), 6);
            }
            other => panic!("unexpected destination: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_failure_sets_error() {
        let feature = Feature::new(rejecting_env("Email não encontrado"));
        let mut state = State::default();
        feature.reduce(&mut state, Action::EmailChanged("ana@gmail.com".to_string()));
        send(&feature, &mut state).await;

        assert_eq!(state.error_message.as_deref(), Some("Email não encontrado"));
        assert!(state.destination.is_none());
        assert_eq!(state.email, "ana@gmail.com");
        assert_eq!(state.phase(), StepPhase::Error);
    }

    #[test]
    fn test_double_tap_sends_once() {
        let feature = Feature::new(accepting_env());
        let mut state = State::default();
        feature.reduce(&mut state, Action::EmailChanged("ana@gmail.com".to_string()));
        assert!(feature
            .reduce(&mut state, Action::SendOtpTapped)
            .has_async_work());
        assert!(feature.reduce(&mut state, Action::SendOtpTapped).is_none());
    }

    #[test]
    fn test_otp_back_returns_here() {
        let feature = Feature::new(unused_env());
        let otp = otp_code::State::new("ana@gmail.com", &Default::default());
        let timer = otp.timer_id();
        let mut state = State {
            destination: Some(Destination::OtpCode(otp)),
            ..Default::default()
        };

        let effect = feature.reduce(
            &mut state,
            Action::Destination(PresentationAction::Presented(DestinationAction::OtpCode(
                otp_code::Action::Finished(FlowOutcome::Cancelled),
            ))),
        );
        assert!(state.destination.is_none());
        assert!(effect.sent_actions().is_empty());
        assert!(effect.cancellations().contains(&timer));
    }

    #[tokio::test]
    async fn test_email_field_is_not_rewritten_on_submit() {
        let mut backend = MockBackend::new();
        backend
            .expect_submit()
            .with(eq(BackendRequest::SendOtp {
                email: "ana@gmail.com".to_string(),
            }))
            .times(1)
            .returning(|_| Ok(BackendResponse::Accepted));
        let feature = Feature::new(Environment::new(Arc::new(backend)));
        let mut state = State::default();
        feature.reduce(&mut state, Action::EmailChanged(" ana@gmail.com ".to_string()));

        let effect = feature.reduce(&mut state, Action::SendOtpTapped);
        assert_eq!(state.email, " ana@gmail.com ");
        for action in run_effects(effect).await {
            feature.reduce(&mut state, action);
        }
        match &state.destination {
            Some(Destination::OtpCode(otp)) => assert_eq!(otp.email, "ana@gmail.com"),
            other => panic!("unexpected destination: {:?}", other),
        }
    }

    #[test]
    fn test_code_request_is_scoped_to_this_screen() {
        let feature = Feature::new(accepting_env());
        let mut state = State::default();
        feature.reduce(&mut state, Action::EmailChanged("ana@gmail.com".to_string()));

        let effect = feature.reduce(&mut state, Action::SendOtpTapped);
        assert!(matches!(
            &effect,
            Effect::Run { id: Some(id), .. } if *id == state.request_id()
        ));
        assert_ne!(State::default().request_id(), state.request_id());
        assert_eq!(feature.teardown(&state).cancellations(), vec![state.request_id()]);
    }
}
