//! Login form
//!
//! Entry point for unauthenticated users. Presents the sign-up and password
//! recovery flows and absorbs their outcome: either way, the user ends up back
//! on this form. A successful login is announced with [`Action::LoggedIn`],
//! which the root screen observes.

use app_core::auth::{BackendRequest, Session};
use app_core::validation::{self, EMAIL_SUGGESTIONS};
use app_state::{present, Effect, FlowAction, FlowOutcome, FlowStep, PresentationAction, Reducer, StepPhase};

use super::{create_account, forgot_password, teardown_destination, Environment};
use crate::navigation::{Route, Screen};

/// Login screen state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct State {
    /// Email field
    pub email: String,
    /// Password field
    pub password: String,
    /// Show the password in clear text
    pub is_password_visible: bool,
    /// Domain badges are visible
    pub should_show_email_suggestions: bool,
    /// Login in flight
    pub is_loading: bool,
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
        StepPhase::derive(
            self.is_loading,
            self.error_message.is_some(),
            self.destination.is_some(),
        )
    }
}

impl Screen for State {
    fn route(&self) -> Route {
        Route::Authentication
    }

    fn presented(&self) -> Option<&dyn Screen> {
        self.destination.as_ref().map(Destination::screen)
    }
}

/// Login screen actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Screen became visible
    OnAppear,
    /// Email field edited
    EmailChanged(String),
    /// Password field edited
    PasswordChanged(String),
    /// A domain badge was tapped
    EmailSuggestionTapped(String),
    /// Eye button of the password field
    TogglePasswordVisibility,
    /// Primary button
    LoginTapped,
    /// The backend opened a session
    LoginSucceeded(Session),
    /// Login failed, with a user-facing message
    LoginFailed(String),
    /// "Criar conta" link
    CreateAccountTapped,
    /// "Esqueci minha senha" link
    ForgotPasswordTapped,
    /// The user is signed in; observed by the root screen
    LoggedIn(Session),
    /// Action for the presented child
    Destination(PresentationAction<DestinationAction>),
}

impl FlowAction for Action {}

/// Flows started from the login form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Sign-up
    CreateAccount(create_account::State),
    /// Password recovery
    ForgotPassword(forgot_password::State),
}

impl Destination {
    fn screen(&self) -> &dyn Screen {
        match self {
            Destination::CreateAccount(state) => state,
            Destination::ForgotPassword(state) => state,
        }
    }
}

/// Actions for [`Destination`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationAction {
    /// Sign-up action
    CreateAccount(create_account::Action),
    /// Password recovery action
    ForgotPassword(forgot_password::Action),
}

impl FlowAction for DestinationAction {
    fn outcome(&self) -> Option<FlowOutcome> {
        match self {
            DestinationAction::CreateAccount(action) => action.outcome(),
            DestinationAction::ForgotPassword(action) => action.outcome(),
        }
    }
}

/// Reducer for [`Destination`]
#[derive(Debug, Clone)]
pub struct DestinationReducer {
    create_account: create_account::Feature,
    forgot_password: forgot_password::Feature,
}

impl Reducer for DestinationReducer {
    type State = Destination;
    type Action = DestinationAction;

    fn reduce(&self, state: &mut Destination, action: DestinationAction) -> Effect<DestinationAction> {
        match (state, action) {
            (Destination::CreateAccount(state), DestinationAction::CreateAccount(action)) => self
                .create_account
                .reduce(state, action)
                .map(DestinationAction::CreateAccount),
            (Destination::ForgotPassword(state), DestinationAction::ForgotPassword(action)) => self
                .forgot_password
                .reduce(state, action)
                .map(DestinationAction::ForgotPassword),
            (_, action) => {
                tracing::debug!(?action, "action for another destination ignored");
                Effect::none()
            }
        }
    }

    fn targets(&self, state: &Destination, action: &DestinationAction) -> bool {
        matches!(
            (state, action),
            (Destination::CreateAccount(_), DestinationAction::CreateAccount(_))
                | (Destination::ForgotPassword(_), DestinationAction::ForgotPassword(_))
        )
    }

    fn teardown(&self, state: &Destination) -> Effect<DestinationAction> {
        match state {
            Destination::CreateAccount(state) => self
                .create_account
                .teardown(state)
                .map(DestinationAction::CreateAccount),
            Destination::ForgotPassword(state) => self
                .forgot_password
                .teardown(state)
                .map(DestinationAction::ForgotPassword),
        }
    }
}

/// Login screen reducer
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
                create_account: create_account::Feature::new(env.clone()),
                forgot_password: forgot_password::Feature::new(env.clone()),
            },
            env,
        }
    }

    /// Present `next`, tearing down the flow it replaces
    fn replace(&self, state: &mut State, next: Destination) -> Effect<Action> {
        let effect = teardown_destination(&self.destination, &state.destination, Action::Destination);
        state.error_message = None;
        state.destination = Some(next);
        effect
    }
}

impl Reducer for Feature {
    type State = State;
    type Action = Action;

    fn reduce(&self, state: &mut State, action: Action) -> Effect<Action> {
        match action {
            Action::OnAppear | Action::LoggedIn(_) => Effect::none(),

            Action::EmailChanged(value) => {
                state.should_show_email_suggestions = validation::should_suggest_domains(&value);
                state.email = value;
                state.error_message = None;
                Effect::none()
            }

            Action::PasswordChanged(value) => {
                state.password = value;
                state.error_message = None;
                Effect::none()
            }

            Action::EmailSuggestionTapped(suggestion) => {
                state.email = validation::apply_email_suggestion(&state.email, &suggestion);
                state.should_show_email_suggestions =
                    validation::should_suggest_domains(&state.email);
                Effect::none()
            }

            Action::TogglePasswordVisibility => {
                state.is_password_visible = !state.is_password_visible;
                Effect::none()
            }

            Action::LoginTapped => {
                if !state.phase().accepts_submit() {
                    return Effect::none();
                }
                if let Err(error) = validation::validate_credentials(&state.email, &state.password) {
                    state.error_message = Some(error.to_string());
                    return Effect::none();
                }

                state.is_loading = true;
                state.error_message = None;
                let request = BackendRequest::Login {
                    email: state.email.trim().to_string(),
                    password: state.password.clone(),
                };
                self.env.request(request, |result| {
                    match result.and_then(|response| response.into_session()) {
                        Ok(session) => Action::LoginSucceeded(session),
                        Err(error) => Action::LoginFailed(error.user_message()),
                    }
                })
            }

            Action::LoginSucceeded(session) => {
                state.is_loading = false;
                state.password.clear();
                tracing::info!(email = %session.email, "Logged in");
                Effect::send(Action::LoggedIn(session))
            }

            Action::LoginFailed(message) => {
                state.is_loading = false;
                state.error_message = Some(message);
                Effect::none()
            }

            Action::CreateAccountTapped => {
                self.replace(state, Destination::CreateAccount(Default::default()))
            }

            Action::ForgotPasswordTapped => {
                let next = Destination::ForgotPassword(forgot_password::State {
                    email: state.email.trim().to_string(),
                    should_show_email_suggestions: validation::should_suggest_domains(&state.email),
                    ..Default::default()
                });
                self.replace(state, next)
            }

            Action::Destination(action) => {
                let presentation = present(&self.destination, &mut state.destination, action);
                if let Some(outcome) = presentation.outcome {
                    tracing::debug!(?outcome, "Returned to login");
                }
                presentation.effect.map(Action::Destination)
            }
        }
    }

    fn teardown(&self, state: &State) -> Effect<Action> {
        teardown_destination(&self.destination, &state.destination, Action::Destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::otp_code;
    use crate::screens::test_support::{rejecting_env, run_effects, session, unused_env, MockBackend};
    use app_core::auth::{BackendError, BackendResponse};
    use mockall::predicate::eq;
    use std::sync::Arc;

    fn filled() -> State {
        State {
            email: "ana@gmail.com".to_string(),
            password: "secret".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_password_rejected() {
        let feature = Feature::new(unused_env());
        let mut state = State::default();
        feature.reduce(&mut state, Action::EmailChanged("ana@gmail.com".to_string()));
        feature.reduce(&mut state, Action::LoginTapped);
        assert_eq!(state.error_message.as_deref(), Some("Por favor, insira sua senha"));
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_login_announces_session() {
        let expected = session("ana@gmail.com");
        let response = expected.clone();
        let mut backend = MockBackend::new();
        backend
            .expect_submit()
            .with(eq(BackendRequest::Login {
                email: "ana@gmail.com".to_string(),
                password: "secret".to_string(),
            }))
            .times(1)
            .returning(move |_| Ok(BackendResponse::Session(response.clone())));
        let feature = Feature::new(Environment::new(Arc::new(backend)));
        let mut state = filled();

        let effect = feature.reduce(&mut state, Action::LoginTapped);
        assert_eq!(state.phase(), StepPhase::Submitting);
        let actions = run_effects(effect).await;
        assert_eq!(actions, vec![Action::LoginSucceeded(expected.clone())]);

        let effect = feature.reduce(&mut state, Action::LoginSucceeded(expected.clone()));
        assert_eq!(effect.sent_actions(), vec![&Action::LoggedIn(expected)]);
        assert!(state.password.is_empty());
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_login_failure_keeps_fields() {
        let feature = Feature::new(rejecting_env("Email ou senha incorretos"));
        let mut state = filled();
        let effect = feature.reduce(&mut state, Action::LoginTapped);
        for action in run_effects(effect).await {
            feature.reduce(&mut state, action);
        }
        assert_eq!(
            state.error_message.as_deref(),
            Some("Email ou senha incorretos")
        );
        assert_eq!(state.password, "secret");
    }

    #[tokio::test]
    async fn test_accepted_without_session_is_an_error() {
        let mut backend = MockBackend::new();
        backend
            .expect_submit()
            .returning(|_| Ok(BackendResponse::Accepted));
        let feature = Feature::new(Environment::new(Arc::new(backend)));
        let mut state = filled();

        let actions = run_effects(feature.reduce(&mut state, Action::LoginTapped)).await;
        assert_eq!(
            actions,
            vec![Action::LoginFailed(
                BackendError::InvalidResponse(String::new()).user_message()
            )]
        );
    }

    #[test]
    fn test_links_present_flows() {
        let feature = Feature::new(unused_env());
        let mut state = filled();
        feature.reduce(&mut state, Action::ForgotPasswordTapped);
        match &state.destination {
            Some(Destination::ForgotPassword(next)) => assert_eq!(next.email, "ana@gmail.com"),
            other => panic!("unexpected destination: {:?}", other),
        }

        feature.reduce(&mut state, Action::Destination(PresentationAction::Dismiss));
        feature.reduce(&mut state, Action::CreateAccountTapped);
        assert!(matches!(
            state.destination,
            Some(Destination::CreateAccount(_))
        ));
    }

    #[test]
    fn test_completed_flow_returns_to_form() {
        let feature = Feature::new(unused_env());
        let mut state = State {
            destination: Some(Destination::CreateAccount(Default::default())),
            ..Default::default()
        };
        let effect = feature.reduce(
            &mut state,
            Action::Destination(PresentationAction::Presented(
                DestinationAction::CreateAccount(create_account::Action::Finished(
                    FlowOutcome::Completed,
                )),
            )),
        );
        assert!(state.destination.is_none());
        assert!(effect.sent_actions().is_empty());
        assert_eq!(state.phase(), StepPhase::Editing);
    }

    #[test]
    fn test_new_flow_tears_down_the_previous_one() {
        let feature = Feature::new(unused_env());
        let otp = otp_code::State::new("ana@gmail.com", &Default::default());
        let timer = otp.timer_id();
        let mut state = State {
            destination: Some(Destination::ForgotPassword(forgot_password::State {
                destination: Some(forgot_password::Destination::OtpCode(otp)),
                ..Default::default()
            })),
            ..Default::default()
        };

        let effect = feature.reduce(&mut state, Action::CreateAccountTapped);
        assert!(effect.cancellations().contains(&timer));
        assert!(matches!(
            state.destination,
            Some(Destination::CreateAccount(_))
        ));
    }

    #[test]
    fn test_finished_for_inactive_flow_keeps_child() {
        let feature = Feature::new(unused_env());
        let mut state = State::default();
        feature.reduce(&mut state, Action::CreateAccountTapped);
        let before = state.clone();

        let effect = feature.reduce(
            &mut state,
            Action::Destination(PresentationAction::Presented(
                DestinationAction::ForgotPassword(forgot_password::Action::Finished(
                    FlowOutcome::Cancelled,
                )),
            )),
        );
        assert!(effect.is_none());
        assert_eq!(state, before);
    }
}
