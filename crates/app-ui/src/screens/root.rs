//! Application root
//!
//! Switches between the login form and the signed-in home. The switch is
//! driven by the one-level announcements of its children:
//! `authentication::Action::LoggedIn` and `home::Action::LoggedOut`.

use app_state::{present, Effect, FlowAction, PresentationAction, Reducer};

use super::{authentication, home, teardown_destination, Environment};
use crate::navigation::{NavigationStack, Screen};

/// Root state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    /// Presented top-level screen
    pub destination: Option<Destination>,
}

impl Default for State {
    /// The app launches on the login form
    fn default() -> Self {
        Self {
            destination: Some(Destination::Authentication(Default::default())),
        }
    }
}

impl State {
    /// Navigation stack of the presented screens, if any
    pub fn navigation(&self) -> Option<NavigationStack> {
        self.destination
            .as_ref()
            .map(|destination| NavigationStack::from_screen(destination.screen()))
    }

    /// Whether a user is signed in
    pub fn is_authenticated(&self) -> bool {
        matches!(self.destination, Some(Destination::Home(_)))
    }
}

/// Root actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// App launched
    OnAppear,
    /// Action for the presented screen
    Destination(PresentationAction<DestinationAction>),
}

/// Top-level screens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Login form and its flows
    Authentication(authentication::State),
    /// Signed-in home
    Home(home::State),
}

impl Destination {
    fn screen(&self) -> &dyn Screen {
        match self {
            Destination::Authentication(state) => state,
            Destination::Home(state) => state,
        }
    }
}

/// Actions for [`Destination`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationAction {
    /// Login form action
    Authentication(authentication::Action),
    /// Home action
    Home(home::Action),
}

impl FlowAction for DestinationAction {}

/// Reducer for [`Destination`]
#[derive(Debug, Clone)]
pub struct DestinationReducer {
    authentication: authentication::Feature,
}

impl Reducer for DestinationReducer {
    type State = Destination;
    type Action = DestinationAction;

    fn reduce(&self, state: &mut Destination, action: DestinationAction) -> Effect<DestinationAction> {
        match (state, action) {
            (Destination::Authentication(state), DestinationAction::Authentication(action)) => self
                .authentication
                .reduce(state, action)
                .map(DestinationAction::Authentication),
            (Destination::Home(state), DestinationAction::Home(action)) => {
                home::Feature.reduce(state, action).map(DestinationAction::Home)
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
            (Destination::Authentication(_), DestinationAction::Authentication(_))
                | (Destination::Home(_), DestinationAction::Home(_))
        )
    }

    fn teardown(&self, state: &Destination) -> Effect<DestinationAction> {
        match state {
            Destination::Authentication(state) => self
                .authentication
                .teardown(state)
                .map(DestinationAction::Authentication),
            Destination::Home(_) => Effect::none(),
        }
    }
}

/// Root reducer
#[derive(Debug, Clone)]
pub struct Feature {
    destination: DestinationReducer,
}

impl Feature {
    /// Create the reducer
    pub fn new(env: Environment) -> Self {
        Self {
            destination: DestinationReducer {
                authentication: authentication::Feature::new(env),
            },
        }
    }

    /// Replace the presented screen, tearing the old one down
    fn replace(&self, state: &mut State, next: Destination) -> Effect<Action> {
        let effect = teardown_destination(&self.destination, &state.destination, Action::Destination);
        state.destination = Some(next);
        effect
    }
}

impl Reducer for Feature {
    type State = State;
    type Action = Action;

    fn reduce(&self, state: &mut State, action: Action) -> Effect<Action> {
        match action {
            Action::OnAppear => {
                if state.destination.is_none() {
                    state.destination = Some(Destination::Authentication(Default::default()));
                }
                Effect::none()
            }

            Action::Destination(action) => {
                let announcement = match (&state.destination, &action) {
                    (
                        Some(Destination::Authentication(_)),
                        PresentationAction::Presented(DestinationAction::Authentication(
                            authentication::Action::LoggedIn(session),
                        )),
                    ) => Some(Destination::Home(home::State::new(session.clone()))),
                    (
                        Some(Destination::Home(_)),
                        PresentationAction::Presented(DestinationAction::Home(
                            home::Action::LoggedOut,
                        )),
                    ) => Some(Destination::Authentication(Default::default())),
                    _ => None,
                };

                let effect = present(&self.destination, &mut state.destination, action)
                    .effect
                    .map(Action::Destination);

                match announcement {
                    Some(next) => {
                        let authenticated = matches!(next, Destination::Home(_));
                        tracing::info!(authenticated, "Switching root screen");
                        effect.merge(self.replace(state, next))
                    }
                    None => effect,
                }
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
    use crate::navigation::Route;
    use crate::screens::test_support::{session, unused_env};

    fn logged_in(state: &mut State, feature: &Feature) {
        feature.reduce(
            state,
            Action::Destination(PresentationAction::Presented(
                DestinationAction::Authentication(authentication::Action::LoggedIn(session(
                    "ana@gmail.com",
                ))),
            )),
        );
    }

    #[test]
    fn test_launches_on_login() {
        let state = State::default();
        assert!(!state.is_authenticated());
        assert_eq!(
            state.navigation().map(|stack| stack.current()),
            Some(Route::Authentication)
        );
    }

    #[test]
    fn test_on_appear_restores_login() {
        let feature = Feature::new(unused_env());
        let mut state = State { destination: None };
        feature.reduce(&mut state, Action::OnAppear);
        assert!(matches!(
            state.destination,
            Some(Destination::Authentication(_))
        ));
    }

    #[test]
    fn test_login_switches_to_home() {
        let feature = Feature::new(unused_env());
        let mut state = State::default();
        logged_in(&mut state, &feature);
        assert!(state.is_authenticated());
        assert_eq!(
            state.navigation().map(|stack| stack.routes()),
            Some(vec![Route::Home])
        );
    }

    #[test]
    fn test_logout_switches_to_login() {
        let feature = Feature::new(unused_env());
        let mut state = State::default();
        logged_in(&mut state, &feature);
        feature.reduce(
            &mut state,
            Action::Destination(PresentationAction::Presented(DestinationAction::Home(
                home::Action::LoggedOut,
            ))),
        );
        assert_eq!(state, State::default());
    }

    #[test]
    fn test_navigation_follows_presented_chain() {
        let feature = Feature::new(unused_env());
        let mut state = State::default();
        feature.reduce(
            &mut state,
            Action::Destination(PresentationAction::Presented(
                DestinationAction::Authentication(authentication::Action::CreateAccountTapped),
            )),
        );
        let stack = state.navigation().unwrap();
        assert_eq!(
            stack.routes(),
            vec![Route::Authentication, Route::CreateAccount]
        );
        assert!(stack.can_go_back());
    }

    #[test]
    fn test_home_action_while_on_login_is_ignored() {
        let feature = Feature::new(unused_env());
        let mut state = State::default();
        let effect = feature.reduce(
            &mut state,
            Action::Destination(PresentationAction::Presented(DestinationAction::Home(
                home::Action::LogoutTapped,
            ))),
        );
        assert!(effect.is_none());
        assert_eq!(state, State::default());
    }
}
