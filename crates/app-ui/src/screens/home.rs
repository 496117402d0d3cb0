//! Signed-in home

use app_core::auth::Session;
use app_state::{Effect, FlowAction, Reducer};

use crate::navigation::{Route, Screen};

/// Home screen state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    /// Current session
    pub session: Session,
}

impl State {
    /// Home for `session`
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Greeting shown in the header
    pub fn greeting(&self) -> String {
        format!("Olá, {}", self.session.display_name)
    }
}

impl Screen for State {
    fn route(&self) -> Route {
        Route::Home
    }

    fn presented(&self) -> Option<&dyn Screen> {
        None
    }
}

/// Home screen actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Screen became visible
    OnAppear,
    /// Logout button
    LogoutTapped,
    /// The session ended; observed by the root screen
    LoggedOut,
}

impl FlowAction for Action {}

/// Home screen reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct Feature;

impl Reducer for Feature {
    type State = State;
    type Action = Action;

    fn reduce(&self, state: &mut State, action: Action) -> Effect<Action> {
        match action {
            Action::OnAppear | Action::LoggedOut => Effect::none(),
            Action::LogoutTapped => {
                tracing::info!(email = %state.session.email, "Logging out");
                Effect::send(Action::LoggedOut)
            }
        }
    }
}
