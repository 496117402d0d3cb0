//! Confirmation shown at the end of a flow

use app_state::{Effect, FlowAction, FlowOutcome, Reducer};
use serde::{Deserialize, Serialize};

use crate::navigation::{Route, Screen};

/// Icon tint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconColor {
    /// Default tint
    #[default]
    Blue,
    /// Security related confirmations
    Green,
}

/// Success screen state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    /// Headline
    pub title: String,
    /// Explanation below the headline
    pub subtitle: String,
    /// Symbol name of the icon
    pub icon_name: String,
    /// Icon tint
    pub icon_color: IconColor,
}

impl Default for State {
    fn default() -> Self {
        Self {
            title: "Tudo pronto!".to_string(),
            subtitle: "Operação realizada com sucesso.".to_string(),
            icon_name: "checkmark.circle.fill".to_string(),
            icon_color: IconColor::Blue,
        }
    }
}

impl State {
    /// Shown after the account was created
    pub fn account_created() -> Self {
        Self {
            title: "Conta criada!".to_string(),
            subtitle: "Sua conta foi criada com sucesso. Agora você pode fazer login.".to_string(),
            icon_name: "person.crop.circle.badge.checkmark".to_string(),
            icon_color: IconColor::Blue,
        }
    }

    /// Shown after a password reset
    pub fn password_updated() -> Self {
        Self {
            title: "Senha Atualizada!".to_string(),
            subtitle: "Sua senha foi atualizada com sucesso. Agora você pode fazer login com sua nova senha.".to_string(),
            icon_name: "checkmark.shield.fill".to_string(),
            icon_color: IconColor::Green,
        }
    }
}

impl Screen for State {
    fn route(&self) -> Route {
        Route::Success
    }

    fn presented(&self) -> Option<&dyn Screen> {
        None
    }
}

/// Success screen actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Screen became visible
    OnAppear,
    /// Primary button
    FinishTapped,
    /// Back button
    BackTapped,
    /// The flow ended
    Finished(FlowOutcome),
}

impl FlowAction for Action {
    fn outcome(&self) -> Option<FlowOutcome> {
        match self {
            Action::Finished(outcome) => Some(*outcome),
            _ => None,
        }
    }
}

/// Success screen reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct Feature;

impl Reducer for Feature {
    type State = State;
    type Action = Action;

    fn reduce(&self, _state: &mut State, action: Action) -> Effect<Action> {
        match action {
            Action::OnAppear | Action::Finished(_) => Effect::none(),
            Action::FinishTapped => Effect::send(Action::Finished(FlowOutcome::Completed)),
            Action::BackTapped => Effect::send(Action::Finished(FlowOutcome::Cancelled)),
        }
    }
}
