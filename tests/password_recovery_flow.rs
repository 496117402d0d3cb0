//! Password recovery, end to end
//!
//! Email, verification code, new password, success, and back to the login
//! form. Time is paused so the resend countdown runs instantly.

use std::sync::Arc;
use std::time::Duration;

use app_core::auth::RequestKind;
use app_core::config::{OtpConfig, SimulationConfig};
use app_core::simulated::SimulatedBackend;
use app_state::{PresentationAction, Store};
use app_ui::navigation::Route;
use app_ui::screens::{
    authentication, forgot_password, new_password, otp_code, root, success, Environment,
};

fn auth(action: authentication::Action) -> root::Action {
    root::Action::Destination(PresentationAction::Presented(
        root::DestinationAction::Authentication(action),
    ))
}

fn recovery(action: forgot_password::Action) -> root::Action {
    auth(authentication::Action::Destination(
        PresentationAction::Presented(authentication::DestinationAction::ForgotPassword(action)),
    ))
}

fn otp_step(action: otp_code::Action) -> root::Action {
    recovery(forgot_password::Action::Destination(
        PresentationAction::Presented(forgot_password::DestinationAction::OtpCode(action)),
    ))
}

fn password_step(action: new_password::Action) -> root::Action {
    otp_step(otp_code::Action::Destination(PresentationAction::Presented(
        otp_code::DestinationAction::NewPassword(action),
    )))
}

fn success_step(action: success::Action) -> root::Action {
    password_step(new_password::Action::Destination(
        PresentationAction::Presented(new_password::DestinationAction::Success(action)),
    ))
}

fn store_with(config: SimulationConfig) -> Store<root::Feature> {
    let env = Environment::new(Arc::new(SimulatedBackend::new(config))).with_otp(OtpConfig {
        code_length: 6,
        resend_after_secs: 30,
    });
    Store::new(root::State::default(), root::Feature::new(env))
}

fn current(state: &root::State) -> Option<Route> {
    state.navigation().map(|stack| stack.current())
}

fn recovery_screen(state: &root::State) -> Option<&forgot_password::State> {
    let Some(root::Destination::Authentication(form)) = &state.destination else {
        return None;
    };
    match &form.destination {
        Some(authentication::Destination::ForgotPassword(recovery)) => Some(recovery),
        _ => None,
    }
}

fn otp_screen(state: &root::State) -> Option<&otp_code::State> {
    match &recovery_screen(state)?.destination {
        Some(forgot_password::Destination::OtpCode(otp)) => Some(otp),
        None => None,
    }
}

/// Login form to code entry, with the countdown running
async fn open_code_entry(store: &Store<root::Feature>) -> otp_code::State {
    store.send(auth(authentication::Action::EmailChanged(
        "ana@gmail.com".to_string(),
    )));
    store.send(auth(authentication::Action::ForgotPasswordTapped));
    assert_eq!(
        recovery_screen(&store.state()).map(|s| s.email.clone()),
        Some("ana@gmail.com".to_string())
    );

    store.send(recovery(forgot_password::Action::SendOtpTapped));
    let state = store
        .wait_for(|state| otp_screen(state).is_some())
        .await
        .unwrap();
    assert_eq!(current(&state), Some(Route::OtpCode));

    store.send(otp_step(otp_code::Action::OnAppear));
    let otp = otp_screen(&store.state()).cloned().unwrap();
    assert!(store.is_running(&otp.timer_id()));
    otp
}

#[tokio::test(start_paused = true)]
async fn test_full_recovery_returns_to_login() {
    let store = store_with(SimulationConfig::default());
    let otp = open_code_entry(&store).await;

    store.send(otp_step(otp_code::Action::CodePasted("123456".to_string())));
    assert!(otp_screen(&store.state()).unwrap().is_loading);

    let state = store
        .wait_for(|state| current(state) == Some(Route::NewPassword))
        .await
        .unwrap();
    assert!(!otp_screen(&state).unwrap().is_timer_active);
    assert!(!store.is_running(&otp.timer_id()));

    store.send(password_step(new_password::Action::NewPasswordChanged(
        "Abcdef1!".to_string(),
    )));
    store.send(password_step(new_password::Action::ConfirmPasswordChanged(
        "Abcdef1!".to_string(),
    )));
    store.send(password_step(new_password::Action::SubmitTapped));

    store
        .wait_for(|state| current(state) == Some(Route::Success))
        .await
        .unwrap();
    assert_eq!(
        store.state().navigation().unwrap().routes(),
        vec![
            Route::Authentication,
            Route::ForgotPassword,
            Route::OtpCode,
            Route::NewPassword,
            Route::Success,
        ]
    );

    store.send(success_step(success::Action::FinishTapped));
    let state = store.state();
    assert!(recovery_screen(&state).is_none());
    assert_eq!(current(&state), Some(Route::Authentication));
}

#[tokio::test(start_paused = true)]
async fn test_countdown_enables_resend() {
    let store = store_with(SimulationConfig::default());
    let otp = open_code_entry(&store).await;

    tokio::time::sleep(Duration::from_millis(10_500)).await;
    let state = store.state();
    let screen = otp_screen(&state).unwrap();
    assert_eq!(screen.remaining_seconds, 20);
    assert!(!screen.can_resend);

    tokio::time::sleep(Duration::from_secs(25)).await;
    let state = store.state();
    let screen = otp_screen(&state).unwrap();
    assert_eq!(screen.remaining_seconds, 0);
    assert!(screen.can_resend);
    assert!(!screen.is_timer_active);
    assert!(!store.is_running(&otp.timer_id()));

    store.send(otp_step(otp_code::Action::ResendTapped));
    let state = store.state();
    let screen = otp_screen(&state).unwrap();
    assert_eq!(screen.remaining_seconds, 30);
    assert!(!screen.can_resend);
    assert!(store.is_running(&otp.timer_id()));
}

#[tokio::test(start_paused = true)]
async fn test_refused_code_is_verified_once() {
    let config = SimulationConfig {
        failure_rate: 1.0,
        flaky_requests: [RequestKind::VerifyOtp].into_iter().collect(),
        ..Default::default()
    };
    let store = store_with(config);
    open_code_entry(&store).await;

    store.send(otp_step(otp_code::Action::CodePasted("123456".to_string())));
    let state = store
        .wait_for(|state| otp_screen(state).is_some_and(|otp| otp.error_message.is_some()))
        .await
        .unwrap();
    assert_eq!(
        otp_screen(&state).unwrap().last_submitted.as_deref(),
        Some("123456")
    );

    store.send(otp_step(otp_code::Action::CodePasted("123456".to_string())));
    assert!(!otp_screen(&store.state()).unwrap().is_loading);

    store.send(otp_step(otp_code::Action::DigitChanged {
        index: 5,
        value: "7".to_string(),
    }));
    let state = store.state();
    let screen = otp_screen(&state).unwrap();
    assert!(screen.is_loading);
    assert_eq!(screen.last_submitted.as_deref(), Some("123457"));
}

#[tokio::test(start_paused = true)]
async fn test_leaving_code_entry_stops_countdown() {
    let store = store_with(SimulationConfig::default());
    let otp = open_code_entry(&store).await;

    store.send(otp_step(otp_code::Action::BackTapped));
    let state = store.state();
    assert_eq!(current(&state), Some(Route::ForgotPassword));
    assert!(otp_screen(&state).is_none());
    assert!(!store.is_running(&otp.timer_id()));

    store.send(recovery(forgot_password::Action::BackTapped));
    assert_eq!(current(&store.state()), Some(Route::Authentication));
}

#[tokio::test(start_paused = true)]
async fn test_code_request_dies_with_its_screen() {
    let store = store_with(SimulationConfig::default());
    store.send(auth(authentication::Action::ForgotPasswordTapped));
    store.send(recovery(forgot_password::Action::EmailChanged(
        "first@gmail.com".to_string(),
    )));
    store.send(recovery(forgot_password::Action::SendOtpTapped));
    store.send(recovery(forgot_password::Action::BackTapped));
    assert_eq!(current(&store.state()), Some(Route::Authentication));

    store.send(auth(authentication::Action::ForgotPasswordTapped));
    store.send(recovery(forgot_password::Action::EmailChanged(
        "second@gmail.com".to_string(),
    )));
    tokio::time::sleep(Duration::from_secs(2)).await;

    let state = store.state();
    assert_eq!(current(&state), Some(Route::ForgotPassword));
    let screen = recovery_screen(&state).unwrap();
    assert!(!screen.is_loading);
    assert!(screen.success_message.is_none());
    assert!(otp_screen(&state).is_none());
}

#[tokio::test(start_paused = true)]
async fn test_switching_to_signup_stops_countdown() {
    let store = store_with(SimulationConfig::default());
    let otp = open_code_entry(&store).await;

    store.send(auth(authentication::Action::CreateAccountTapped));
    assert_eq!(current(&store.state()), Some(Route::CreateAccount));
    assert!(!store.is_running(&otp.timer_id()));

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(store.running_effects(), 0);
}

