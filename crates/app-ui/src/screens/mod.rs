//! Application screens
//!
//! Every screen is a [`Reducer`] over its own `State` and `Action`. Screens that
//! move the user forward own an optional `destination`: a sum of the screens
//! reachable from there, driven through [`present`].
//!
//! Flow steps share a few conventions:
//!
//! - fields are validated when the primary action is tapped, never while
//!   typing; editing a field clears a stale error message
//! - `BackTapped` dispatches `Finished(Cancelled)`, which only the immediate
//!   presenter observes
//! - when a child finishes with [`FlowOutcome::Completed`], the presenter
//!   clears its destination and dispatches its own `Finished(Completed)`

use std::fmt;
use std::sync::Arc;

use app_core::auth::{AccountBackend, BackendError, BackendRequest, BackendResponse};
use app_core::config::OtpConfig;
use app_state::{present, Effect, FlowAction, FlowOutcome, PresentationAction, Reducer};

pub mod authentication;
pub mod cpf;
pub mod create_account;
pub mod documents;
pub mod forgot_password;
pub mod home;
pub mod new_password;
pub mod otp_code;
pub mod phone;
pub mod root;
pub mod success;
pub mod term;

/// Dependencies shared by every screen
#[derive(Clone)]
pub struct Environment {
    /// Account service
    pub backend: Arc<dyn AccountBackend>,
    /// Verification code settings
    pub otp: OtpConfig,
}

impl Environment {
    /// Environment with default code settings
    pub fn new(backend: Arc<dyn AccountBackend>) -> Self {
        Self {
            backend,
            otp: OtpConfig::default(),
        }
    }

    /// Override the verification code settings
    pub fn with_otp(mut self, otp: OtpConfig) -> Self {
        self.otp = otp;
        self
    }

    /// Submit `request` in the background and turn the result into an action
    pub(crate) fn request<A, F>(&self, request: BackendRequest, into_action: F) -> Effect<A>
    where
        A: Send + 'static,
        F: FnOnce(Result<BackendResponse, BackendError>) -> A + Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        Effect::run(async move {
            let kind = request.kind();
            let result = backend.submit(request).await;
            match &result {
                Ok(_) => tracing::debug!(?kind, "Request succeeded"),
                Err(error) => tracing::warn!(?kind, %error, "Request failed"),
            }
            into_action(result)
        })
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("otp", &self.otp)
            .finish_non_exhaustive()
    }
}

/// Route a destination action and lift the resulting effect
///
/// A completed child is re-emitted through `finished` so the screen reports
/// completion to its own presenter. Cancelled children stop here.
pub(crate) fn forward<R, A>(
    router: &R,
    slot: &mut Option<R::State>,
    action: PresentationAction<R::Action>,
    lift: fn(PresentationAction<R::Action>) -> A,
    finished: fn(FlowOutcome) -> A,
) -> Effect<A>
where
    R: Reducer,
    R::Action: FlowAction + fmt::Debug,
    A: Send + 'static,
{
    let presentation = present(router, slot, action);
    let bubbled = presentation.bubbled();
    let effect = presentation.effect.map(lift);
    match bubbled {
        Some(outcome) => effect.merge(Effect::send(finished(outcome))),
        None => effect,
    }
}

/// Teardown effects of the presented child, if any
pub(crate) fn teardown_destination<R, A>(
    router: &R,
    slot: &Option<R::State>,
    lift: fn(PresentationAction<R::Action>) -> A,
) -> Effect<A>
where
    R: Reducer,
    A: Send + 'static,
{
    match slot {
        Some(child) => router
            .teardown(child)
            .map(move |action| lift(PresentationAction::Presented(action))),
        None => Effect::none(),
    }
}
