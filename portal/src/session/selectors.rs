//! Read projections of the session slice.

use crate::app::AppState;
use autohire_client::Identity;

/// The logged-in user
#[must_use]
pub fn current_user(state: &AppState) -> Option<Identity> {
    state.session.current_user.clone()
}

/// Whether a user is logged in
#[must_use]
pub fn is_authenticated(state: &AppState) -> bool {
    state.session.is_authenticated()
}

/// Whether the logged-in user is an administrator
#[must_use]
pub fn is_admin(state: &AppState) -> bool {
    state.session.is_admin()
}

/// Whether a login or profile update is in flight
#[must_use]
pub fn is_pending(state: &AppState) -> bool {
    state.session.pending
}

/// Last session error
#[must_use]
pub fn failure_reason(state: &AppState) -> Option<String> {
    state.session.failure_reason.clone()
}

/// Bearer token of the current session
#[must_use]
pub fn token(state: &AppState) -> Option<String> {
    state
        .session
        .current_user
        .as_ref()
        .and_then(|user| user.token.clone())
}
