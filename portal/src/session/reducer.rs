//! Reducer for the session slice.

use crate::session::{SessionAction, SessionState};
use autohire_core::reducer::{update, Reducer};
use std::sync::Arc;

/// Pure state transitions of the session slice.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionReducer;

impl Reducer for SessionReducer {
    type State = SessionState;
    type Action = SessionAction;

    fn reduce(&self, state: &Arc<SessionState>, action: &SessionAction) -> Arc<SessionState> {
        match action {
            SessionAction::Login { .. } => update(state, |s| {
                s.pending = true;
                s.failure_reason = None;
            }),

            SessionAction::LoginSucceeded { identity } => update(state, |s| {
                s.current_user = Some(identity.clone());
                s.pending = false;
            }),

            // A reply arriving after logout must not bring the session back
            SessionAction::UpdateUserSucceeded { identity }
                if state.current_user.as_ref().is_some_and(|user| user.id == identity.id) =>
            {
                update(state, |s| {
                    s.current_user = Some(identity.clone());
                    s.pending = false;
                })
            },

            SessionAction::LoginFailed { message } | SessionAction::UpdateUserFailed { message } => {
                update(state, |s| {
                    s.failure_reason = Some(message.clone());
                    s.pending = false;
                })
            },

            SessionAction::Logout => update(state, |s| {
                s.current_user = None;
                s.pending = false;
            }),

            SessionAction::Register { .. } => update(state, |s| s.failure_reason = None),

            SessionAction::RegisterFailed { message } => {
                update(state, |s| s.failure_reason = Some(message.clone()))
            },

            // A profile update needs someone to update
            SessionAction::UpdateUser { .. } if state.is_authenticated() => {
                update(state, |s| s.pending = true)
            },

            SessionAction::UpdateUser { .. }
            | SessionAction::UpdateUserSucceeded { .. }
            | SessionAction::Init => Arc::clone(state),
        }
    }
}
