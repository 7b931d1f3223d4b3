//! Effect handlers for the session slice.
//!
//! | handler          | reacts to          | does                                        |
//! |------------------|--------------------|---------------------------------------------|
//! | `RestoreSession` | `Init`             | reads durable storage, emits `LoginSucceeded` |
//! | `Authenticate`   | `Login`, `Register`| calls the API, emits the outcome            |
//! | `PersistSession` | `LoginSucceeded`   | writes storage, redirects                   |
//! | `EndSession`     | `Logout`           | clears storage, redirects to login          |
//! | `UpdateProfile`  | `UpdateUser`       | patches the user, merges, persists          |

use crate::app::{AppAction, AppState, PortalEnvironment};
use crate::navigation::{self, routes};
use crate::session::profile::merge_profile;
use crate::session::SessionAction;
use autohire_core::effect::{Effect, EffectHandler};
use autohire_core::{side_effect, smallvec, try_effect, SmallVec};
use autohire_runtime::BoxedEffectHandler;
use std::sync::Arc;

type Effects = SmallVec<[Effect<AppAction>; 4]>;

/// All session effect handlers
#[must_use]
pub fn handlers() -> Vec<BoxedEffectHandler<AppState, AppAction, PortalEnvironment>> {
    vec![
        Box::new(RestoreSession),
        Box::new(Authenticate),
        Box::new(PersistSession),
        Box::new(EndSession),
        Box::new(UpdateProfile),
    ]
}

/// Restores a persisted session on `Init` without a network round trip
#[derive(Debug, Clone, Copy)]
pub struct RestoreSession;

impl EffectHandler for RestoreSession {
    type State = AppState;
    type Action = AppAction;
    type Environment = PortalEnvironment;

    fn name(&self) -> &'static str {
        "session.restore"
    }

    fn handle(&self, action: &AppAction, _state: &AppState, env: &PortalEnvironment) -> Effects {
        let AppAction::Session(SessionAction::Init) = action else {
            return SmallVec::new();
        };

        let persistence = env.persistence.clone();
        smallvec![Effect::inline(move || {
            let identity = persistence.restore()?;
            tracing::info!(user_id = identity.id, "Restored persisted session");
            Some(AppAction::Session(SessionAction::LoginSucceeded { identity }))
        })]
    }
}

/// Talks to the authentication endpoints
#[derive(Debug, Clone, Copy)]
pub struct Authenticate;

impl EffectHandler for Authenticate {
    type State = AppState;
    type Action = AppAction;
    type Environment = PortalEnvironment;

    fn name(&self) -> &'static str {
        "session.authenticate"
    }

    fn handle(&self, action: &AppAction, _state: &AppState, env: &PortalEnvironment) -> Effects {
        match action {
            AppAction::Session(SessionAction::Login { credentials }) => {
                let api = Arc::clone(&env.api);
                let credentials = credentials.clone();
                tracing::debug!(email = %credentials.email, "Logging in");

                smallvec![try_effect! {
                    call: api.login(credentials),
                    on_success: |response| {
                        metrics::counter!("portal.session.logins", "outcome" => "succeeded").increment(1);
                        Some(AppAction::Session(SessionAction::LoginSucceeded {
                            identity: response.into_identity(),
                        }))
                    },
                    on_error: |error| {
                        tracing::warn!(%error, "Login failed");
                        metrics::counter!("portal.session.logins", "outcome" => "failed").increment(1);
                        Some(AppAction::Session(SessionAction::LoginFailed {
                            message: error.user_message(),
                        }))
                    }
                }]
            },

            AppAction::Session(SessionAction::Register { registration }) => {
                let api = Arc::clone(&env.api);
                let credentials = registration.credentials();
                let registration = registration.clone();
                tracing::debug!(username = %registration.username, "Registering");

                smallvec![try_effect! {
                    call: api.register(registration),
                    on_success: |identity| {
                        tracing::info!(user_id = identity.id, "Account created");
                        Some(AppAction::Session(SessionAction::Login { credentials }))
                    },
                    on_error: |error| {
                        tracing::warn!(%error, "Registration failed");
                        Some(AppAction::Session(SessionAction::RegisterFailed {
                            message: error.user_message(),
                        }))
                    }
                }]
            },

            _ => SmallVec::new(),
        }
    }
}

/// Persists the new session and leaves the login page
#[derive(Debug, Clone, Copy)]
pub struct PersistSession;

impl EffectHandler for PersistSession {
    type State = AppState;
    type Action = AppAction;
    type Environment = PortalEnvironment;

    fn name(&self) -> &'static str {
        "session.persist"
    }

    fn handle(&self, action: &AppAction, _state: &AppState, env: &PortalEnvironment) -> Effects {
        let AppAction::Session(SessionAction::LoginSucceeded { identity }) = action else {
            return SmallVec::new();
        };

        let identity = identity.clone();
        let persistence = env.persistence.clone();
        let navigator = Arc::clone(&env.navigator);

        smallvec![side_effect!(move || {
            if let Err(error) = persistence.persist(&identity) {
                tracing::error!(%error, user_id = identity.id, "Failed to persist session");
            }
            let destination = navigation::after_login(&navigator.current_url(), &identity);
            navigator.navigate(&destination);
        })]
    }
}

/// Forgets the session and returns to the login page
#[derive(Debug, Clone, Copy)]
pub struct EndSession;

impl EffectHandler for EndSession {
    type State = AppState;
    type Action = AppAction;
    type Environment = PortalEnvironment;

    fn name(&self) -> &'static str {
        "session.end"
    }

    fn handle(&self, action: &AppAction, _state: &AppState, env: &PortalEnvironment) -> Effects {
        let AppAction::Session(SessionAction::Logout) = action else {
            return SmallVec::new();
        };

        let persistence = env.persistence.clone();
        let navigator = Arc::clone(&env.navigator);

        smallvec![side_effect!(move || {
            if let Err(error) = persistence.clear() {
                tracing::error!(%error, "Failed to clear persisted session");
            }
            navigator.navigate(routes::LOGIN);
        })]
    }
}

/// Sends profile patches and keeps the stored session in step
#[derive(Debug, Clone, Copy)]
pub struct UpdateProfile;

impl EffectHandler for UpdateProfile {
    type State = AppState;
    type Action = AppAction;
    type Environment = PortalEnvironment;

    fn name(&self) -> &'static str {
        "session.update_profile"
    }

    fn handle(&self, action: &AppAction, state: &AppState, env: &PortalEnvironment) -> Effects {
        let AppAction::Session(SessionAction::UpdateUser { patch }) = action else {
            return SmallVec::new();
        };
        let Some(original) = state.session.current_user.clone() else {
            tracing::warn!("Profile update without a session, ignoring");
            return SmallVec::new();
        };

        let api = Arc::clone(&env.api);
        let persistence = env.persistence.clone();
        let patch = patch.clone();

        smallvec![Effect::future(async move {
            let merged = api
                .update_user(original.id, patch.clone())
                .await
                .and_then(|response| merge_profile(&original, &patch, response));

            match merged {
                Ok(identity) => {
                    let still_logged_in =
                        persistence.peek().is_some_and(|stored| stored.id == original.id);
                    if !still_logged_in {
                        tracing::info!(user_id = identity.id, "Session ended during profile update");
                    } else if let Err(error) = persistence.persist(&identity) {
                        tracing::error!(%error, user_id = identity.id, "Failed to persist profile");
                    }
                    Some(AppAction::Session(SessionAction::UpdateUserSucceeded { identity }))
                },
                Err(error) => {
                    tracing::warn!(%error, user_id = original.id, "Profile update failed");
                    Some(AppAction::Session(SessionAction::UpdateUserFailed {
                        message: error.user_message(),
                    }))
                },
            }
        })]
    }
}
