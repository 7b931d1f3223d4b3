//! Actions for the session slice.

use autohire_client::{Credentials, Identity, Registration, UserPatch};
use autohire_macros::Action;

/// Actions handled by the session slice.
///
/// Intents come from the user interface; outcomes are dispatched by the
/// session effects once I/O has completed.
#[derive(Action, Clone, Debug, PartialEq, Eq)]
#[action(scope = "Session")]
pub enum SessionAction {
    /// Restore a persisted session, if any
    #[intent]
    Init,

    /// Authenticate with email and password
    #[intent]
    Login {
        /// Submitted credentials
        credentials: Credentials,
    },

    /// Authentication completed (login, registration or restore)
    #[outcome]
    LoginSucceeded {
        /// The authenticated user, token included
        identity: Identity,
    },

    /// Authentication was rejected or the server was unreachable
    #[outcome]
    LoginFailed {
        /// User-facing reason
        message: String,
    },

    /// End the session
    #[intent]
    Logout,

    /// Create an account, then log in with the same credentials
    #[intent]
    Register {
        /// Submitted registration form
        registration: Registration,
    },

    /// Account creation failed
    #[outcome]
    RegisterFailed {
        /// User-facing reason
        message: String,
    },

    /// Patch the current user's profile
    #[intent]
    UpdateUser {
        /// Fields to change
        patch: UserPatch,
    },

    /// The profile update was accepted
    #[outcome]
    UpdateUserSucceeded {
        /// Merged identity, token preserved
        identity: Identity,
    },

    /// The profile update failed; the session stays open
    #[outcome]
    UpdateUserFailed {
        /// User-facing reason
        message: String,
    },
}
