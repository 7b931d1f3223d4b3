//! Session slice state.

use autohire_client::Identity;

/// Session slice
///
/// `pending` is true exactly while a login or a profile update is in
/// flight. `failure_reason` holds the last user-facing error and is
/// cleared when a new login starts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    /// The authenticated user, token included
    pub current_user: Option<Identity>,
    /// A login or profile update is in flight
    pub pending: bool,
    /// Last user-facing error
    pub failure_reason: Option<String>,
}

impl SessionState {
    /// Returns true when a user is logged in
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    /// Returns true when the logged-in user is an administrator
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.current_user.as_ref().is_some_and(Identity::is_admin)
    }
}
