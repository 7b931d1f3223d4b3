//! Route guards.
//!
//! Decide whether the current session may enter an area of the portal.
//! Anonymous visitors of a member area are sent to the login page with the
//! requested location as `returnUrl`, so the login redirect can take them
//! back there.

use crate::navigation::{login_with_return, routes};
use crate::session::SessionState;

/// What an area of the portal requires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Any logged-in user
    Authenticated,
    /// Administrators only
    Admin,
}

/// Outcome of a guard check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Enter the requested location
    Allow,
    /// Go to this location instead
    Redirect(String),
}

/// Check whether `session` may open `requested_url`
#[must_use]
pub fn authorize(session: &SessionState, requested_url: &str, access: Access) -> Decision {
    match access {
        Access::Authenticated if session.is_authenticated() => Decision::Allow,
        Access::Authenticated => Decision::Redirect(login_with_return(requested_url)),
        Access::Admin if session.is_admin() => Decision::Allow,
        Access::Admin => {
            tracing::debug!(requested_url, "Admin area refused");
            Decision::Redirect(routes::LOGIN.to_string())
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autohire_client::{Identity, Role};

    fn session(role: Option<Role>) -> SessionState {
        SessionState {
            current_user: role.map(|role| Identity {
                id: 1,
                first_name: String::new(),
                last_name: String::new(),
                username: "u".into(),
                email: "u@example.com".into(),
                role,
                token: Some("T".into()),
            }),
            ..SessionState::default()
        }
    }

    #[test]
    fn anonymous_member_area_redirects_with_return_url() {
        assert_eq!(
            authorize(&session(None), "/profile", Access::Authenticated),
            Decision::Redirect("/auth/login?returnUrl=%2Fprofile".to_string())
        );
    }

    #[test]
    fn users_enter_member_area() {
        assert_eq!(
            authorize(&session(Some(Role::User)), "/profile", Access::Authenticated),
            Decision::Allow
        );
    }

    #[test]
    fn admin_area_requires_admin_role() {
        assert_eq!(
            authorize(&session(Some(Role::User)), "/admin", Access::Admin),
            Decision::Redirect("/auth/login".to_string())
        );
        assert_eq!(
            authorize(&session(None), "/admin", Access::Admin),
            Decision::Redirect("/auth/login".to_string())
        );
        assert_eq!(
            authorize(&session(Some(Role::Admin)), "/admin", Access::Admin),
            Decision::Allow
        );
    }
}
