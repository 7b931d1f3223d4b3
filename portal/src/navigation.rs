//! Navigation seam
//!
//! Session effects redirect after login and logout. The portal only needs
//! to know the current location and to request a new one, so routing
//! itself stays outside the state layer.

use autohire_client::Identity;
use std::sync::{Arc, Mutex, PoisonError};
use url::Url;

/// Well-known portal routes
pub mod routes {
    /// Login page
    pub const LOGIN: &str = "/auth/login";
    /// Admin landing page
    pub const ADMIN: &str = "/admin";
    /// Customer landing page
    pub const CATALOG: &str = "/catalog";
    /// Query parameter carrying the deferred destination
    pub const RETURN_URL_PARAM: &str = "returnUrl";
}

/// Requests route changes
pub trait Navigator: Send + Sync {
    /// Current location, path plus query
    fn current_url(&self) -> String;

    /// Move to `url`
    fn navigate(&self, url: &str);
}

/// Navigator that records every requested location
///
/// Clones share the same history.
#[derive(Debug, Clone)]
pub struct MemoryNavigator {
    history: Arc<Mutex<Vec<String>>>,
}

impl MemoryNavigator {
    /// Start at `initial`
    #[must_use]
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            history: Arc::new(Mutex::new(vec![initial.into()])),
        }
    }

    /// Every location visited so far, oldest first
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for MemoryNavigator {
    fn current_url(&self) -> String {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
            .unwrap_or_else(|| "/".to_string())
    }

    fn navigate(&self, url: &str) {
        tracing::info!(url, "Navigating");
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());
    }
}

/// Resolve a portal-relative location against a dummy origin
fn parse_location(location: &str) -> Option<Url> {
    Url::parse("http://portal.invalid/")
        .ok()?
        .join(location)
        .ok()
}

/// The deferred destination carried by `location`, if any
///
/// ```
/// use autohire_portal::navigation::return_url;
///
/// assert_eq!(
///     return_url("/auth/login?returnUrl=%2Fbooking%2F4").as_deref(),
///     Some("/booking/4"),
/// );
/// assert_eq!(return_url("/auth/login"), None);
/// ```
#[must_use]
pub fn return_url(location: &str) -> Option<String> {
    parse_location(location)?
        .query_pairs()
        .find(|(key, _)| key == routes::RETURN_URL_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Login location that returns to `destination` afterwards
#[must_use]
pub fn login_with_return(destination: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair(routes::RETURN_URL_PARAM, destination)
        .finish();
    format!("{}?{query}", routes::LOGIN)
}

/// Landing page for a freshly authenticated user
#[must_use]
pub fn landing_page(identity: &Identity) -> &'static str {
    if identity.is_admin() {
        routes::ADMIN
    } else {
        routes::CATALOG
    }
}

/// Where to go after login: the deferred destination, else the landing page
#[must_use]
pub fn after_login(current: &str, identity: &Identity) -> String {
    return_url(current).unwrap_or_else(|| landing_page(identity).to_string())
}
