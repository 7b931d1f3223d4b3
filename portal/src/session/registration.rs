//! Registration form helpers.

use autohire_client::{ApiError, RentalApi};

/// Ask the server whether `username` can still be taken
///
/// Surrounding whitespace is ignored; a blank username is never available
/// and is not sent.
///
/// # Errors
///
/// Returns the [`ApiError`] of the availability check.
pub async fn username_available(api: &dyn RentalApi, username: &str) -> Result<bool, ApiError> {
    let username = username.trim();
    if username.is_empty() {
        return Ok(false);
    }

    let availability = api.check_username(username.to_string()).await?;
    tracing::debug!(username, available = availability.is_available, "Checked username");
    Ok(availability.is_available)
}
