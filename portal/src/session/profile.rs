//! Profile update merging.
//!
//! Partial-update endpoints echo back only some fields and never the
//! bearer token, so the identity kept in the session is rebuilt as
//! `original`, overlaid by the submitted patch, overlaid by whatever the
//! server returned.

use autohire_client::{ApiError, Identity, UserPatch};
use serde_json::{Map, Value};

/// Fields that must never reach the session or durable storage
const SECRET_FIELDS: [&str; 2] = ["password", "passwordHash"];

fn overlay(target: &mut Map<String, Value>, source: Value) {
    if let Value::Object(fields) = source {
        for (key, value) in fields {
            if !value.is_null() {
                target.insert(key, value);
            }
        }
    }
}

/// Merge a profile update into the identity held before the request
///
/// Null fields in the response are ignored. A response without a token
/// keeps the token of `original`.
///
/// # Errors
///
/// Returns [`ApiError::Decode`] if the merged object is not a valid identity.
pub fn merge_profile(
    original: &Identity,
    patch: &UserPatch,
    response: Value,
) -> Result<Identity, ApiError> {
    let decode = |e: serde_json::Error| ApiError::Decode(e.to_string());

    let mut merged = Map::new();
    overlay(&mut merged, serde_json::to_value(original).map_err(decode)?);
    overlay(&mut merged, serde_json::to_value(patch).map_err(decode)?);
    overlay(&mut merged, response);

    for field in SECRET_FIELDS {
        merged.remove(field);
    }

    let mut identity: Identity = serde_json::from_value(Value::Object(merged)).map_err(decode)?;
    if identity.token.is_none() {
        identity.token.clone_from(&original.token);
    }
    Ok(identity)
}
