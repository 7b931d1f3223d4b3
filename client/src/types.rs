//! Wire types for the rental API

use crate::error::ApiError;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Role of an authenticated user
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Administrator with access to inventory and user management
    Admin,
    /// Ordinary customer
    #[default]
    User,
}

/// An authenticated user as seen by the client
///
/// `token` is only present for a session that came from a successful
/// login, registration or restore.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Numeric user id
    pub id: u64,
    /// Given name
    #[serde(default)]
    pub first_name: String,
    /// Family name
    #[serde(default)]
    pub last_name: String,
    /// Unique username
    pub username: String,
    /// Unique email
    pub email: String,
    /// Access level
    #[serde(default)]
    pub role: Role,
    /// Bearer token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Identity {
    /// Returns true for administrators
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Display name, "First Last"
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Login credentials
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    /// Account email
    pub email: String,
    /// Plain-text password, only ever sent to the login endpoint
    pub password: String,
}

impl Credentials {
    /// Create credentials
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Response of `POST /auth/login`
///
/// Accepts both `{token, identity}` and `{access_token, user}` shapes.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    /// Bearer token
    #[serde(alias = "access_token", alias = "accessToken")]
    pub token: String,
    /// The authenticated user
    #[serde(alias = "user")]
    pub identity: Identity,
}

impl LoginResponse {
    /// The identity carrying the issued token
    #[must_use]
    pub fn into_identity(self) -> Identity {
        Identity {
            token: Some(self.token),
            ..self.identity
        }
    }
}

/// Body of `POST /auth/register`
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Desired username
    pub username: String,
    /// Account email
    pub email: String,
    /// Chosen password
    pub password: String,
}

impl Registration {
    /// Credentials to log in with once the account exists
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.email.clone(), self.password.clone())
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Partial profile update sent with `PATCH /users/{id}`
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    /// New given name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// New family name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// New username
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// New email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserPatch {
    /// Returns true if the patch changes nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.username.is_none()
            && self.email.is_none()
    }
}

/// Body of `PATCH /users/{id}/password`
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    /// Password currently in use
    pub current_password: String,
    /// Replacement password
    pub new_password: String,
}

impl fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordChange { .. }")
    }
}

/// Response of `GET /auth/check-username/{name}`
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UsernameAvailability {
    /// Whether the username can still be taken
    #[serde(rename = "isAvailable")]
    pub is_available: bool,
}

/// Lifecycle status of a reservation
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ReservationStatus {
    /// Awaiting confirmation
    #[default]
    Pending,
    /// Confirmed by the rental agency
    Confirmed,
    /// Rental period is over
    Completed,
    /// Cancelled by the customer or an admin
    Cancelled,
}

impl ReservationStatus {
    /// All statuses, in lifecycle order
    pub const ALL: [Self; 4] = [Self::Pending, Self::Confirmed, Self::Completed, Self::Cancelled];

    /// Parse a wire status, case-insensitively
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(raw.trim()))
    }

    /// Wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Returns true if a reservation in this status occupies its car
    #[must_use]
    pub const fn blocks_calendar(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reservation exactly as the API returns it
///
/// Dates are kept as strings and status as an optional raw string; the
/// portal normalizes both.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRecord {
    /// Reservation id
    pub id: u64,
    /// Reserved car
    pub car_id: u64,
    /// Owner
    pub user_id: u64,
    /// First day, `YYYY-MM-DD` or an RFC 3339 timestamp
    pub start_date: String,
    /// Last day (inclusive), same formats as `start_date`
    pub end_date: String,
    /// Total price
    #[serde(deserialize_with = "number_or_string")]
    pub total_price: f64,
    /// ISO currency code
    #[serde(default)]
    pub currency: Option<String>,
    /// Raw status, may be absent or unknown
    #[serde(default)]
    pub status: Option<String>,
}

/// Body of `POST /bookings`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewReservation {
    /// Car to reserve
    pub car_id: u64,
    /// Owner
    pub user_id: u64,
    /// First day
    pub start_date: NaiveDate,
    /// Last day (inclusive)
    pub end_date: NaiveDate,
    /// Quoted total price
    pub total_price: f64,
    /// ISO currency code
    pub currency: String,
    /// Initial status
    pub status: ReservationStatus,
}

/// Body of `PATCH /bookings/{id}` when changing status
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusChange {
    /// New status
    pub status: ReservationStatus,
}

/// Descriptive fields of a car
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CarDetails {
    /// Manufacturer
    pub brand: String,
    /// Model name
    pub model: String,
    /// Daily rate
    #[serde(deserialize_with = "number_or_string")]
    pub price_per_day: f64,
    /// ISO currency code of the rate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Category label (Electric, Sport, Luxury, SUV, Sedan, Convertible)
    #[serde(default)]
    pub category: String,
    /// Image URL
    #[serde(default)]
    pub image: String,
    /// Whether the car can be booked at all
    #[serde(default = "default_available")]
    pub available: bool,
    /// Feature labels
    #[serde(default)]
    pub features: Vec<String>,
}

const fn default_available() -> bool {
    true
}

/// A rentable car
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Car {
    /// Car id
    pub id: u64,
    /// Descriptive fields
    #[serde(flatten)]
    pub details: CarDetails,
}

/// Strip secret fields from a freshly created identity
///
/// # Errors
///
/// Returns [`ApiError::Sanitization`] when the response is not a JSON object
/// (its secrets cannot be located), and [`ApiError::Decode`] when the
/// stripped object is not an identity.
pub fn sanitize_identity(value: serde_json::Value) -> Result<Identity, ApiError> {
    let serde_json::Value::Object(mut fields) = value else {
        return Err(ApiError::Sanitization(
            "registration response is not an object".to_string(),
        ));
    };

    fields.remove("password");
    fields.remove("passwordHash");

    serde_json::from_value(serde_json::Value::Object(fields))
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// Accept numbers and numeric strings (decimal columns arrive as strings)
fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}
