//! The rental API seam
//!
//! Effects depend on [`RentalApi`] rather than on the HTTP client, so tests
//! can script responses without a server.

use crate::error::ApiError;
use crate::types::{
    Car, CarDetails, Credentials, Identity, LoginResponse, NewReservation, PasswordChange,
    Registration, ReservationRecord, ReservationStatus, UserPatch, UsernameAvailability,
};
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by [`RentalApi`] methods
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

/// Supplies the bearer token attached to outgoing requests
pub trait TokenSource: Send + Sync {
    /// Current bearer token, if a session exists
    fn bearer_token(&self) -> Option<String>;
}

/// Operations of the rental REST API
pub trait RentalApi: Send + Sync {
    /// `POST /auth/login`
    fn login(&self, credentials: Credentials) -> ApiFuture<'_, LoginResponse>;

    /// `POST /auth/register`, response already stripped of secret fields
    fn register(&self, registration: Registration) -> ApiFuture<'_, Identity>;

    /// `GET /auth/check-username/{name}`
    fn check_username(&self, username: String) -> ApiFuture<'_, UsernameAvailability>;

    /// `GET /cars`
    fn list_cars(&self) -> ApiFuture<'_, Vec<Car>>;

    /// `GET /cars/{id}`
    fn get_car(&self, id: u64) -> ApiFuture<'_, Car>;

    /// `POST /cars`
    fn create_car(&self, details: CarDetails) -> ApiFuture<'_, Car>;

    /// `PATCH /cars/{id}`
    fn update_car(&self, car: Car) -> ApiFuture<'_, Car>;

    /// `DELETE /cars/{id}`
    fn delete_car(&self, id: u64) -> ApiFuture<'_, ()>;

    /// `GET /bookings`
    fn list_reservations(&self) -> ApiFuture<'_, Vec<ReservationRecord>>;

    /// `POST /bookings`
    fn create_reservation(&self, reservation: NewReservation) -> ApiFuture<'_, ReservationRecord>;

    /// `PATCH /bookings/{id}` with a new status
    fn update_reservation_status(
        &self,
        id: u64,
        status: ReservationStatus,
    ) -> ApiFuture<'_, ReservationRecord>;

    /// `DELETE /bookings/{id}`
    fn delete_reservation(&self, id: u64) -> ApiFuture<'_, ()>;

    /// `GET /users`
    fn list_users(&self) -> ApiFuture<'_, Vec<Identity>>;

    /// `GET /users/{id}`
    fn get_user(&self, id: u64) -> ApiFuture<'_, Identity>;

    /// `PATCH /users/{id}`
    ///
    /// Returns the raw response object; partial-update endpoints may echo
    /// only some fields, so callers merge it over what they already hold.
    fn update_user(&self, id: u64, patch: UserPatch) -> ApiFuture<'_, serde_json::Value>;

    /// `PATCH /users/{id}/password`
    fn change_password(&self, id: u64, change: PasswordChange) -> ApiFuture<'_, ()>;

    /// `DELETE /users/{id}`
    fn delete_user(&self, id: u64) -> ApiFuture<'_, ()>;
}
