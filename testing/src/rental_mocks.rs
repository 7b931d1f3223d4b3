//! In-memory rental API for testing
//!
//! Provides fast, deterministic testing infrastructure for effects:
//! - [`MockRentalApi`]: a scripted, in-memory implementation of
//!   [`RentalApi`] with failure injection and a call log

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Test utilities document panics where critical

use autohire_client::{
    ApiError, ApiFuture, Car, CarDetails, Credentials, Identity, LoginResponse, NewReservation,
    PasswordChange, Registration, RentalApi, ReservationRecord, ReservationStatus, UserPatch,
    UsernameAvailability,
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct Backend {
    accounts: Vec<(Identity, String)>,
    cars: Vec<Car>,
    reservations: Vec<ReservationRecord>,
    next_id: u64,
    failures: HashMap<&'static str, VecDeque<ApiError>>,
    user_update_responses: VecDeque<serde_json::Value>,
    calls: Vec<&'static str>,
}

impl Backend {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Record the call and return a scripted failure, if any
    fn enter(&mut self, operation: &'static str) -> Result<(), ApiError> {
        self.calls.push(operation);
        match self.failures.get_mut(operation).and_then(VecDeque::pop_front) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn not_found(what: &str) -> ApiError {
    ApiError::Server {
        status: 404,
        message: format!("{what} not found"),
    }
}

fn ready<T: Send + 'static>(result: Result<T, ApiError>) -> ApiFuture<'static, T> {
    Box::pin(async move { result })
}

/// In-memory rental API for fast, deterministic tests.
///
/// Accounts, cars and reservations live in memory. Every operation is
/// logged by name (`"login"`, `"list_reservations"`, ...) and can be made to
/// fail once with [`MockRentalApi::fail_next`].
///
/// Clones share the same backend, so a test can keep a handle for
/// assertions while the store owns another.
///
/// # Example
///
/// ```
/// use autohire_client::{ApiError, Credentials, RentalApi};
/// use autohire_testing::MockRentalApi;
///
/// # tokio_test::block_on(async {
/// let api = MockRentalApi::new();
/// api.fail_next("login", ApiError::Unreachable);
///
/// let result = api.login(Credentials::new("a@b.c", "pw")).await;
/// assert_eq!(result.unwrap_err(), ApiError::Unreachable);
/// assert_eq!(api.calls(), vec!["login"]);
/// # });
/// ```
#[derive(Clone, Debug, Default)]
pub struct MockRentalApi {
    backend: Arc<Mutex<Backend>>,
}

impl MockRentalApi {
    /// Create an empty backend
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an account that can log in with `password`
    #[must_use]
    pub fn with_account(self, identity: Identity, password: &str) -> Self {
        {
            let mut backend = self.backend.lock().unwrap();
            backend.next_id = backend.next_id.max(identity.id);
            backend.accounts.push((
                Identity {
                    token: None,
                    ..identity
                },
                password.to_string(),
            ));
        }
        self
    }

    /// Seed the car inventory
    #[must_use]
    pub fn with_cars(self, cars: Vec<Car>) -> Self {
        {
            let mut backend = self.backend.lock().unwrap();
            backend.next_id = cars.iter().map(|car| car.id).fold(backend.next_id, u64::max);
            backend.cars = cars;
        }
        self
    }

    /// Seed the reservation list
    #[must_use]
    pub fn with_reservations(self, reservations: Vec<ReservationRecord>) -> Self {
        {
            let mut backend = self.backend.lock().unwrap();
            backend.next_id = reservations
                .iter()
                .map(|record| record.id)
                .fold(backend.next_id, u64::max);
            backend.reservations = reservations;
        }
        self
    }

    /// Make the next call of `operation` fail with `error`
    pub fn fail_next(&self, operation: &'static str, error: ApiError) {
        self.backend
            .lock()
            .unwrap()
            .failures
            .entry(operation)
            .or_default()
            .push_back(error);
    }

    /// Script the raw response of the next `update_user` call
    ///
    /// Without a scripted response the mock echoes the patch fields only,
    /// like a partial-update endpoint.
    pub fn respond_to_next_user_update(&self, response: serde_json::Value) {
        self.backend
            .lock()
            .unwrap()
            .user_update_responses
            .push_back(response);
    }

    /// Names of the operations called so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<&'static str> {
        self.backend.lock().unwrap().calls.clone()
    }

    /// Number of calls of one operation
    #[must_use]
    pub fn call_count(&self, operation: &str) -> usize {
        self.backend
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|name| **name == operation)
            .count()
    }

    /// Reservations currently held by the backend
    #[must_use]
    pub fn reservations(&self) -> Vec<ReservationRecord> {
        self.backend.lock().unwrap().reservations.clone()
    }

    fn with_backend<T, F>(&self, operation: &'static str, f: F) -> ApiFuture<'static, T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Backend) -> Result<T, ApiError>,
    {
        let mut backend = self.backend.lock().unwrap();
        let result = backend.enter(operation).and_then(|()| f(&mut backend));
        ready(result)
    }
}

impl RentalApi for MockRentalApi {
    fn login(&self, credentials: Credentials) -> ApiFuture<'_, LoginResponse> {
        self.with_backend("login", |backend| {
            backend
                .accounts
                .iter()
                .find(|(identity, password)| {
                    identity.email == credentials.email && *password == credentials.password
                })
                .map(|(identity, _)| LoginResponse {
                    token: format!("token-{}", identity.id),
                    identity: identity.clone(),
                })
                .ok_or_else(|| ApiError::Server {
                    status: 401,
                    message: "Invalid email or password".to_string(),
                })
        })
    }

    fn register(&self, registration: Registration) -> ApiFuture<'_, Identity> {
        self.with_backend("register", |backend| {
            let taken = backend.accounts.iter().any(|(identity, _)| {
                identity.username == registration.username || identity.email == registration.email
            });
            if taken {
                return Err(ApiError::Server {
                    status: 409,
                    message: "Username or email already exists".to_string(),
                });
            }

            let identity = Identity {
                id: backend.allocate_id(),
                first_name: registration.first_name,
                last_name: registration.last_name,
                username: registration.username,
                email: registration.email,
                role: autohire_client::Role::User,
                token: None,
            };
            backend.accounts.push((identity.clone(), registration.password));
            Ok(identity)
        })
    }

    fn check_username(&self, username: String) -> ApiFuture<'_, UsernameAvailability> {
        self.with_backend("check_username", |backend| {
            Ok(UsernameAvailability {
                is_available: !backend
                    .accounts
                    .iter()
                    .any(|(identity, _)| identity.username == username),
            })
        })
    }

    fn list_cars(&self) -> ApiFuture<'_, Vec<Car>> {
        self.with_backend("list_cars", |backend| Ok(backend.cars.clone()))
    }

    fn get_car(&self, id: u64) -> ApiFuture<'_, Car> {
        self.with_backend("get_car", |backend| {
            backend
                .cars
                .iter()
                .find(|car| car.id == id)
                .cloned()
                .ok_or_else(|| not_found("Car"))
        })
    }

    fn create_car(&self, details: CarDetails) -> ApiFuture<'_, Car> {
        self.with_backend("create_car", |backend| {
            let car = Car {
                id: backend.allocate_id(),
                details,
            };
            backend.cars.push(car.clone());
            Ok(car)
        })
    }

    fn update_car(&self, car: Car) -> ApiFuture<'_, Car> {
        self.with_backend("update_car", |backend| {
            let slot = backend
                .cars
                .iter_mut()
                .find(|existing| existing.id == car.id)
                .ok_or_else(|| not_found("Car"))?;
            *slot = car.clone();
            Ok(car)
        })
    }

    fn delete_car(&self, id: u64) -> ApiFuture<'_, ()> {
        self.with_backend("delete_car", |backend| {
            let before = backend.cars.len();
            backend.cars.retain(|car| car.id != id);
            if backend.cars.len() == before {
                return Err(not_found("Car"));
            }
            Ok(())
        })
    }

    fn list_reservations(&self) -> ApiFuture<'_, Vec<ReservationRecord>> {
        self.with_backend("list_reservations", |backend| Ok(backend.reservations.clone()))
    }

    fn create_reservation(&self, reservation: NewReservation) -> ApiFuture<'_, ReservationRecord> {
        self.with_backend("create_reservation", |backend| {
            let record = ReservationRecord {
                id: backend.allocate_id(),
                car_id: reservation.car_id,
                user_id: reservation.user_id,
                start_date: reservation.start_date.to_string(),
                end_date: reservation.end_date.to_string(),
                total_price: reservation.total_price,
                currency: Some(reservation.currency),
                status: Some(reservation.status.to_string()),
            };
            backend.reservations.push(record.clone());
            Ok(record)
        })
    }

    fn update_reservation_status(
        &self,
        id: u64,
        status: ReservationStatus,
    ) -> ApiFuture<'_, ReservationRecord> {
        self.with_backend("update_reservation_status", |backend| {
            let record = backend
                .reservations
                .iter_mut()
                .find(|record| record.id == id)
                .ok_or_else(|| not_found("Booking"))?;
            record.status = Some(status.to_string());
            Ok(record.clone())
        })
    }

    fn delete_reservation(&self, id: u64) -> ApiFuture<'_, ()> {
        self.with_backend("delete_reservation", |backend| {
            let before = backend.reservations.len();
            backend.reservations.retain(|record| record.id != id);
            if backend.reservations.len() == before {
                return Err(not_found("Booking"));
            }
            Ok(())
        })
    }

    fn list_users(&self) -> ApiFuture<'_, Vec<Identity>> {
        self.with_backend("list_users", |backend| {
            Ok(backend.accounts.iter().map(|(identity, _)| identity.clone()).collect())
        })
    }

    fn get_user(&self, id: u64) -> ApiFuture<'_, Identity> {
        self.with_backend("get_user", |backend| {
            backend
                .accounts
                .iter()
                .find(|(identity, _)| identity.id == id)
                .map(|(identity, _)| identity.clone())
                .ok_or_else(|| not_found("User"))
        })
    }

    fn update_user(&self, id: u64, patch: UserPatch) -> ApiFuture<'_, serde_json::Value> {
        self.with_backend("update_user", |backend| {
            let (identity, _) = backend
                .accounts
                .iter_mut()
                .find(|(identity, _)| identity.id == id)
                .ok_or_else(|| not_found("User"))?;

            if let Some(first_name) = &patch.first_name {
                identity.first_name.clone_from(first_name);
            }
            if let Some(last_name) = &patch.last_name {
                identity.last_name.clone_from(last_name);
            }
            if let Some(username) = &patch.username {
                identity.username.clone_from(username);
            }
            if let Some(email) = &patch.email {
                identity.email.clone_from(email);
            }

            match backend.user_update_responses.pop_front() {
                Some(response) => Ok(response),
                None => serde_json::to_value(&patch).map_err(|e| ApiError::Decode(e.to_string())),
            }
        })
    }

    fn change_password(&self, id: u64, change: PasswordChange) -> ApiFuture<'_, ()> {
        self.with_backend("change_password", |backend| {
            let (_, password) = backend
                .accounts
                .iter_mut()
                .find(|(identity, _)| identity.id == id)
                .ok_or_else(|| not_found("User"))?;

            if *password != change.current_password {
                return Err(ApiError::Server {
                    status: 400,
                    message: "Current password is incorrect".to_string(),
                });
            }
            *password = change.new_password;
            Ok(())
        })
    }

    fn delete_user(&self, id: u64) -> ApiFuture<'_, ()> {
        self.with_backend("delete_user", |backend| {
            let before = backend.accounts.len();
            backend.accounts.retain(|(identity, _)| identity.id != id);
            if backend.accounts.len() == before {
                return Err(not_found("User"));
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn grace() -> Identity {
        Identity {
            id: 1,
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            username: "grace".into(),
            email: "grace@example.com".into(),
            role: autohire_client::Role::User,
            token: None,
        }
    }

    #[tokio::test]
    async fn test_login_checks_password() {
        let api = MockRentalApi::new().with_account(grace(), "cobol");

        let ok = api.login(Credentials::new("grace@example.com", "cobol")).await.unwrap();
        assert_eq!(ok.into_identity().token.as_deref(), Some("token-1"));

        let err = api.login(Credentials::new("grace@example.com", "nope")).await.unwrap_err();
        assert_eq!(err.status(), Some(401));
    }

    #[tokio::test]
    async fn test_fail_next_applies_once() {
        let api = MockRentalApi::new();
        api.fail_next("list_reservations", ApiError::Unreachable);

        assert!(api.list_reservations().await.is_err());
        assert!(api.list_reservations().await.is_ok());
        assert_eq!(api.call_count("list_reservations"), 2);
    }

    #[tokio::test]
    async fn test_create_then_delete_reservation() {
        let api = MockRentalApi::new();
        let day = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();

        let created = api
            .create_reservation(NewReservation {
                car_id: 2,
                user_id: 1,
                start_date: day,
                end_date: day,
                total_price: 100.0,
                currency: "USD".into(),
                status: ReservationStatus::Confirmed,
            })
            .await
            .unwrap();

        assert_eq!(created.start_date, "2025-03-01");
        assert_eq!(api.reservations().len(), 1);

        api.delete_reservation(created.id).await.unwrap();
        assert!(api.reservations().is_empty());
        assert!(api.delete_reservation(created.id).await.is_err());
    }

    #[tokio::test]
    async fn test_update_user_echoes_patch_without_token() {
        let api = MockRentalApi::new().with_account(grace(), "cobol");
        let patch = UserPatch {
            last_name: Some("Murray Hopper".into()),
            ..UserPatch::default()
        };

        let response = api.update_user(1, patch).await.unwrap();

        assert_eq!(response, serde_json::json!({"lastName": "Murray Hopper"}));
        assert_eq!(api.get_user(1).await.unwrap().last_name, "Murray Hopper");
    }
}
