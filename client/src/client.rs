//! HTTP implementation of the rental API

use crate::{
    api::{ApiFuture, RentalApi, TokenSource},
    error::ApiError,
    types::{
        sanitize_identity, Car, CarDetails, Credentials, Identity, LoginResponse, NewReservation,
        PasswordChange, Registration, ReservationRecord, ReservationStatus, StatusChange,
        UserPatch, UsernameAvailability,
    },
};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Rental API client over HTTP
///
/// Attaches `Authorization: Bearer <token>` to every request when a
/// [`TokenSource`] is configured and currently holds a token.
#[derive(Clone)]
pub struct HttpRentalApi {
    client: Client,
    base_url: Url,
    tokens: Option<Arc<dyn TokenSource>>,
}

impl HttpRentalApi {
    /// Create a client for the API rooted at `base_url`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Request`] if the URL is invalid or the HTTP client
    /// cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| ApiError::Request(format!("invalid API URL {base_url}: {e}")))?;

        // Relative joins replace the last path segment unless it ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            tokens: None,
        })
    }

    /// Attach bearer tokens from `source` to outgoing requests
    #[must_use]
    pub fn with_token_source(mut self, source: Arc<dyn TokenSource>) -> Self {
        self.tokens = Some(source);
        self
    }

    /// Root URL of the API
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::Request(format!("invalid endpoint {path}: {e}")))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        Ok(self.authorize(self.client.request(method, self.endpoint(path)?)))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.tokens.as_ref().and_then(|tokens| tokens.bearer_token()) {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn execute(&self, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await.map_err(|e| {
            if e.is_builder() {
                ApiError::Request(e.to_string())
            } else {
                tracing::warn!(error = %e, "Rental API unreachable");
                ApiError::Unreachable
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), "Rental API returned an error");
        Err(ApiError::from_status(status.as_u16(), &body))
    }

    async fn fetch<T>(&self, method: Method, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let request = self.request(method, path)?;
        decode(self.execute(request).await?).await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(method, path)?.json(body);
        decode(self.execute(request).await?).await
    }

    async fn send_empty<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.request(method, path)?;
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute(request).await.map(|_| ())
    }
}

async fn decode<T>(response: reqwest::Response) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    let bytes = response
        .bytes()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))?;

    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

impl RentalApi for HttpRentalApi {
    fn login(&self, credentials: Credentials) -> ApiFuture<'_, LoginResponse> {
        Box::pin(async move { self.send_json(Method::POST, "auth/login", &credentials).await })
    }

    fn register(&self, registration: Registration) -> ApiFuture<'_, Identity> {
        Box::pin(async move {
            let created: serde_json::Value =
                self.send_json(Method::POST, "auth/register", &registration).await?;
            sanitize_identity(created)
        })
    }

    fn check_username(&self, username: String) -> ApiFuture<'_, UsernameAvailability> {
        Box::pin(async move {
            let mut url = self.endpoint("auth/check-username/")?;
            url.path_segments_mut()
                .map_err(|()| ApiError::Request("API URL cannot be a base".to_string()))?
                .pop_if_empty()
                .push(&username);

            let request = self.authorize(self.client.get(url));
            decode(self.execute(request).await?).await
        })
    }

    fn list_cars(&self) -> ApiFuture<'_, Vec<Car>> {
        Box::pin(async move { self.fetch(Method::GET, "cars").await })
    }

    fn get_car(&self, id: u64) -> ApiFuture<'_, Car> {
        Box::pin(async move { self.fetch(Method::GET, &format!("cars/{id}")).await })
    }

    fn create_car(&self, details: CarDetails) -> ApiFuture<'_, Car> {
        Box::pin(async move { self.send_json(Method::POST, "cars", &details).await })
    }

    fn update_car(&self, car: Car) -> ApiFuture<'_, Car> {
        Box::pin(async move {
            self.send_json(Method::PATCH, &format!("cars/{}", car.id), &car.details)
                .await
        })
    }

    fn delete_car(&self, id: u64) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            self.send_empty::<()>(Method::DELETE, &format!("cars/{id}"), None)
                .await
        })
    }

    fn list_reservations(&self) -> ApiFuture<'_, Vec<ReservationRecord>> {
        Box::pin(async move { self.fetch(Method::GET, "bookings").await })
    }

    fn create_reservation(&self, reservation: NewReservation) -> ApiFuture<'_, ReservationRecord> {
        Box::pin(async move { self.send_json(Method::POST, "bookings", &reservation).await })
    }

    fn update_reservation_status(
        &self,
        id: u64,
        status: ReservationStatus,
    ) -> ApiFuture<'_, ReservationRecord> {
        Box::pin(async move {
            self.send_json(Method::PATCH, &format!("bookings/{id}"), &StatusChange { status })
                .await
        })
    }

    fn delete_reservation(&self, id: u64) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            self.send_empty::<()>(Method::DELETE, &format!("bookings/{id}"), None)
                .await
        })
    }

    fn list_users(&self) -> ApiFuture<'_, Vec<Identity>> {
        Box::pin(async move { self.fetch(Method::GET, "users").await })
    }

    fn get_user(&self, id: u64) -> ApiFuture<'_, Identity> {
        Box::pin(async move { self.fetch(Method::GET, &format!("users/{id}")).await })
    }

    fn update_user(&self, id: u64, patch: UserPatch) -> ApiFuture<'_, serde_json::Value> {
        Box::pin(async move {
            self.send_json(Method::PATCH, &format!("users/{id}"), &patch)
                .await
        })
    }

    fn change_password(&self, id: u64, change: PasswordChange) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            self.send_empty(Method::PATCH, &format!("users/{id}/password"), Some(&change))
                .await
        })
    }

    fn delete_user(&self, id: u64) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            self.send_empty::<()>(Method::DELETE, &format!("users/{id}"), None)
                .await
        })
    }
}
