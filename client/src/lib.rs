//! # Autohire Rental API Client
//!
//! Client library for the car-rental REST API: authentication, cars,
//! bookings and users.
//!
//! ## Example
//!
//! ```no_run
//! use autohire_client::{Credentials, HttpRentalApi, RentalApi};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = HttpRentalApi::new("http://localhost:3000", Duration::from_secs(10))?;
//!
//!     let response = api.login(Credentials::new("ada@example.com", "secret")).await?;
//!     println!("Logged in as {}", response.identity.username);
//!
//!     let cars = api.list_cars().await?;
//!     println!("{} cars available", cars.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - Object-safe [`RentalApi`] trait for dependency injection
//! - Bearer token injection from a [`TokenSource`]
//! - Transport failures reported as [`ApiError::Unreachable`]
//! - Server error bodies flattened into display messages

pub mod api;
pub mod client;
pub mod error;
pub mod types;

// Re-export main types for convenience
pub use api::{ApiFuture, RentalApi, TokenSource};
pub use client::HttpRentalApi;
pub use error::{ApiError, UNREACHABLE_MESSAGE};
pub use types::{
    sanitize_identity, Car, CarDetails, Credentials, Identity, LoginResponse, NewReservation,
    PasswordChange, Registration, ReservationRecord, ReservationStatus, Role, StatusChange,
    UserPatch, UsernameAvailability,
};
