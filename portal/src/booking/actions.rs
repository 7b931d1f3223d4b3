//! Actions for the booking slice.

use crate::booking::Reservation;
use autohire_client::{NewReservation, ReservationStatus};
use autohire_macros::Action;

/// Actions handled by the booking slice.
#[derive(Action, Clone, Debug, PartialEq)]
#[action(scope = "Booking")]
pub enum BookingAction {
    /// Fetch every reservation
    #[intent]
    LoadReservations,

    /// The reservation list arrived
    #[outcome]
    LoadReservationsSucceeded {
        /// Normalized reservations, replacing the current list
        reservations: Vec<Reservation>,
    },

    /// The reservation list could not be fetched
    #[outcome]
    LoadReservationsFailed {
        /// User-facing reason
        message: String,
    },

    /// Reserve a car
    #[intent]
    CreateReservation {
        /// Validated request payload
        reservation: NewReservation,
    },

    /// The server accepted the reservation
    #[outcome]
    CreateReservationSucceeded {
        /// The created reservation, appended to the list
        reservation: Reservation,
    },

    /// The reservation was rejected
    #[outcome]
    CreateReservationFailed {
        /// User-facing reason
        message: String,
    },

    /// Delete a reservation
    #[intent]
    DeleteReservation {
        /// Reservation id
        id: u64,
    },

    /// The server deleted the reservation
    #[outcome]
    DeleteReservationSucceeded {
        /// Reservation id
        id: u64,
    },

    /// The reservation could not be deleted
    #[outcome]
    DeleteReservationFailed {
        /// Reservation id
        id: u64,
        /// User-facing reason
        message: String,
    },

    /// Move a reservation through its lifecycle
    #[intent]
    UpdateReservationStatus {
        /// Reservation id
        id: u64,
        /// Target status
        status: ReservationStatus,
    },

    /// The server accepted the status change
    #[outcome]
    ReservationStatusUpdated {
        /// The updated reservation, replacing the one with the same id
        reservation: Reservation,
    },

    /// The status change was rejected
    #[outcome]
    UpdateReservationStatusFailed {
        /// User-facing reason
        message: String,
    },
}
