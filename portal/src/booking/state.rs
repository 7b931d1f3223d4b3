//! Booking slice state.

use autohire_client::ReservationStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A normalized reservation
///
/// Dates are calendar days; both ends are inclusive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    /// Reservation id
    pub id: u64,
    /// Reserved car
    pub car_id: u64,
    /// Owner
    pub user_id: u64,
    /// First day
    pub start_date: NaiveDate,
    /// Last day (inclusive)
    pub end_date: NaiveDate,
    /// Total price
    pub total_price: f64,
    /// ISO currency code
    pub currency: String,
    /// Lifecycle status
    pub status: ReservationStatus,
}

impl Reservation {
    /// Returns true if this reservation keeps its car off the calendar
    #[must_use]
    pub const fn blocks_calendar(&self) -> bool {
        self.status.blocks_calendar()
    }
}

/// Booking slice
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BookingState {
    /// Canonical reservation list, server order
    pub reservations: Vec<Reservation>,
    /// A reservation request is in flight
    pub pending: bool,
    /// Last user-facing error
    pub failure_reason: Option<String>,
}

impl BookingState {
    /// Look up a reservation by id
    #[must_use]
    pub fn get(&self, id: u64) -> Option<&Reservation> {
        self.reservations.iter().find(|r| r.id == id)
    }
}
