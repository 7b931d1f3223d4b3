//! Blocked-date calendar of one car.

use crate::app::PortalStore;
use crate::booking::{blocked_dates, BookingState};
use chrono::NaiveDate;
use futures::Stream;
use std::collections::BTreeSet;
use std::pin::Pin;

/// Days on which one car cannot be booked
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingCalendar {
    car_id: u64,
    blocked: BTreeSet<NaiveDate>,
}

impl BookingCalendar {
    /// Compute the calendar of `car_id` from the booking slice
    #[must_use]
    pub fn for_car(car_id: u64, booking: &BookingState) -> Self {
        Self {
            car_id,
            blocked: blocked_dates(car_id, &booking.reservations),
        }
    }

    /// Follow the calendar of `car_id` as the reservation list changes
    ///
    /// Yields the current calendar first, then a new one each time the
    /// blocked days change.
    pub fn watch(store: &PortalStore, car_id: u64) -> Pin<Box<dyn Stream<Item = Self> + Send>> {
        store.observe(move |state: &crate::app::AppState| Self::for_car(car_id, &state.booking))
    }

    /// The car this calendar belongs to
    #[must_use]
    pub const fn car_id(&self) -> u64 {
        self.car_id
    }

    /// Every blocked day, ascending
    #[must_use]
    pub const fn blocked(&self) -> &BTreeSet<NaiveDate> {
        &self.blocked
    }

    /// Whether `date` is taken
    #[must_use]
    pub fn is_blocked(&self, date: NaiveDate) -> bool {
        self.blocked.contains(&date)
    }

    /// First taken day within `start..=end`
    #[must_use]
    pub fn first_conflict(&self, start: NaiveDate, end: NaiveDate) -> Option<NaiveDate> {
        if end < start {
            return None;
        }
        self.blocked.range(start..=end).next().copied()
    }
}
