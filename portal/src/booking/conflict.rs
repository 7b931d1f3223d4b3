//! Reservation conflict resolver and pricing.
//!
//! A car is unavailable on every calendar day covered by one of its
//! Pending or Confirmed reservations, both ends inclusive. Cancelled and
//! Completed reservations never block.

use crate::booking::normalize::DEFAULT_CURRENCY;
use crate::booking::Reservation;
use autohire_client::{Car, Identity, NewReservation, ReservationStatus};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use thiserror::Error;

/// Every day on which `car_id` is already taken
///
/// A reservation whose end precedes its start covers no day.
#[must_use]
pub fn blocked_dates(car_id: u64, reservations: &[Reservation]) -> BTreeSet<NaiveDate> {
    reservations
        .iter()
        .filter(|r| r.car_id == car_id && r.blocks_calendar())
        .flat_map(|r| r.start_date.iter_days().take_while(move |day| *day <= r.end_date))
        .collect()
}

/// Number of days billed for a rental, both ends inclusive
///
/// A same-day rental, a missing end or an end before the start bills one day.
#[must_use]
pub fn billable_days(start: NaiveDate, end: Option<NaiveDate>) -> u32 {
    let span = end.map_or(0, |end| (end - start).num_days());
    u32::try_from(span).map_or(1, |days| days.saturating_add(1))
}

/// Total price of a rental at `price_per_day`
#[must_use]
pub fn quote(price_per_day: f64, start: NaiveDate, end: Option<NaiveDate>) -> f64 {
    f64::from(billable_days(start, end)) * price_per_day
}

/// Reasons a booking request is rejected before it reaches the store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingValidationError {
    /// The rental would start before today
    #[error("Start date {start} is in the past")]
    StartInPast {
        /// Requested start
        start: NaiveDate,
    },

    /// The rental would end before it starts
    #[error("End date {end} is before start date {start}")]
    EndBeforeStart {
        /// Requested start
        start: NaiveDate,
        /// Requested end
        end: NaiveDate,
    },

    /// A requested day is already taken
    #[error("The car is already booked on {date}")]
    DateUnavailable {
        /// First conflicting day
        date: NaiveDate,
    },

    /// The car is withdrawn from rental
    #[error("Car {car_id} is not available for booking")]
    CarUnavailable {
        /// Requested car
        car_id: u64,
    },
}

/// A date range picked on the booking form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingRequest {
    /// Car to reserve
    pub car_id: u64,
    /// First day
    pub start: NaiveDate,
    /// Last day; `None` books a single day
    pub end: Option<NaiveDate>,
}

impl BookingRequest {
    /// Book `car_id` from `start` to `end`, inclusive
    #[must_use]
    pub const fn new(car_id: u64, start: NaiveDate, end: Option<NaiveDate>) -> Self {
        Self { car_id, start, end }
    }

    /// Last day of the rental
    #[must_use]
    pub fn last_day(&self) -> NaiveDate {
        self.end.unwrap_or(self.start)
    }

    /// Check the request against today's date and the car's calendar
    ///
    /// # Errors
    ///
    /// Returns the first [`BookingValidationError`] that applies.
    pub fn validate(
        &self,
        today: NaiveDate,
        blocked: &BTreeSet<NaiveDate>,
    ) -> Result<(), BookingValidationError> {
        if self.start < today {
            return Err(BookingValidationError::StartInPast { start: self.start });
        }

        let end = self.last_day();
        if end < self.start {
            return Err(BookingValidationError::EndBeforeStart {
                start: self.start,
                end,
            });
        }

        match blocked.range(self.start..=end).next() {
            Some(date) => Err(BookingValidationError::DateUnavailable { date: *date }),
            None => Ok(()),
        }
    }

    /// Build the create payload for `user`, priced from `car`
    ///
    /// New reservations start out Confirmed, in the car's currency.
    ///
    /// # Errors
    ///
    /// Returns [`BookingValidationError::CarUnavailable`] if the car is
    /// withdrawn from rental.
    pub fn into_payload(
        self,
        user: &Identity,
        car: &Car,
    ) -> Result<NewReservation, BookingValidationError> {
        if !car.details.available {
            return Err(BookingValidationError::CarUnavailable { car_id: car.id });
        }

        Ok(NewReservation {
            car_id: self.car_id,
            user_id: user.id,
            start_date: self.start,
            end_date: self.last_day(),
            total_price: quote(car.details.price_per_day, self.start, self.end),
            currency: car
                .details
                .currency
                .clone()
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            status: ReservationStatus::Confirmed,
        })
    }
}
