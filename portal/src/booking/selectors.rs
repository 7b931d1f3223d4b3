//! Read projections of the booking slice.
//!
//! Parameterised selectors return closures, so they can be handed to
//! `Store::select` and `Store::observe` alike.

use crate::app::AppState;
use crate::booking::{blocked_dates, Reservation};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// The canonical reservation list
#[must_use]
pub fn reservations(state: &AppState) -> Vec<Reservation> {
    state.booking.reservations.clone()
}

/// Whether a reservation request is in flight
#[must_use]
pub fn is_pending(state: &AppState) -> bool {
    state.booking.pending
}

/// Last booking error
#[must_use]
pub fn failure_reason(state: &AppState) -> Option<String> {
    state.booking.failure_reason.clone()
}

/// Reservations owned by `user_id`
pub fn reservations_for_user(user_id: u64) -> impl Fn(&AppState) -> Vec<Reservation> + Send + Sync {
    move |state| {
        state
            .booking
            .reservations
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }
}

/// Reservations of the logged-in user
#[must_use]
pub fn my_reservations(state: &AppState) -> Vec<Reservation> {
    state
        .session
        .current_user
        .as_ref()
        .map(|user| reservations_for_user(user.id)(state))
        .unwrap_or_default()
}

/// Days on which `car_id` cannot be booked
pub fn blocked_dates_for(car_id: u64) -> impl Fn(&AppState) -> BTreeSet<NaiveDate> + Send + Sync {
    move |state| blocked_dates(car_id, &state.booking.reservations)
}
