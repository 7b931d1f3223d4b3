//! Reducer for the booking slice.

use crate::booking::{BookingAction, BookingState};
use autohire_core::reducer::{update, Reducer};
use std::sync::Arc;

/// Pure state transitions of the booking slice.
///
/// The reservation list only changes on confirmed outcomes; intents merely
/// raise `pending`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookingReducer;

impl Reducer for BookingReducer {
    type State = BookingState;
    type Action = BookingAction;

    fn reduce(&self, state: &Arc<BookingState>, action: &BookingAction) -> Arc<BookingState> {
        match action {
            BookingAction::LoadReservations
            | BookingAction::CreateReservation { .. }
            | BookingAction::DeleteReservation { .. }
            | BookingAction::UpdateReservationStatus { .. } => update(state, |s| {
                s.pending = true;
                s.failure_reason = None;
            }),

            BookingAction::LoadReservationsSucceeded { reservations } => update(state, |s| {
                s.reservations.clone_from(reservations);
                s.pending = false;
            }),

            BookingAction::CreateReservationSucceeded { reservation } => update(state, |s| {
                s.reservations.push(reservation.clone());
                s.pending = false;
            }),

            BookingAction::DeleteReservationSucceeded { id } => update(state, |s| {
                s.reservations.retain(|r| r.id != *id);
                s.pending = false;
            }),

            BookingAction::ReservationStatusUpdated { reservation } => update(state, |s| {
                if let Some(existing) = s.reservations.iter_mut().find(|r| r.id == reservation.id) {
                    *existing = reservation.clone();
                }
                s.pending = false;
            }),

            BookingAction::LoadReservationsFailed { message }
            | BookingAction::CreateReservationFailed { message }
            | BookingAction::DeleteReservationFailed { message, .. }
            | BookingAction::UpdateReservationStatusFailed { message } => update(state, |s| {
                s.failure_reason = Some(message.clone());
                s.pending = false;
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::booking::Reservation;
    use autohire_client::ReservationStatus;
    use autohire_testing::{date, ReducerTest};

    fn reservation(id: u64, status: ReservationStatus) -> Reservation {
        Reservation {
            id,
            car_id: 7,
            user_id: 1,
            start_date: date(2025, 3, 1),
            end_date: date(2025, 3, 2),
            total_price: 200.0,
            currency: "USD".into(),
            status,
        }
    }

    fn loaded(ids: &[u64]) -> BookingState {
        BookingState {
            reservations: ids
                .iter()
                .map(|id| reservation(*id, ReservationStatus::Confirmed))
                .collect(),
            ..BookingState::default()
        }
    }

    #[test]
    fn load_replaces_the_list() {
        ReducerTest::new(BookingReducer)
            .given_state(loaded(&[1, 2]))
            .when_action(BookingAction::LoadReservations)
            .when_action(BookingAction::LoadReservationsSucceeded {
                reservations: vec![reservation(9, ReservationStatus::Pending)],
            })
            .then_state(|s| {
                assert!(!s.pending);
                assert_eq!(s.reservations.len(), 1);
                assert_eq!(s.reservations[0].id, 9);
            })
            .run();
    }

    #[test]
    fn create_appends() {
        ReducerTest::new(BookingReducer)
            .given_state(loaded(&[1]))
            .when_action(BookingAction::CreateReservationSucceeded {
                reservation: reservation(2, ReservationStatus::Confirmed),
            })
            .then_state(|s| {
                let ids: Vec<u64> = s.reservations.iter().map(|r| r.id).collect();
                assert_eq!(ids, vec![1, 2]);
            })
            .run();
    }

    #[test]
    fn delete_removes_exactly_that_entry() {
        ReducerTest::new(BookingReducer)
            .given_state(loaded(&[1, 2, 3]))
            .when_action(BookingAction::DeleteReservationSucceeded { id: 2 })
            .then_state(|s| {
                let ids: Vec<u64> = s.reservations.iter().map(|r| r.id).collect();
                assert_eq!(ids, vec![1, 3]);
            })
            .run();
    }

    #[test]
    fn delete_of_missing_id_is_harmless() {
        ReducerTest::new(BookingReducer)
            .given_state(loaded(&[1]))
            .when_action(BookingAction::DeleteReservationSucceeded { id: 2 })
            .when_action(BookingAction::DeleteReservationSucceeded { id: 2 })
            .then_state(|s| assert_eq!(s.reservations.len(), 1))
            .run();
    }

    #[test]
    fn status_update_replaces_by_id() {
        ReducerTest::new(BookingReducer)
            .given_state(loaded(&[1, 2]))
            .when_action(BookingAction::ReservationStatusUpdated {
                reservation: reservation(2, ReservationStatus::Cancelled),
            })
            .then_state(|s| {
                assert_eq!(s.get(1).unwrap().status, ReservationStatus::Confirmed);
                assert_eq!(s.get(2).unwrap().status, ReservationStatus::Cancelled);
            })
            .run();
    }

    #[test]
    fn failure_keeps_list_and_records_reason() {
        ReducerTest::new(BookingReducer)
            .given_state(loaded(&[1]))
            .when_action(BookingAction::CreateReservation {
                reservation: autohire_client::NewReservation {
                    car_id: 7,
                    user_id: 1,
                    start_date: date(2025, 4, 1),
                    end_date: date(2025, 4, 1),
                    total_price: 100.0,
                    currency: "USD".into(),
                    status: ReservationStatus::Confirmed,
                },
            })
            .when_action(BookingAction::CreateReservationFailed {
                message: "Car is not available".into(),
            })
            .then_state(|s| {
                assert!(!s.pending);
                assert_eq!(s.reservations.len(), 1);
                assert_eq!(s.failure_reason.as_deref(), Some("Car is not available"));
            })
            .run();
    }
}
