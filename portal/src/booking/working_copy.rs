//! Admin reservation table.
//!
//! The admin detail view drops a row as soon as the admin deletes it and
//! only then asks the store to delete the reservation for real. Its rows are
//! the canonical list minus the ids still awaiting deletion. An id stops
//! awaiting once it is gone from the canonical list or its delete is reported
//! failed, so a failed delete makes the row reappear.

use crate::app::{AppAction, PortalStore};
use crate::booking::{BookingAction, BookingState, Reservation};
use autohire_runtime::{EffectHandle, StoreError};
use std::collections::BTreeSet;

/// Local working copy of the reservation list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReservationTable {
    rows: Vec<Reservation>,
    removed: BTreeSet<u64>,
}

impl ReservationTable {
    /// Start from the canonical list
    #[must_use]
    pub fn from_slice(booking: &BookingState) -> Self {
        Self {
            rows: booking.reservations.clone(),
            removed: BTreeSet::new(),
        }
    }

    /// Rows currently shown
    #[must_use]
    pub fn rows(&self) -> &[Reservation] {
        &self.rows
    }

    /// Drop a row locally
    ///
    /// Returns the canonical delete to dispatch, or `None` if the row is
    /// already gone. Removing the same id twice is harmless.
    pub fn remove(&mut self, id: u64) -> Option<BookingAction> {
        let before = self.rows.len();
        self.rows.retain(|r| r.id != id);
        if self.rows.len() == before || !self.removed.insert(id) {
            return None;
        }
        Some(BookingAction::DeleteReservation { id })
    }

    /// Drop a row locally and dispatch the canonical delete
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store no longer
    /// accepts actions.
    pub fn delete(&mut self, id: u64, store: &PortalStore) -> Result<Option<EffectHandle>, StoreError> {
        self.remove(id)
            .map(|action| store.dispatch(AppAction::Booking(action)))
            .transpose()
    }

    /// Record the outcome of a canonical delete
    ///
    /// A failed delete releases its id; the row returns on the next
    /// [`reconcile`](Self::reconcile).
    pub fn apply(&mut self, action: &BookingAction) {
        if let BookingAction::DeleteReservationFailed { id, .. } = action {
            self.removed.remove(id);
        }
    }

    /// Converge towards the canonical list
    ///
    /// Rows awaiting deletion stay hidden until they leave the canonical list.
    pub fn reconcile(&mut self, booking: &BookingState) {
        self.removed
            .retain(|id| booking.reservations.iter().any(|r| r.id == *id));
        self.rows = booking
            .reservations
            .iter()
            .filter(|r| !self.removed.contains(&r.id))
            .cloned()
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autohire_client::ReservationStatus;
    use autohire_testing::date;

    fn slice(ids: &[u64], pending: bool) -> BookingState {
        BookingState {
            reservations: ids
                .iter()
                .map(|id| Reservation {
                    id: *id,
                    car_id: 1,
                    user_id: 1,
                    start_date: date(2025, 3, 1),
                    end_date: date(2025, 3, 1),
                    total_price: 50.0,
                    currency: "USD".into(),
                    status: ReservationStatus::Confirmed,
                })
                .collect(),
            pending,
            failure_reason: None,
        }
    }

    fn ids(table: &ReservationTable) -> Vec<u64> {
        table.rows().iter().map(|r| r.id).collect()
    }

    #[test]
    fn removal_is_idempotent() {
        let mut table = ReservationTable::from_slice(&slice(&[1, 2], false));

        assert_eq!(table.remove(1), Some(BookingAction::DeleteReservation { id: 1 }));
        assert_eq!(table.remove(1), None);
        assert_eq!(table.remove(42), None);
        assert_eq!(ids(&table), vec![2]);
    }

    #[test]
    fn removed_rows_stay_hidden_until_resolved() {
        let mut table = ReservationTable::from_slice(&slice(&[1, 2], false));
        table.remove(1);

        table.reconcile(&slice(&[1, 2, 3], true));
        assert_eq!(ids(&table), vec![2, 3]);

        // Another request finishing does not resolve the delete
        table.reconcile(&slice(&[1, 2, 3], false));
        assert_eq!(ids(&table), vec![2, 3]);
    }

    #[test]
    fn failed_delete_brings_row_back() {
        let mut table = ReservationTable::from_slice(&slice(&[1, 2], false));
        table.remove(1);

        table.apply(&BookingAction::DeleteReservationFailed {
            id: 1,
            message: "Forbidden".into(),
        });
        table.reconcile(&slice(&[1, 2], false));
        assert_eq!(ids(&table), vec![1, 2]);
    }

    #[test]
    fn other_failures_keep_row_hidden() {
        let mut table = ReservationTable::from_slice(&slice(&[1, 2], false));
        table.remove(1);

        table.apply(&BookingAction::DeleteReservationFailed {
            id: 2,
            message: "Forbidden".into(),
        });
        table.apply(&BookingAction::LoadReservationsFailed {
            message: "down".into(),
        });
        table.reconcile(&slice(&[1, 2], false));
        assert_eq!(ids(&table), vec![2]);
    }

    #[test]
    fn confirmed_delete_converges() {
        let mut table = ReservationTable::from_slice(&slice(&[1, 2], false));
        table.remove(1);

        table.reconcile(&slice(&[2], false));
        assert_eq!(ids(&table), vec![2]);

        // A later reload containing the id again shows it
        table.reconcile(&slice(&[1, 2], false));
        assert_eq!(ids(&table), vec![1, 2]);
    }
}
