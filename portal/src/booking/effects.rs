//! Effect handler for the booking slice.
//!
//! Every intent becomes one API call and exactly one outcome action. No
//! retries: a failure is reported and the canonical list stays untouched.

use crate::app::{AppAction, AppState, PortalEnvironment};
use crate::booking::normalize::{normalize, normalize_all};
use crate::booking::BookingAction;
use autohire_client::ApiError;
use autohire_core::effect::{Effect, EffectHandler};
use autohire_core::{smallvec, try_effect, SmallVec};
use autohire_runtime::BoxedEffectHandler;
use std::sync::Arc;

type Effects = SmallVec<[Effect<AppAction>; 4]>;

/// All booking effect handlers
#[must_use]
pub fn handlers() -> Vec<BoxedEffectHandler<AppState, AppAction, PortalEnvironment>> {
    vec![Box::new(ReservationRequests)]
}

fn booking(action: BookingAction) -> Option<AppAction> {
    Some(AppAction::Booking(action))
}

fn failure(operation: &'static str, error: &ApiError) -> String {
    tracing::warn!(operation, %error, "Reservation request failed");
    metrics::counter!("portal.booking.failures", "operation" => operation).increment(1);
    error.user_message()
}

/// Sends reservation intents to the API
#[derive(Debug, Clone, Copy)]
pub struct ReservationRequests;

impl EffectHandler for ReservationRequests {
    type State = AppState;
    type Action = AppAction;
    type Environment = PortalEnvironment;

    fn name(&self) -> &'static str {
        "booking.requests"
    }

    fn handle(&self, action: &AppAction, _state: &AppState, env: &PortalEnvironment) -> Effects {
        let Some(action) = action.as_booking().filter(|a| a.is_intent()) else {
            return SmallVec::new();
        };
        let api = Arc::clone(&env.api);

        match action {
            BookingAction::LoadReservations => smallvec![try_effect! {
                call: api.list_reservations(),
                on_success: |records| {
                    let reservations = normalize_all(records);
                    tracing::debug!(count = reservations.len(), "Reservations loaded");
                    booking(BookingAction::LoadReservationsSucceeded { reservations })
                },
                on_error: |error| booking(BookingAction::LoadReservationsFailed {
                    message: failure("load", &error),
                })
            }],

            BookingAction::CreateReservation { reservation } => {
                let payload = reservation.clone();
                tracing::debug!(
                    car_id = payload.car_id,
                    start = %payload.start_date,
                    end = %payload.end_date,
                    "Creating reservation"
                );

                smallvec![Effect::future(async move {
                    let created = api.create_reservation(payload).await.and_then(|record| {
                        normalize(record).map_err(|e| ApiError::Decode(e.to_string()))
                    });

                    match created {
                        Ok(reservation) => {
                            tracing::info!(reservation_id = reservation.id, "Reservation created");
                            booking(BookingAction::CreateReservationSucceeded { reservation })
                        },
                        Err(error) => booking(BookingAction::CreateReservationFailed {
                            message: failure("create", &error),
                        }),
                    }
                })]
            },

            BookingAction::DeleteReservation { id } => {
                let id = *id;
                smallvec![try_effect! {
                    call: api.delete_reservation(id),
                    on_success: |_deleted| {
                        tracing::info!(reservation_id = id, "Reservation deleted");
                        booking(BookingAction::DeleteReservationSucceeded { id })
                    },
                    on_error: |error| booking(BookingAction::DeleteReservationFailed {
                        id,
                        message: failure("delete", &error),
                    })
                }]
            },

            BookingAction::UpdateReservationStatus { id, status } => {
                let (id, status) = (*id, *status);
                smallvec![Effect::future(async move {
                    let updated = api
                        .update_reservation_status(id, status)
                        .await
                        .and_then(|record| normalize(record).map_err(|e| ApiError::Decode(e.to_string())));

                    match updated {
                        Ok(reservation) => {
                            tracing::info!(reservation_id = id, %status, "Reservation status updated");
                            booking(BookingAction::ReservationStatusUpdated { reservation })
                        },
                        Err(error) => booking(BookingAction::UpdateReservationStatusFailed {
                            message: failure("update_status", &error),
                        }),
                    }
                })]
            },

            _ => SmallVec::new(),
        }
    }
}
