//! Booking slice: the canonical reservation list and everything derived
//! from it.
//!
//! The list is only ever replaced on load, appended on create and pruned on
//! delete, each time from a server-confirmed outcome. The blocked-date
//! calendar and the admin working copy are derived views.

pub mod actions;
pub mod calendar;
pub mod conflict;
pub mod effects;
pub mod normalize;
pub mod reducer;
pub mod selectors;
pub mod state;
pub mod working_copy;

pub use actions::BookingAction;
pub use calendar::BookingCalendar;
pub use conflict::{blocked_dates, billable_days, quote, BookingRequest, BookingValidationError};
pub use reducer::BookingReducer;
pub use state::{BookingState, Reservation};
pub use working_copy::ReservationTable;
