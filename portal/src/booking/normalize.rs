//! Turning API records into [`Reservation`]s.
//!
//! Records carry dates either as `YYYY-MM-DD` or as timestamps, and a
//! status that may be missing or unknown. Both are normalized here, once,
//! before anything reaches the store.

use crate::booking::Reservation;
use autohire_client::{ReservationRecord, ReservationStatus};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;

/// Currency assumed when a record carries none
pub const DEFAULT_CURRENCY: &str = "USD";

/// A record that cannot be normalized
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Reservation {id} has an unreadable {field}: {value:?}")]
pub struct NormalizeError {
    /// Reservation id
    pub id: u64,
    /// Offending field
    pub field: &'static str,
    /// Raw value
    pub value: String,
}

/// Parse a calendar day from a date or a timestamp
///
/// Timestamps are reduced to the calendar day they name, ignoring time of day.
#[must_use]
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Map a raw status onto the lifecycle; unknown or absent means Pending
#[must_use]
pub fn normalize_status(raw: Option<&str>) -> ReservationStatus {
    raw.and_then(ReservationStatus::parse).unwrap_or_default()
}

/// Normalize one record
///
/// # Errors
///
/// Returns [`NormalizeError`] if either date cannot be read.
pub fn normalize(record: ReservationRecord) -> Result<Reservation, NormalizeError> {
    let day = |field: &'static str, value: &str| {
        parse_day(value).ok_or_else(|| NormalizeError {
            id: record.id,
            field,
            value: value.to_string(),
        })
    };

    let start_date = day("startDate", &record.start_date)?;
    let end_date = day("endDate", &record.end_date)?;

    Ok(Reservation {
        id: record.id,
        car_id: record.car_id,
        user_id: record.user_id,
        start_date,
        end_date,
        total_price: record.total_price,
        currency: record
            .currency
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        status: normalize_status(record.status.as_deref()),
    })
}

/// Normalize a list, skipping records with unreadable dates
pub fn normalize_all(records: Vec<ReservationRecord>) -> Vec<Reservation> {
    records
        .into_iter()
        .filter_map(|record| {
            normalize(record)
                .map_err(|error| tracing::warn!(%error, "Skipping reservation"))
                .ok()
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn record(status: Option<&str>, start: &str) -> ReservationRecord {
        ReservationRecord {
            id: 1,
            car_id: 2,
            user_id: 3,
            start_date: start.into(),
            end_date: "2025-03-02".into(),
            total_price: 80.0,
            currency: None,
            status: status.map(str::to_string),
        }
    }

    #[test]
    fn unknown_or_missing_status_is_pending() {
        assert_eq!(normalize_status(None), ReservationStatus::Pending);
        assert_eq!(normalize_status(Some("on hold")), ReservationStatus::Pending);
        assert_eq!(normalize_status(Some("CANCELLED")), ReservationStatus::Cancelled);
    }

    #[test]
    fn timestamps_become_calendar_days() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(parse_day("2025-03-01"), Some(day));
        assert_eq!(parse_day("2025-03-01T00:00:00.000Z"), Some(day));
        assert_eq!(parse_day("2025-03-01T18:30:00+02:00"), Some(day));
        assert_eq!(parse_day("2025-03-01T09:15:00"), Some(day));
        assert_eq!(parse_day("March 1st"), None);
    }

    #[test]
    fn currency_defaults_to_usd() {
        let reservation = normalize(record(Some("Confirmed"), "2025-03-01")).unwrap();
        assert_eq!(reservation.currency, "USD");
        assert_eq!(reservation.status, ReservationStatus::Confirmed);
    }

    #[test]
    fn unreadable_records_are_skipped() {
        let kept = normalize_all(vec![
            record(None, "2025-03-01"),
            record(None, "not a date"),
        ]);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn error_names_the_field() {
        let error = normalize(record(None, "soon")).unwrap_err();
        assert_eq!(error.field, "startDate");
    }
}
