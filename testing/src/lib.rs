//! # Autohire Testing
//!
//! Testing utilities and helpers for the Autohire state layer.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then assertions for reducers
//! - [`EffectTest`]: Given-When-Then assertions for effect handlers
//! - [`run_effects`]: executes effect descriptions and collects follow-up actions
//! - [`MockRentalApi`]: scripted in-memory rental API
//! - [`FixedClock`]: deterministic time
//!
//! ## Example
//!
//! ```ignore
//! use autohire_testing::{test_clock, MockRentalApi};
//!
//! #[tokio::test]
//! async fn test_login_flow() {
//!     let api = MockRentalApi::new().with_account(identity(), "secret");
//!     let store = build_store(PortalEnvironment::new(Arc::new(api), ...));
//!
//!     store.dispatch(SessionAction::Login { .. }.into())?.wait().await;
//!
//!     assert!(store.select(selectors::is_authenticated));
//! }
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use autohire_core::environment::Clock;

pub mod effect_test;
pub mod reducer_test;
pub mod rental_mocks;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, NaiveDate, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use autohire_testing::mocks::FixedClock;
    /// use autohire_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }

        /// Create a clock fixed at midnight UTC of `date`
        #[must_use]
        pub fn on(date: NaiveDate) -> Self {
            Self::new(date.and_time(chrono::NaiveTime::MIN).and_utc())
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Test helpers and utilities
pub mod helpers {
    /// Build a calendar date, panicking on invalid input
    ///
    /// # Panics
    ///
    /// Panics if the date does not exist.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn date(year: i32, month: u32, day: u32) -> chrono::NaiveDate {
        chrono::NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
    }

    /// Install a `tracing` subscriber writing to the test output
    ///
    /// Safe to call from every test; only the first call installs.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "autohire=debug".into()),
            )
            .with_test_writer()
            .try_init();
    }
}

// Re-export commonly used items
pub use effect_test::{run_effect, run_effects, EffectTest};
pub use helpers::date;
pub use mocks::{test_clock, FixedClock};
pub use reducer_test::{assertions, ReducerTest};
pub use rental_mocks::MockRentalApi;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
        assert_eq!(clock.today(), date(2025, 1, 1));
    }

    #[test]
    fn test_fixed_clock_on_date() {
        let clock = FixedClock::on(date(2025, 3, 1));
        assert_eq!(clock.today(), date(2025, 3, 1));
    }
}
