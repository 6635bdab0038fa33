//! Time source used to stamp records and derive the current calendar day.

use chrono::{Local, Utc};

use crate::{Day, Time};

/// Source of "now" and "today".
///
/// Calendar days are local dates. Implementations must be cheap to call;
/// the tracker asks for the time once per operation.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> Time;

    /// Current calendar day in the learner's local zone.
    fn today(&self) -> Day {
        self.now().with_timezone(&Local).date_naive()
    }
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Time {
        Utc::now()
    }
}

#[cfg(any(test, feature = "test-util"))]
pub use manual::ManualClock;

#[cfg(any(test, feature = "test-util"))]
mod manual {
    use std::sync::atomic::{AtomicI64, Ordering};

    use chrono::{DateTime, Duration};

    use super::Clock;
    use crate::{Day, Time};

    /// A clock that only moves when told to.
    ///
    /// Treats UTC as the local zone so `today()` is the UTC date of `now()`.
    #[derive(Debug)]
    pub struct ManualClock {
        seconds: AtomicI64,
    }

    impl ManualClock {
        /// Clock fixed at the given instant.
        pub fn new(now: Time) -> Self {
            Self {
                seconds: AtomicI64::new(now.timestamp()),
            }
        }

        /// Clock fixed at noon of the given day.
        pub fn on(day: Day) -> Self {
            Self::new(noon(day))
        }

        /// Jump to noon of another day.
        pub fn set_day(&self, day: Day) {
            self.seconds.store(noon(day).timestamp(), Ordering::SeqCst);
        }

        /// Move forward (or backward, for negative values) by whole days.
        pub fn advance_days(&self, days: i64) {
            self.advance(Duration::days(days));
        }

        /// Move by an arbitrary duration.
        pub fn advance(&self, by: Duration) {
            self.seconds.fetch_add(by.num_seconds(), Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Time {
            DateTime::from_timestamp(self.seconds.load(Ordering::SeqCst), 0).unwrap_or_default()
        }

        fn today(&self) -> Day {
            self.now().date_naive()
        }
    }

    fn noon(day: Day) -> Time {
        day.and_hms_opt(12, 0, 0)
            .map(|dt| dt.and_utc())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn day(y: i32, m: u32, d: u32) -> Day {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_manual_clock_on_day() {
        let clock = ManualClock::on(day(2024, 3, 10));
        assert_eq!(clock.today(), day(2024, 3, 10));
    }

    #[test]
    fn test_manual_clock_advance_days() {
        let clock = ManualClock::on(day(2024, 2, 28));
        clock.advance_days(1);
        assert_eq!(clock.today(), day(2024, 2, 29));
        clock.advance_days(2);
        assert_eq!(clock.today(), day(2024, 3, 2));
        clock.advance_days(-3);
        assert_eq!(clock.today(), day(2024, 2, 28));
    }

    #[test]
    fn test_manual_clock_set_day() {
        let clock = ManualClock::on(day(2024, 1, 1));
        clock.set_day(day(2025, 6, 15));
        assert_eq!(clock.today(), day(2025, 6, 15));
    }
}
