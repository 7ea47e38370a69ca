//! Shared test doubles.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

/// A clock that only moves when told to.
pub(crate) struct FixedClock(Mutex<DateTime<Utc>>);

impl FixedClock {
    pub(crate) fn at(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self(Mutex::new(now)))
    }

    pub(crate) fn set(&self, now: DateTime<Utc>) {
        *self.lock_clock() = now;
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// 2024-03-17 14:10:00 UTC.
pub(crate) fn ten_past_two() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 17, 14, 10, 0)
        .single()
        .unwrap_or_default()
}
