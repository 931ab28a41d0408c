//! Sources of "now" for the range factory.
//!
//! Relative bounds (a `Duration` offset) are resolved against a [`Clock`]
//! instead of reading the wall clock directly, so callers can pin the
//! current instant in tests.

use chrono::{DateTime, Local, TimeZone, Utc};

/// Provides the current instant in a particular timezone.
pub trait Clock {
    type Tz: TimeZone;

    fn now(&self) -> DateTime<Self::Tz>;
}

/// Wall clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    type Tz = Utc;

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Wall clock in the system's local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    type Tz = Local;

    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Wall clock expressed in a named IANA timezone.
#[derive(Debug, Clone, Copy)]
pub struct ZonedClock(pub chrono_tz::Tz);

impl Clock for ZonedClock {
    type Tz = chrono_tz::Tz;

    fn now(&self) -> DateTime<chrono_tz::Tz> {
        Utc::now().with_timezone(&self.0)
    }
}

/// A clock stopped at a single instant.
#[derive(Debug, Clone)]
pub struct FixedClock<Tz: TimeZone>(pub DateTime<Tz>);

impl<Tz: TimeZone> Clock for FixedClock<Tz> {
    type Tz = Tz;

    fn now(&self) -> DateTime<Tz> {
        self.0.clone()
    }
}
