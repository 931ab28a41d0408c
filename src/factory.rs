//! Range construction from loosely shaped arguments.
//!
//! [`make_range`] accepts up to two positional bounds plus an optional named
//! `end`. Each bound is an [`Anchor`]: either an absolute point or an offset
//! from "now". The shapes resolve as follows:
//!
//! | positional | `end` | result                                   |
//! |------------|-------|------------------------------------------|
//! | none       | none  | forward, from now to eternity            |
//! | none       | `e`   | backward "until" range, no start         |
//! | `a`        | none  | forward, from `a` to eternity            |
//! | `a`        | `e`   | same as `a, e`                           |
//! | `a, b`     | none  | forward if `a <= b`, otherwise backward  |
//!
//! Anything else is rejected with [`Error::InvalidArguments`].

use chrono::{DateTime, Duration, TimeZone};

use crate::clock::Clock;
use crate::errors::{Error, Result};
use crate::range::TimeRange;

/// A factory argument: an absolute point, or an offset from "now".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor<Tz: TimeZone> {
    At(DateTime<Tz>),
    Offset(Duration),
}

impl<Tz: TimeZone> Anchor<Tz> {
    fn resolve(&self, now: &DateTime<Tz>) -> Result<DateTime<Tz>> {
        match self {
            Anchor::At(point) => Ok(point.clone()),
            Anchor::Offset(offset) => now.clone().checked_add_signed(*offset).ok_or_else(|| {
                Error::InvalidArguments(format!("offset {} from now is out of range", offset))
            }),
        }
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Anchor<Tz> {
    fn from(point: DateTime<Tz>) -> Self {
        Anchor::At(point)
    }
}

impl<Tz: TimeZone> From<Duration> for Anchor<Tz> {
    fn from(offset: Duration) -> Self {
        Anchor::Offset(offset)
    }
}

/// Build a forward or backward [`TimeRange`] from positional bounds and an
/// optional named `end`.
///
/// The clock is read exactly once, so every offset in one call resolves
/// against the same instant.
pub fn make_range<C: Clock>(
    clock: &C,
    positional: &[Anchor<C::Tz>],
    end: Option<Anchor<C::Tz>>,
) -> Result<TimeRange<C::Tz>> {
    let now = clock.now();

    let range = match (positional, end.as_ref()) {
        ([], None) => TimeRange::starting_at(now),
        ([], Some(end)) => TimeRange::until(end.resolve(&now)?),
        ([start], None) => TimeRange::starting_at(start.resolve(&now)?),
        ([start], Some(end)) | ([start, end], None) => {
            TimeRange::between(start.resolve(&now)?, end.resolve(&now)?)
        }
        _ => {
            return Err(Error::InvalidArguments(format!(
                "expected at most two bounds, got {} positional and {} named",
                positional.len(),
                usize::from(end.is_some())
            )))
        }
    };

    log::debug!(
        "Resolved {:?} range from {:?} to {:?}",
        range.direction(),
        range.start(),
        range.end()
    );

    Ok(range)
}
