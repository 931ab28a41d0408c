//! Directed time ranges.
//!
//! A [`TimeRange`] spans from `start` to `end`, either of which may be
//! absent (unbounded). Its [`Direction`] is fixed when it is built:
//!
//! ```text
//! forward     [12:30 ==========>> 14:15>
//! backward    <12:30 <<========== 14:15]
//! open        [12:30 ===================>> ...
//! until   ... <<=================== 14:00]
//! ```
//!
//! Stepping always walks from `start` toward `end`.

use std::fmt;
use std::iter::FusedIterator;
use std::ops::{Bound, RangeBounds};

use chrono::{DateTime, Duration, TimeZone};

use crate::errors::{Error, Result};
use crate::interval::ToDuration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `start <= end`, iterated in increasing time order.
    Forward,
    /// `start > end`, iterated in decreasing time order.
    Backward,
}

/// Whether equality with each bound counts as inside the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Inclusion {
    pub start: bool,
    pub end: bool,
}

impl Inclusion {
    pub const CLOSED: Inclusion = Inclusion {
        start: true,
        end: true,
    };
    pub const OPEN: Inclusion = Inclusion {
        start: false,
        end: false,
    };
    pub const EXCLUDE_START: Inclusion = Inclusion {
        start: false,
        end: true,
    };
    pub const EXCLUDE_END: Inclusion = Inclusion {
        start: true,
        end: false,
    };
}

impl Default for Inclusion {
    fn default() -> Self {
        Inclusion::CLOSED
    }
}

/// An immutable span of time with a fixed direction.
///
/// # Invariants
/// At least one of `start` and `end` is present. When both are present,
/// `start <= end` for a forward range and `start > end` for a backward one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimeRange<Tz: TimeZone> {
    start: Option<DateTime<Tz>>,
    end: Option<DateTime<Tz>>,
    direction: Direction,
}

impl<Tz: TimeZone> TimeRange<Tz> {
    /// Build a forward range, rejecting bounds that run backward.
    pub fn forward(start: Option<DateTime<Tz>>, end: Option<DateTime<Tz>>) -> Result<Self> {
        require_a_bound(&start, &end)?;
        if let (Some(s), Some(e)) = (&start, &end) {
            if s > e {
                return Err(Error::InvalidBounds(format!(
                    "forward range cannot start at {:?} after its end {:?}, build a backward range instead",
                    s, e
                )));
            }
        }
        Ok(TimeRange {
            start,
            end,
            direction: Direction::Forward,
        })
    }

    /// Build a backward range, rejecting bounds that do not strictly run backward.
    pub fn backward(start: Option<DateTime<Tz>>, end: Option<DateTime<Tz>>) -> Result<Self> {
        require_a_bound(&start, &end)?;
        if let (Some(s), Some(e)) = (&start, &end) {
            if s <= e {
                return Err(Error::InvalidBounds(format!(
                    "backward range cannot start at {:?} at or before its end {:?}, build a forward range instead",
                    s, e
                )));
            }
        }
        Ok(TimeRange {
            start,
            end,
            direction: Direction::Backward,
        })
    }

    /// A bounded range whose direction follows the order of `start` and `end`.
    pub fn between(start: DateTime<Tz>, end: DateTime<Tz>) -> Self {
        let direction = if start <= end {
            Direction::Forward
        } else {
            Direction::Backward
        };
        TimeRange {
            start: Some(start),
            end: Some(end),
            direction,
        }
    }

    /// A forward range from `start` to eternity.
    pub fn starting_at(start: DateTime<Tz>) -> Self {
        TimeRange {
            start: Some(start),
            end: None,
            direction: Direction::Forward,
        }
    }

    /// A backward range with no start, reaching infinitely into the past up to `end`.
    pub fn until(end: DateTime<Tz>) -> Self {
        TimeRange {
            start: None,
            end: Some(end),
            direction: Direction::Backward,
        }
    }

    pub fn start(&self) -> Option<&DateTime<Tz>> {
        self.start.as_ref()
    }

    pub fn end(&self) -> Option<&DateTime<Tz>> {
        self.end.as_ref()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_forward(&self) -> bool {
        self.direction == Direction::Forward
    }

    pub fn is_backward(&self) -> bool {
        self.direction == Direction::Backward
    }

    /// True when both bounds are present.
    pub fn is_bounded(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// `end - start`, negative for backward ranges. `None` when a bound is absent.
    pub fn delta(&self) -> Option<Duration> {
        match (&self.start, &self.end) {
            (Some(s), Some(e)) => Some(e.clone().signed_duration_since(s.clone())),
            _ => None,
        }
    }

    /// The chronologically earliest point of the range, if it has one.
    pub fn earliest(&self) -> Option<&DateTime<Tz>> {
        match self.direction {
            Direction::Forward => self.start.as_ref(),
            // Without a start the range is the "until" shape, open toward the past.
            Direction::Backward => self.start.as_ref().and(self.end.as_ref()),
        }
    }

    /// The chronologically latest point of the range, if it has one.
    pub fn latest(&self) -> Option<&DateTime<Tz>> {
        match self.direction {
            Direction::Forward => self.end.as_ref(),
            Direction::Backward => self.start.as_ref().or(self.end.as_ref()),
        }
    }

    /// Membership with both bounds included.
    pub fn contains(&self, point: &DateTime<Tz>) -> bool {
        self.contains_with(point, Inclusion::CLOSED)
    }

    pub fn contains_with(&self, point: &DateTime<Tz>, inclusion: Inclusion) -> bool {
        match (self.direction, &self.start) {
            (Direction::Forward, _) => {
                not_before(point, self.start.as_ref(), inclusion.start)
                    && not_after(point, self.end.as_ref(), inclusion.end)
            }
            (Direction::Backward, Some(start)) => {
                not_after(point, Some(start), inclusion.start)
                    && not_before(point, self.end.as_ref(), inclusion.end)
            }
            (Direction::Backward, None) => not_after(point, self.end.as_ref(), inclusion.end),
        }
    }

    /// True when every point of `other` is also a point of `self`.
    pub fn encloses(&self, other: &TimeRange<Tz>) -> bool {
        let lower_ok = match (self.earliest(), other.earliest()) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(mine), Some(theirs)) => theirs >= mine,
        };
        let upper_ok = match (self.latest(), other.latest()) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(mine), Some(theirs)) => theirs <= mine,
        };
        lower_ok && upper_ok
    }

    /// Walk from `start` toward `end` in steps of `interval`, both bounds included.
    ///
    /// The sequence is infinite when `end` is absent. Errors are reported
    /// here, before any element is produced.
    pub fn step<I: ToDuration + ?Sized>(&self, interval: &I) -> Result<Steps<Tz>> {
        self.step_with(interval, Inclusion::CLOSED)
    }

    pub fn step_with<I: ToDuration + ?Sized>(
        &self,
        interval: &I,
        inclusion: Inclusion,
    ) -> Result<Steps<Tz>> {
        let interval = interval.to_duration()?;
        if interval <= Duration::zero() {
            return Err(Error::InvalidInterval(format!(
                "step must be positive, got {}",
                interval
            )));
        }
        let start = self.start.clone().ok_or(Error::UndefinedStart)?;

        let cursor = if inclusion.start {
            Some(start)
        } else {
            advance(start, interval, self.direction)
        };

        log::trace!(
            "Stepping {:?} range by {} (start included: {}, end included: {})",
            self.direction,
            interval,
            inclusion.start,
            inclusion.end
        );

        Ok(Steps {
            cursor,
            end: self.end.clone(),
            interval,
            direction: self.direction,
            include_end: inclusion.end,
        })
    }
}

fn require_a_bound<Tz: TimeZone>(
    start: &Option<DateTime<Tz>>,
    end: &Option<DateTime<Tz>>,
) -> Result<()> {
    if start.is_none() && end.is_none() {
        return Err(Error::InvalidArguments(
            "a range needs at least one bound".to_string(),
        ));
    }
    Ok(())
}

fn not_before<Tz: TimeZone>(
    point: &DateTime<Tz>,
    bound: Option<&DateTime<Tz>>,
    inclusive: bool,
) -> bool {
    match bound {
        None => true,
        Some(bound) if inclusive => point >= bound,
        Some(bound) => point > bound,
    }
}

fn not_after<Tz: TimeZone>(
    point: &DateTime<Tz>,
    bound: Option<&DateTime<Tz>>,
    inclusive: bool,
) -> bool {
    match bound {
        None => true,
        Some(bound) if inclusive => point <= bound,
        Some(bound) => point < bound,
    }
}

fn advance<Tz: TimeZone>(
    cursor: DateTime<Tz>,
    interval: Duration,
    direction: Direction,
) -> Option<DateTime<Tz>> {
    match direction {
        Direction::Forward => cursor.checked_add_signed(interval),
        Direction::Backward => cursor.checked_sub_signed(interval),
    }
}

impl<Tz: TimeZone> RangeBounds<DateTime<Tz>> for TimeRange<Tz> {
    fn start_bound(&self) -> Bound<&DateTime<Tz>> {
        self.earliest().map_or(Bound::Unbounded, Bound::Included)
    }

    fn end_bound(&self) -> Bound<&DateTime<Tz>> {
        self.latest().map_or(Bound::Unbounded, Bound::Included)
    }
}

impl<Tz: TimeZone> fmt::Display for TimeRange<Tz>
where
    Tz::Offset: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.direction, &self.start, &self.end) {
            (Direction::Forward, Some(s), Some(e)) => write!(f, "[{}, ..., {}>", s, e),
            (Direction::Forward, Some(s), None) => write!(f, "[{}, ...>", s),
            (Direction::Forward, None, Some(e)) => write!(f, "[..., {}>", e),
            (Direction::Backward, Some(s), Some(e)) => write!(f, "<{}, ..., {}]", e, s),
            (Direction::Backward, Some(s), None) => write!(f, "<..., {}]", s),
            (Direction::Backward, None, Some(e)) => write!(f, "<..., {}]", e),
            (_, None, None) => write!(f, "<...>"),
        }
    }
}

/// Lazy iterator over the steps of a [`TimeRange`].
///
/// Infinite when the range has no end; the caller bounds consumption.
#[derive(Debug, Clone)]
pub struct Steps<Tz: TimeZone> {
    cursor: Option<DateTime<Tz>>,
    end: Option<DateTime<Tz>>,
    interval: Duration,
    direction: Direction,
    include_end: bool,
}

impl<Tz: TimeZone> Steps<Tz> {
    fn admits(&self, point: &DateTime<Tz>) -> bool {
        match self.direction {
            Direction::Forward => not_after(point, self.end.as_ref(), self.include_end),
            Direction::Backward => not_before(point, self.end.as_ref(), self.include_end),
        }
    }

    /// Exact number of points left between `cursor` and `end`.
    ///
    /// Every such point lies between two representable instants, so the
    /// count is not cut short by chrono's limits.
    fn remaining(&self, cursor: &DateTime<Tz>, end: &DateTime<Tz>) -> Option<u128> {
        let gap = match self.direction {
            Direction::Forward => end.clone().signed_duration_since(cursor.clone()),
            Direction::Backward => cursor.clone().signed_duration_since(end.clone()),
        };
        let gap = total_nanos(gap);
        let interval = total_nanos(self.interval);
        if gap < 0 || interval <= 0 {
            return Some(0);
        }
        let gap = u128::try_from(gap).ok()?;
        let interval = u128::try_from(interval).ok()?;
        let lands_on_end = gap % interval == 0;
        let count = gap / interval + 1;
        Some(if lands_on_end && !self.include_end {
            count - 1
        } else {
            count
        })
    }
}

fn total_nanos(duration: Duration) -> i128 {
    i128::from(duration.num_seconds()) * 1_000_000_000 + i128::from(duration.subsec_nanos())
}

impl<Tz: TimeZone> Iterator for Steps<Tz> {
    type Item = DateTime<Tz>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.cursor.take()?;
        if !self.admits(&current) {
            return None;
        }
        self.cursor = advance(current.clone(), self.interval, self.direction);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match (&self.cursor, &self.end) {
            (None, _) => (0, Some(0)),
            // Unbounded, but the cursor may still run into chrono's limit
            (Some(_), None) => (1, None),
            (Some(cursor), Some(end)) => match self
                .remaining(cursor, end)
                .and_then(|n| usize::try_from(n).ok())
            {
                Some(n) => (n, Some(n)),
                None => (usize::MAX, None),
            },
        }
    }
}

impl<Tz: TimeZone> FusedIterator for Steps<Tz> {}
