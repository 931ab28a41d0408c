//! Directed time ranges with membership tests and fixed-interval stepping.
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use trange::{trange, FixedClock};
//!
//! let noon = Utc.with_ymd_and_hms(2019, 1, 1, 12, 0, 0).unwrap();
//! let clock = FixedClock(noon);
//!
//! let range = trange!(&clock; noon + Duration::hours(1), noon).unwrap();
//! assert!(range.is_backward());
//! assert!(range.contains(&(noon + Duration::minutes(30))));
//!
//! let steps: Vec<_> = range.step("15 minutes").unwrap().collect();
//! assert_eq!(steps.len(), 5);
//! assert_eq!(steps.last(), Some(&noon));
//! ```

/// Build a [`TimeRange`] with positional and named bounds.
///
/// Every bound is a `DateTime` or a `chrono::Duration` offset from the
/// clock's "now".
///
/// - `trange!(clock)` starts now and never ends
/// - `trange!(clock; a)` starts at `a` and never ends
/// - `trange!(clock; a, b)` runs from `a` to `b`, backward if `a > b`
/// - `trange!(clock; end = e)` reaches infinitely into the past up to `e`
/// - `trange!(clock; a; end = e)` is the same as `trange!(clock; a, e)`
#[macro_export]
macro_rules! trange {
    ($clock:expr $(,)?) => {
        $crate::make_range($clock, &[], None)
    };
    ($clock:expr; end = $end:expr $(,)?) => {
        $crate::make_range($clock, &[], Some($crate::Anchor::from($end)))
    };
    ($clock:expr; $($arg:expr),+ $(,)?) => {
        $crate::make_range($clock, &[$($crate::Anchor::from($arg)),+], None)
    };
    ($clock:expr; $($arg:expr),+ ; end = $end:expr $(,)?) => {
        $crate::make_range(
            $clock,
            &[$($crate::Anchor::from($arg)),+],
            Some($crate::Anchor::from($end)),
        )
    };
}

pub mod clock;
pub mod errors;
pub mod factory;
pub mod interval;
pub mod range;

pub use clock::{Clock, FixedClock, LocalClock, SystemClock, ZonedClock};
pub use errors::{Error, Result};
pub use factory::{make_range, Anchor};
pub use interval::{Interval, ToDuration};
pub use range::{Direction, Inclusion, Steps, TimeRange};
