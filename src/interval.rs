//! Step sizes.
//!
//! An [`Interval`] is a bag of named unit magnitudes that add up to one
//! signed `chrono::Duration`. It can be written inline, deserialized from
//! configuration, or parsed from a human string.
//!
//! # Supported string formats
//!
//! - **Single unit**: `"15 minutes"`, `"1 hour"`, `"2.5 days"`
//! - **Article**: `"an hour"`, `"a week"`
//! - **Compound**: `"1 hour 30 minutes"`, `"1 day, 2 hours and 5 minutes"`
//! - **Abbreviated**: `"90s"`, `"1h30m"`, `"250ms"`, `"10us"`

use std::str::FromStr;

use chrono::Duration;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

const MICROS_PER_MILLISECOND: f64 = 1_000.0;
const MICROS_PER_SECOND: f64 = 1_000_000.0;
const MICROS_PER_MINUTE: f64 = 60.0 * MICROS_PER_SECOND;
const MICROS_PER_HOUR: f64 = 60.0 * MICROS_PER_MINUTE;
const MICROS_PER_DAY: f64 = 24.0 * MICROS_PER_HOUR;
const MICROS_PER_WEEK: f64 = 7.0 * MICROS_PER_DAY;

/// Named unit magnitudes, each defaulting to zero.
///
/// Magnitudes may be fractional or negative; they are summed and rounded to
/// the nearest microsecond.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Interval {
    pub weeks: f64,
    pub days: f64,
    pub hours: f64,
    pub minutes: f64,
    pub seconds: f64,
    pub milliseconds: f64,
    pub microseconds: f64,
}

impl Interval {
    /// Total length in microseconds, before rounding.
    fn total_micros(&self) -> f64 {
        self.weeks * MICROS_PER_WEEK
            + self.days * MICROS_PER_DAY
            + self.hours * MICROS_PER_HOUR
            + self.minutes * MICROS_PER_MINUTE
            + self.seconds * MICROS_PER_SECOND
            + self.milliseconds * MICROS_PER_MILLISECOND
            + self.microseconds
    }

    fn add(&mut self, unit: Unit, magnitude: f64) {
        let field = match unit {
            Unit::Week => &mut self.weeks,
            Unit::Day => &mut self.days,
            Unit::Hour => &mut self.hours,
            Unit::Minute => &mut self.minutes,
            Unit::Second => &mut self.seconds,
            Unit::Millisecond => &mut self.milliseconds,
            Unit::Microsecond => &mut self.microseconds,
        };
        *field += magnitude;
    }
}

/// Anything that can be used as a step size.
pub trait ToDuration {
    fn to_duration(&self) -> Result<Duration>;
}

impl ToDuration for Duration {
    fn to_duration(&self) -> Result<Duration> {
        Ok(*self)
    }
}

impl ToDuration for Interval {
    fn to_duration(&self) -> Result<Duration> {
        let total = self.total_micros().round();
        if !total.is_finite() {
            return Err(Error::InvalidInterval(format!(
                "{:?} does not describe a finite length",
                self
            )));
        }
        // i64::MAX as f64 rounds up to 2^63, so `>=` keeps the cast in range
        if total.abs() >= i64::MAX as f64 {
            return Err(Error::InvalidInterval(format!(
                "{:?} is too long to represent",
                self
            )));
        }
        Ok(Duration::microseconds(total as i64))
    }
}

impl ToDuration for str {
    fn to_duration(&self) -> Result<Duration> {
        self.parse::<Interval>()?.to_duration()
    }
}

impl ToDuration for String {
    fn to_duration(&self) -> Result<Duration> {
        self.as_str().to_duration()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Week,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
    Microsecond,
}

fn unit_from_name(name: &str) -> Option<Unit> {
    let unit = match name {
        "w" | "wk" | "wks" | "week" | "weeks" => Unit::Week,
        "d" | "day" | "days" => Unit::Day,
        "h" | "hr" | "hrs" | "hour" | "hours" => Unit::Hour,
        "m" | "min" | "mins" | "minute" | "minutes" => Unit::Minute,
        "s" | "sec" | "secs" | "second" | "seconds" => Unit::Second,
        "ms" | "msec" | "msecs" | "millisecond" | "milliseconds" => Unit::Millisecond,
        "us" | "µs" | "usec" | "usecs" | "microsecond" | "microseconds" => Unit::Microsecond,
        _ => return None,
    };
    Some(unit)
}

/// Text between two terms may only be whitespace, commas or "and".
fn is_separator(gap: &str) -> bool {
    gap.split(|c: char| c.is_whitespace() || c == ',')
        .all(|word| word.is_empty() || word == "and")
}

impl FromStr for Interval {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        let input_lower = input.trim().to_lowercase();
        let unrecognized = || Error::UnrecognizedInterval(input.to_string());

        let re = Regex::new(r"(?:(-?\d+(?:\.\d+)?)|\b(an?)\b)\s*([a-zµ]+)")
            .map_err(|_| unrecognized())?;

        let mut interval = Interval::default();
        let mut terms = 0;
        let mut last_end = 0;

        for caps in re.captures_iter(&input_lower) {
            let whole = caps.get(0).ok_or_else(unrecognized)?;
            if !is_separator(&input_lower[last_end..whole.start()]) {
                return Err(unrecognized());
            }
            last_end = whole.end();

            let magnitude: f64 = match (caps.get(1), caps.get(2)) {
                (Some(number), _) => number.as_str().parse().map_err(|_| unrecognized())?,
                (None, Some(_)) => 1.0,
                (None, None) => return Err(unrecognized()),
            };
            let unit = caps
                .get(3)
                .and_then(|name| unit_from_name(name.as_str()))
                .ok_or_else(unrecognized)?;

            interval.add(unit, magnitude);
            terms += 1;
        }

        if terms == 0 || !is_separator(&input_lower[last_end..]) {
            return Err(unrecognized());
        }

        Ok(interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_interval_is_zero() {
        assert_eq!(Interval::default().to_duration().unwrap(), Duration::zero());
    }

    #[test]
    fn test_units_combine_additively() {
        let interval = Interval {
            weeks: 1.0,
            days: 1.0,
            hours: 1.0,
            minutes: 1.0,
            seconds: 1.0,
            milliseconds: 1.0,
            microseconds: 1.0,
        };
        let expected = Duration::weeks(1)
            + Duration::days(1)
            + Duration::hours(1)
            + Duration::minutes(1)
            + Duration::seconds(1)
            + Duration::milliseconds(1)
            + Duration::microseconds(1);
        assert_eq!(interval.to_duration().unwrap(), expected);
    }

    #[test]
    fn test_fractional_and_negative_magnitudes() {
        let interval = Interval {
            hours: 1.5,
            minutes: -30.0,
            ..Default::default()
        };
        assert_eq!(interval.to_duration().unwrap(), Duration::hours(1));

        let half_micro = Interval {
            microseconds: 0.4,
            ..Default::default()
        };
        assert_eq!(half_micro.to_duration().unwrap(), Duration::zero());
    }

    #[test]
    fn test_non_finite_interval_is_rejected() {
        let interval = Interval {
            seconds: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            interval.to_duration(),
            Err(Error::InvalidInterval(_))
        ));

        let huge = Interval {
            weeks: 1e300,
            ..Default::default()
        };
        assert!(matches!(huge.to_duration(), Err(Error::InvalidInterval(_))));
    }

    #[test]
    fn test_deserialize_from_config() {
        let interval: Interval = serde_json::from_str(r#"{"minutes": 15}"#).unwrap();
        assert_eq!(interval.to_duration().unwrap(), Duration::minutes(15));

        let empty: Interval = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, Interval::default());

        assert!(serde_json::from_str::<Interval>(r#"{"fortnights": 1}"#).is_err());
    }

    #[test]
    fn test_parse_single_unit() {
        assert_eq!("15 minutes".to_duration().unwrap(), Duration::minutes(15));
        assert_eq!("1 hour".to_duration().unwrap(), Duration::hours(1));
        assert_eq!("2.5 days".to_duration().unwrap(), Duration::hours(60));
        assert_eq!("  3 Weeks ".to_duration().unwrap(), Duration::weeks(3));
    }

    #[test]
    fn test_parse_article() {
        assert_eq!("an hour".to_duration().unwrap(), Duration::hours(1));
        assert_eq!("a week".to_duration().unwrap(), Duration::weeks(1));
    }

    #[test]
    fn test_parse_compound() {
        assert_eq!(
            "1 hour 30 minutes".to_duration().unwrap(),
            Duration::minutes(90)
        );
        assert_eq!(
            "1 day, 2 hours and 5 minutes".to_duration().unwrap(),
            Duration::days(1) + Duration::hours(2) + Duration::minutes(5)
        );
        assert_eq!(
            "an hour and 15 minutes".to_duration().unwrap(),
            Duration::minutes(75)
        );
    }

    #[test]
    fn test_parse_abbreviated() {
        assert_eq!("90s".to_duration().unwrap(), Duration::seconds(90));
        assert_eq!("1h30m".to_duration().unwrap(), Duration::minutes(90));
        assert_eq!("250ms".to_duration().unwrap(), Duration::milliseconds(250));
        assert_eq!("10us".to_duration().unwrap(), Duration::microseconds(10));
    }

    #[test]
    fn test_parse_negative() {
        assert_eq!("-15 minutes".to_duration().unwrap(), Duration::minutes(-15));
    }

    #[test]
    fn test_parse_fills_named_fields() {
        let interval: Interval = "2 hours 15 minutes".parse().unwrap();
        assert_eq!(
            interval,
            Interval {
                hours: 2.0,
                minutes: 15.0,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_invalid_inputs() {
        for input in ["", "minutes", "15", "15 fortnights", "soon", "1 hour or so", "and"] {
            assert!(
                matches!(
                    input.parse::<Interval>(),
                    Err(Error::UnrecognizedInterval(_))
                ),
                "{input:?} should not parse"
            );
        }
    }
}
