use std::{fmt, str::FromStr};

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use pest::Parser;
use pest_derive::Parser;

use crate::{
    constants::{DAYS_PER_JULIAN_CENTURY, J2000_JD, SECONDS_PER_DAY},
    error::{Result, SkyError},
};

#[derive(Parser)]
#[grammar = "date.pest"]
struct UtDateParser;

/// Julian date of 0001-01-01T00:00 minus one day, proleptic Gregorian.
const JD_CE_EPOCH: f64 = 1721424.5;

/// A calendar instant in Universal Time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtTimestamp(NaiveDateTime);

impl UtTimestamp {
    pub fn new(dt: NaiveDateTime) -> Self {
        UtTimestamp(dt)
    }

    /// Parses `YYYY/M/D[ h[:m[:s[.fff]]]]`; `-` may replace `/` and `T` the
    /// space. The day may carry a decimal fraction instead of a time.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || SkyError::InvalidTimestamp(s.to_string());
        let timestamp = UtDateParser::parse(Rule::timestamp, s)
            .map_err(|_| invalid())?
            .next()
            .ok_or_else(invalid)?;

        let (mut year, mut month, mut day, mut day_frac) = (0_i32, 0_u32, 0_u32, 0.0_f64);
        let (mut hour, mut minute, mut second) = (0_u32, 0_u32, 0.0_f64);

        for part in timestamp.into_inner() {
            match part.as_rule() {
                Rule::date => {
                    for field in part.into_inner() {
                        let text = field.as_str();
                        match field.as_rule() {
                            Rule::year => year = text.parse().map_err(|_| invalid())?,
                            Rule::month => month = text.parse().map_err(|_| invalid())?,
                            Rule::day => {
                                let d: f64 = text.parse().map_err(|_| invalid())?;
                                day = d.trunc() as u32;
                                day_frac = d.fract();
                            }
                            _ => {}
                        }
                    }
                }
                Rule::time => {
                    for field in part.into_inner() {
                        let text = field.as_str();
                        match field.as_rule() {
                            Rule::hour => hour = text.parse().map_err(|_| invalid())?,
                            Rule::minute => minute = text.parse().map_err(|_| invalid())?,
                            Rule::second => second = text.parse().map_err(|_| invalid())?,
                            _ => {}
                        }
                    }
                }
                _ => {}
            }
        }

        if day_frac > 0.0 && (hour, minute, second) != (0, 0, 0.0) {
            return Err(invalid());
        }
        if second >= 60.0 {
            return Err(invalid());
        }

        let dt = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, minute, second.trunc() as u32))
            .ok_or_else(invalid)?;
        let extra_ns = (second.fract() * 1e9).round() as i64
            + (day_frac * SECONDS_PER_DAY * 1e9).round() as i64;
        Ok(UtTimestamp(dt + Duration::nanoseconds(extra_ns)))
    }

    pub fn datetime(&self) -> NaiveDateTime {
        self.0
    }

    pub fn julian_date(&self) -> f64 {
        let days = self.0.date().num_days_from_ce() as f64 + JD_CE_EPOCH;
        let t = self.0.time();
        let secs = t.num_seconds_from_midnight() as f64 + t.nanosecond() as f64 * 1e-9;
        days + secs / SECONDS_PER_DAY
    }

    /// Julian centuries since J2000.0.
    pub fn julian_centuries(&self) -> f64 {
        (self.julian_date() - J2000_JD) / DAYS_PER_JULIAN_CENTURY
    }
}

impl FromStr for UtTimestamp {
    type Err = SkyError;

    fn from_str(s: &str) -> Result<Self> {
        UtTimestamp::parse(s)
    }
}

impl From<NaiveDateTime> for UtTimestamp {
    fn from(dt: NaiveDateTime) -> Self {
        UtTimestamp(dt)
    }
}

impl fmt::Display for UtTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y/%-m/%-d %H:%M:%S"))
    }
}
