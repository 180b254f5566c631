//! Calendar date + time-of-day argument with blank-able segments.
//!
//! `DateTimeArg` is the boundary encoding used for construction, display and
//! persistence. Either segment may be blank while a value is being parsed or
//! edited; schedules and habits require a complete pair (see
//! [`DateTimeArg::resolve`]) and own their trigger as a concrete instant.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::Error;

const DATE_FMT: &str = "%Y-%m-%d";
const TIME_FMT: &str = "%H:%M:%S";
const TIME_FMT_SHORT: &str = "%H:%M";

/// A calendar date and a time of day, either of which may be blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DateTimeArg {
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
}

impl DateTimeArg {
    pub fn new(date: Option<NaiveDate>, time: Option<NaiveTime>) -> Self {
        Self { date, time }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn time(&self) -> Option<NaiveTime> {
        self.time
    }

    pub fn is_blank(&self) -> bool {
        self.date.is_none() && self.time.is_none()
    }

    pub fn is_complete(&self) -> bool {
        self.date.is_some() && self.time.is_some()
    }

    /// The concrete instant this argument names, if both segments are
    /// present.
    pub fn resolve(&self) -> Option<NaiveDateTime> {
        match (self.date, self.time) {
            (Some(date), Some(time)) => Some(NaiveDateTime::new(date, time)),
            _ => None,
        }
    }
}

impl From<NaiveDateTime> for DateTimeArg {
    fn from(value: NaiveDateTime) -> Self {
        Self {
            date: Some(value.date()),
            time: Some(value.time()),
        }
    }
}

impl fmt::Display for DateTimeArg {
    /// Canonical form: `YYYY-MM-DD HH:MM:SS`, with a blank segment rendered
    /// empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.date, self.time) {
            (Some(date), Some(time)) => {
                write!(f, "{} {}", date.format(DATE_FMT), time.format(TIME_FMT))
            }
            (Some(date), None) => write!(f, "{}", date.format(DATE_FMT)),
            (None, Some(time)) => write!(f, "{}", time.format(TIME_FMT)),
            (None, None) => Ok(()),
        }
    }
}

fn parse_time(segment: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(segment, TIME_FMT)
        .or_else(|_| NaiveTime::parse_from_str(segment, TIME_FMT_SHORT))
        .ok()
}

impl FromStr for DateTimeArg {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Self::new(None, None));
        }

        let bad = || Error::BadDateTime {
            value: s.to_string(),
        };

        let segments: Vec<&str> = trimmed.split_whitespace().collect();
        match segments.as_slice() {
            [date, time] => {
                let date = NaiveDate::parse_from_str(date, DATE_FMT).map_err(|_| bad())?;
                let time = parse_time(time).ok_or_else(bad)?;
                Ok(Self::new(Some(date), Some(time)))
            }
            // A lone segment is a time if it has a clock separator, else a date.
            [one] if one.contains(':') => {
                let time = parse_time(one).ok_or_else(bad)?;
                Ok(Self::new(None, Some(time)))
            }
            [one] => {
                let date = NaiveDate::parse_from_str(one, DATE_FMT).map_err(|_| bad())?;
                Ok(Self::new(Some(date), None))
            }
            _ => Err(bad()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn parses_complete_pair() {
        let arg: DateTimeArg = "2024-03-01 18:30".parse().unwrap();
        assert_eq!(arg.date(), Some(date(2024, 3, 1)));
        assert_eq!(arg.time(), Some(time(18, 30, 0)));
        assert!(arg.is_complete());
        assert_eq!(
            arg.resolve(),
            Some(NaiveDateTime::new(date(2024, 3, 1), time(18, 30, 0)))
        );
    }

    #[test]
    fn parses_with_seconds() {
        let arg: DateTimeArg = "2024-03-01 18:30:45".parse().unwrap();
        assert_eq!(arg.time(), Some(time(18, 30, 45)));
    }

    #[test]
    fn blank_segments_are_allowed() {
        let date_only: DateTimeArg = "2024-03-01".parse().unwrap();
        assert_eq!(date_only.date(), Some(date(2024, 3, 1)));
        assert_eq!(date_only.time(), None);
        assert_eq!(date_only.resolve(), None);

        let time_only: DateTimeArg = "07:15".parse().unwrap();
        assert_eq!(time_only.date(), None);
        assert_eq!(time_only.time(), Some(time(7, 15, 0)));

        let blank: DateTimeArg = "".parse().unwrap();
        assert!(blank.is_blank());
        assert_eq!(blank.to_string(), "");
    }

    #[test]
    fn display_round_trips() {
        for input in ["2024-03-01 18:30:45", "2024-03-01", "07:15:00"] {
            let arg: DateTimeArg = input.parse().unwrap();
            let reparsed: DateTimeArg = arg.to_string().parse().unwrap();
            assert_eq!(arg, reparsed);
        }
    }

    #[test]
    fn rejects_garbage() {
        assert!("yesterday".parse::<DateTimeArg>().is_err());
        assert!("2024-13-01 18:30".parse::<DateTimeArg>().is_err());
        assert!("2024-03-01 25:00".parse::<DateTimeArg>().is_err());
    }

    #[test]
    fn orders_by_date_then_time() {
        let earlier: DateTimeArg = "2024-03-01 08:00".parse().unwrap();
        let later: DateTimeArg = "2024-03-01 09:00".parse().unwrap();
        let next_day: DateTimeArg = "2024-03-02 01:00".parse().unwrap();
        assert!(earlier < later);
        assert!(later < next_day);
    }
}
