//! Timestamp data type implementation

use crate::error::{DbError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Civil timestamp with millisecond resolution.
///
/// Statement literals use the `MM/DD/YYYY HH:MM:SS.mmm` form; the time and
/// millisecond parts may be omitted when parsing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    year: i32,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    millis: u16,
}

impl Timestamp {
    pub fn new(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            millis: 0,
        }
    }

    pub fn with_millis(mut self, millis: u16) -> Self {
        self.millis = millis;
        self
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }

    pub fn millis(&self) -> u16 {
        self.millis
    }

    /// Parse a timestamp literal.
    ///
    /// Accepts `M/D/YYYY`, `M/D/YYYY H:M:S` and `M/D/YYYY H:M:S.mmm`.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let bad = || DbError::Conversion(format!("invalid timestamp literal '{}'", text));

        let (date_part, time_part) = match text.split_once(' ') {
            Some((d, t)) => (d, Some(t.trim())),
            None => (text, None),
        };

        let mut date = date_part.split('/');
        let month: u8 = date.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
        let day: u8 = date.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
        let year: i32 = date.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
        if date.next().is_some() || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return Err(bad());
        }

        let mut ts = Timestamp::new(year, month, day, 0, 0, 0);

        if let Some(time) = time_part {
            let (clock, millis) = match time.split_once('.') {
                Some((c, m)) => {
                    let millis: u16 = m.parse().map_err(|_| bad())?;
                    if millis > 999 {
                        return Err(bad());
                    }
                    (c, millis)
                }
                None => (time, 0),
            };
            let mut parts = clock.split(':');
            let hour: u8 = parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
            let minute: u8 = parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
            let second: u8 = parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
            if parts.next().is_some() || hour > 23 || minute > 59 || second > 59 {
                return Err(bad());
            }
            ts = Timestamp::new(year, month, day, hour, minute, second).with_millis(millis);
        }

        Ok(ts)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}/{:02}/{:04} {:02}:{:02}:{:02}.{:03}",
            self.month, self.day, self.year, self.hour, self.minute, self.second, self.millis
        )
    }
}
