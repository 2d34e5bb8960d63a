//! Time utilities shared by the hydration and sleep analytics.
//!
//! Sleep sessions are recorded as wall-clock `"HH:MM"` strings and must be
//! placed on a continuous overnight timeline before they can be compared.
//! Hydration entries carry full timestamps that are bucketed into calendar
//! days ("date keys") in the user's timezone.
//!
//! There are several distinct overnight rollover rules in this crate. Each
//! one lives next to the metric that uses it:
//!
//! | Rule | Where | Adds 24h when |
//! |------|-------|---------------|
//! | Overnight timeline | [`ClockTime::on_overnight_timeline`] | wake hour < 12, or sleep hour < 6 |
//! | Time in bed | [`crate::analytics::sleep_metrics::time_in_bed_span`] | start > end and start past noon |
//! | Consistency bedtime | [`crate::analytics::sleep::consistency_bedtime_minutes`] | hour < 6 |
//! | Grogginess | [`crate::analytics::sleep::grogginess_span`] | out-of-bed before wake-up |

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Minutes in a day.
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Calendar-day identifier used to bucket timestamped records.
pub type DateKey = NaiveDate;

// ============================================
// Clock times
// ============================================

/// A wall-clock time of day with minute precision, parsed from `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

/// Which side of a sleep session a clock time marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineRole {
    /// Lights out / falling asleep
    Sleep,
    /// Waking up or getting out of bed
    Wake,
}

impl ClockTime {
    /// Default target bedtime (`23:00`).
    pub const DEFAULT_BEDTIME: ClockTime = ClockTime {
        hour: 23,
        minute: 0,
    };
    /// Default target wake time (`07:00`).
    pub const DEFAULT_WAKE_TIME: ClockTime = ClockTime { hour: 7, minute: 0 };

    /// Build a clock time from hour and minute, rejecting out-of-range values.
    pub fn new(hour: u8, minute: u8) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(Error::InvalidClockTime(format!("{:02}:{:02}", hour, minute)));
        }
        Ok(Self { hour, minute })
    }

    /// Parse an `"HH:MM"` string. A single-digit hour (`"7:05"`) is accepted.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidClockTime(s.to_string());

        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(invalid());
        }
        let hour: u8 = h.parse().map_err(|_| invalid())?;
        let minute: u8 = m.parse().map_err(|_| invalid())?;

        Self::new(hour, minute).map_err(|_| invalid())
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Minutes since midnight (`h*60 + m`).
    pub fn minutes(&self) -> i64 {
        self.hour as i64 * 60 + self.minute as i64
    }

    /// Minutes on a continuous overnight timeline.
    ///
    /// Wake-type times before noon and sleep-type times before 6am belong to
    /// the following day, so 24h is added. This orders a 23:00 bedtime
    /// before a 07:00 wake time.
    pub fn on_overnight_timeline(&self, role: TimelineRole) -> i64 {
        let minutes = self.minutes();
        let next_day = match role {
            TimelineRole::Wake => self.hour < 12,
            TimelineRole::Sleep => self.hour < 6,
        };
        if next_day {
            minutes + MINUTES_PER_DAY
        } else {
            minutes
        }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<ClockTime> for String {
    fn from(t: ClockTime) -> Self {
        t.to_string()
    }
}

// ============================================
// Periods and reference days
// ============================================

/// Look-back window for period statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// The `n` calendar days ending today (inclusive)
    Days(u32),
    /// No cutoff
    AllTime,
}

impl Period {
    /// Trailing week.
    pub const WEEK: Period = Period::Days(7);
    /// Trailing 30 days.
    pub const MONTH: Period = Period::Days(30);

    /// First date inside the window, or `None` for all-time.
    ///
    /// `Days(0)` yields tomorrow, so nothing on or before today matches.
    pub fn start(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Period::Days(n) => Some(today - Duration::days(*n as i64 - 1)),
            Period::AllTime => None,
        }
    }

    /// Whether `date` falls inside this window.
    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        match self.start(today) {
            Some(start) => date >= start,
            None => true,
        }
    }

    /// Window length in days, if bounded.
    pub fn days(&self) -> Option<u32> {
        match self {
            Period::Days(n) => Some(*n),
            Period::AllTime => None,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Days(n) => write!(f, "last {} days", n),
            Period::AllTime => write!(f, "all time"),
        }
    }
}

/// Reference day and timezone used to turn timestamps into date keys.
///
/// Tests pin `today` and use `Utc`; callers use [`DayContext::local_now`].
#[derive(Debug, Clone)]
pub struct DayContext<Tz: TimeZone> {
    tz: Tz,
    today: NaiveDate,
}

impl<Tz: TimeZone> DayContext<Tz> {
    pub fn new(tz: Tz, today: NaiveDate) -> Self {
        Self { tz, today }
    }

    /// Reference day is the calendar day of `now` in `tz`.
    pub fn at(tz: Tz, now: DateTime<Utc>) -> Self {
        let today = now.with_timezone(&tz).date_naive();
        Self { tz, today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Calendar day of a timestamp in this context's timezone.
    pub fn date_key(&self, ts: &DateTime<Utc>) -> DateKey {
        ts.with_timezone(&self.tz).date_naive()
    }

    /// Hour of day (0-23) of a timestamp in this context's timezone.
    pub fn hour_of(&self, ts: &DateTime<Utc>) -> u32 {
        ts.with_timezone(&self.tz).hour()
    }

    /// The date `n` days before today.
    pub fn days_ago(&self, n: u32) -> NaiveDate {
        self.today - Duration::days(n as i64)
    }

    /// Whether a timestamp's date key falls inside `period`.
    pub fn in_period(&self, ts: &DateTime<Utc>, period: Period) -> bool {
        period.contains(self.date_key(ts), self.today)
    }
}

impl DayContext<Local> {
    /// Context for the current day in the system timezone.
    pub fn local_now() -> Self {
        Self::at(Local, Utc::now())
    }
}

/// Saturday or Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Day-of-week index with 0 = Sunday, 6 = Saturday.
pub fn weekday_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_sunday() as usize
}

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
    ) {
        (Some(first), Some(next)) => (next - first).num_days() as u32,
        _ => 0,
    }
}
