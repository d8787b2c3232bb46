//! Reporting windows.
//!
//! A window is the `[since, now]` range a report covers. Calendar periods
//! (`day`, `week`, `month`, `year`) start at a UTC midnight boundary; `all`
//! has no lower bound. Relative windows (`2 months`) step back a fixed number
//! of days from `now`: a month is 30 days and a year is 365 days, regardless
//! of the calendar.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, NaiveTime, TimeDelta, Utc};
use thiserror::Error;

/// Errors produced while resolving a window from user input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WindowError {
    /// The period keyword is not one of day, week, month, year, all.
    #[error("invalid period: {0}")]
    InvalidPeriod(String),

    /// The relative count or unit could not be understood.
    #[error("invalid relative window: {0}")]
    InvalidRelativeSpec(String),
}

/// Calendar-aligned reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
    All,
}

impl Period {
    /// Every keyword, in the order they are listed to users.
    pub const ALL: [Self; 5] = [Self::Day, Self::Week, Self::Month, Self::Year, Self::All];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::All => "all",
        }
    }

    /// Title used in report headers.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Day => "Day",
            Self::Week => "Week",
            Self::Month => "Month",
            Self::Year => "Year",
            Self::All => "All time",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = WindowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|period| period.as_str() == lowered)
            .ok_or_else(|| WindowError::InvalidPeriod(s.to_string()))
    }
}

/// Unit for relative windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelativeUnit {
    Week,
    Month,
    Year,
}

impl RelativeUnit {
    /// Approximate length of the unit in days.
    #[must_use]
    pub const fn days(self) -> i64 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Year => 365,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for RelativeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelativeUnit {
    type Err = WindowError;

    /// Accepts any word starting with `week`, `month` or `year`, so both
    /// singular and plural forms work.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        [Self::Week, Self::Month, Self::Year]
            .into_iter()
            .find(|unit| lowered.starts_with(unit.as_str()))
            .ok_or_else(|| WindowError::InvalidRelativeSpec(format!("unknown unit '{s}'")))
    }
}

/// The resolved lower bound of a report, plus a human label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    /// Inclusive lower bound. `None` means every event counts.
    pub since: Option<DateTime<Utc>>,
    /// Label shown in report headers.
    pub label: String,
    /// The calendar period this window came from, if any.
    pub period: Option<Period>,
}

/// How many whole units have passed since the start of a calendar window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitsElapsed {
    pub count: i64,
    pub unit: RelativeUnit,
}

impl fmt::Display for UnitsElapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Units elapsed: {} {}(s)", self.count, self.unit)
    }
}

impl TimeWindow {
    /// Elapsed-unit annotation for week, month and year windows.
    ///
    /// Day, all-time and relative windows have no annotation.
    #[must_use]
    pub fn units_elapsed(&self, now: DateTime<Utc>) -> Option<UnitsElapsed> {
        let since = self.since?;
        match self.period? {
            Period::Week => Some(UnitsElapsed {
                count: (now - since).num_days().div_euclid(7),
                unit: RelativeUnit::Week,
            }),
            Period::Month => Some(UnitsElapsed {
                count: i64::from(now.year() - since.year()) * 12
                    + (i64::from(now.month()) - i64::from(since.month())),
                unit: RelativeUnit::Month,
            }),
            Period::Year => Some(UnitsElapsed {
                count: i64::from(now.year() - since.year()),
                unit: RelativeUnit::Year,
            }),
            Period::Day | Period::All => None,
        }
    }
}

/// Resolves a calendar period against `now`.
pub fn resolve(period: Period, now: DateTime<Utc>) -> TimeWindow {
    let today = now.date_naive();
    let start = match period {
        Period::Day => Some(today),
        Period::Week => {
            Some(today - Days::new(u64::from(today.weekday().num_days_from_monday())))
        }
        Period::Month => Some(today - Days::new(u64::from(today.day0()))),
        Period::Year => Some(today - Days::new(u64::from(today.ordinal0()))),
        Period::All => None,
    };

    TimeWindow {
        since: start.map(|date| date.and_time(NaiveTime::MIN).and_utc()),
        label: period.title().to_string(),
        period: Some(period),
    }
}

/// Resolves a window of `count` approximate units ending at `now`.
pub fn resolve_relative(
    count: u32,
    unit: RelativeUnit,
    now: DateTime<Utc>,
) -> Result<TimeWindow, WindowError> {
    if count == 0 {
        return Err(WindowError::InvalidRelativeSpec(
            "count must be at least 1".to_string(),
        ));
    }

    let since = TimeDelta::try_days(i64::from(count) * unit.days())
        .and_then(|span| now.checked_sub_signed(span))
        .ok_or_else(|| WindowError::InvalidRelativeSpec(format!("{count} {unit}s is too far back")))?;

    Ok(TimeWindow {
        since: Some(since),
        label: format!("Last {count} {unit}(s)"),
        period: None,
    })
}

/// Parses a textual `count` and `unit` pair and resolves it.
pub fn parse_relative(count: &str, unit: &str, now: DateTime<Utc>) -> Result<TimeWindow, WindowError> {
    let count: u32 = count
        .trim()
        .parse()
        .map_err(|_| WindowError::InvalidRelativeSpec(format!("'{count}' is not a whole number")))?;
    let unit: RelativeUnit = unit.parse()?;
    resolve_relative(count, unit, now)
}
