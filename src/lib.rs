//! Civil date handling for benefit applications.
//!
//! Parses and formats dates in the textual conventions used by the portals
//! and their backends, computes 30/360 day and month counts, and derives the
//! permissible end-date window of a benefit from its start date and type.
//! Every operation is a pure function over immutable values.

mod consts;
mod convention;
mod days360;
mod format;
mod parse;
mod prelude;
mod range;
mod types;
mod window;

#[cfg(test)]
mod test_utils;

pub use consts::*;
pub use convention::DateConvention;
pub use days360::{Days360Method, days360, diff_months};
pub use format::{
    convert_date_format, convert_to_backend_date_format, convert_to_ui_date_and_time_format,
    convert_to_ui_date_format, format_date, format_date_and_time, format_date_time, format_ui_date,
};
pub use parse::{
    DateInput, is_valid_date, parse_date, parse_date_time, parse_ui_date_and_time, parse_with,
};
pub use range::{
    DateInterval, RangeError, compare_ui_date_times, compare_ui_dates, correct_end_date,
    is_from_current_year_onwards, is_from_year_of, is_within_interval,
};
pub use types::{Day, Month, TimeOfDay, Year, is_leap_year};
pub use window::{
    BenefitType, BenefitWindowPolicy, CalendarOffset, DateWindow, WindowError, WindowRule,
    max_end_date, min_end_date,
};

use crate::prelude::*;
use crate::types::days_in_month;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

/// A validated Gregorian calendar date without time of day or time zone.
///
/// Fields are ordered year, month, day so the derived ordering is
/// chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:04}-{:02}-{:02}", "year.get()", "month.get()", "day.get()")]
pub struct CivilDate {
    year: Year,
    month: Month,
    day: Day,
}

/// A civil date together with the wall-clock time it was written with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{date}T{time}")]
pub struct CivilDateTime {
    pub date: CivilDate,
    pub time: TimeOfDay,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Unrecognized date convention: {_0}")]
    UnrecognizedFormat(String),
    #[display(fmt = "Invalid year: {} (must be {}-{})", "_0", MIN_YEAR, MAX_YEAR)]
    InvalidYear(u16),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { month: u8, day: u8, year: u16 },
    #[display(fmt = "Invalid time {hour:02}:{minute:02}:{second:02}")]
    InvalidTime { hour: u8, minute: u8, second: u8 },
    #[display(fmt = "Date out of supported range: {_0}")]
    OutOfRange(String),
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

impl CivilDate {
    /// Creates a date from plain components.
    ///
    /// # Errors
    /// Returns the `ParseError` of the first invalid component.
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self, ParseError> {
        let year_nz = Year::new(year)?;
        let month_nz = Month::new(month)?;
        let day_nz = Day::new(day, year, month)?;
        Ok(Self {
            year: year_nz,
            month: month_nz,
            day: day_nz,
        })
    }

    pub const fn year(&self) -> u16 {
        self.year.get()
    }

    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    pub const fn day(&self) -> u8 {
        self.day.get()
    }

    pub const fn year_typed(&self) -> Year {
        self.year
    }

    pub const fn month_typed(&self) -> Month {
        self.month
    }

    pub const fn day_typed(&self) -> Day {
        self.day
    }

    /// Converts to plain components: (year, month, day)
    pub const fn to_columns(&self) -> (u16, u8, u8) {
        (self.year.get(), self.month.get(), self.day.get())
    }

    /// Number of days in this date's month.
    pub const fn days_in_month(&self) -> u8 {
        days_in_month(self.year.get(), self.month.get())
    }

    pub const fn is_last_day_of_month(&self) -> bool {
        self.day.get() == self.days_in_month()
    }

    /// 1 January of this date's year.
    pub fn start_of_year(&self) -> Self {
        Self {
            year: self.year,
            month: Month(std::num::NonZeroU8::MIN),
            day: Day(std::num::NonZeroU8::MIN),
        }
    }

    /// Days elapsed since 1970-01-01 (negative before it).
    pub fn days_since_epoch(&self) -> i64 {
        days_from_civil(i64::from(self.year()), self.month(), self.day())
    }

    /// Inverse of [`Self::days_since_epoch`].
    /// Returns `None` outside `MIN_YEAR..=MAX_YEAR`.
    pub fn from_days_since_epoch(days: i64) -> Option<Self> {
        if !(FIRST_SUPPORTED_DAY..=LAST_SUPPORTED_DAY).contains(&days) {
            return None;
        }
        let (year, month, day) = civil_from_days(days);
        let year = i32::try_from(year).ok()?;
        let year = Year::from_i32(year)?;
        Self::new(year.get(), month, day).ok()
    }

    /// Moves the date by `days` calendar days.
    /// Returns `None` if the result leaves the supported year range.
    pub fn add_days(self, days: i64) -> Option<Self> {
        Self::from_days_since_epoch(self.days_since_epoch().checked_add(days)?)
    }

    pub fn next_day(self) -> Option<Self> {
        self.add_days(1)
    }

    pub fn previous_day(self) -> Option<Self> {
        self.add_days(-1)
    }

    /// Moves the date by `months` calendar months.
    ///
    /// A day that does not exist in the target month is clamped to that
    /// month's last day, so 31 January plus one month is the last day of
    /// February.
    pub fn add_months(self, months: i32) -> Option<Self> {
        let zero_based = (i32::from(self.month()) - 1).checked_add(months)?;
        let year = i32::from(self.year()).checked_add(zero_based.div_euclid(12))?;
        let year = Year::from_i32(year)?;
        let month = u8::try_from(zero_based.rem_euclid(12) + 1).ok()?;
        let day = self.day().min(days_in_month(year.get(), month));
        Self::new(year.get(), month, day).ok()
    }

    /// Moves the date by `years` calendar years; 29 February clamps to 28
    /// February in common years.
    pub fn add_years(self, years: i32) -> Option<Self> {
        self.add_months(years.checked_mul(12)?)
    }

    /// Attaches a wall-clock time.
    pub const fn at(self, time: TimeOfDay) -> CivilDateTime {
        CivilDateTime { date: self, time }
    }

    /// Current date in UTC according to the system clock.
    pub fn today_utc() -> Option<Self> {
        let millis = SystemTime::now().duration_since(UNIX_EPOCH).ok()?.as_millis();
        CivilDateTime::from_unix_millis(i64::try_from(millis).ok()?).map(|dt| dt.date)
    }
}

impl Default for CivilDate {
    /// 1970-01-01
    fn default() -> Self {
        Self {
            year: Year(std::num::NonZeroU16::MIN.saturating_add(1969)),
            month: Month(std::num::NonZeroU8::MIN),
            day: Day(std::num::NonZeroU8::MIN),
        }
    }
}

impl CivilDateTime {
    pub const fn new(date: CivilDate, time: TimeOfDay) -> Self {
        Self { date, time }
    }

    /// Interprets `millis` as milliseconds since the Unix epoch in UTC.
    /// Returns `None` outside the supported year range.
    pub fn from_unix_millis(millis: i64) -> Option<Self> {
        let days = millis.div_euclid(consts::MILLIS_PER_DAY);
        let time = TimeOfDay::from_millis_of_day(millis.rem_euclid(consts::MILLIS_PER_DAY));
        let date = CivilDate::from_days_since_epoch(days)?;
        Some(Self { date, time })
    }

    /// Milliseconds since the Unix epoch, reading the wall-clock time as UTC.
    pub fn to_unix_millis(&self) -> i64 {
        self.date.days_since_epoch() * consts::MILLIS_PER_DAY + self.time.millis_of_day()
    }
}

impl From<CivilDate> for CivilDateTime {
    fn from(date: CivilDate) -> Self {
        date.at(TimeOfDay::MIDNIGHT)
    }
}

impl From<CivilDateTime> for CivilDate {
    fn from(value: CivilDateTime) -> Self {
        value.date
    }
}

impl TryFrom<(u16, u8, u8)> for CivilDate {
    type Error = ParseError;

    fn try_from(value: (u16, u8, u8)) -> Result<Self, Self::Error> {
        Self::new(value.0, value.1, value.2)
    }
}

impl FromStr for CivilDate {
    type Err = ParseError;

    /// Detects the convention of `s` and parses it, dropping any time part.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse::parse_text(s).map(|dt| dt.date)
    }
}

impl FromStr for CivilDateTime {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse::parse_text(s)
    }
}

impl serde::Serialize for CivilDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for CivilDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl serde::Serialize for CivilDateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&DateConvention::Iso8601.format(*self))
    }
}

impl<'de> serde::Deserialize<'de> for CivilDateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// --- day-number conversion (proleptic Gregorian, 400-year eras) ---

const DAYS_PER_ERA: i64 = 146_097;
const EPOCH_SHIFT: i64 = 719_468;
/// 0001-01-01
const FIRST_SUPPORTED_DAY: i64 = -719_162;
/// 9999-12-31
const LAST_SUPPORTED_DAY: i64 = 2_932_896;

fn days_from_civil(year: i64, month: u8, day: u8) -> i64 {
    let year = if month <= consts::FEBRUARY { year - 1 } else { year };
    let era = year.div_euclid(400);
    let year_of_era = year - era * 400;
    // March-based month so the leap day falls at the end of the year
    let march_month = (i64::from(month) + 9) % 12;
    let day_of_year = (153 * march_month + 2) / 5 + i64::from(day) - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * DAYS_PER_ERA + day_of_era - EPOCH_SHIFT
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let shifted = days + EPOCH_SHIFT;
    let era = shifted.div_euclid(DAYS_PER_ERA);
    let day_of_era = shifted - era * DAYS_PER_ERA;
    let year_of_era =
        (day_of_era - day_of_era / 1460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let march_month = (5 * day_of_year + 2) / 153;
    let day = (day_of_year - (153 * march_month + 2) / 5 + 1) as u8;
    let month = (if march_month < 10 {
        march_month + 3
    } else {
        march_month - 9
    }) as u8;
    let year = year_of_era + era * 400;
    (if month <= consts::FEBRUARY { year + 1 } else { year }, month, day)
}
