use std::{cmp::Ordering, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    CivilDate, DateConvention, DateInput, Days360Method, ParseError, RANGE_SEPARATOR, days360,
    diff_months, parse_date, parse_ui_date_and_time, parse_with, prelude::*,
};

/// A closed interval of civil dates (both ends inclusive).
/// The start date must be less than or equal to the end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display(fmt = "{}{}{}", start, RANGE_SEPARATOR, end)]
pub struct DateInterval {
    start: CivilDate,
    end: CivilDate,
}

/// Error type for date interval operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// Start date is after end date.
    #[error("Invalid date range: start ({start}) is after end ({end})")]
    InvalidRange { start: CivilDate, end: CivilDate },

    /// Error parsing date component.
    #[error(transparent)]
    ParseError(#[from] ParseError),

    /// Invalid range format.
    #[error("Invalid range format: {0}")]
    InvalidFormat(String),
}

impl DateInterval {
    /// Creates a new interval with validation.
    ///
    /// # Errors
    /// Returns `RangeError::InvalidRange` if start > end.
    pub fn new(start: CivilDate, end: CivilDate) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns the start date of the interval
    pub const fn start(&self) -> CivilDate {
        self.start
    }

    /// Returns the end date of the interval
    pub const fn end(&self) -> CivilDate {
        self.end
    }

    /// Returns both start and end dates as a tuple
    pub const fn dates(&self) -> (CivilDate, CivilDate) {
        (self.start, self.end)
    }

    pub fn contains(&self, date: CivilDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub fn is_within(&self, other: &Self) -> bool {
        other.start <= self.start && self.end <= other.end
    }

    /// Calendar days covered, counting both ends.
    pub fn days(&self) -> i64 {
        self.end.days_since_epoch() - self.start.days_since_epoch() + 1
    }

    /// 30/360 day count from start to end.
    pub fn days360(&self, method: Days360Method) -> i64 {
        days360(Some(self.start), Some(self.end), method)
    }

    /// 30/360 months covered, counting the end day, to two decimals.
    pub fn months(&self, method: Days360Method) -> f64 {
        diff_months(Some(self.end), Some(self.start), method)
    }
}

impl FromStr for DateInterval {
    type Err = RangeError;

    /// Reads `start/end`; each side may use any recognised convention.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let separator_count = trimmed.matches(RANGE_SEPARATOR).count();

        match separator_count {
            0 => Err(RangeError::InvalidFormat(format!(
                "No range separator found (expected '{RANGE_SEPARATOR}'): {s}"
            ))),
            1 => {
                let (start_str, end_str) =
                    trimmed.split_once(RANGE_SEPARATOR).ok_or_else(|| {
                        RangeError::InvalidFormat(format!(
                            "Separator '{RANGE_SEPARATOR}' not found despite count == 1"
                        ))
                    })?;

                let start = start_str.trim().parse::<CivilDate>()?;
                let end = end_str.trim().parse::<CivilDate>()?;

                Self::new(start, end)
            }
            _ => Err(RangeError::InvalidFormat(format!(
                "Too many '{RANGE_SEPARATOR}' separators: expected 1, found {separator_count}"
            ))),
        }
    }
}

impl PartialOrd for DateInterval {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DateInterval {
    fn cmp(&self, other: &Self) -> Ordering {
        // Compare start dates first, then end dates
        match self.start.cmp(&other.start) {
            Ordering::Equal => self.end.cmp(&other.end),
            ord => ord,
        }
    }
}

impl Serialize for DateInterval {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DateInterval {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Picks the end date to show for a period.
///
/// Returns `None` if either input does not parse, the start when it falls
/// after the end, and the end otherwise. The chosen input is returned as
/// given, not re-rendered.
pub fn correct_end_date<'a, T>(start: T, end: T) -> Option<T>
where
    T: Into<DateInput<'a>> + Copy,
{
    let parsed_start = parse_date(start)?;
    let parsed_end = parse_date(end)?;
    if parsed_start > parsed_end {
        Some(start)
    } else {
        Some(end)
    }
}

/// Whether `current` lies inside `[start, end]`. An absent or unparseable
/// bound leaves that side open; an unparseable `current` is never inside.
pub fn is_within_interval<'a, 'b, 'c>(
    current: impl Into<DateInput<'a>>,
    start: impl Into<DateInput<'b>>,
    end: impl Into<DateInput<'c>>,
) -> bool {
    let Some(current) = parse_date(current) else {
        return false;
    };
    let after_start = parse_date(start).is_none_or(|start| start <= current);
    let before_end = parse_date(end).is_none_or(|end| current <= end);
    after_start && before_end
}

/// Whether `date` is on or after 1 January of `today`'s year.
pub fn is_from_year_of<'a>(date: impl Into<DateInput<'a>>, today: CivilDate) -> bool {
    parse_date(date).is_some_and(|date| date >= today.start_of_year())
}

/// [`is_from_year_of`] against the system clock (UTC).
pub fn is_from_current_year_onwards<'a>(date: impl Into<DateInput<'a>>) -> bool {
    CivilDate::today_utc().is_some_and(|today| is_from_year_of(date, today))
}

/// Chronological comparator for `d.M.yyyy` strings, for sorting table
/// columns. Unparseable values sort first.
pub fn compare_ui_dates(a: &str, b: &str) -> Ordering {
    compare_parsed(
        parse_with(a, DateConvention::Ui).ok(),
        parse_with(b, DateConvention::Ui).ok(),
    )
}

/// Chronological comparator for `d.M.yyyy. HH:mm` strings.
pub fn compare_ui_date_times(a: &str, b: &str) -> Ordering {
    compare_parsed(parse_ui_date_and_time(a).ok(), parse_ui_date_and_time(b).ok())
}

fn compare_parsed<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.cmp(&b),
    }
}
