use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::{CivilDate, CivilDateTime, DateConvention, ParseError, TimeOfDay};

#[allow(clippy::expect_used)]
static UI_DATE_AND_TIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}\.\d{1,2}\.\d{4})\. (\d{2}):(\d{2})$")
        .expect("valid UI date and time pattern")
});

/// Anything the parser accepts.
///
/// Text goes through convention detection; dates and timestamps pass through.
/// Every `Option` of an accepted type converts too, with `None` as `Absent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInput<'a> {
    Text(&'a str),
    Date(CivilDate),
    DateTime(CivilDateTime),
    /// Milliseconds since the Unix epoch, read in UTC
    UnixMillis(i64),
    Absent,
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<&'a String> for DateInput<'a> {
    fn from(value: &'a String) -> Self {
        Self::Text(value.as_str())
    }
}

impl From<CivilDate> for DateInput<'_> {
    fn from(value: CivilDate) -> Self {
        Self::Date(value)
    }
}

impl From<CivilDateTime> for DateInput<'_> {
    fn from(value: CivilDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl From<i64> for DateInput<'_> {
    fn from(value: i64) -> Self {
        Self::UnixMillis(value)
    }
}

impl<'a, T: Into<DateInput<'a>>> From<Option<T>> for DateInput<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

/// Detects the convention of `text` and parses it.
pub(crate) fn parse_text(text: &str) -> Result<CivilDateTime, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyInput);
    }
    let convention = DateConvention::detect(trimmed)
        .ok_or_else(|| ParseError::UnrecognizedFormat(trimmed.to_owned()))?;
    convention.parse(trimmed)
}

/// Parses any accepted input into a date and time of day.
///
/// Date-only conventions give midnight. Returns `None` for absent, empty,
/// unrecognised or calendrically impossible input; never panics.
pub fn parse_date_time<'a>(input: impl Into<DateInput<'a>>) -> Option<CivilDateTime> {
    match input.into() {
        DateInput::Text(text) => match parse_text(text) {
            Ok(value) => Some(value),
            Err(err) => {
                debug!(input = text, error = %err, "rejected date input");
                None
            }
        },
        DateInput::Date(date) => Some(date.into()),
        DateInput::DateTime(value) => Some(value),
        DateInput::UnixMillis(millis) => {
            let value = CivilDateTime::from_unix_millis(millis);
            if value.is_none() {
                debug!(millis, "timestamp outside the supported year range");
            }
            value
        }
        DateInput::Absent => None,
    }
}

/// Parses any accepted input into a civil date, dropping the time of day.
pub fn parse_date<'a>(input: impl Into<DateInput<'a>>) -> Option<CivilDate> {
    parse_date_time(input).map(|value| value.date)
}

/// Parses `text` strictly in `convention`, without detection.
///
/// # Errors
/// `InvalidFormat` if `text` does not have the convention's shape, otherwise
/// the error of the first invalid component.
pub fn parse_with(text: &str, convention: DateConvention) -> Result<CivilDateTime, ParseError> {
    convention.parse(text.trim())
}

/// Parses the UI date-and-time layout `d.M.yyyy. HH:mm`.
///
/// # Errors
/// `InvalidFormat` on a shape mismatch, otherwise the first invalid component.
pub fn parse_ui_date_and_time(text: &str) -> Result<CivilDateTime, ParseError> {
    let trimmed = text.trim();
    let caps = UI_DATE_AND_TIME_PATTERN
        .captures(trimmed)
        .ok_or_else(|| ParseError::InvalidFormat(trimmed.to_owned()))?;
    let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());
    let date = DateConvention::Ui.parse(group(1))?.date;
    let hour = group(2)
        .parse()
        .map_err(|_| ParseError::InvalidFormat(trimmed.to_owned()))?;
    let minute = group(3)
        .parse()
        .map_err(|_| ParseError::InvalidFormat(trimmed.to_owned()))?;
    Ok(date.at(TimeOfDay::new(hour, minute, 0, 0)?))
}

/// Whether `input` parses to a valid date.
pub fn is_valid_date<'a>(input: impl Into<DateInput<'a>>) -> bool {
    parse_date(input).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::date;

    #[test]
    fn test_parse_date_text_conventions() {
        struct TestCase {
            input: &'static str,
            expected: Option<CivilDate>,
        }

        let cases = [
            TestCase {
                input: "1.9.2021",
                expected: Some(date(2021, 9, 1)),
            },
            TestCase {
                input: " 30.9.2021 ",
                expected: Some(date(2021, 9, 30)),
            },
            TestCase {
                input: "2021-09-30",
                expected: Some(date(2021, 9, 30)),
            },
            TestCase {
                input: "19910815",
                expected: Some(date(1991, 8, 15)),
            },
            TestCase {
                input: "2021-09-30T21:00:00.000Z",
                expected: Some(date(2021, 9, 30)),
            },
            TestCase {
                input: "31.9.2021",
                expected: None,
            },
            TestCase {
                input: "30.2.2020",
                expected: None,
            },
            TestCase {
                input: "0.1.2021",
                expected: None,
            },
            TestCase {
                input: "",
                expected: None,
            },
            TestCase {
                input: "   ",
                expected: None,
            },
            TestCase {
                input: "tomorrow",
                expected: None,
            },
        ];

        for case in &cases {
            assert_eq!(
                parse_date(case.input),
                case.expected,
                "parse_date({:?})",
                case.input
            );
        }
    }

    #[test]
    fn test_parse_date_pass_through() {
        let d = date(2020, 12, 1);
        assert_eq!(parse_date(d), Some(d));
        assert_eq!(
            parse_date(d.at(TimeOfDay::new(8, 0, 0, 0).unwrap())),
            Some(d)
        );
        assert_eq!(parse_date(0_i64), Some(date(1970, 1, 1)));
        assert_eq!(parse_date(1_606_780_800_000_i64), Some(d));
        assert_eq!(parse_date(i64::MIN), None);
    }

    #[test]
    fn test_parse_date_absent() {
        assert_eq!(parse_date(None::<&str>), None);
        assert_eq!(parse_date(None::<CivilDate>), None);
        assert_eq!(parse_date(Some("1.12.2020")), Some(date(2020, 12, 1)));
        assert_eq!(parse_date(DateInput::Absent), None);

        let owned = String::from("2020-12-01");
        assert_eq!(parse_date(&owned), Some(date(2020, 12, 1)));
    }

    #[test]
    fn test_parse_date_time_keeps_time() {
        let dt = parse_date_time("2021-09-30T21:15:00Z").unwrap();
        assert_eq!(dt.time, TimeOfDay::new(21, 15, 0, 0).unwrap());
        let dt = parse_date_time("30.9.2021").unwrap();
        assert_eq!(dt.time, TimeOfDay::MIDNIGHT);
    }

    #[test]
    fn test_parse_with_is_strict() {
        assert!(parse_with("1.12.2020", DateConvention::Ui).is_ok());
        assert!(matches!(
            parse_with("1.12.2020", DateConvention::Backend),
            Err(ParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_with("2020-12-01", DateConvention::LegacyNumeric),
            Err(ParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_ui_date_and_time() {
        let dt = parse_ui_date_and_time("1.12.2020. 09:05").unwrap();
        assert_eq!(dt.date, date(2020, 12, 1));
        assert_eq!(dt.time, TimeOfDay::new(9, 5, 0, 0).unwrap());

        assert!(matches!(
            parse_ui_date_and_time("1.12.2020 09:05"),
            Err(ParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_ui_date_and_time("1.12.2020. 25:00"),
            Err(ParseError::InvalidTime { .. })
        ));
        assert!(parse_ui_date_and_time("31.11.2020. 10:00").is_err());
    }

    #[test]
    fn test_is_valid_date() {
        assert!(is_valid_date("29.2.2020"));
        assert!(!is_valid_date("29.2.2021"));
        assert!(!is_valid_date(None::<&str>));
    }
}
