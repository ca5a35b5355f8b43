//! Textual date conventions and the fixed patterns that tell them apart.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::{
    CivilDate, CivilDateTime, DATE_SEPARATOR, ParseError, TimeOfDay, UI_SEPARATOR, prelude::*,
};

#[allow(clippy::expect_used)]
static UI_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})\.(\d{1,2})\.(\d{4})$").expect("valid UI pattern"));

#[allow(clippy::expect_used)]
static BACKEND_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("valid backend pattern"));

#[allow(clippy::expect_used)]
static LEGACY_NUMERIC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})(\d{2})(\d{2})$").expect("valid legacy pattern"));

#[allow(clippy::expect_used)]
static ISO_8601_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{4})-(\d{2})-(\d{2})T(\d{2})(?::(\d{2})(?::(\d{2})(?:[.,](\d{1,9}))?)?)?(Z|[+-]\d{2}(?::?\d{2})?)?$",
    )
    .expect("valid ISO 8601 pattern")
});

/// One of the textual layouts a date can arrive in.
///
/// Variants are declared in detection priority order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DateConvention {
    /// `D.M.YYYY`, day and month unpadded on output
    #[default]
    #[display(fmt = "d.M.yyyy")]
    Ui,
    /// `YYYY-MM-DD`
    #[display(fmt = "yyyy-MM-dd")]
    Backend,
    /// `YYYYMMDD`, used by the population register integration
    #[display(fmt = "yyyyMMdd")]
    LegacyNumeric,
    /// Full timestamp, `YYYY-MM-DDTHH:MM:SS.sssZ` on output
    #[display(fmt = "yyyy-MM-ddTHH:mm:ss.SSSZ")]
    Iso8601,
}

impl DateConvention {
    /// All conventions in detection priority order.
    pub const ALL: [Self; 4] = [Self::Ui, Self::Backend, Self::LegacyNumeric, Self::Iso8601];

    fn pattern(self) -> &'static Regex {
        match self {
            Self::Ui => &UI_PATTERN,
            Self::Backend => &BACKEND_PATTERN,
            Self::LegacyNumeric => &LEGACY_NUMERIC_PATTERN,
            Self::Iso8601 => &ISO_8601_PATTERN,
        }
    }

    /// Whether `text` has the shape of this convention. The calendar values
    /// are not validated here.
    pub fn matches(self, text: &str) -> bool {
        self.pattern().is_match(text)
    }

    /// The first convention, in priority order, whose shape `text` has.
    pub fn detect(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|convention| convention.matches(text))
    }

    /// Parses `text` strictly in this convention.
    ///
    /// # Errors
    /// `InvalidFormat` if the shape does not match, otherwise the error of the
    /// first invalid calendar or clock component.
    pub fn parse(self, text: &str) -> Result<CivilDateTime, ParseError> {
        let caps = self
            .pattern()
            .captures(text)
            .ok_or_else(|| ParseError::InvalidFormat(text.to_owned()))?;

        match self {
            Self::Ui => {
                let date = CivilDate::new(number(&caps, 3)?, number(&caps, 2)?, number(&caps, 1)?)?;
                Ok(date.into())
            }
            Self::Backend | Self::LegacyNumeric => {
                let date = CivilDate::new(number(&caps, 1)?, number(&caps, 2)?, number(&caps, 3)?)?;
                Ok(date.into())
            }
            Self::Iso8601 => {
                let date = CivilDate::new(number(&caps, 1)?, number(&caps, 2)?, number(&caps, 3)?)?;
                let hour = number(&caps, 4)?;
                let minute = optional_number(&caps, 5)?;
                let second = optional_number(&caps, 6)?;
                let millisecond = caps.get(7).map_or(Ok(0), |m| fraction_millis(m.as_str()))?;
                if let Some(zone) = caps.get(8) {
                    validate_offset(zone.as_str())?;
                }
                let time = TimeOfDay::new(hour, minute, second, millisecond)?;
                Ok(date.at(time))
            }
        }
    }

    /// Renders `value` in this convention. Date-only conventions drop the
    /// time of day.
    pub fn format(self, value: impl Into<CivilDateTime>) -> String {
        let CivilDateTime { date, time } = value.into();
        let (year, month, day) = date.to_columns();
        match self {
            Self::Ui => format!("{day}{UI_SEPARATOR}{month}{UI_SEPARATOR}{year:04}"),
            Self::Backend => format!("{year:04}{DATE_SEPARATOR}{month:02}{DATE_SEPARATOR}{day:02}"),
            Self::LegacyNumeric => format!("{year:04}{month:02}{day:02}"),
            Self::Iso8601 => {
                format!("{year:04}{DATE_SEPARATOR}{month:02}{DATE_SEPARATOR}{day:02}T{time}Z")
            }
        }
    }
}

fn number<T: std::str::FromStr>(caps: &Captures<'_>, group: usize) -> Result<T, ParseError> {
    let text = caps.get(group).map_or("", |m| m.as_str());
    text.parse::<T>()
        .map_err(|_| ParseError::InvalidFormat(text.to_owned()))
}

fn optional_number(caps: &Captures<'_>, group: usize) -> Result<u8, ParseError> {
    if caps.get(group).is_some() {
        number(caps, group)
    } else {
        Ok(0)
    }
}

/// Fractional seconds truncated to milliseconds ("5" is 500 ms).
fn fraction_millis(digits: &str) -> Result<u16, ParseError> {
    let mut padded: String = digits.chars().take(3).collect();
    while padded.len() < 3 {
        padded.push('0');
    }
    padded
        .parse()
        .map_err(|_| ParseError::InvalidFormat(digits.to_owned()))
}

/// Checks a `Z`, `±HH`, `±HHMM` or `±HH:MM` designator.
fn validate_offset(zone: &str) -> Result<(), ParseError> {
    if zone == "Z" {
        return Ok(());
    }
    let digits: String = zone.chars().filter(char::is_ascii_digit).collect();
    let hours: u8 = digits
        .get(..2)
        .and_then(|h| h.parse().ok())
        .ok_or_else(|| ParseError::InvalidFormat(zone.to_owned()))?;
    let minutes: u8 = digits.get(2..).filter(|m| !m.is_empty()).map_or(Ok(0), |m| {
        m.parse::<u8>()
            .map_err(|_| ParseError::InvalidFormat(zone.to_owned()))
    })?;
    if hours > 23 || minutes > 59 {
        return Err(ParseError::InvalidFormat(zone.to_owned()));
    }
    Ok(())
}
