//! Permissible end dates of a benefit period.
//!
//! Employment and salary benefits must last at least one calendar month and
//! at most one calendar year. Commission benefits, and applications whose
//! benefit type is not chosen yet, only need to end on or after the start.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{CivilDate, DateConvention, ParseError, prelude::*};

/// Which wage-subsidy programme an application belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum BenefitType {
    #[serde(rename = "employment_benefit")]
    #[display(fmt = "employment_benefit")]
    Employment,
    #[serde(rename = "salary_benefit")]
    #[display(fmt = "salary_benefit")]
    Salary,
    #[serde(rename = "commission_benefit")]
    #[display(fmt = "commission_benefit")]
    Commission,
}

impl BenefitType {
    /// Reads a form or API tag where the empty string means "not chosen".
    ///
    /// # Errors
    /// `WindowError::UnknownBenefitType` for any other unrecognised tag.
    pub fn from_tag(tag: &str) -> Result<Option<Self>, WindowError> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Ok(None);
        }
        tag.parse().map(Some)
    }
}

impl FromStr for BenefitType {
    type Err = WindowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "employment_benefit" => Ok(Self::Employment),
            "salary_benefit" => Ok(Self::Salary),
            "commission_benefit" => Ok(Self::Commission),
            other => Err(WindowError::UnknownBenefitType(other.to_owned())),
        }
    }
}

/// Error type for benefit window operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WindowError {
    /// Tag is not one of the known benefit types.
    #[error("Unknown benefit type: {0}")]
    UnknownBenefitType(String),

    /// End date is earlier than the window allows.
    #[error("End date {end} is before the earliest allowed end date {min}")]
    EndBeforeMinimum { end: CivilDate, min: CivilDate },

    /// End date is later than the window allows.
    #[error("End date {end} is after the latest allowed end date {max}")]
    EndAfterMaximum { end: CivilDate, max: CivilDate },

    /// Error parsing a date.
    #[error(transparent)]
    ParseError(#[from] ParseError),
}

/// A calendar-accurate duration in whole years and months.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarOffset {
    pub years: i32,
    pub months: i32,
}

impl CalendarOffset {
    pub const fn months(months: i32) -> Self {
        Self { years: 0, months }
    }

    pub const fn years(years: i32) -> Self {
        Self { years, months: 0 }
    }

    /// Last day of a period of this length beginning on `start`: the start
    /// moved by the offset, minus one day.
    pub fn last_day_from(self, start: CivilDate) -> Option<CivilDate> {
        let total = self.years.checked_mul(12)?.checked_add(self.months)?;
        start.add_months(total)?.previous_day()
    }
}

/// Shortest and longest period allowed for one benefit type.
///
/// A missing minimum means the period may end on its start date; a missing
/// maximum means the period is uncapped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowRule {
    pub min_duration: Option<CalendarOffset>,
    pub max_duration: Option<CalendarOffset>,
}

impl WindowRule {
    pub const CAPPED: Self = Self {
        min_duration: Some(CalendarOffset::months(1)),
        max_duration: Some(CalendarOffset::years(1)),
    };

    pub const UNBOUNDED: Self = Self {
        min_duration: None,
        max_duration: None,
    };

    /// # Errors
    /// `ParseError::OutOfRange` if a bound falls outside the supported years.
    pub fn window_from(&self, start: CivilDate) -> Result<DateWindow, ParseError> {
        let out_of_range = || ParseError::OutOfRange(start.to_string());
        let min_end = match self.min_duration {
            Some(offset) => offset.last_day_from(start).ok_or_else(out_of_range)?,
            None => start,
        };
        let max_end = self
            .max_duration
            .map(|offset| offset.last_day_from(start).ok_or_else(out_of_range))
            .transpose()?;
        Ok(DateWindow { min_end, max_end })
    }
}

/// Rule table keyed by benefit type.
///
/// Deserialises from configuration; fields left out keep their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct BenefitWindowPolicy {
    pub employment: WindowRule,
    pub salary: WindowRule,
    /// Also applies when no benefit type is chosen.
    pub commission: WindowRule,
}

impl Default for BenefitWindowPolicy {
    fn default() -> Self {
        Self {
            employment: WindowRule::CAPPED,
            salary: WindowRule::CAPPED,
            commission: WindowRule::UNBOUNDED,
        }
    }
}

impl BenefitWindowPolicy {
    pub const fn rule(&self, benefit_type: Option<BenefitType>) -> &WindowRule {
        match benefit_type {
            Some(BenefitType::Employment) => &self.employment,
            Some(BenefitType::Salary) => &self.salary,
            Some(BenefitType::Commission) | None => &self.commission,
        }
    }

    /// Window for a start date given in the UI convention (other recognised
    /// conventions are accepted too).
    ///
    /// # Errors
    /// The `ParseError` of an unparseable start date, or `OutOfRange` if a
    /// bound leaves the supported years.
    pub fn window(
        &self,
        start: &str,
        benefit_type: Option<BenefitType>,
    ) -> Result<DateWindow, ParseError> {
        let start: CivilDate = start.parse()?;
        let window = self.rule(benefit_type).window_from(start)?;
        trace!(
            %start,
            benefit_type = ?benefit_type,
            min_end = %window.min_end,
            max_end = ?window.max_end,
            "resolved benefit window"
        );
        Ok(window)
    }
}

/// Allowed range of end dates for one benefit period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    pub min_end: CivilDate,
    pub max_end: Option<CivilDate>,
}

impl DateWindow {
    pub fn contains(&self, end: CivilDate) -> bool {
        self.check(end).is_ok()
    }

    /// # Errors
    /// `EndBeforeMinimum` or `EndAfterMaximum` when `end` falls outside.
    pub fn check(&self, end: CivilDate) -> Result<(), WindowError> {
        if end < self.min_end {
            return Err(WindowError::EndBeforeMinimum {
                end,
                min: self.min_end,
            });
        }
        match self.max_end {
            Some(max) if end > max => Err(WindowError::EndAfterMaximum { end, max }),
            _ => Ok(()),
        }
    }

    /// Lower bound rendered for a date picker.
    pub fn min_end_text(&self, convention: DateConvention) -> String {
        convention.format(self.min_end)
    }
}

/// Earliest allowed end date under the default policy.
///
/// Returns `None` only if `start` does not parse; callers validate the start
/// date before asking.
pub fn min_end_date(start: &str, benefit_type: Option<BenefitType>) -> Option<CivilDate> {
    BenefitWindowPolicy::default()
        .window(start, benefit_type)
        .ok()
        .map(|window| window.min_end)
}

/// Latest allowed end date under the default policy, or `None` when the
/// benefit type is uncapped (or `start` does not parse).
pub fn max_end_date(start: &str, benefit_type: Option<BenefitType>) -> Option<CivilDate> {
    BenefitWindowPolicy::default()
        .window(start, benefit_type)
        .ok()
        .and_then(|window| window.max_end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::date;

    #[test]
    fn test_min_end_date_cases() {
        struct TestCase {
            benefit_type: Option<BenefitType>,
            expected: CivilDate,
            description: &'static str,
        }

        let cases = [
            TestCase {
                benefit_type: Some(BenefitType::Employment),
                expected: date(2020, 12, 31),
                description: "one month minus one day for employment",
            },
            TestCase {
                benefit_type: Some(BenefitType::Salary),
                expected: date(2020, 12, 31),
                description: "one month minus one day for salary",
            },
            TestCase {
                benefit_type: Some(BenefitType::Commission),
                expected: date(2020, 12, 1),
                description: "start date for commission",
            },
            TestCase {
                benefit_type: None,
                expected: date(2020, 12, 1),
                description: "start date when no type is chosen",
            },
        ];

        for case in &cases {
            assert_eq!(
                min_end_date("1.12.2020", case.benefit_type),
                Some(case.expected),
                "{}",
                case.description
            );
        }
    }

    #[test]
    fn test_max_end_date_cases() {
        assert_eq!(
            max_end_date("1.12.2020", Some(BenefitType::Employment)),
            Some(date(2021, 11, 30))
        );
        assert_eq!(
            max_end_date("1.12.2020", Some(BenefitType::Salary)),
            Some(date(2021, 11, 30))
        );
        assert_eq!(
            max_end_date("1.12.2020", Some(BenefitType::Commission)),
            None
        );
        assert_eq!(max_end_date("1.12.2020", None), None);
    }

    #[test]
    fn test_month_end_starts_clamp() {
        // 31.1. + 1 month clamps to 28.2., minus one day
        assert_eq!(
            min_end_date("31.1.2021", Some(BenefitType::Employment)),
            Some(date(2021, 2, 27))
        );
        assert_eq!(
            min_end_date("31.1.2020", Some(BenefitType::Employment)),
            Some(date(2020, 2, 28))
        );
        // 29.2. + 1 year clamps to 28.2., minus one day
        assert_eq!(
            max_end_date("29.2.2020", Some(BenefitType::Salary)),
            Some(date(2021, 2, 27))
        );
        assert_eq!(
            max_end_date("1.1.2021", Some(BenefitType::Salary)),
            Some(date(2021, 12, 31))
        );
    }

    #[test]
    fn test_unparseable_start() {
        assert_eq!(min_end_date("", Some(BenefitType::Employment)), None);
        assert_eq!(
            max_end_date("31.11.2020", Some(BenefitType::Employment)),
            None
        );
        assert!(matches!(
            BenefitWindowPolicy::default().window("nope", None),
            Err(ParseError::UnrecognizedFormat(_))
        ));
    }

    #[test]
    fn test_window_near_year_limit() {
        let result =
            BenefitWindowPolicy::default().window("1.12.9999", Some(BenefitType::Employment));
        assert!(matches!(result, Err(ParseError::OutOfRange(_))));
        // Uncapped types never leave the range
        assert!(
            BenefitWindowPolicy::default()
                .window("31.12.9999", None)
                .is_ok()
        );
    }

    #[test]
    fn test_window_check() {
        let window = BenefitWindowPolicy::default()
            .window("1.12.2020", Some(BenefitType::Employment))
            .unwrap();
        assert!(window.contains(date(2020, 12, 31)));
        assert!(window.contains(date(2021, 11, 30)));
        assert_eq!(
            window.check(date(2020, 12, 30)),
            Err(WindowError::EndBeforeMinimum {
                end: date(2020, 12, 30),
                min: date(2020, 12, 31),
            })
        );
        assert!(matches!(
            window.check(date(2021, 12, 1)),
            Err(WindowError::EndAfterMaximum { .. })
        ));
        assert_eq!(window.min_end_text(DateConvention::Ui), "31.12.2020");

        let open = BenefitWindowPolicy::default()
            .window("1.12.2020", None)
            .unwrap();
        assert!(open.contains(date(2099, 1, 1)));
        assert!(!open.contains(date(2020, 11, 30)));
    }

    #[test]
    fn test_benefit_type_tags() {
        assert_eq!(
            BenefitType::from_tag("employment_benefit"),
            Ok(Some(BenefitType::Employment))
        );
        assert_eq!(BenefitType::from_tag(""), Ok(None));
        assert!(matches!(
            BenefitType::from_tag("pension"),
            Err(WindowError::UnknownBenefitType(_))
        ));
        assert_eq!(BenefitType::Salary.to_string(), "salary_benefit");

        let json = serde_json::to_string(&BenefitType::Commission).unwrap();
        assert_eq!(json, r#""commission_benefit""#);
    }

    #[test]
    fn test_policy_from_config() {
        let json = r#"{ "commission": { "max_duration": { "months": 6 } } }"#;
        let policy: BenefitWindowPolicy = serde_json::from_str(json).unwrap();
        assert_eq!(policy.employment, WindowRule::CAPPED);
        assert_eq!(policy.commission.min_duration, None);

        let window = policy.window("1.12.2020", None).unwrap();
        assert_eq!(window.min_end, date(2020, 12, 1));
        assert_eq!(window.max_end, Some(date(2021, 5, 31)));

        let empty: BenefitWindowPolicy = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, BenefitWindowPolicy::default());
    }

    #[test]
    fn test_window_error_wraps_parse_error() {
        let err: WindowError = ParseError::EmptyInput.into();
        assert_eq!(err.to_string(), "Empty date string");
    }
}
