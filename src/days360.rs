//! 30/360 day counts.
//!
//! Every month counts as 30 days and every year as 360, the way spreadsheet
//! `DAYS360` works. Benefit durations are booked in these units rather than
//! in elapsed days.

use serde::{Deserialize, Serialize};

use crate::{
    CivilDate, DAYS_IN_360_MONTH, DAYS_IN_360_YEAR, DECEMBER, FEBRUARY, JANUARY, prelude::*,
};

/// Which end-of-month adjustment `days360` applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Days360Method {
    /// European: the 31st of either date becomes the 30th.
    #[default]
    #[display(fmt = "EU")]
    Eu,
    /// US (NASD): also treats the last day of February as the 30th (for the
    /// end date only when the start is one too), and a 31st end date rolls
    /// to the 1st of the next month unless the start is on the 30th.
    #[display(fmt = "US")]
    Us,
}

/// Day count from `start` to `end` on the 30/360 basis.
///
/// Returns 0 if either date is absent. Not antisymmetric: swapping the
/// arguments only negates the result when no end-of-month adjustment fires.
pub fn days360(start: Option<CivilDate>, end: Option<CivilDate>, method: Days360Method) -> i64 {
    let (Some(start), Some(end)) = (start, end) else {
        return 0;
    };

    let start_year = i64::from(start.year());
    let start_month = i64::from(start.month());
    let mut start_day = i64::from(start.day());
    let mut end_year = i64::from(end.year());
    let mut end_month = i64::from(end.month());
    let mut end_day = i64::from(end.day());

    let is_us = method == Days360Method::Us;
    let start_is_february_end = start.month() == FEBRUARY && start.is_last_day_of_month();
    let end_is_february_end = end.month() == FEBRUARY && end.is_last_day_of_month();

    if is_us && start_is_february_end && end_is_february_end {
        end_day = DAYS_IN_360_MONTH;
    }

    if start_day == 31 || (is_us && start_is_february_end) {
        start_day = DAYS_IN_360_MONTH;
    }

    if end_day == 31 {
        if is_us && start_day < DAYS_IN_360_MONTH {
            end_day = 1;
            if end_month == i64::from(DECEMBER) {
                end_year += 1;
                end_month = i64::from(JANUARY);
            } else {
                end_month += 1;
            }
        } else {
            end_day = DAYS_IN_360_MONTH;
        }
    }

    (end_day + end_month * DAYS_IN_360_MONTH + end_year * DAYS_IN_360_YEAR)
        - (start_day + start_month * DAYS_IN_360_MONTH + start_year * DAYS_IN_360_YEAR)
}

/// Months from `start` to `end` inclusive of the end day, on the 30/360
/// basis, rounded to two decimals.
///
/// Note the argument order: end first. Returns 0.0 if either date is absent
/// or `end` is the last supported day. Negative when `end` precedes `start`.
#[allow(clippy::cast_precision_loss)]
pub fn diff_months(end: Option<CivilDate>, start: Option<CivilDate>, method: Days360Method) -> f64 {
    let (Some(end), Some(start)) = (end, start) else {
        return 0.0;
    };
    let Some(day_after_end) = end.next_day() else {
        return 0.0;
    };
    let days = days360(Some(start), Some(day_after_end), method);
    round_to_hundredths(days as f64 / DAYS_IN_360_MONTH as f64)
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
