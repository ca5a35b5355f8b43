/// Minimum valid year (inclusive)
pub const MIN_YEAR: u16 = 1;
/// Maximum valid year (inclusive)
pub const MAX_YEAR: u16 = 9999;

/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// First day of month
pub const MIN_DAY: u8 = 1;

/// Month number for January
pub const JANUARY: u8 = 1;
/// Month number for February
pub const FEBRUARY: u8 = 2;
/// Month number for December
pub const DECEMBER: u8 = 12;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Maximum days in each month (index 0 is unused, months are 1-indexed)
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u8; 13] = [
    0,  // index 0 unused (months are 1-indexed)
    31, // January
    28, // February (non-leap, adjusted by is_leap_year check)
    31, // March
    30, // April
    31, // May
    30, // June
    31, // July
    31, // August
    30, // September
    31, // October
    30, // November
    31, // December
];

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: i32 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: i32 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: i32 = 400;

/// Length of every month on the 30/360 basis
pub const DAYS_IN_360_MONTH: i64 = 30;
/// Length of every year on the 30/360 basis
pub const DAYS_IN_360_YEAR: i64 = 360;

/// Last hour of the day
pub const MAX_HOUR: u8 = 23;
/// Last minute of the hour
pub const MAX_MINUTE: u8 = 59;
/// Last second of the minute (leap seconds are not representable)
pub const MAX_SECOND: u8 = 59;
/// Last millisecond of the second
pub const MAX_MILLISECOND: u16 = 999;

pub(crate) const MILLIS_PER_DAY: i64 = 86_400_000;

/// Separator of the UI convention (`1.12.2020`)
pub const UI_SEPARATOR: char = '.';
/// Separator of the backend and ISO 8601 conventions (`2020-12-01`)
pub const DATE_SEPARATOR: char = '-';
/// Separator placed between the UI date and the clock time (`1.12.2020. 09:05`)
pub const DATE_TIME_SEPARATOR: &str = ". ";
/// Interval separator (ISO 8601 extended format)
pub const RANGE_SEPARATOR: char = '/';
