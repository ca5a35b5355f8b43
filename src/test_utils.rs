use crate::{CivilDate, DateConvention, parse_with};

/// Builds a date known to be valid.
pub fn date(year: u16, month: u8, day: u8) -> CivilDate {
    CivilDate::new(year, month, day)
        .unwrap_or_else(|e| panic!("invalid test date {year}-{month}-{day}: {e}"))
}

/// Parses a `d.M.yyyy` literal known to be valid.
pub fn ui(text: &str) -> CivilDate {
    parse_with(text, DateConvention::Ui)
        .unwrap_or_else(|e| panic!("invalid UI test date {text:?}: {e}"))
        .date
}
