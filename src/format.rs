use crate::{
    CivilDate, CivilDateTime, DATE_TIME_SEPARATOR, DateConvention, DateInput, parse_date_time,
};

/// Renders `date` in `convention`; an absent date renders as `""`.
pub fn format_date(date: Option<CivilDate>, convention: DateConvention) -> String {
    date.map_or_else(String::new, |d| convention.format(d))
}

/// [`format_date`] in the UI convention.
pub fn format_ui_date(date: Option<CivilDate>) -> String {
    format_date(date, DateConvention::Ui)
}

/// Renders `value` in `convention`, keeping the time for ISO 8601.
pub fn format_date_time(value: Option<CivilDateTime>, convention: DateConvention) -> String {
    value.map_or_else(String::new, |v| convention.format(v))
}

/// Renders `d.M.yyyy. HH:mm`; an absent value renders as `""`.
pub fn format_date_and_time(value: Option<CivilDateTime>) -> String {
    value.map_or_else(String::new, |v| {
        format!(
            "{}{DATE_TIME_SEPARATOR}{:02}:{:02}",
            DateConvention::Ui.format(v.date),
            v.time.hour(),
            v.time.minute()
        )
    })
}

/// Parses `input` in whatever convention it has and renders it in `to`.
/// Unparseable input gives `""`.
pub fn convert_date_format<'a>(input: impl Into<DateInput<'a>>, to: DateConvention) -> String {
    format_date_time(parse_date_time(input), to)
}

pub fn convert_to_ui_date_format<'a>(input: impl Into<DateInput<'a>>) -> String {
    convert_date_format(input, DateConvention::Ui)
}

pub fn convert_to_backend_date_format<'a>(input: impl Into<DateInput<'a>>) -> String {
    convert_date_format(input, DateConvention::Backend)
}

pub fn convert_to_ui_date_and_time_format<'a>(input: impl Into<DateInput<'a>>) -> String {
    format_date_and_time(parse_date_time(input))
}
