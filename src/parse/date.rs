//! Date headings of the supported plan pages.
//!
//! Both extractors return `None` for anything that is not a date heading; the caller skips that block.

use chrono::NaiveDate;

pub const MONTHS: [&str; 12] = [
    "Januar",
    "Februar",
    "März",
    "April",
    "Mai",
    "Juni",
    "Juli",
    "August",
    "September",
    "Oktober",
    "November",
    "Dezember",
];

/// 1-based month number of a German month name.
pub fn month_number(name: &str) -> Option<u32> {
    MONTHS
        .iter()
        .position(|m| *m == name)
        .and_then(|i| u32::try_from(i + 1).ok())
}

/// Parses `"<DayName> <DD>. <MonthName>"`, e.g. `"Montag 24. November"`.
///
/// The heading carries no year, so the caller supplies it.
pub fn parse_month_name_heading(heading: &str, year: i32) -> Option<NaiveDate> {
    let tokens: Vec<&str> = heading.split_whitespace().collect();
    let [_, day, month] = tokens.as_slice() else {
        return None;
    };
    let month = month_number(month)?;
    let day: u32 = day.trim_matches('.').parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parses `"<Weekday> <DD>.<MM>.<YYYY>"`, e.g. `"Montag 01.12.2025"`.
pub fn parse_dotted_heading(heading: &str) -> Option<NaiveDate> {
    let date = heading.split_whitespace().nth(1)?;
    let mut fields: Vec<&str> = date.split('.').collect();
    fields.reverse();
    let [year, month, day] = fields.as_slice() else {
        return None;
    };
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}
