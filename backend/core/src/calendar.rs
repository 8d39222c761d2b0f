//! Terminal date handling: `DDMMM` entry, weekday codes and sign-in stamps.

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Parse a `DDMMM` date. The year is implied: the next occurrence on or after `today`.
///
/// Returns `None` for malformed text or an impossible day such as `31FEB`.
pub fn parse_ddmmm(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    if text.len() != 5 || !text.is_ascii() {
        return None;
    }
    let day: u32 = text[..2].parse().ok()?;
    let month = MONTHS.iter().position(|m| *m == &text[2..])? as u32 + 1;

    match NaiveDate::from_ymd_opt(today.year(), month, day) {
        Some(date) if date >= today => Some(date),
        _ => NaiveDate::from_ymd_opt(today.year() + 1, month, day),
    }
}

/// `12JAN`
pub fn format_ddmmm(date: NaiveDate) -> String {
    format!("{:02}{}", date.day(), MONTHS[date.month0() as usize])
}

/// Two-letter weekday used in listing headers.
pub fn weekday_code(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

/// `18OCT26 1432Z`
pub fn sign_in_stamp(now: DateTime<Utc>) -> String {
    format!(
        "{}{:02} {}Z",
        format_ddmmm(now.date_naive()),
        now.year() % 100,
        now.format("%H%M")
    )
}
