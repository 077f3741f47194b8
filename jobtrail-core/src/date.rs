//! Date shorthand and date ordering.
//!
//! Dates are kept as plain strings. A *canonical* date is exactly
//! `DD.MM.YYYY`. No calendar checking happens anywhere in here: `99.13.2025`
//! is canonical as far as this module is concerned.

use chrono::{Datelike, Local, NaiveDate};

/// Sort value for empty or non-canonical dates.
///
/// Greater than any value [`sort_value`] can produce for a canonical date.
pub const UNDATED: u64 = u64::MAX;

/// Expand numeric date shorthand into `DD.MM.YYYY`, filling gaps from today's
/// local date.
///
/// See [`normalize_date_on`].
pub fn normalize_date(input: &str) -> String {
    normalize_date_on(input, Local::now().date_naive())
}

/// Expand numeric date shorthand into `DD.MM.YYYY`, filling gaps from `today`.
///
/// Every non-digit character is dropped first. Then, by number of digits:
///
/// - 2: `DD`, month and year from `today`
/// - 4: `DDMM`, year from `today`
/// - 6: `DDMMYY`, year is `2000 + YY`
/// - 8: `DDMMYYYY`
///
/// Any other digit count returns `input` untouched.
pub fn normalize_date_on(input: &str, today: NaiveDate) -> String {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();

    let current_month = format!("{:02}", today.month());
    let current_year = today.year();

    match digits.len() {
        2 => format!("{digits}.{current_month}.{current_year}"),
        4 => format!("{}.{}.{current_year}", &digits[0..2], &digits[2..4]),
        6 => {
            let year = 2000 + two_digit_number(&digits[4..6]);
            format!("{}.{}.{year}", &digits[0..2], &digits[2..4])
        }
        8 => format!("{}.{}.{}", &digits[0..2], &digits[2..4], &digits[4..8]),
        _ => input.to_string(),
    }
}

/// Whether `date` is exactly `DD.MM.YYYY` (ASCII digits, dot separators).
pub fn is_canonical(date: &str) -> bool {
    let bytes = date.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            2 | 5 => *b == b'.',
            _ => b.is_ascii_digit(),
        })
}

/// Numeric ordering key for a date string.
///
/// Canonical `DD.MM.YYYY` becomes the integer spelled `YYYYMMDD`. Anything
/// else (including the empty string) gets [`UNDATED`].
pub fn sort_value(date: &str) -> u64 {
    if !is_canonical(date) {
        return UNDATED;
    }

    let (day, month, year) = (&date[0..2], &date[3..5], &date[6..10]);
    // Ten ASCII digits at most, always fits.
    format!("{year}{month}{day}").parse().unwrap_or(UNDATED)
}

fn two_digit_number(digits: &str) -> i32 {
    digits
        .bytes()
        .fold(0, |acc, b| acc * 10 + i32::from(b - b'0'))
}
