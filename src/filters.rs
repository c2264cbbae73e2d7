//! Display helpers for dates, times and prices.
//!
//! `money` doubles as an askama filter; the template modules bring this
//! module into scope as `filters`.

use std::borrow::Borrow;

use chrono::{Datelike, NaiveDate, NaiveTime};

const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Formats an ISO `YYYY-MM-DD` date as `"10 de mayo de 2024"`.
pub fn pretty_date(iso: &str) -> Result<String, chrono::ParseError> {
    let date = NaiveDate::parse_from_str(iso, "%Y-%m-%d")?;
    let month = MONTHS[date.month0() as usize];
    Ok(format!("{} de {} de {}", date.day(), month, date.year()))
}

/// Formats a 24-hour `HH:MM` time as `"02:30 PM"`, or hands the input back
/// untouched when it does not parse.
pub fn pretty_time(hhmm: &str) -> String {
    match NaiveTime::parse_from_str(hhmm, "%H:%M") {
        Ok(time) => time.format("%I:%M %p").to_string(),
        Err(_) => hhmm.to_string(),
    }
}

pub fn money<T: Borrow<i64>>(value: T) -> askama::Result<String> {
    Ok(group_thousands(*value.borrow()))
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    grouped
}
