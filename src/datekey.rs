use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};

use crate::models::CellValue;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%m/%d/%Y"];

/// Canonical `YYYY/MM/DD` join key used by every lookup.
///
/// Values that cannot be read as a date keep their original text, so a
/// malformed cell never matches a real date but is still printable.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(String);

impl DateKey {
    pub fn from_date(date: NaiveDate) -> Self {
        Self(format!("{:04}/{:02}/{:02}", date.year(), date.month(), date.day()))
    }

    /// Normalize a grid cell. Empty cells yield an empty key.
    pub fn normalize(cell: &CellValue) -> Self {
        match cell {
            CellValue::Empty => Self(String::new()),
            CellValue::Date(dt) => Self::from_date(dt.date()),
            CellValue::Text(s) => Self::parse(s),
            CellValue::Number(_) => Self(cell.to_string()),
        }
    }

    /// Normalize free text, falling back to the text itself when unparseable.
    pub fn parse(raw: &str) -> Self {
        match parse_date(raw) {
            Some(date) => Self::from_date(date),
            None => Self(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for DateKey {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse a date string, ignoring any time-of-day suffix.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let date_part = raw.split(['T', ' ']).next().unwrap_or(raw);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// Calendar date of a cell, if it holds one.
pub fn cell_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::Date(dt) => Some(dt.date()),
        CellValue::Text(s) => parse_date(s),
        CellValue::Number(_) | CellValue::Empty => None,
    }
}

pub fn yesterday(today: NaiveDate) -> NaiveDate {
    today - Duration::days(1)
}

/// Last calendar day of the month after `today`.
pub fn end_of_next_month(today: NaiveDate) -> NaiveDate {
    let (year, month) = if today.month() >= 11 {
        (today.year() + 1, today.month() - 10)
    } else {
        (today.year(), today.month() + 2)
    };
    // first day of the month after next, minus one day
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(today)
}
