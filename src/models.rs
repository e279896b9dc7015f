use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use crate::datekey::{parse_date, DateKey};
use crate::error::{AppError, Result};

/// Longest period, in inclusive days, a range report may cover.
pub const MAX_RANGE_DAYS: i64 = 31;

/// A single cell as read from the workbook.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Date(NaiveDateTime),
    Empty,
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Date(dt) => write!(f, "{}", dt.format("%Y/%m/%d %H:%M:%S")),
            Self::Empty => Ok(()),
        }
    }
}

/// A numeric field that may be missing or non-numeric in the sheet.
///
/// Sums treat an absent value as zero; rendering shows it as unavailable.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Metric(Option<f64>);

impl Metric {
    pub const ABSENT: Metric = Metric(None);

    pub fn new(value: f64) -> Self {
        Self(Some(value))
    }

    pub fn value(&self) -> Option<f64> {
        self.0
    }

    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }

    pub fn or_zero(&self) -> f64 {
        self.0.unwrap_or(0.0)
    }
}

impl From<&CellValue> for Metric {
    fn from(cell: &CellValue) -> Self {
        match cell {
            CellValue::Number(n) if n.is_finite() => Self(Some(*n)),
            _ => Self::ABSENT,
        }
    }
}

/// One matched row of the company-wide PL sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialRecord {
    pub date: DateKey,
    pub daily_sales: Metric,
    pub monthly_sales: Metric,
    pub daily_gross_profit: Metric,
    pub monthly_gross_profit: Metric,
    pub daily_operating_profit: Metric,
    pub monthly_operating_profit: Metric,
}

/// Balances found under one date column of a `YYYYMMCF` sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct CashBalanceRecord {
    pub date: DateKey,
    pub actual_balance: Metric,
    pub budget_balance: Metric,
    pub source_sheet: String,
}

/// Yesterday's actual balance paired with the budget at the end of next month.
#[derive(Debug, Clone, PartialEq)]
pub struct CashBalanceReport {
    pub actual_date: DateKey,
    pub actual_sheet: String,
    pub actual_balance: Metric,
    pub budget_date: DateKey,
    pub budget_sheet: String,
    pub budget_balance: Metric,
}

impl CashBalanceReport {
    /// Budget minus actual, only when both balances are known.
    pub fn difference(&self) -> Option<f64> {
        match (self.actual_balance.value(), self.budget_balance.value()) {
            (Some(actual), Some(budget)) => Some(budget - actual),
            _ => None,
        }
    }
}

/// Inclusive date range, validated on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(AppError::InvalidRange(format!(
                "start date {} is after end date {}",
                DateKey::from_date(start),
                DateKey::from_date(end)
            )));
        }
        let days = (end - start).num_days() + 1;
        if days > MAX_RANGE_DAYS {
            return Err(AppError::InvalidRange(format!(
                "{days} days requested, at most {MAX_RANGE_DAYS} allowed"
            )));
        }
        Ok(Self { start, end })
    }

    /// Build a range from the raw strings a caller submitted.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let s = parse_date(start)
            .ok_or_else(|| AppError::InvalidRange(format!("unreadable start date '{start}'")))?;
        let e = parse_date(end)
            .ok_or_else(|| AppError::InvalidRange(format!("unreadable end date '{end}'")))?;
        Self::new(s, e)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Sums and per-record averages over a period. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodAggregate {
    pub total_sales: f64,
    pub total_gross_profit: f64,
    pub total_operating_profit: f64,
    pub count: usize,
    pub average_sales: f64,
    pub average_gross_profit: f64,
    pub average_operating_profit: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_metric_from_cells() {
        assert_eq!(Metric::from(&CellValue::Number(1200.0)).value(), Some(1200.0));
        assert!(!Metric::from(&CellValue::Text("-".into())).is_present());
        assert!(!Metric::from(&CellValue::Empty).is_present());
        assert!(!Metric::from(&CellValue::Number(f64::NAN)).is_present());
        assert_eq!(Metric::ABSENT.or_zero(), 0.0);
    }

    #[test]
    fn test_range_rejects_reversed_dates() {
        let err = DateRange::new(ymd(2025, 6, 30), ymd(2025, 6, 1)).unwrap_err();
        assert!(matches!(err, AppError::InvalidRange(_)));
    }

    #[test]
    fn test_range_accepts_exactly_31_days() {
        let range = DateRange::new(ymd(2025, 7, 1), ymd(2025, 7, 31)).unwrap();
        assert!(range.contains(ymd(2025, 7, 1)));
        assert!(range.contains(ymd(2025, 7, 31)));
        assert!(!range.contains(ymd(2025, 8, 1)));
    }

    #[test]
    fn test_range_rejects_32_days() {
        let err = DateRange::new(ymd(2025, 7, 1), ymd(2025, 8, 1)).unwrap_err();
        assert!(matches!(err, AppError::InvalidRange(_)));
    }

    #[test]
    fn test_single_day_range() {
        let range = DateRange::parse("2025-06-15", "2025-06-15").unwrap();
        assert_eq!(range.start(), range.end());
        assert!(range.contains(ymd(2025, 6, 15)));
    }

    #[test]
    fn test_range_parse_rejects_garbage() {
        assert!(matches!(
            DateRange::parse("yesterday", "2025-06-15"),
            Err(AppError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_cash_difference_requires_both_balances() {
        let mut report = CashBalanceReport {
            actual_date: DateKey::from("2025/08/14"),
            actual_sheet: "202508CF".into(),
            actual_balance: Metric::new(5_000_000.0),
            budget_date: DateKey::from("2025/09/30"),
            budget_sheet: "202509CF".into(),
            budget_balance: Metric::new(5_500_000.0),
        };
        assert_eq!(report.difference(), Some(500_000.0));
        report.budget_balance = Metric::ABSENT;
        assert_eq!(report.difference(), None);
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(CellValue::Number(45000.0).to_string(), "45000");
        assert_eq!(CellValue::Number(1.5).to_string(), "1.5");
        assert_eq!(CellValue::Empty.to_string(), "");
    }
}
