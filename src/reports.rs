use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::aggregate::aggregate;
use crate::datekey::DateKey;
use crate::error::{AppError, Result};
use crate::grid::Workbook;
use crate::line::{Notifier, SendResult};
use crate::messages::format_period_pl;
use crate::models::{CashBalanceRecord, CashBalanceReport, DateRange, FinancialRecord, Metric, PeriodAggregate};
use crate::scanner::{base_date, find_balance, find_record, find_records};
use crate::sheets::cf_sheet_name;

// ---------------------------------------------------------------------------
// Daily PL
// ---------------------------------------------------------------------------

/// Look up one day on the PL sheet; `None` uses the sheet's A1 base date.
pub fn daily_pl(
    wb: &mut dyn Workbook,
    sheet_name: &str,
    target: Option<&DateKey>,
) -> Result<FinancialRecord> {
    let sheet = wb.sheet(sheet_name)?;
    let key = match target {
        Some(key) => key.clone(),
        None => base_date(&sheet),
    };
    debug!(date = %key, "daily lookup");
    find_record(&sheet, &key).ok_or(AppError::NotFound(key))
}

// ---------------------------------------------------------------------------
// Period PL
// ---------------------------------------------------------------------------

pub struct PeriodReport {
    pub range: DateRange,
    pub records: Vec<FinancialRecord>,
    pub aggregate: PeriodAggregate,
}

pub fn period_pl(wb: &mut dyn Workbook, sheet_name: &str, range: &DateRange) -> Result<PeriodReport> {
    let sheet = wb.sheet(sheet_name)?;
    info!(
        start = %DateKey::from_date(range.start()),
        end = %DateKey::from_date(range.end()),
        "period lookup"
    );
    let records = find_records(&sheet, range);
    let aggregate = aggregate(&records)?;
    Ok(PeriodReport {
        range: *range,
        records,
        aggregate,
    })
}

/// Validate, look up, render and send a period report.
///
/// Every failure, including a rejected range, comes back as a failed
/// [`SendResult`]; the range is checked before the workbook is read.
pub fn send_period_report(
    wb: &mut dyn Workbook,
    notifier: &dyn Notifier,
    sheet_name: &str,
    start: &str,
    end: &str,
) -> SendResult {
    let built = DateRange::parse(start, end)
        .and_then(|range| period_pl(wb, sheet_name, &range))
        .map(|report| format_period_pl(&report.range, &report.aggregate));
    match built {
        Ok(message) => notifier.send(&message),
        Err(e) => {
            warn!(error = %e, "period report not sent");
            SendResult::from(&e)
        }
    }
}

// ---------------------------------------------------------------------------
// Cash balance
// ---------------------------------------------------------------------------

/// Balances for `date` from its month's CF sheet.
///
/// A missing sheet is an error; a sheet without that date is `Ok(None)`.
pub fn balance_for(wb: &mut dyn Workbook, date: NaiveDate) -> Result<Option<CashBalanceRecord>> {
    let sheet = wb.sheet(&cf_sheet_name(date))?;
    Ok(find_balance(&sheet, &DateKey::from_date(date)))
}

fn balance_or_missing(wb: &mut dyn Workbook, date: NaiveDate) -> Result<Option<Option<CashBalanceRecord>>> {
    match balance_for(wb, date) {
        Ok(found) => Ok(Some(found)),
        Err(AppError::MissingDataSource(name)) => {
            warn!(sheet = %name, "cash-flow sheet not found");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Actual balance on `actual_date` against the budget on `budget_date`.
///
/// Each date resolves its own monthly sheet. Only when neither sheet exists
/// is the report abandoned; otherwise missing values render as unavailable.
pub fn cash_balance(
    wb: &mut dyn Workbook,
    actual_date: NaiveDate,
    budget_date: NaiveDate,
) -> Result<CashBalanceReport> {
    let actual_sheet = cf_sheet_name(actual_date);
    let budget_sheet = cf_sheet_name(budget_date);

    let actual = balance_or_missing(wb, actual_date)?;
    let budget = balance_or_missing(wb, budget_date)?;
    if actual.is_none() && budget.is_none() {
        return Err(AppError::MissingDataSource(format!("{actual_sheet}, {budget_sheet}")));
    }

    let actual_balance = actual
        .flatten()
        .map_or(Metric::ABSENT, |r| r.actual_balance);
    let budget_balance = budget
        .flatten()
        .map_or(Metric::ABSENT, |r| r.budget_balance);

    Ok(CashBalanceReport {
        actual_date: DateKey::from_date(actual_date),
        actual_sheet,
        actual_balance,
        budget_date: DateKey::from_date(budget_date),
        budget_sheet,
        budget_balance,
    })
}

// ---------------------------------------------------------------------------
// Form responses
// ---------------------------------------------------------------------------

/// Header row and one response row (default: the latest) of a form sheet.
pub fn form_response(
    wb: &mut dyn Workbook,
    sheet_name: &str,
    row: Option<usize>,
) -> Result<(Vec<String>, Vec<String>)> {
    let sheet = wb.sheet(sheet_name)?;
    let row = row.unwrap_or_else(|| sheet.last_row());
    if row < 2 || row > sheet.last_row() {
        return Err(AppError::Other(format!(
            "no form response at row {row} of {sheet_name}"
        )));
    }
    let width = sheet.last_column();
    let block = sheet.get_cells(1, 1, 1, width);
    let headers = block[0].iter().map(|c| c.to_string()).collect();
    let answers = sheet.get_cells(row, 1, 1, width)[0]
        .iter()
        .map(|c| c.to_string())
        .collect();
    Ok((headers, answers))
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::grid::{MemoryWorkbook, Sheet};
    use crate::models::CellValue;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn pl_sheet(days: &[(&str, f64)]) -> Sheet {
        let mut rows = vec![vec![text("2025/06/15")], vec![], vec![], vec![], vec![]];
        for (date, sales) in days {
            let mut row = vec![CellValue::Empty; 12];
            row[0] = text(date);
            row[2] = CellValue::Number(*sales);
            row[6] = CellValue::Number(sales / 2.0);
            row[10] = CellValue::Number(sales / 10.0);
            rows.push(row);
        }
        Sheet::new("全社PLシート", rows)
    }

    fn cf_sheet(name: &str, date: &str, budget: f64, actual: f64) -> Sheet {
        let mut rows = vec![vec![]; 6];
        rows.push(vec![text("日付"), text(date)]);
        rows.push(vec![text("予算"), CellValue::Number(budget)]);
        rows.push(vec![text("実績"), CellValue::Number(actual)]);
        Sheet::new(name, rows)
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    struct CountingWorkbook {
        reads: Cell<usize>,
    }

    impl Workbook for CountingWorkbook {
        fn sheet(&mut self, name: &str) -> Result<Sheet> {
            self.reads.set(self.reads.get() + 1);
            Err(AppError::MissingDataSource(name.to_string()))
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        sent: RefCell<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn send(&self, text: &str) -> SendResult {
            self.sent.borrow_mut().push(text.to_string());
            SendResult::ok()
        }
    }

    #[test]
    fn test_daily_pl_found_and_not_found() {
        let mut wb = MemoryWorkbook::new().with_sheet(pl_sheet(&[("2025/06/15", 10_000.0)]));
        let rec = daily_pl(&mut wb, "全社PLシート", Some(&DateKey::from("2025-06-15"))).unwrap();
        assert_eq!(rec.daily_sales.value(), Some(10_000.0));

        let err = daily_pl(&mut wb, "全社PLシート", Some(&DateKey::from("2025/06/16"))).unwrap_err();
        assert!(matches!(err, AppError::NotFound(k) if k.as_str() == "2025/06/16"));
    }

    #[test]
    fn test_daily_pl_defaults_to_base_date() {
        let mut wb = MemoryWorkbook::new().with_sheet(pl_sheet(&[("2025/06/15", 7.0)]));
        let rec = daily_pl(&mut wb, "全社PLシート", None).unwrap();
        assert_eq!(rec.date.as_str(), "2025/06/15");
    }

    #[test]
    fn test_daily_pl_missing_sheet() {
        let mut wb = MemoryWorkbook::new();
        let err = daily_pl(&mut wb, "全社PLシート", None).unwrap_err();
        assert!(matches!(err, AppError::MissingDataSource(_)));
    }

    #[test]
    fn test_period_pl_aggregates_matching_rows() {
        let days: Vec<(String, f64)> = (1..=30).map(|d| (format!("2025/06/{d:02}"), 1_000.0)).collect();
        let refs: Vec<(&str, f64)> = days.iter().map(|(d, v)| (d.as_str(), *v)).collect();
        let mut wb = MemoryWorkbook::new().with_sheet(pl_sheet(&refs));
        let range = DateRange::parse("2025-06-01", "2025-06-30").unwrap();
        let report = period_pl(&mut wb, "全社PLシート", &range).unwrap();
        assert_eq!(report.records.len(), 30);
        assert_eq!(report.aggregate.total_sales, 30_000.0);
        assert_eq!(report.aggregate.average_sales, 1_000.0);
        assert_eq!(report.aggregate.count, 30);
    }

    #[test]
    fn test_period_pl_empty_range() {
        let mut wb = MemoryWorkbook::new().with_sheet(pl_sheet(&[("2025/05/01", 1.0)]));
        let range = DateRange::parse("2025-06-01", "2025-06-30").unwrap();
        assert!(matches!(period_pl(&mut wb, "全社PLシート", &range), Err(AppError::EmptyRange)));
    }

    #[test]
    fn test_invalid_range_never_reads_workbook() {
        let mut wb = CountingWorkbook { reads: Cell::new(0) };
        let notifier = RecordingNotifier::default();

        let reversed = send_period_report(&mut wb, &notifier, "全社PLシート", "2025-06-30", "2025-06-01");
        assert!(!reversed.success);
        let too_long = send_period_report(&mut wb, &notifier, "全社PLシート", "2025-06-01", "2025-07-02");
        assert!(!too_long.success);
        assert!(too_long.error.unwrap().starts_with("Invalid range"));

        assert_eq!(wb.reads.get(), 0);
        assert!(notifier.sent.borrow().is_empty());
    }

    #[test]
    fn test_send_period_report_delivers_message() {
        let mut wb = MemoryWorkbook::new().with_sheet(pl_sheet(&[("2025/06/01", 1_000.0), ("2025/06/02", 3_000.0)]));
        let notifier = RecordingNotifier::default();
        let result = send_period_report(&mut wb, &notifier, "全社PLシート", "2025-06-01", "2025-06-07");
        assert_eq!(result, SendResult::ok());
        let sent = notifier.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("（データ件数: 2件）"));
        assert!(sent[0].contains("売上: ¥4,000"));
        assert!(sent[0].contains("【日平均】\n売上: ¥2,000"));
    }

    #[test]
    fn test_send_period_report_no_data() {
        let mut wb = MemoryWorkbook::new().with_sheet(pl_sheet(&[]));
        let notifier = RecordingNotifier::default();
        let result = send_period_report(&mut wb, &notifier, "全社PLシート", "2025-06-01", "2025-06-07");
        assert_eq!(result, SendResult::failed("No data found in the requested period"));
    }

    #[test]
    fn test_cash_balance_across_two_sheets() {
        let mut wb = MemoryWorkbook::new()
            .with_sheet(cf_sheet("202508CF", "2025/08/14", 1.0, 5_000_000.0))
            .with_sheet(cf_sheet("202509CF", "2025/09/30", 5_500_000.0, 2.0));
        let report = cash_balance(&mut wb, ymd(2025, 8, 14), ymd(2025, 9, 30)).unwrap();
        assert_eq!(report.actual_balance.value(), Some(5_000_000.0));
        assert_eq!(report.budget_balance.value(), Some(5_500_000.0));
        assert_eq!(report.difference(), Some(500_000.0));
        assert_eq!(report.actual_sheet, "202508CF");
        assert_eq!(report.budget_sheet, "202509CF");
    }

    #[test]
    fn test_cash_balance_one_sheet_missing() {
        let mut wb = MemoryWorkbook::new().with_sheet(cf_sheet("202508CF", "2025/08/14", 1.0, 5_000_000.0));
        let report = cash_balance(&mut wb, ymd(2025, 8, 14), ymd(2025, 9, 30)).unwrap();
        assert!(report.actual_balance.is_present());
        assert!(!report.budget_balance.is_present());
        assert_eq!(report.difference(), None);
    }

    #[test]
    fn test_cash_balance_both_sheets_missing() {
        let mut wb = MemoryWorkbook::new();
        let err = cash_balance(&mut wb, ymd(2025, 12, 14), ymd(2026, 1, 31)).unwrap_err();
        assert!(matches!(err, AppError::MissingDataSource(n) if n == "202512CF, 202601CF"));
    }

    #[test]
    fn test_balance_for_distinguishes_missing_sheet_from_missing_date() {
        let mut wb = MemoryWorkbook::new().with_sheet(cf_sheet("202508CF", "2025/08/14", 1.0, 2.0));
        assert!(matches!(
            balance_for(&mut wb, ymd(2025, 12, 1)),
            Err(AppError::MissingDataSource(n)) if n == "202512CF"
        ));
        assert!(balance_for(&mut wb, ymd(2025, 8, 15)).unwrap().is_none());
        assert!(balance_for(&mut wb, ymd(2025, 8, 14)).unwrap().is_some());
    }

    #[test]
    fn test_form_response_latest_row() {
        let sheet = Sheet::new(
            "フォームの回答 1",
            vec![
                vec![text("タイムスタンプ"), text("氏名"), text("ご意見")],
                vec![text("2025/08/13 09:00:00"), text("佐藤"), text("特になし")],
                vec![text("2025/08/14 10:00:00"), text("山田"), CellValue::Empty],
            ],
        );
        let mut wb = MemoryWorkbook::new().with_sheet(sheet);
        let (headers, answers) = form_response(&mut wb, "フォームの回答 1", None).unwrap();
        assert_eq!(headers, vec!["タイムスタンプ", "氏名", "ご意見"]);
        assert_eq!(answers, vec!["2025/08/14 10:00:00", "山田", ""]);
        assert!(form_response(&mut wb, "フォームの回答 1", Some(1)).is_err());
    }
}
