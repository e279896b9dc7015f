//! Row lookups over loaded sheets.
//!
//! PL sheet layout: the base date sits in A1, data rows start at row 6 with the
//! date in column A. Cash-flow sheets are transposed: dates run across row 7
//! with the budget balance in row 8 and the actual balance in row 9.

use tracing::debug;

use crate::datekey::{cell_date, DateKey};
use crate::grid::Sheet;
use crate::models::{CashBalanceRecord, CellValue, DateRange, FinancialRecord, Metric};

pub const PL_FIRST_DATA_ROW: usize = 6;
const PL_COLUMNS: usize = 12;

// zero-based offsets within a PL row (columns C, D, G, H, K, L)
const COL_DAILY_SALES: usize = 2;
const COL_MONTHLY_SALES: usize = 3;
const COL_DAILY_GROSS: usize = 6;
const COL_MONTHLY_GROSS: usize = 7;
const COL_DAILY_OPERATING: usize = 10;
const COL_MONTHLY_OPERATING: usize = 11;

pub const CF_DATE_ROW: usize = 7;
pub const CF_BUDGET_ROW: usize = 8;
pub const CF_ACTUAL_ROW: usize = 9;
pub const CF_MAX_COLUMNS: usize = 100;

/// The reference date stored in A1 of the PL sheet.
pub fn base_date(sheet: &Sheet) -> DateKey {
    DateKey::normalize(sheet.cell(1, 1))
}

fn pl_rows(sheet: &Sheet) -> Vec<Vec<CellValue>> {
    let last = sheet.last_row();
    if last < PL_FIRST_DATA_ROW {
        return Vec::new();
    }
    sheet.get_cells(PL_FIRST_DATA_ROW, 1, last - PL_FIRST_DATA_ROW + 1, PL_COLUMNS)
}

fn record_from_row(date: DateKey, row: &[CellValue]) -> FinancialRecord {
    let metric = |i: usize| row.get(i).map(Metric::from).unwrap_or_default();
    FinancialRecord {
        date,
        daily_sales: metric(COL_DAILY_SALES),
        monthly_sales: metric(COL_MONTHLY_SALES),
        daily_gross_profit: metric(COL_DAILY_GROSS),
        monthly_gross_profit: metric(COL_MONTHLY_GROSS),
        daily_operating_profit: metric(COL_DAILY_OPERATING),
        monthly_operating_profit: metric(COL_MONTHLY_OPERATING),
    }
}

/// First data row whose date matches `target`. Later duplicates are ignored.
pub fn find_record(sheet: &Sheet, target: &DateKey) -> Option<FinancialRecord> {
    pl_rows(sheet).iter().find_map(|row| {
        let key = DateKey::normalize(&row[0]);
        (key == *target).then(|| record_from_row(key, row))
    })
}

/// Every data row dated within `range`, in sheet order.
pub fn find_records(sheet: &Sheet, range: &DateRange) -> Vec<FinancialRecord> {
    let mut records = Vec::new();
    for row in pl_rows(sheet) {
        if row[0].is_empty() {
            continue;
        }
        let Some(date) = cell_date(&row[0]) else {
            continue;
        };
        if range.contains(date) {
            let record = record_from_row(DateKey::from_date(date), &row);
            debug!(date = %record.date, "matched row");
            records.push(record);
        }
    }
    debug!(count = records.len(), "range scan complete");
    records
}

/// Scan the date row of a cash-flow sheet left to right for `target`.
pub fn find_balance(sheet: &Sheet, target: &DateKey) -> Option<CashBalanceRecord> {
    let block = sheet.get_cells(CF_DATE_ROW, 1, CF_ACTUAL_ROW - CF_DATE_ROW + 1, CF_MAX_COLUMNS);
    let dates = &block[0];
    let budget = &block[CF_BUDGET_ROW - CF_DATE_ROW];
    let actual = &block[CF_ACTUAL_ROW - CF_DATE_ROW];
    dates
        .iter()
        .position(|cell| !cell.is_empty() && DateKey::normalize(cell) == *target)
        .map(|i| CashBalanceRecord {
            date: target.clone(),
            actual_balance: Metric::from(&actual[i]),
            budget_balance: Metric::from(&budget[i]),
            source_sheet: sheet.name().to_string(),
        })
}
