use chrono::{Datelike, Duration, NaiveDate};

use crate::cli::Context;
use crate::datekey::{end_of_next_month, yesterday, DateKey};
use crate::error::Result;
use crate::grid::{MemoryWorkbook, Sheet};
use crate::messages::{format_cash_balance, format_period_pl, format_pl, DIVIDER};
use crate::models::{CellValue, DateRange};
use crate::reports;
use crate::sheets::{cf_sheet_name, DEFAULT_PL_SHEET};

/// Base daily figures cycled across the week.
const DAILY_SALES: &[f64] = &[
    182_000.0, 205_500.0, 176_300.0, 221_800.0, 248_900.0, 312_400.0, 129_700.0,
];
const GROSS_MARGIN: f64 = 0.38;
const FIXED_COSTS_PER_DAY: f64 = 52_000.0;

fn pl_sheet(first: NaiveDate, last: NaiveDate) -> Sheet {
    let mut rows = vec![
        vec![CellValue::Text(DateKey::from_date(last).to_string())],
        vec![],
        vec![],
        vec![],
        vec![CellValue::Text("日付".into())],
    ];
    let (mut month_sales, mut month_gross, mut month_operating) = (0.0, 0.0, 0.0);
    let mut day = first;
    while day <= last {
        if day.day() == 1 {
            (month_sales, month_gross, month_operating) = (0.0, 0.0, 0.0);
        }
        let sales = DAILY_SALES[day.weekday().num_days_from_monday() as usize];
        let gross = (sales * GROSS_MARGIN).round();
        let operating = gross - FIXED_COSTS_PER_DAY;
        month_sales += sales;
        month_gross += gross;
        month_operating += operating;

        let mut row = vec![CellValue::Empty; 12];
        row[0] = CellValue::Date(day.and_hms_opt(0, 0, 0).unwrap_or_default());
        row[2] = CellValue::Number(sales);
        row[3] = CellValue::Number(month_sales);
        row[6] = CellValue::Number(gross);
        row[7] = CellValue::Number(month_gross);
        row[10] = CellValue::Number(operating);
        row[11] = CellValue::Number(month_operating);
        rows.push(row);
        day += Duration::days(1);
    }
    Sheet::new(DEFAULT_PL_SHEET, rows)
}

fn cf_sheet(month_of: NaiveDate, opening: f64) -> Sheet {
    let first = month_of.with_day(1).unwrap_or(month_of);
    let mut dates = vec![CellValue::Text("日付".into())];
    let mut budget = vec![CellValue::Text("予算".into())];
    let mut actual = vec![CellValue::Text("実績".into())];
    let mut day = first;
    let mut i = 0.0;
    while day.month() == first.month() {
        dates.push(CellValue::Text(DateKey::from_date(day).to_string()));
        budget.push(CellValue::Number(opening + i * 25_000.0));
        actual.push(CellValue::Number(opening + i * 21_500.0));
        day += Duration::days(1);
        i += 1.0;
    }
    let mut rows = vec![vec![]; 6];
    rows.extend([dates, budget, actual]);
    Sheet::new(cf_sheet_name(first), rows)
}

pub fn run(ctx: &Context) -> Result<()> {
    let today = ctx.today();
    let report_day = yesterday(today);
    let budget_day = end_of_next_month(today);
    let first = (report_day - Duration::days(40)).with_day(1).unwrap_or(report_day);

    let mut wb = MemoryWorkbook::new()
        .with_sheet(pl_sheet(first, report_day))
        .with_sheet(cf_sheet(report_day, 4_800_000.0))
        .with_sheet(cf_sheet(budget_day, 5_200_000.0));

    let record = reports::daily_pl(&mut wb, DEFAULT_PL_SHEET, Some(&DateKey::from_date(report_day)))?;
    println!("{}\n", format_pl(&record));
    println!("{DIVIDER}\n");

    let range = DateRange::new(report_day - Duration::days(6), report_day)?;
    let period = reports::period_pl(&mut wb, DEFAULT_PL_SHEET, &range)?;
    println!("{}\n", format_period_pl(&period.range, &period.aggregate));
    println!("{DIVIDER}\n");

    let cash = reports::cash_balance(&mut wb, report_day, budget_day)?;
    println!("{}", format_cash_balance(&cash));
    Ok(())
}
