use crate::error::{AppError, Result};
use crate::models::{FinancialRecord, PeriodAggregate};

/// Sum the daily metrics over `records` and average them per record.
///
/// Absent values add nothing to a total but still count toward the divisor,
/// so a missing cell lowers that metric's average.
pub fn aggregate(records: &[FinancialRecord]) -> Result<PeriodAggregate> {
    if records.is_empty() {
        return Err(AppError::EmptyRange);
    }

    let total_sales: f64 = records.iter().map(|r| r.daily_sales.or_zero()).sum();
    let total_gross_profit: f64 = records.iter().map(|r| r.daily_gross_profit.or_zero()).sum();
    let total_operating_profit: f64 = records
        .iter()
        .map(|r| r.daily_operating_profit.or_zero())
        .sum();

    let count = records.len();
    let n = count as f64;
    Ok(PeriodAggregate {
        total_sales,
        total_gross_profit,
        total_operating_profit,
        count,
        average_sales: total_sales / n,
        average_gross_profit: total_gross_profit / n,
        average_operating_profit: total_operating_profit / n,
    })
}
