use tracing::info;

use crate::cli::{deliver, parse_date_arg, Context};
use crate::datekey::{end_of_next_month, yesterday};
use crate::error::Result;
use crate::messages::format_cash_balance;
use crate::reports;

pub fn run(ctx: &Context, today: Option<String>, scheduled: bool) -> Result<()> {
    let today = match today {
        Some(raw) => parse_date_arg(&raw)?,
        None => ctx.today(),
    };
    let actual_date = yesterday(today);
    let budget_date = end_of_next_month(today);

    let mut wb = ctx.open_workbook()?;
    let report = match reports::cash_balance(&mut wb, actual_date, budget_date) {
        Ok(report) => report,
        Err(e) if scheduled && e.is_no_data() => {
            info!(error = %e, "no cash-flow data, nothing sent");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    if scheduled && !report.actual_balance.is_present() && !report.budget_balance.is_present() {
        info!("no balances found, nothing sent");
        return Ok(());
    }

    let message = format_cash_balance(&report);
    deliver(ctx, &message, "cash balance report")
}
