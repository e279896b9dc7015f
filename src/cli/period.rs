use colored::Colorize;

use crate::cli::Context;
use crate::error::Result;
use crate::line::SendResult;
use crate::models::DateRange;
use crate::reports::send_period_report;

pub fn run(ctx: &Context, from_date: &str, to_date: &str, json: bool) -> Result<()> {
    // reject a bad range before the workbook is even opened
    let prepared = DateRange::parse(from_date, to_date)
        .and_then(|_| Ok((ctx.open_workbook()?, ctx.notifier()?)));
    let result = match prepared {
        Ok((mut wb, notifier)) => send_period_report(
            &mut wb,
            notifier.as_ref(),
            &ctx.settings.pl_sheet,
            from_date,
            to_date,
        ),
        Err(e) if json => SendResult::from(&e),
        Err(e) => return Err(e),
    };

    if json {
        println!("{}", serde_json::to_string(&result)?);
        return Ok(());
    }
    if result.success && !ctx.dry_run {
        println!("{} period report {from_date} ～ {to_date}", "✅ Sent".green().bold());
    }
    result.into_result()
}
