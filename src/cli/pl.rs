use tracing::info;

use crate::cli::{deliver, parse_date_arg, Context};
use crate::datekey::{yesterday, DateKey};
use crate::error::Result;
use crate::messages::format_pl;
use crate::reports;

pub fn run(ctx: &Context, date: Option<String>, base_date: bool, scheduled: bool) -> Result<()> {
    let target = if base_date {
        None
    } else {
        let day = match date {
            Some(raw) => parse_date_arg(&raw)?,
            None => yesterday(ctx.today()),
        };
        Some(DateKey::from_date(day))
    };

    let mut wb = ctx.open_workbook()?;
    let record = match reports::daily_pl(&mut wb, &ctx.settings.pl_sheet, target.as_ref()) {
        Ok(record) => record,
        Err(e) if scheduled && e.is_no_data() => {
            info!(error = %e, "no PL data, nothing sent");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let message = format_pl(&record);
    deliver(ctx, &message, &format!("PL report for {}", record.date))
}
