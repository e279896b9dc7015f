use crate::cli::{deliver, Context};
use crate::error::Result;
use crate::messages::format_form_response;
use crate::reports;

pub fn run(ctx: &Context, sheet: &str, row: Option<usize>) -> Result<()> {
    let mut wb = ctx.open_workbook()?;
    let (headers, answers) = reports::form_response(&mut wb, sheet, row)?;
    let message = format_form_response(&headers, &answers);
    deliver(ctx, &message, "form response")
}
