use chrono::{Datelike, NaiveDate};

/// Default name of the company-wide PL sheet.
pub const DEFAULT_PL_SHEET: &str = "全社PLシート";

/// Suffix shared by every monthly cash-flow sheet.
pub const CF_SUFFIX: &str = "CF";

/// Name of the cash-flow sheet holding `date`'s month, e.g. `202508CF`.
pub fn cf_sheet_name(date: NaiveDate) -> String {
    format!("{:04}{:02}{CF_SUFFIX}", date.year(), date.month())
}
