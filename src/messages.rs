//! Notification text. Layouts are consumed as-is by the chat client, so
//! headers, separators and field order must stay exactly as written here.

use chrono::NaiveDateTime;

use crate::fmt::{round_half_up, yen, yen_metric};
use crate::models::{CashBalanceReport, DateRange, FinancialRecord, PeriodAggregate};

pub const DIVIDER: &str = "━━━━━━━━━━━━";
const DEFAULT_EMOJI: &str = "📢";

pub fn format_pl(record: &FinancialRecord) -> String {
    let mut message = String::from("📊 全社PL情報\n");
    message += &format!("{DIVIDER}\n");
    message += &format!("📅 {}\n\n", record.date);

    message += "【売上】\n";
    message += &format!("単日: {}\n", yen_metric(record.daily_sales));
    message += &format!("当月累計: {}\n\n", yen_metric(record.monthly_sales));

    message += "【粗利】\n";
    message += &format!("単日: {}\n", yen_metric(record.daily_gross_profit));
    message += &format!("当月累計: {}\n\n", yen_metric(record.monthly_gross_profit));

    message += "【営業利益】\n";
    message += &format!("単日: {}\n", yen_metric(record.daily_operating_profit));
    message += &format!("当月累計: {}", yen_metric(record.monthly_operating_profit));
    message
}

pub fn format_period_pl(range: &DateRange, agg: &PeriodAggregate) -> String {
    let mut message = String::from("📊 期間PL情報\n");
    message += &format!("{DIVIDER}\n");
    message += &format!(
        "📅 {} ～ {}\n",
        range.start().format("%Y-%m-%d"),
        range.end().format("%Y-%m-%d")
    );
    message += &format!("（データ件数: {}件）\n\n", agg.count);

    message += "【期間合計】\n";
    message += &format!("売上: {}\n", yen(agg.total_sales));
    message += &format!("粗利: {}\n", yen(agg.total_gross_profit));
    message += &format!("営業利益: {}\n\n", yen(agg.total_operating_profit));

    message += "【日平均】\n";
    message += &format!("売上: {}\n", yen(round_half_up(agg.average_sales)));
    message += &format!("粗利: {}\n", yen(round_half_up(agg.average_gross_profit)));
    message += &format!("営業利益: {}", yen(round_half_up(agg.average_operating_profit)));
    message
}

pub fn format_cash_balance(report: &CashBalanceReport) -> String {
    let mut message = String::from("💰 現預金残高情報\n");
    message += &format!("{DIVIDER}\n\n");

    message += "【実残高】\n";
    message += &format!("📅 {}時点\n", report.actual_date);
    message += &format!("💵 {}\n", yen_metric(report.actual_balance));
    message += &format!("（{}より取得）\n\n", report.actual_sheet);

    message += "【予算残高】\n";
    message += &format!("📅 {}時点\n", report.budget_date);
    message += &format!("💴 {}\n", yen_metric(report.budget_balance));
    message += &format!("（{}より取得）\n\n", report.budget_sheet);

    if let Some(difference) = report.difference() {
        let sign = if difference >= 0.0 { "📈" } else { "📉" };
        message += "【予実差額】\n";
        message += &format!("{sign} {}", yen(difference));
    }
    message
}

/// Optional extras for a free-form notification.
#[derive(Debug, Clone, Default)]
pub struct CustomOptions {
    pub emoji: Option<String>,
    pub sender: Option<String>,
    pub timestamp: Option<String>,
}

pub fn format_custom(title: &str, body: &str, options: &CustomOptions) -> String {
    let emoji = options.emoji.as_deref().unwrap_or(DEFAULT_EMOJI);
    let mut message = format!("{emoji} {title}\n{DIVIDER}\n{body}");
    if let Some(sender) = &options.sender {
        message += &format!("\n\n送信者: {sender}");
    }
    if let Some(ts) = &options.timestamp {
        message += &format!("\n送信日時: {ts}");
    }
    message
}

/// Render one form response. Column 0 is the submission timestamp; only
/// questions with both a header and an answer are listed.
pub fn format_form_response(headers: &[String], answers: &[String]) -> String {
    let timestamp = answers.first().map(String::as_str).unwrap_or("");
    let mut message = String::from("📝 新しいフォーム回答\n");
    message += &format!("{DIVIDER}\n");
    message += &format!("送信日時: {timestamp}\n\n");
    for (header, answer) in headers.iter().zip(answers).skip(1) {
        if !header.is_empty() && !answer.is_empty() {
            message += &format!("【{header}】\n{answer}\n\n");
        }
    }
    message
}

/// Local time as the ja-JP locale prints it, e.g. `2025/8/14 9:05:03`.
pub fn ja_timestamp(dt: NaiveDateTime) -> String {
    dt.format("%Y/%-m/%-d %-H:%M:%S").to_string()
}
