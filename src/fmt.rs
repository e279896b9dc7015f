use crate::models::Metric;

/// Shown in place of a missing or non-numeric value.
pub const UNAVAILABLE: &str = "取得不可";

/// Format a number with ja-JP grouping: 1234567.5 -> 1,234,567.5
///
/// Up to three fraction digits are kept, trailing zeros dropped.
pub fn number(val: f64) -> String {
    let fixed = format!("{:.3}", val.abs());
    let (int_part, dec_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let dec_part = dec_part.trim_end_matches('0');

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    let is_zero = int_part.chars().all(|c| c == '0') && dec_part.is_empty();
    let sign = if val < 0.0 && !is_zero { "-" } else { "" };
    if dec_part.is_empty() {
        format!("{sign}{with_commas}")
    } else {
        format!("{sign}{with_commas}.{dec_part}")
    }
}

/// Yen amount: ¥1,234 (negative as ¥-1,234).
pub fn yen(val: f64) -> String {
    format!("¥{}", number(val))
}

pub fn yen_metric(metric: Metric) -> String {
    match metric.value() {
        Some(v) => yen(v),
        None => UNAVAILABLE.to_string(),
    }
}

/// Round half up toward positive infinity, as `Math.round` does.
pub fn round_half_up(val: f64) -> f64 {
    (val + 0.5).floor()
}
