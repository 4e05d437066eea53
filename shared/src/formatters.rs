//! Display formatting shared by every view.
//!
//! Currency always renders with a `$` symbol, thousands separators and exactly two
//! decimals; missing values render as `$0.00` rather than an empty cell.

use chrono::NaiveDateTime;

use crate::dates::parse_flexible_datetime;
use crate::timeline::ViewMode;

/// Format an optional amount as US currency, e.g. `-$1,234.50`
pub fn format_currency(amount: Option<f64>) -> String {
    let value = match amount {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    };
    let cents = (value * 100.0).round() / 100.0;
    if cents == 0.0 {
        return "$0.00".to_string();
    }
    let sign = if cents < 0.0 { "-" } else { "" };
    format!("{}${}", sign, format_num::format_num!(",.2", cents.abs()))
}

/// Currency of the absolute value, used where the sign is implied by context
pub fn format_currency_abs(amount: f64) -> String {
    format_currency(Some(amount.abs()))
}

pub fn format_percentage(value: f64) -> String {
    if !value.is_finite() {
        return "0.0%".to_string();
    }
    format!("{:.1}%", value)
}

/// Rounded share of `part` in `total`, 0 when the total is not positive
pub fn percent_of(part: f64, total: f64) -> u32 {
    if total <= 0.0 || !part.is_finite() {
        return 0;
    }
    ((part / total) * 100.0).round().max(0.0) as u32
}

const SPECIAL_WORDS: [(&str, &str); 4] = [("Usd", "USD"), ("Aud", "AUD"), ("Nzd", "NZD"), ("Id", "ID")];

/// `merchant_name` -> `Merchant Name`, `last-4-id` -> `Last 4 ID`
pub fn title_case(text: &str) -> String {
    text.replace(['_', '-'], " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            let titled = match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
                None => String::new(),
            };
            SPECIAL_WORDS
                .iter()
                .find(|(from, _)| *from == titled)
                .map(|(_, to)| to.to_string())
                .unwrap_or(titled)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Long-form date for a calendar granularity
pub fn format_date(view_mode: ViewMode, date: NaiveDateTime) -> String {
    let pattern = match view_mode {
        ViewMode::Yearly => "%Y",
        ViewMode::Monthly => "%B %Y",
        ViewMode::Daily => "%A, %B %-d, %Y",
        ViewMode::Hourly => "%A, %B %-d, %Y, %-I %p",
    };
    date.format(pattern).to_string()
}

/// `2024-03-05` -> `5 Mar 2024`; unparseable input is returned unchanged
pub fn format_short_date(value: &str) -> String {
    match parse_flexible_datetime(value) {
        Some(dt) => dt.format("%-d %b %Y").to_string(),
        None => value.to_string(),
    }
}

/// `2024-03-05 14:30:00` -> `2:30 PM`
pub fn format_time_of_day(value: &str) -> String {
    match parse_flexible_datetime(value) {
        Some(dt) => dt.format("%-I:%M %p").to_string(),
        None => String::new(),
    }
}
