use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::dates::{add_months, days_in_month, first_of_month, last_of_month, parse_flexible_datetime};
use crate::models::TimelineTransaction;
use crate::timeline::{bar_width_percent, DateRange};

/// Zoom level of the spending timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpendingScope {
    Daily,
    Monthly,
}

impl SpendingScope {
    pub fn label(&self) -> &'static str {
        match self {
            SpendingScope::Daily => "Daily View",
            SpendingScope::Monthly => "Monthly View",
        }
    }
}

/// Move the selected date by one day or one month
pub fn navigate(scope: SpendingScope, selected: NaiveDate, direction: i32) -> NaiveDate {
    match scope {
        SpendingScope::Daily => selected + Duration::days(direction as i64),
        SpendingScope::Monthly => add_months(selected, direction),
    }
}

pub fn scope_title(scope: SpendingScope, selected: NaiveDate) -> String {
    match scope {
        SpendingScope::Daily => selected.format("%A, %B %-d, %Y").to_string(),
        SpendingScope::Monthly => selected.format("%B %Y").to_string(),
    }
}

/// The selected month; both scopes are served from one month of data
pub fn fetch_range(selected: NaiveDate) -> DateRange {
    DateRange { start: first_of_month(selected), end: last_of_month(selected) }
}

/// Merchant and amount filters. Bounds apply to the absolute amount.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpendingFilters {
    pub merchant: String,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
}

impl SpendingFilters {
    pub fn matches(&self, tx: &TimelineTransaction) -> bool {
        let needle = self.merchant.trim().to_lowercase();
        if !needle.is_empty() {
            let merchant = tx.merchant_name.as_deref().unwrap_or_default().to_lowercase();
            if !merchant.contains(&needle) {
                return false;
            }
        }
        let magnitude = tx.amount.abs();
        if self.min_amount.is_some_and(|min| magnitude < min) {
            return false;
        }
        if self.max_amount.is_some_and(|max| magnitude > max) {
            return false;
        }
        true
    }
}

fn in_scope(scope: SpendingScope, selected: NaiveDate, tx_date: NaiveDate) -> bool {
    match scope {
        SpendingScope::Daily => tx_date == selected,
        SpendingScope::Monthly => tx_date.year() == selected.year() && tx_date.month() == selected.month(),
    }
}

/// Rows inside the scope that pass the filters, newest first
pub fn filter_transactions(
    transactions: &[TimelineTransaction],
    scope: SpendingScope,
    selected: NaiveDate,
    filters: &SpendingFilters,
) -> Vec<TimelineTransaction> {
    let mut dated: Vec<_> = transactions
        .iter()
        .filter_map(|tx| parse_flexible_datetime(&tx.date).map(|dt| (dt, tx)))
        .filter(|(dt, tx)| in_scope(scope, selected, dt.date()) && filters.matches(tx))
        .collect();
    dated.sort_by(|a, b| b.0.cmp(&a.0));
    dated.into_iter().map(|(_, tx)| tx.clone()).collect()
}

/// Sum of |amount| over spending rows
pub fn spending_total(transactions: &[TimelineTransaction]) -> f64 {
    transactions.iter().map(TimelineTransaction::spend).sum()
}

/// One column of the monthly bar view
#[derive(Debug, Clone, PartialEq)]
pub struct DayTotal {
    pub day: u32,
    pub total: f64,
    pub transaction_count: usize,
    pub height_percent: f64,
}

/// A column for every day of the selected month, scaled against the busiest day
pub fn day_totals(transactions: &[TimelineTransaction], selected: NaiveDate) -> Vec<DayTotal> {
    let days = days_in_month(selected.year(), selected.month());
    let mut columns: Vec<DayTotal> = (1..=days)
        .map(|day| DayTotal { day, total: 0.0, transaction_count: 0, height_percent: 0.0 })
        .collect();

    for tx in transactions {
        let Some(dt) = parse_flexible_datetime(&tx.date) else { continue };
        if !in_scope(SpendingScope::Monthly, selected, dt.date()) {
            continue;
        }
        if let Some(column) = columns.get_mut(dt.day() as usize - 1) {
            column.total += tx.spend();
            column.transaction_count += 1;
        }
    }

    let max = columns.iter().map(|c| c.total).fold(0.0, f64::max);
    for column in &mut columns {
        column.height_percent = bar_width_percent(column.total, max);
    }
    columns
}

/// Clicking a day column zooms into that day
pub fn select_day(selected: NaiveDate, day: u32) -> (SpendingScope, NaiveDate) {
    (SpendingScope::Daily, selected.with_day(day).unwrap_or(selected))
}
