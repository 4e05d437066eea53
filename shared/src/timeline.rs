//! Period bucketing behind the financial calendar.
//!
//! Transactions are grouped by a truncated date key whose granularity follows the
//! calendar's [`ViewMode`]. Each [`PeriodBucket`] carries the period's total spend
//! (the sum of |amount| over negative amounts), per-category subtotals and an
//! "Uncategorized" remainder, so that
//! `sum(categories) + uncategorized == total_spend` for every bucket.
//!
//! [`CalendarNavigator`] holds the transient drill-down state: the granularity,
//! the anchor date the visible range is derived from, the selected period and a
//! history stack for "Back".

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::dates::{add_months, add_years, days_in_month, first_of_month, first_weekday_of_month, last_of_month, parse_flexible_datetime};
use crate::models::{Category, TimelineTransaction};

pub const UNCATEGORIZED: &str = "Uncategorized";
pub const UNCATEGORIZED_COLOR: &str = "#A0AEC0";
pub const UNCATEGORIZED_ICON: &str = "❔";
/// Transactions listed on each calendar block
pub const TOP_TRANSACTIONS: usize = 3;

/// Calendar granularity, from coarsest to finest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Yearly,
    Monthly,
    Daily,
    Hourly,
}

impl ViewMode {
    pub const ALL: [ViewMode; 4] = [ViewMode::Yearly, ViewMode::Monthly, ViewMode::Daily, ViewMode::Hourly];

    /// Value of the `view_mode` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Yearly => "yearly",
            ViewMode::Monthly => "monthly",
            ViewMode::Daily => "daily",
            ViewMode::Hourly => "hourly",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Yearly => "Year",
            ViewMode::Monthly => "Month",
            ViewMode::Daily => "Day",
            ViewMode::Hourly => "Hour",
        }
    }

    /// Granularity reached by drilling into a period, `None` at the finest level
    pub fn next(&self) -> Option<ViewMode> {
        match self {
            ViewMode::Yearly => Some(ViewMode::Monthly),
            ViewMode::Monthly => Some(ViewMode::Daily),
            ViewMode::Daily => Some(ViewMode::Hourly),
            ViewMode::Hourly => None,
        }
    }

    /// CSS `grid-template-columns` for the calendar grid
    pub fn grid_columns(&self) -> &'static str {
        match self {
            ViewMode::Yearly => "repeat(auto-fill, minmax(150px, 1fr))",
            ViewMode::Monthly => "repeat(4, 1fr)",
            ViewMode::Daily => "repeat(7, 1fr)",
            ViewMode::Hourly => "repeat(auto-fill, minmax(120px, 1fr))",
        }
    }
}

/// Truncate a timestamp to the bucket key for `view`
pub fn period_key(view: ViewMode, dt: NaiveDateTime) -> String {
    match view {
        ViewMode::Yearly => dt.format("%Y").to_string(),
        ViewMode::Monthly => dt.format("%Y-%m").to_string(),
        ViewMode::Daily => dt.format("%Y-%m-%d").to_string(),
        ViewMode::Hourly => dt.format("%Y-%m-%dT%H:00").to_string(),
    }
}

fn parse_period(view: ViewMode, key: &str) -> Option<NaiveDateTime> {
    let date = match view {
        ViewMode::Yearly => NaiveDate::from_ymd_opt(key.parse().ok()?, 1, 1)?,
        ViewMode::Monthly => NaiveDate::parse_from_str(&format!("{}-01", key), "%Y-%m-%d").ok()?,
        ViewMode::Daily => NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()?,
        ViewMode::Hourly => return NaiveDateTime::parse_from_str(key, "%Y-%m-%dT%H:%M").ok(),
    };
    date.and_hms_opt(0, 0, 0)
}

/// First day covered by a period key
pub fn period_start(view: ViewMode, key: &str) -> Option<NaiveDate> {
    parse_period(view, key).map(|dt| dt.date())
}

/// Inclusive date range requested from the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn start_param(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Visible range around `anchor`: five years, one year, one month or one day
pub fn date_range(view: ViewMode, anchor: NaiveDate) -> DateRange {
    let year = anchor.year();
    let ymd = |y: i32, m: u32, d: u32| NaiveDate::from_ymd_opt(y, m, d).unwrap_or(anchor);
    match view {
        ViewMode::Yearly => DateRange { start: ymd(year - 2, 1, 1), end: ymd(year + 2, 12, 31) },
        ViewMode::Monthly => DateRange { start: ymd(year, 1, 1), end: ymd(year, 12, 31) },
        ViewMode::Daily => DateRange { start: first_of_month(anchor), end: last_of_month(anchor) },
        ViewMode::Hourly => DateRange { start: anchor, end: anchor },
    }
}

/// Move the anchor one visible range forwards or backwards
pub fn shift_anchor(view: ViewMode, anchor: NaiveDate, direction: i32) -> NaiveDate {
    match view {
        ViewMode::Yearly => add_years(anchor, direction * 5),
        ViewMode::Monthly => add_years(anchor, direction),
        ViewMode::Daily => add_months(anchor, direction),
        ViewMode::Hourly => anchor + chrono::Duration::days(direction as i64),
    }
}

/// Every period key inside the visible range, in order
pub fn period_keys(view: ViewMode, anchor: NaiveDate) -> Vec<String> {
    let range = date_range(view, anchor);
    match view {
        ViewMode::Yearly => (range.start.year()..=range.end.year()).map(|y| y.to_string()).collect(),
        ViewMode::Monthly => (1..=12).map(|m| format!("{:04}-{:02}", anchor.year(), m)).collect(),
        ViewMode::Daily => (1..=days_in_month(anchor.year(), anchor.month()))
            .map(|d| format!("{:04}-{:02}-{:02}", anchor.year(), anchor.month(), d))
            .collect(),
        ViewMode::Hourly => (0..24)
            .map(|h| format!("{}T{:02}:00", anchor.format("%Y-%m-%d"), h))
            .collect(),
    }
}

/// Empty cells before the first day in the weekday-aligned daily grid
pub fn leading_blank_cells(view: ViewMode, anchor: NaiveDate) -> u32 {
    match view {
        ViewMode::Daily => first_weekday_of_month(anchor.year(), anchor.month()),
        _ => 0,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySubtotal {
    /// `None` for the uncategorized remainder
    pub category_id: Option<i64>,
    pub name: String,
    pub color: String,
    pub icon: String,
    pub amount: f64,
}

/// Spending aggregate for one period key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodBucket {
    pub key: String,
    /// Sum of |amount| over negative amounts
    pub total_spend: f64,
    pub income: f64,
    /// Known categories, largest first
    pub categories: Vec<CategorySubtotal>,
    /// `total_spend` minus every categorized subtotal
    pub uncategorized: f64,
    pub top_transactions: Vec<TimelineTransaction>,
    pub transaction_count: usize,
}

impl PeriodBucket {
    pub fn empty(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            total_spend: 0.0,
            income: 0.0,
            categories: Vec::new(),
            uncategorized: 0.0,
            top_transactions: Vec::new(),
            transaction_count: 0,
        }
    }

    pub fn categorized_total(&self) -> f64 {
        self.categories.iter().map(|c| c.amount).sum()
    }

    /// Category subtotals followed by the uncategorized remainder when non-zero
    pub fn breakdown(&self) -> Vec<CategorySubtotal> {
        let mut rows = self.categories.clone();
        if self.uncategorized > 0.005 {
            rows.push(CategorySubtotal {
                category_id: None,
                name: UNCATEGORIZED.to_string(),
                color: UNCATEGORIZED_COLOR.to_string(),
                icon: UNCATEGORIZED_ICON.to_string(),
                amount: self.uncategorized,
            });
        }
        rows
    }

    pub fn is_empty(&self) -> bool {
        self.transaction_count == 0
    }
}

#[derive(Default)]
struct BucketAccumulator {
    total_spend: f64,
    income: f64,
    by_category: HashMap<i64, f64>,
    transactions: Vec<TimelineTransaction>,
}

/// Group transactions into period buckets ordered by key.
///
/// Spending assigned to a category id missing from `categories` stays in the
/// uncategorized remainder. Rows with unparseable dates are skipped.
pub fn build_buckets(
    view: ViewMode,
    transactions: &[TimelineTransaction],
    categories: &[Category],
) -> Vec<PeriodBucket> {
    let known: HashMap<i64, &Category> = categories.iter().map(|c| (c.id, c)).collect();
    let mut grouped: BTreeMap<String, BucketAccumulator> = BTreeMap::new();

    for tx in transactions {
        let Some(dt) = parse_flexible_datetime(&tx.date) else {
            log::warn!("skipping timeline row with unparseable date {:?}", tx.date);
            continue;
        };
        let acc = grouped.entry(period_key(view, dt)).or_default();
        let spend = tx.spend();
        acc.total_spend += spend;
        if tx.amount > 0.0 {
            acc.income += tx.amount;
        }
        if spend > 0.0 {
            if let Some(id) = tx.category_id.filter(|id| known.contains_key(id)) {
                *acc.by_category.entry(id).or_insert(0.0) += spend;
            }
        }
        acc.transactions.push(tx.clone());
    }

    grouped
        .into_iter()
        .map(|(key, acc)| {
            let mut subtotals: Vec<CategorySubtotal> = acc
                .by_category
                .iter()
                .filter_map(|(id, amount)| {
                    known.get(id).map(|category| CategorySubtotal {
                        category_id: Some(*id),
                        name: category.name.clone(),
                        color: category.color.clone(),
                        icon: category.icon.clone(),
                        amount: *amount,
                    })
                })
                .collect();
            subtotals.sort_by(|a, b| b.amount.total_cmp(&a.amount).then_with(|| a.name.cmp(&b.name)));

            let categorized: f64 = subtotals.iter().map(|s| s.amount).sum();
            let transaction_count = acc.transactions.len();
            let mut spending: Vec<TimelineTransaction> =
                acc.transactions.into_iter().filter(|tx| tx.spend() > 0.0).collect();
            spending.sort_by(|a, b| b.spend().total_cmp(&a.spend()));
            spending.truncate(TOP_TRANSACTIONS);

            PeriodBucket {
                key,
                total_spend: acc.total_spend,
                income: acc.income,
                uncategorized: (acc.total_spend - categorized).max(0.0),
                categories: subtotals,
                top_transactions: spending,
                transaction_count,
            }
        })
        .collect()
}

/// Buckets for every period in the visible range, empty where nothing happened
pub fn fill_periods(view: ViewMode, anchor: NaiveDate, buckets: Vec<PeriodBucket>) -> Vec<PeriodBucket> {
    let mut by_key: HashMap<String, PeriodBucket> = buckets.into_iter().map(|b| (b.key.clone(), b)).collect();
    period_keys(view, anchor)
        .into_iter()
        .map(|key| by_key.remove(&key).unwrap_or_else(|| PeriodBucket::empty(key)))
        .collect()
}

/// Largest bucket total; bars across all visible periods scale against it
pub fn max_bucket_total(buckets: &[PeriodBucket]) -> f64 {
    buckets.iter().map(|b| b.total_spend).fold(0.0, f64::max)
}

/// Bar size as a percentage of `max`, clamped to 0..=100
pub fn bar_width_percent(amount: f64, max: f64) -> f64 {
    if max <= 0.0 || !max.is_finite() || !amount.is_finite() {
        return 0.0;
    }
    (amount / max * 100.0).clamp(0.0, 100.0)
}

/// Short label on a calendar block: `2024`, `Mar`, `5`, `2 PM`
pub fn period_label(view: ViewMode, key: &str) -> String {
    match (view, parse_period(view, key)) {
        (ViewMode::Yearly, _) => key.to_string(),
        (ViewMode::Monthly, Some(dt)) => dt.format("%b").to_string(),
        (ViewMode::Daily, Some(dt)) => dt.day().to_string(),
        (ViewMode::Hourly, Some(dt)) => dt.format("%-I %p").to_string(),
        (_, None) => key.to_string(),
    }
}

/// Heading of the detail panel for a selected period
pub fn detail_title(view: ViewMode, key: &str) -> String {
    match (view, parse_period(view, key)) {
        (ViewMode::Yearly, _) => format!("Year {}", key),
        (ViewMode::Monthly, Some(dt)) => dt.format("%B %Y").to_string(),
        (ViewMode::Daily, Some(dt)) => dt.format("%A, %B %-d, %Y").to_string(),
        (ViewMode::Hourly, Some(dt)) => dt.format("%A, %B %-d, %Y, %-I:%M %p").to_string(),
        (_, None) => key.to_string(),
    }
}

/// Toolbar heading for the visible range
pub fn view_title(view: ViewMode, anchor: NaiveDate) -> String {
    match view {
        ViewMode::Yearly => format!("{} - {}", anchor.year() - 2, anchor.year() + 2),
        ViewMode::Monthly => anchor.year().to_string(),
        ViewMode::Daily => anchor.format("%B %Y").to_string(),
        ViewMode::Hourly => anchor.format("%A, %B %-d, %Y").to_string(),
    }
}

pub fn is_current_period(view: ViewMode, key: &str, now: NaiveDateTime) -> bool {
    period_key(view, now) == key
}

#[derive(Debug, Clone, PartialEq)]
struct NavigationEntry {
    view_mode: ViewMode,
    anchor: NaiveDate,
    selected_period: Option<String>,
}

/// Drill-down state of the financial calendar
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarNavigator {
    view_mode: ViewMode,
    anchor: NaiveDate,
    selected_period: Option<String>,
    history: Vec<NavigationEntry>,
}

impl CalendarNavigator {
    pub fn new(view_mode: ViewMode, today: NaiveDate) -> Self {
        Self { view_mode, anchor: today, selected_period: None, history: Vec::new() }
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn selected_period(&self) -> Option<&str> {
        self.selected_period.as_deref()
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn can_drill_down(&self) -> bool {
        self.view_mode.next().is_some()
    }

    pub fn date_range(&self) -> DateRange {
        date_range(self.view_mode, self.anchor)
    }

    pub fn title(&self) -> String {
        view_title(self.view_mode, self.anchor)
    }

    /// First click selects a period; clicking the selected period drills into it
    pub fn click_period(&mut self, key: &str) {
        if self.selected_period.as_deref() == Some(key) {
            self.drill_down(key);
        } else {
            self.selected_period = Some(key.to_string());
        }
    }

    /// Zoom into `key`. Returns false at the finest granularity or for a bad key.
    pub fn drill_down(&mut self, key: &str) -> bool {
        let Some(next) = self.view_mode.next() else {
            return false;
        };
        let Some(start) = period_start(self.view_mode, key) else {
            return false;
        };
        self.history.push(NavigationEntry {
            view_mode: self.view_mode,
            anchor: self.anchor,
            selected_period: self.selected_period.clone(),
        });
        self.view_mode = next;
        self.anchor = start;
        self.selected_period = None;
        true
    }

    /// Restore the state before the last drill-down
    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(entry) => {
                self.view_mode = entry.view_mode;
                self.anchor = entry.anchor;
                self.selected_period = entry.selected_period;
                true
            }
            None => false,
        }
    }

    /// Picking a granularity directly starts over from today
    pub fn set_view_mode(&mut self, view_mode: ViewMode, today: NaiveDate) {
        self.history.clear();
        self.view_mode = view_mode;
        self.anchor = today;
        self.selected_period = None;
    }

    pub fn navigate(&mut self, direction: i32) {
        self.anchor = shift_anchor(self.view_mode, self.anchor, direction);
        self.selected_period = None;
    }

    pub fn go_to_today(&mut self, today: NaiveDate) {
        self.anchor = today;
        self.selected_period = None;
    }

    pub fn clear_selection(&mut self) {
        self.selected_period = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tx(date: &str, amount: f64, merchant: &str, category_id: Option<i64>) -> TimelineTransaction {
        TimelineTransaction {
            date: date.to_string(),
            amount,
            merchant_name: Some(merchant.to_string()),
            transaction_type: Some("Merchant".to_string()),
            category_id,
        }
    }

    fn category(id: i64, name: &str) -> Category {
        Category {
            id,
            name: name.to_string(),
            color: "#123456".to_string(),
            icon: "🛒".to_string(),
            merchant_count: None,
        }
    }

    fn sample() -> Vec<TimelineTransaction> {
        vec![
            tx("2024-03-05 09:10:00", -40.0, "Grocer", Some(1)),
            tx("2024-03-05 18:00:00", -25.5, "Cinema", Some(2)),
            tx("2024-03-05", -10.0, "Corner Shop", None),
            tx("2024-03-20", -5.0, "Mystery", Some(99)),
            tx("2024-03-21", 1000.0, "Employer", None),
            tx("2024-04-02", -60.0, "Grocer", Some(1)),
            tx("garbage", -1.0, "Broken", None),
        ]
    }

    #[test]
    fn test_period_keys_truncate_dates() {
        let dt = date(2024, 3, 5).and_hms_opt(14, 35, 0).unwrap();
        assert_eq!(period_key(ViewMode::Yearly, dt), "2024");
        assert_eq!(period_key(ViewMode::Monthly, dt), "2024-03");
        assert_eq!(period_key(ViewMode::Daily, dt), "2024-03-05");
        assert_eq!(period_key(ViewMode::Hourly, dt), "2024-03-05T14:00");
    }

    #[test]
    fn test_subtotals_plus_uncategorized_equal_total() {
        let categories = vec![category(1, "Groceries"), category(2, "Fun")];
        for view in ViewMode::ALL {
            let buckets = build_buckets(view, &sample(), &categories);
            for bucket in &buckets {
                let sum = bucket.categorized_total() + bucket.uncategorized;
                assert!(
                    (sum - bucket.total_spend).abs() < 1e-9,
                    "{:?} bucket {} does not add up",
                    view,
                    bucket.key
                );
            }
        }
    }

    #[test]
    fn test_monthly_buckets() {
        let categories = vec![category(1, "Groceries"), category(2, "Fun")];
        let buckets = build_buckets(ViewMode::Monthly, &sample(), &categories);
        assert_eq!(buckets.len(), 2);

        let march = &buckets[0];
        assert_eq!(march.key, "2024-03");
        assert_eq!(march.total_spend, 80.5);
        assert_eq!(march.income, 1000.0);
        assert_eq!(march.transaction_count, 5);
        assert_eq!(march.categories.len(), 2);
        assert_eq!(march.categories[0].name, "Groceries");
        assert_eq!(march.categories[0].amount, 40.0);
        // unknown category 99 falls into the remainder
        assert_eq!(march.uncategorized, 15.0);
        let merchants: Vec<&str> = march.top_transactions.iter().map(|t| t.merchant_or_unknown()).collect();
        assert_eq!(merchants, vec!["Grocer", "Cinema", "Corner Shop"]);

        let breakdown = march.breakdown();
        assert_eq!(breakdown.last().unwrap().name, UNCATEGORIZED);
        assert_eq!(breakdown.last().unwrap().category_id, None);
    }

    #[test]
    fn test_hourly_buckets_split_by_hour() {
        let buckets = build_buckets(ViewMode::Hourly, &sample(), &[]);
        let keys: Vec<&str> = buckets.iter().map(|b| b.key.as_str()).collect();
        assert!(keys.contains(&"2024-03-05T09:00"));
        assert!(keys.contains(&"2024-03-05T18:00"));
        assert!(keys.contains(&"2024-03-05T00:00"));
    }

    #[test]
    fn test_bar_width_is_capped_and_monotonic() {
        assert_eq!(bar_width_percent(50.0, 200.0), 25.0);
        assert_eq!(bar_width_percent(300.0, 200.0), 100.0);
        assert_eq!(bar_width_percent(10.0, 0.0), 0.0);
        assert_eq!(bar_width_percent(-5.0, 10.0), 0.0);
        let mut previous = 0.0;
        for amount in [0.0, 1.0, 10.0, 99.0, 100.0, 150.0] {
            let width = bar_width_percent(amount, 100.0);
            assert!(width >= previous);
            assert!(width <= 100.0);
            previous = width;
        }
    }

    #[test]
    fn test_max_bucket_total() {
        let buckets = build_buckets(ViewMode::Monthly, &sample(), &[]);
        assert_eq!(max_bucket_total(&buckets), 80.5);
        assert_eq!(max_bucket_total(&[]), 0.0);
    }

    #[test]
    fn test_date_ranges() {
        let anchor = date(2024, 3, 15);
        assert_eq!(date_range(ViewMode::Yearly, anchor), DateRange { start: date(2022, 1, 1), end: date(2026, 12, 31) });
        assert_eq!(date_range(ViewMode::Monthly, anchor), DateRange { start: date(2024, 1, 1), end: date(2024, 12, 31) });
        assert_eq!(date_range(ViewMode::Daily, anchor), DateRange { start: date(2024, 3, 1), end: date(2024, 3, 31) });
        assert_eq!(date_range(ViewMode::Hourly, anchor), DateRange { start: anchor, end: anchor });
        assert_eq!(date_range(ViewMode::Daily, anchor).start_param(), "2024-03-01");
    }

    #[test]
    fn test_shift_anchor() {
        let anchor = date(2024, 1, 31);
        assert_eq!(shift_anchor(ViewMode::Yearly, anchor, -1), date(2019, 1, 31));
        assert_eq!(shift_anchor(ViewMode::Monthly, anchor, 1), date(2025, 1, 31));
        assert_eq!(shift_anchor(ViewMode::Daily, anchor, 1), date(2024, 2, 29));
        assert_eq!(shift_anchor(ViewMode::Hourly, anchor, 1), date(2024, 2, 1));
    }

    #[test]
    fn test_fill_periods_covers_range() {
        let anchor = date(2024, 2, 10);
        let filled = fill_periods(ViewMode::Daily, anchor, build_buckets(ViewMode::Daily, &sample(), &[]));
        assert_eq!(filled.len(), 29);
        assert!(filled.iter().all(|b| b.is_empty()));
        assert_eq!(period_keys(ViewMode::Monthly, anchor).len(), 12);
        assert_eq!(period_keys(ViewMode::Hourly, anchor)[23], "2024-02-10T23:00");
        assert_eq!(period_keys(ViewMode::Yearly, anchor), vec!["2022", "2023", "2024", "2025", "2026"]);
        assert_eq!(leading_blank_cells(ViewMode::Daily, date(2024, 3, 9)), 5);
        assert_eq!(leading_blank_cells(ViewMode::Monthly, anchor), 0);
    }

    #[test]
    fn test_labels_and_titles() {
        assert_eq!(period_label(ViewMode::Yearly, "2024"), "2024");
        assert_eq!(period_label(ViewMode::Monthly, "2024-03"), "Mar");
        assert_eq!(period_label(ViewMode::Daily, "2024-03-05"), "5");
        assert_eq!(period_label(ViewMode::Hourly, "2024-03-05T14:00"), "2 PM");
        assert_eq!(detail_title(ViewMode::Yearly, "2024"), "Year 2024");
        assert_eq!(detail_title(ViewMode::Monthly, "2024-03"), "March 2024");
        assert_eq!(detail_title(ViewMode::Daily, "2024-03-05"), "Tuesday, March 5, 2024");
        assert_eq!(detail_title(ViewMode::Hourly, "2024-03-05T14:00"), "Tuesday, March 5, 2024, 2:00 PM");
        let anchor = date(2024, 3, 5);
        assert_eq!(view_title(ViewMode::Yearly, anchor), "2022 - 2026");
        assert_eq!(view_title(ViewMode::Monthly, anchor), "2024");
        assert_eq!(view_title(ViewMode::Daily, anchor), "March 2024");
        assert_eq!(view_title(ViewMode::Hourly, anchor), "Tuesday, March 5, 2024");
    }

    #[test]
    fn test_is_current_period() {
        let now = date(2024, 3, 5).and_hms_opt(14, 35, 0).unwrap();
        assert!(is_current_period(ViewMode::Monthly, "2024-03", now));
        assert!(is_current_period(ViewMode::Hourly, "2024-03-05T14:00", now));
        assert!(!is_current_period(ViewMode::Daily, "2024-03-04", now));
    }

    #[test]
    fn test_navigator_select_then_drill_down() {
        let mut nav = CalendarNavigator::new(ViewMode::Monthly, date(2024, 6, 1));
        nav.click_period("2024-03");
        assert_eq!(nav.selected_period(), Some("2024-03"));
        assert_eq!(nav.view_mode(), ViewMode::Monthly);

        nav.click_period("2024-03");
        assert_eq!(nav.view_mode(), ViewMode::Daily);
        assert_eq!(nav.anchor(), date(2024, 3, 1));
        assert_eq!(nav.selected_period(), None);
        assert!(nav.can_go_back());

        assert!(nav.drill_down("2024-03-05"));
        assert_eq!(nav.view_mode(), ViewMode::Hourly);
        assert!(!nav.drill_down("2024-03-05T10:00"));

        assert!(nav.back());
        assert_eq!(nav.view_mode(), ViewMode::Daily);
        assert!(nav.back());
        assert_eq!(nav.view_mode(), ViewMode::Monthly);
        assert_eq!(nav.anchor(), date(2024, 6, 1));
        assert_eq!(nav.selected_period(), Some("2024-03"));
        assert!(!nav.back());
    }

    #[test]
    fn test_navigator_view_change_resets_history() {
        let today = date(2024, 6, 15);
        let mut nav = CalendarNavigator::new(ViewMode::Yearly, date(2020, 1, 1));
        assert!(nav.drill_down("2021"));
        nav.click_period("2021-02");
        nav.navigate(1);
        assert_eq!(nav.selected_period(), None);
        assert_eq!(nav.anchor(), date(2022, 1, 1));

        nav.set_view_mode(ViewMode::Daily, today);
        assert!(!nav.can_go_back());
        assert_eq!(nav.anchor(), today);
        assert_eq!(nav.title(), "June 2024");

        nav.navigate(-1);
        nav.go_to_today(today);
        assert_eq!(nav.anchor(), today);
    }
}
