//! Search, filtering, sorting, paging and CSV export for the raw transaction table.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{Pagination, RawTransaction};

pub const EXPORT_HEADERS: [&str; 11] = [
    "ID", "Date", "Amount", "Balance", "Description", "Merchant", "Type", "Location", "Currency", "Card", "Source",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write CSV record: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV writer: {0}")]
    Flush(String),
    #[error("CSV output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Table filter panel state. Empty strings and `None` mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFilters {
    pub search: String,
    pub date_from: String,
    pub date_to: String,
    /// Signed bounds, unlike the spending timeline
    pub amount_min: Option<f64>,
    pub amount_max: Option<f64>,
    pub transaction_type: Option<String>,
    pub source: Option<String>,
    pub category: Option<i64>,
}

fn contains_ci(field: &Option<String>, term: &str) -> bool {
    field.as_deref().is_some_and(|value| value.to_lowercase().contains(term))
}

/// Day part of a stored date, so that date-time rows compare inclusively by day
fn day_of(date: &str) -> &str {
    date.get(..10).unwrap_or(date)
}

impl RawFilters {
    pub fn is_active(&self) -> bool {
        *self != RawFilters::default()
    }

    pub fn matches_search(&self, tx: &RawTransaction) -> bool {
        let term = self.search.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        contains_ci(&tx.merchant_name, &term)
            || contains_ci(&tx.original_description, &term)
            || contains_ci(&tx.transaction_type, &term)
            || tx.date.contains(term.as_str())
    }

    /// `primary_category` is the first category assigned to the row's merchant
    pub fn matches(&self, tx: &RawTransaction, primary_category: Option<i64>) -> bool {
        if !self.matches_search(tx) {
            return false;
        }
        if !self.date_from.is_empty() && day_of(&tx.date) < self.date_from.as_str() {
            return false;
        }
        if !self.date_to.is_empty() && day_of(&tx.date) > self.date_to.as_str() {
            return false;
        }
        if self.amount_min.is_some_and(|min| tx.amount < min) {
            return false;
        }
        if self.amount_max.is_some_and(|max| tx.amount > max) {
            return false;
        }
        if let Some(kind) = &self.transaction_type {
            if tx.transaction_type.as_ref() != Some(kind) {
                return false;
            }
        }
        if let Some(source) = &self.source {
            if tx.source.as_ref() != Some(source) {
                return false;
            }
        }
        if let Some(category) = self.category {
            if primary_category != Some(category) {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Date,
    Amount,
    Merchant,
    Description,
    Type,
    Source,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::Date,
        SortKey::Amount,
        SortKey::Merchant,
        SortKey::Description,
        SortKey::Type,
        SortKey::Source,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Date => "Date",
            SortKey::Amount => "Amount",
            SortKey::Merchant => "Merchant",
            SortKey::Description => "Description",
            SortKey::Type => "Type",
            SortKey::Source => "Source",
        }
    }

    fn text<'a>(&self, tx: &'a RawTransaction) -> Option<&'a str> {
        match self {
            SortKey::Date => Some(tx.date.as_str()),
            SortKey::Merchant => tx.merchant_name.as_deref(),
            SortKey::Description => tx.original_description.as_deref(),
            SortKey::Type => tx.transaction_type.as_deref(),
            SortKey::Source => tx.source.as_deref(),
            SortKey::Amount => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self { key: SortKey::Date, direction: SortDirection::Descending }
    }
}

impl SortConfig {
    /// Header click: the active ascending column flips to descending, anything else sorts ascending
    pub fn toggle(self, key: SortKey) -> Self {
        let direction = if self.key == key && self.direction == SortDirection::Ascending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        Self { key, direction }
    }

    pub fn indicator(&self, key: SortKey) -> Option<&'static str> {
        if self.key != key {
            return None;
        }
        Some(match self.direction {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        })
    }

    /// Missing values sort last in either direction
    pub fn compare(&self, a: &RawTransaction, b: &RawTransaction) -> Ordering {
        let ordering = match self.key {
            SortKey::Amount => a.amount.total_cmp(&b.amount),
            key => match (key.text(a), key.text(b)) {
                (Some(x), Some(y)) => x.cmp(y),
                (None, Some(_)) => return Ordering::Greater,
                (Some(_), None) => return Ordering::Less,
                (None, None) => Ordering::Equal,
            },
        };
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Filtered and sorted view of the loaded page
pub fn apply(
    rows: &[RawTransaction],
    filters: &RawFilters,
    sort: SortConfig,
    merchant_categories: &HashMap<String, i64>,
) -> Vec<RawTransaction> {
    let mut filtered: Vec<RawTransaction> = rows
        .iter()
        .filter(|tx| {
            let primary = tx.merchant_name.as_ref().and_then(|m| merchant_categories.get(m).copied());
            filters.matches(tx, primary)
        })
        .cloned()
        .collect();
    filtered.sort_by(|a, b| sort.compare(a, b));
    filtered
}

fn unique_by(rows: &[RawTransaction], field: impl Fn(&RawTransaction) -> Option<&String>) -> Vec<String> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter_map(field)
        .filter(|value| !value.is_empty() && seen.insert(value.as_str()))
        .cloned()
        .collect()
}

/// Distinct transaction types in first-seen order
pub fn unique_types(rows: &[RawTransaction]) -> Vec<String> {
    unique_by(rows, |tx| tx.transaction_type.as_ref())
}

pub fn unique_sources(rows: &[RawTransaction]) -> Vec<String> {
    unique_by(rows, |tx| tx.source.as_ref())
}

pub fn unique_merchants(rows: &[RawTransaction]) -> Vec<String> {
    unique_by(rows, |tx| tx.merchant_name.as_ref())
}

impl Pagination {
    pub fn first_page(limit: u32) -> Self {
        Self { total: 0, limit, offset: 0 }
    }

    pub fn has_previous(&self) -> bool {
        self.offset > 0
    }

    pub fn has_next(&self) -> bool {
        self.offset.saturating_add(self.limit) < self.total
    }

    pub fn next_page(&self) -> Self {
        if !self.has_next() {
            return *self;
        }
        Self { offset: self.offset + self.limit, ..*self }
    }

    pub fn previous_page(&self) -> Self {
        Self { offset: self.offset.saturating_sub(self.limit), ..*self }
    }

    /// 1-based first and last row numbers for `shown` rows on this page
    pub fn showing_range(&self, shown: usize) -> (u32, u32) {
        if self.total == 0 || shown == 0 {
            return (0, 0);
        }
        let last = self.offset.saturating_add(shown as u32).min(self.total);
        (self.offset + 1, last)
    }
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

/// CSV document with one row per transaction, quoted as needed
pub fn export_csv(rows: &[RawTransaction]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADERS)?;
    for tx in rows {
        writer.write_record([
            tx.id.to_string().as_str(),
            tx.date.as_str(),
            tx.amount.to_string().as_str(),
            tx.balance.map(|b| b.to_string()).unwrap_or_default().as_str(),
            opt(&tx.original_description),
            opt(&tx.merchant_name),
            opt(&tx.transaction_type),
            opt(&tx.location),
            opt(&tx.currency),
            opt(&tx.last_4_card_number),
            opt(&tx.source),
        ])?;
    }
    let bytes = writer.into_inner().map_err(|e| ExportError::Flush(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

pub fn export_filename(today: NaiveDate) -> String {
    format!("transactions_export_{}.csv", today.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, date: &str, amount: f64, merchant: Option<&str>, kind: &str, source: &str) -> RawTransaction {
        RawTransaction {
            id,
            date: date.to_string(),
            amount,
            balance: None,
            original_description: merchant.map(|m| format!("{} PURCHASE", m.to_uppercase())),
            merchant_name: merchant.map(str::to_string),
            transaction_type: Some(kind.to_string()),
            location: None,
            currency: Some("AUD".to_string()),
            last_4_card_number: None,
            source: Some(source.to_string()),
        }
    }

    fn sample() -> Vec<RawTransaction> {
        vec![
            row(1, "2024-03-01", -12.5, Some("Coffee Co"), "Merchant", "commbank"),
            row(2, "2024-03-05 10:00:00", -300.0, Some("Landlord"), "Transfer", "commbank"),
            row(3, "2024-03-10", 2000.0, None, "Transfer", "api"),
            row(4, "2024-02-28", -3.0, Some("Bank"), "Fee", "api"),
        ]
    }

    fn ids(rows: &[RawTransaction]) -> Vec<i64> {
        rows.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let rows = apply(&sample(), &RawFilters::default(), SortConfig::default(), &HashMap::new());
        assert_eq!(ids(&rows), vec![3, 2, 1, 4]);
    }

    #[test]
    fn test_search_matches_fields_and_date() {
        let mut filters = RawFilters { search: "coffee".to_string(), ..Default::default() };
        let rows = apply(&sample(), &filters, SortConfig::default(), &HashMap::new());
        assert_eq!(ids(&rows), vec![1]);

        filters.search = "2024-02".to_string();
        let rows = apply(&sample(), &filters, SortConfig::default(), &HashMap::new());
        assert_eq!(ids(&rows), vec![4]);

        filters.search = "TRANSFER".to_string();
        assert_eq!(ids(&apply(&sample(), &filters, SortConfig::default(), &HashMap::new())), vec![3, 2]);
    }

    #[test]
    fn test_filters_combine() {
        let filters = RawFilters {
            date_from: "2024-03-01".to_string(),
            date_to: "2024-03-05".to_string(),
            amount_max: Some(0.0),
            ..Default::default()
        };
        assert!(filters.is_active());
        let rows = apply(&sample(), &filters, SortConfig::default(), &HashMap::new());
        assert_eq!(ids(&rows), vec![2, 1]);

        let by_type = RawFilters { transaction_type: Some("Transfer".to_string()), source: Some("api".to_string()), ..Default::default() };
        assert_eq!(ids(&apply(&sample(), &by_type, SortConfig::default(), &HashMap::new())), vec![3]);
    }

    #[test]
    fn test_category_filter_uses_primary_category() {
        let mut categories = HashMap::new();
        categories.insert("Coffee Co".to_string(), 7);
        categories.insert("Bank".to_string(), 8);
        let filters = RawFilters { category: Some(7), ..Default::default() };
        assert_eq!(ids(&apply(&sample(), &filters, SortConfig::default(), &categories)), vec![1]);
    }

    #[test]
    fn test_sort_toggle_and_missing_values_last() {
        let sort = SortConfig::default().toggle(SortKey::Merchant);
        assert_eq!(sort.direction, SortDirection::Ascending);
        assert_eq!(sort.indicator(SortKey::Merchant), Some("↑"));
        assert_eq!(sort.indicator(SortKey::Date), None);
        let rows = apply(&sample(), &RawFilters::default(), sort, &HashMap::new());
        assert_eq!(ids(&rows), vec![4, 1, 2, 3]);

        let sort = sort.toggle(SortKey::Merchant);
        assert_eq!(sort.direction, SortDirection::Descending);
        let rows = apply(&sample(), &RawFilters::default(), sort, &HashMap::new());
        assert_eq!(ids(&rows), vec![2, 1, 4, 3]);

        // a descending column clicked again goes back to ascending
        assert_eq!(sort.toggle(SortKey::Merchant).direction, SortDirection::Ascending);

        let by_amount = SortConfig::default().toggle(SortKey::Amount);
        assert_eq!(ids(&apply(&sample(), &RawFilters::default(), by_amount, &HashMap::new())), vec![2, 1, 4, 3]);
    }

    #[test]
    fn test_unique_values() {
        assert_eq!(unique_types(&sample()), vec!["Merchant", "Transfer", "Fee"]);
        assert_eq!(unique_sources(&sample()), vec!["commbank", "api"]);
        assert_eq!(unique_merchants(&sample()), vec!["Coffee Co", "Landlord", "Bank"]);
    }

    #[test]
    fn test_pagination_controls() {
        let first = Pagination { total: 2500, limit: 1000, offset: 0 };
        assert!(!first.has_previous());
        assert!(first.has_next());
        assert_eq!(first.showing_range(1000), (1, 1000));

        let last = first.next_page().next_page();
        assert_eq!(last.offset, 2000);
        assert!(!last.has_next());
        assert_eq!(last.next_page(), last);
        assert_eq!(last.showing_range(500), (2001, 2500));
        assert_eq!(last.previous_page().offset, 1000);

        let exact = Pagination { total: 1000, limit: 1000, offset: 0 };
        assert!(!exact.has_next());
        assert_eq!(Pagination::first_page(1000).showing_range(0), (0, 0));
    }

    #[test]
    fn test_export_csv_quotes_fields() {
        let mut tricky = row(9, "2024-03-02", -1234.5, Some("Smith, \"Jr\" & Co"), "Merchant", "commbank");
        tricky.balance = Some(100.25);
        tricky.location = Some("Line one\nLine two".to_string());
        let csv = export_csv(&[tricky, sample().remove(2)]).unwrap();

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), EXPORT_HEADERS.to_vec());
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][2], "-1234.5");
        assert_eq!(&records[0][3], "100.25");
        assert_eq!(&records[0][5], "Smith, \"Jr\" & Co");
        assert_eq!(&records[0][7], "Line one\nLine two");
        assert_eq!(&records[1][5], "");
        assert!(csv.contains("\"Smith, \"\"Jr\"\" & Co\""));
    }

    #[test]
    fn test_export_filename() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(export_filename(today), "transactions_export_2024-03-05.csv");
    }
}
