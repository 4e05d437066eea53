//! Paths of the finance backend, relative to a configurable base.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::timeline::{DateRange, ViewMode};

/// Characters escaped in a single path segment; mirrors `encodeURIComponent`
const SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_segment(value: &str) -> String {
    utf8_percent_encode(value, SEGMENT_ENCODE_SET).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self { base: base.trim_end_matches('/').to_string() }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn recurring(&self) -> String {
        self.url("/transactions/recurring")
    }

    pub fn recent(&self) -> String {
        self.url("/transactions/recent")
    }

    pub fn subscriptions(&self) -> String {
        self.url("/transactions/subscriptions")
    }

    pub fn timeline(&self, range: &DateRange, view_mode: ViewMode) -> String {
        self.url(&format!(
            "/transactions/timeline?start_date={}&end_date={}&view_mode={}",
            range.start_param(),
            range.end_param(),
            view_mode.as_str()
        ))
    }

    pub fn timeline_categories(&self, range: &DateRange, view_mode: ViewMode) -> String {
        self.url(&format!(
            "/transactions/timeline/categories?start_date={}&end_date={}&view_mode={}",
            range.start_param(),
            range.end_param(),
            view_mode.as_str()
        ))
    }

    pub fn raw_transactions(&self, limit: u32, offset: u32) -> String {
        self.url(&format!("/transactions/raw?limit={}&offset={}", limit, offset))
    }

    pub fn merchant_counts(&self) -> String {
        self.url("/merchants/count")
    }

    pub fn all_merchants(&self) -> String {
        self.url("/merchants/all")
    }

    pub fn merchant_categories(&self, merchant: &str) -> String {
        self.url(&format!("/merchants/{}/categories", encode_segment(merchant)))
    }

    pub fn merchant_category(&self, merchant: &str, category_id: i64) -> String {
        self.url(&format!("/merchants/{}/categories/{}", encode_segment(merchant), category_id))
    }

    pub fn merchant_categories_batch(&self) -> String {
        self.url("/merchants/categories/batch")
    }

    pub fn categories(&self) -> String {
        self.url("/categories")
    }

    pub fn category(&self, category_id: i64) -> String {
        self.url(&format!("/categories/{}", category_id))
    }

    pub fn monthly_spending(&self, months: u32) -> String {
        self.url(&format!("/spending/monthly?months={}", months))
    }

    pub fn upload_statement(&self) -> String {
        self.url("/transactions/upload/commbank")
    }

    pub fn import_from_api(&self) -> String {
        self.url("/transactions/import/api")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_merchant_names_are_encoded() {
        let endpoints = Endpoints::new("/api");
        assert_eq!(
            endpoints.merchant_categories("Ben & Jerry's/Shop 1"),
            "/api/merchants/Ben%20%26%20Jerry's%2FShop%201/categories"
        );
        assert_eq!(endpoints.merchant_category("Café", 4), "/api/merchants/Caf%C3%A9/categories/4");
    }

    #[test]
    fn test_query_strings() {
        let endpoints = Endpoints::new("http://localhost:5000/api/");
        assert_eq!(endpoints.base(), "http://localhost:5000/api");
        assert_eq!(
            endpoints.raw_transactions(1000, 2000),
            "http://localhost:5000/api/transactions/raw?limit=1000&offset=2000"
        );
        assert_eq!(endpoints.monthly_spending(6), "http://localhost:5000/api/spending/monthly?months=6");

        let range = DateRange {
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        };
        assert_eq!(
            endpoints.timeline_categories(&range, ViewMode::Monthly),
            "http://localhost:5000/api/transactions/timeline/categories?start_date=2024-01-01&end_date=2024-12-31&view_mode=monthly"
        );
        assert!(endpoints.timeline(&range, ViewMode::Daily).ends_with("view_mode=daily"));
    }

    #[test]
    fn test_fixed_paths() {
        let endpoints = Endpoints::new("/api");
        assert_eq!(endpoints.category(3), "/api/categories/3");
        assert_eq!(endpoints.upload_statement(), "/api/transactions/upload/commbank");
        assert_eq!(endpoints.import_from_api(), "/api/transactions/import/api");
        assert_eq!(endpoints.merchant_categories_batch(), "/api/merchants/categories/batch");
    }
}
