use std::collections::HashMap;

use futures::future::join_all;
use gloo::net::http::{Request, Response};
use serde::de::DeserializeOwned;
use shared::cache::MerchantCategoryCache;
use shared::{
    ApiImportRequest, Category, DashboardConfig, Endpoints, ImportSummary, MerchantCount, MerchantSummary,
    MonthlySpending, NewCategory, RawTransactionPage, RecentTransaction, RecurringTransaction,
    SubscriptionPattern, TimelineTransaction, ViewMode,
};
use shared::timeline::DateRange;
use thiserror::Error;
use web_sys::{File, FormData};

use super::date_utils::now_ms;
use super::session_cache::SessionStore;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to parse response: {0}")]
    Parse(String),
    #[error("failed to build request: {0}")]
    Request(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}

/// API client for the finance backend
#[derive(Clone, PartialEq)]
pub struct ApiClient {
    config: DashboardConfig,
    endpoints: Endpoints,
}

impl ApiClient {
    /// Client for the build-time configured base URL
    pub fn new() -> Self {
        Self::from_config(&DashboardConfig::from_build_env())
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            config: config.clone(),
            endpoints: config.endpoints(),
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    fn category_cache(&self) -> MerchantCategoryCache<SessionStore> {
        MerchantCategoryCache::with_ttl(SessionStore, self.config.cache_ttl_ms)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let response = Self::check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn check_status(response: Response) -> Result<Response, ApiError> {
        if response.ok() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
        Err(ApiError::Status { status, body })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let response = Request::get(url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::read_json(response).await
    }

    async fn post_json<B: serde::Serialize, T: DeserializeOwned>(&self, url: &str, body: &B) -> Result<T, ApiError> {
        let response = Request::post(url)
            .json(body)
            .map_err(|e| ApiError::Request(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::read_json(response).await
    }

    fn logged<T>(operation: &str, result: Result<T, ApiError>) -> Result<T, ApiError> {
        if let Err(e) = &result {
            log::error!("Error {}: {}", operation, e);
        }
        result
    }

    pub async fn get_recurring_transactions(&self) -> Result<Vec<RecurringTransaction>, ApiError> {
        Self::logged("fetching recurring transactions", self.get_json(&self.endpoints.recurring()).await)
    }

    pub async fn get_recent_transaction(&self) -> Result<RecentTransaction, ApiError> {
        Self::logged("fetching recent transaction", self.get_json(&self.endpoints.recent()).await)
    }

    pub async fn get_subscriptions(&self) -> Result<Vec<SubscriptionPattern>, ApiError> {
        Self::logged("fetching subscriptions", self.get_json(&self.endpoints.subscriptions()).await)
    }

    pub async fn get_timeline(&self, range: &DateRange, view_mode: ViewMode) -> Result<Vec<TimelineTransaction>, ApiError> {
        Self::logged(
            "fetching transaction timeline",
            self.get_json(&self.endpoints.timeline(range, view_mode)).await,
        )
    }

    pub async fn get_timeline_with_categories(
        &self,
        range: &DateRange,
        view_mode: ViewMode,
    ) -> Result<Vec<TimelineTransaction>, ApiError> {
        Self::logged(
            "fetching transaction timeline with categories",
            self.get_json(&self.endpoints.timeline_categories(range, view_mode)).await,
        )
    }

    pub async fn get_raw_transactions(&self, limit: u32, offset: u32) -> Result<RawTransactionPage, ApiError> {
        Self::logged(
            "fetching raw transactions",
            self.get_json(&self.endpoints.raw_transactions(limit, offset)).await,
        )
    }

    pub async fn get_merchant_counts(&self) -> Result<Vec<MerchantCount>, ApiError> {
        Self::logged("fetching merchant counts", self.get_json(&self.endpoints.merchant_counts()).await)
    }

    pub async fn get_all_merchants(&self) -> Result<Vec<MerchantSummary>, ApiError> {
        Self::logged("fetching all merchants", self.get_json(&self.endpoints.all_merchants()).await)
    }

    pub async fn get_monthly_spending(&self, months: u32) -> Result<Vec<MonthlySpending>, ApiError> {
        Self::logged(
            "fetching monthly spending",
            self.get_json(&self.endpoints.monthly_spending(months)).await,
        )
    }

    pub async fn get_categories(&self) -> Result<Vec<Category>, ApiError> {
        Self::logged("fetching categories", self.get_json(&self.endpoints.categories()).await)
    }

    pub async fn create_category(&self, category: &NewCategory) -> Result<Category, ApiError> {
        Self::logged("creating category", self.post_json(&self.endpoints.categories(), category).await)
    }

    pub async fn delete_category(&self, category_id: i64) -> Result<(), ApiError> {
        let result = async {
            let response = Request::delete(&self.endpoints.category(category_id))
                .send()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?;
            Self::check_status(response).await.map(|_| ())
        }
        .await;
        Self::logged(&format!("deleting category {}", category_id), result)
    }

    /// Categories of one merchant, served from the session cache while fresh.
    ///
    /// A 404 or a network failure is remembered as "no categories" so the
    /// merchant is not requested again until the entry expires.
    pub async fn get_merchant_categories(&self, merchant: &str) -> Result<Vec<Category>, ApiError> {
        let cache = self.category_cache();
        if let Some(categories) = cache.lookup(merchant, now_ms()) {
            return Ok(categories);
        }

        match self.get_json::<Vec<Category>>(&self.endpoints.merchant_categories(merchant)).await {
            Ok(categories) => {
                cache.store(merchant, &categories, now_ms());
                Ok(categories)
            }
            Err(e) if e.is_not_found() => {
                cache.store_empty(merchant, now_ms());
                Ok(Vec::new())
            }
            Err(e) if e.is_network() => {
                log::warn!("Network error fetching categories for {}, using empty cache", merchant);
                cache.store_empty(merchant, now_ms());
                Ok(Vec::new())
            }
            Err(e) => Self::logged(&format!("fetching categories for merchant {}", merchant), Err(e)),
        }
    }

    /// Look up categories `group_size` merchants at a time.
    ///
    /// Lookups within a group run concurrently, groups run one after another
    /// and `on_group` sees each group's successful lookups as soon as it
    /// completes. A failing merchant is logged and left out.
    pub async fn lookup_categories_in_groups<F>(&self, merchants: &[String], group_size: usize, mut on_group: F)
    where
        F: FnMut(Vec<(String, Vec<Category>)>),
    {
        for group in merchants.chunks(group_size.max(1)) {
            let lookups = group.iter().map(|merchant| async move {
                (merchant.clone(), self.get_merchant_categories(merchant).await)
            });
            let resolved = join_all(lookups)
                .await
                .into_iter()
                .filter_map(|(merchant, result)| match result {
                    Ok(categories) => Some((merchant, categories)),
                    Err(e) => {
                        log::warn!("Skipping categories for {}: {}", merchant, e);
                        None
                    }
                })
                .collect();
            on_group(resolved);
        }
    }

    /// Prefetch categories for every merchant without a fresh cache entry.
    ///
    /// Returns the batch response; a failed batch caches every requested name as empty.
    pub async fn get_merchant_categories_batch(&self, merchants: &[String]) -> HashMap<String, Vec<Category>> {
        let cache = self.category_cache();
        let uncached = cache.uncached(merchants, now_ms());
        if uncached.is_empty() {
            return HashMap::new();
        }

        let result = self
            .post_json::<_, HashMap<String, Vec<Category>>>(&self.endpoints.merchant_categories_batch(), &uncached)
            .await;
        match result {
            Ok(batch) => {
                cache.store_batch_result(uncached, &batch, now_ms());
                batch
            }
            Err(e) => {
                log::error!("Error fetching merchant categories batch: {}", e);
                cache.store_failed_batch(uncached, now_ms());
                HashMap::new()
            }
        }
    }

    /// Cached categories regardless of age, else the batch result
    pub fn categories_from_cache_or_batch(&self, merchant: &str, batch: &HashMap<String, Vec<Category>>) -> Vec<Category> {
        self.category_cache().cached_or_batch(merchant, batch)
    }

    /// Keep the session cache in line with a merchant's new category
    pub fn remember_assignment(&self, merchant: &str, category: Option<&Category>) {
        self.category_cache().store_assignment(merchant, category, now_ms());
    }

    /// Remove a deleted category from the cached lists of `merchants`
    pub fn forget_category(&self, merchants: &[String], category_id: i64) {
        self.category_cache().remove_category(merchants, category_id, now_ms());
    }

    pub async fn add_merchant_category(&self, merchant: &str, category_id: i64) -> Result<(), ApiError> {
        let result = async {
            let response = Request::post(&self.endpoints.merchant_category(merchant, category_id))
                .send()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?;
            Self::check_status(response).await.map(|_| ())
        }
        .await;
        Self::logged(&format!("adding category to merchant {}", merchant), result)
    }

    pub async fn remove_merchant_category(&self, merchant: &str, category_id: i64) -> Result<(), ApiError> {
        let result = async {
            let response = Request::delete(&self.endpoints.merchant_category(merchant, category_id))
                .send()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?;
            Self::check_status(response).await.map(|_| ())
        }
        .await;
        Self::logged(&format!("removing category from merchant {}", merchant), result)
    }

    /// Upload a bank statement CSV as multipart field `file`
    pub async fn upload_statement(&self, file: &File) -> Result<ImportSummary, ApiError> {
        let result = async {
            let form = FormData::new().map_err(|e| ApiError::Request(format!("{:?}", e)))?;
            form.append_with_blob_and_filename("file", file, &file.name())
                .map_err(|e| ApiError::Request(format!("{:?}", e)))?;
            let response = Request::post(&self.endpoints.upload_statement())
                .body(form)
                .map_err(|e| ApiError::Request(e.to_string()))?
                .send()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?;
            Self::read_json(response).await
        }
        .await;
        Self::logged("uploading transactions", result)
    }

    /// Ask the backend to pull transactions from the bank API
    pub async fn import_from_api(&self, request: &ApiImportRequest) -> Result<ImportSummary, ApiError> {
        Self::logged(
            "importing transactions from bank API",
            self.post_json(&self.endpoints.import_from_api(), request).await,
        )
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let not_found = ApiError::Status { status: 404, body: "missing".to_string() };
        assert!(not_found.is_not_found());
        assert!(!not_found.is_network());
        assert_eq!(not_found.to_string(), "server returned 404: missing");

        let network = ApiError::Network("connection refused".to_string());
        assert!(network.is_network());
        assert!(!ApiError::Status { status: 500, body: String::new() }.is_not_found());
    }

    #[test]
    fn test_client_uses_configured_base() {
        let config = DashboardConfig::with_api_base(Some("http://localhost:5000/api"));
        let client = ApiClient::from_config(&config);
        assert_eq!(
            client.endpoints().recurring(),
            "http://localhost:5000/api/transactions/recurring"
        );
        assert_eq!(client.config().raw_page_size, 1000);
    }
}
