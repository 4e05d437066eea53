//! Time-limited memo of merchant → category lookups.
//!
//! Entries live in a string key/value store (session storage in the browser) as
//! `merchant_category_<name>` holding the JSON category list, plus a sibling
//! `merchant_category_<name>_timestamp` holding the write time in epoch millis.
//! An entry is valid while `now - timestamp < ttl`. Writers do not coordinate;
//! the last write wins.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::models::Category;

pub const KEY_PREFIX: &str = "merchant_category_";
pub const DEFAULT_TTL_MS: f64 = 300_000.0;

/// String key/value storage backing the cache
pub trait CacheStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str);
}

/// In-process store, used natively and in tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl CacheStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
    }
}

pub fn cache_key(merchant: &str) -> String {
    format!("{}{}", KEY_PREFIX, merchant)
}

pub fn timestamp_key(merchant: &str) -> String {
    format!("{}_timestamp", cache_key(merchant))
}

pub struct MerchantCategoryCache<S: CacheStore> {
    store: S,
    ttl_ms: f64,
}

impl<S: CacheStore> MerchantCategoryCache<S> {
    pub fn new(store: S) -> Self {
        Self::with_ttl(store, DEFAULT_TTL_MS)
    }

    pub fn with_ttl(store: S, ttl_ms: f64) -> Self {
        Self { store, ttl_ms }
    }

    pub fn store_ref(&self) -> &S {
        &self.store
    }

    fn read(&self, merchant: &str) -> Option<Vec<Category>> {
        let raw = self.store.get_item(&cache_key(merchant))?;
        match serde_json::from_str(&raw) {
            Ok(categories) => Some(categories),
            Err(e) => {
                log::warn!("discarding unreadable cache entry for {}: {}", merchant, e);
                None
            }
        }
    }

    fn is_fresh(&self, merchant: &str, now_ms: f64) -> bool {
        self.store
            .get_item(&timestamp_key(merchant))
            .and_then(|ts| ts.parse::<f64>().ok())
            .is_some_and(|written| now_ms - written < self.ttl_ms)
    }

    /// Cached categories if the entry is still within its TTL
    pub fn lookup(&self, merchant: &str, now_ms: f64) -> Option<Vec<Category>> {
        if !self.is_fresh(merchant, now_ms) {
            return None;
        }
        let hit = self.read(merchant);
        if hit.is_some() {
            log::debug!("merchant category cache hit for {}", merchant);
        }
        hit
    }

    pub fn store(&self, merchant: &str, categories: &[Category], now_ms: f64) {
        match serde_json::to_string(categories) {
            Ok(json) => {
                self.store.set_item(&cache_key(merchant), &json);
                self.store.set_item(&timestamp_key(merchant), &(now_ms as i64).to_string());
            }
            Err(e) => log::error!("failed to serialize categories for {}: {}", merchant, e),
        }
    }

    /// Remember that a merchant has no categories (404, network failure, failed batch)
    pub fn store_empty(&self, merchant: &str, now_ms: f64) {
        self.store(merchant, &[], now_ms);
    }

    /// Names without a valid entry, in input order
    pub fn uncached<'a>(&self, merchants: &'a [String], now_ms: f64) -> Vec<&'a String> {
        merchants
            .iter()
            .filter(|name| !(self.is_fresh(name, now_ms) && self.store.get_item(&cache_key(name)).is_some()))
            .collect()
    }

    /// Cache a batch response; requested names missing from it are cached as empty
    pub fn store_batch_result<'a>(
        &self,
        requested: impl IntoIterator<Item = &'a String>,
        result: &HashMap<String, Vec<Category>>,
        now_ms: f64,
    ) {
        for (merchant, categories) in result {
            self.store(merchant, categories, now_ms);
        }
        for merchant in requested {
            if !result.contains_key(merchant) {
                self.store_empty(merchant, now_ms);
            }
        }
    }

    /// A failed batch is cached as empty for every requested merchant
    pub fn store_failed_batch<'a>(&self, requested: impl IntoIterator<Item = &'a String>, now_ms: f64) {
        for merchant in requested {
            self.store_empty(merchant, now_ms);
        }
    }

    /// Record a merchant's category after the backend accepted a change; `None` means uncategorized
    pub fn store_assignment(&self, merchant: &str, category: Option<&Category>, now_ms: f64) {
        match category {
            Some(category) => self.store(merchant, std::slice::from_ref(category), now_ms),
            None => self.store_empty(merchant, now_ms),
        }
    }

    /// Drop a deleted category from the entries of `merchants` that hold it
    pub fn remove_category<'a>(&self, merchants: impl IntoIterator<Item = &'a String>, category_id: i64, now_ms: f64) {
        for merchant in merchants {
            let Some(mut categories) = self.read(merchant) else {
                continue;
            };
            let before = categories.len();
            categories.retain(|c| c.id != category_id);
            if categories.len() != before {
                self.store(merchant, &categories, now_ms);
            }
        }
    }

    /// Whatever the cache holds regardless of age, else the batch result, else empty
    pub fn cached_or_batch(&self, merchant: &str, batch: &HashMap<String, Vec<Category>>) -> Vec<Category> {
        self.read(merchant)
            .or_else(|| batch.get(merchant).cloned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i64, name: &str) -> Category {
        Category {
            id,
            name: name.to_string(),
            color: "#7D6B91".to_string(),
            icon: "📊".to_string(),
            merchant_count: None,
        }
    }

    #[test]
    fn test_store_and_lookup_within_ttl() {
        let cache = MerchantCategoryCache::new(MemoryStore::new());
        cache.store("Coffee Co", &[category(1, "Dining")], 1_000.0);

        assert_eq!(
            cache.store_ref().get_item("merchant_category_Coffee Co_timestamp").as_deref(),
            Some("1000")
        );
        let hit = cache.lookup("Coffee Co", 1_000.0 + 299_999.0).unwrap();
        assert_eq!(hit[0].name, "Dining");
        assert!(cache.lookup("Coffee Co", 1_000.0 + 300_000.0).is_none());
        assert!(cache.lookup("Unknown", 1_000.0).is_none());
    }

    #[test]
    fn test_missing_timestamp_is_stale() {
        let store = MemoryStore::new();
        store.set_item(&cache_key("Cafe"), "[]");
        let cache = MerchantCategoryCache::new(store);
        assert!(cache.lookup("Cafe", 0.0).is_none());
        assert_eq!(cache.cached_or_batch("Cafe", &HashMap::new()), Vec::<Category>::new());
    }

    #[test]
    fn test_uncached_and_batch_results() {
        let cache = MerchantCategoryCache::new(MemoryStore::new());
        cache.store("Cafe", &[category(1, "Dining")], 0.0);
        let names: Vec<String> = vec!["Cafe".into(), "Garage".into(), "Bakery".into()];

        let missing = cache.uncached(&names, 10.0);
        assert_eq!(missing, vec![&names[1], &names[2]]);

        let mut batch = HashMap::new();
        batch.insert("Garage".to_string(), vec![category(3, "Car")]);
        cache.store_batch_result(missing, &batch, 20.0);

        assert_eq!(cache.lookup("Garage", 30.0).unwrap()[0].id, 3);
        assert!(cache.lookup("Bakery", 30.0).unwrap().is_empty());
        assert!(cache.uncached(&names, 30.0).is_empty());
        // everything expires together
        assert_eq!(cache.uncached(&names, 400_000.0).len(), 3);
    }

    #[test]
    fn test_failed_batch_caches_empty() {
        let cache = MerchantCategoryCache::new(MemoryStore::new());
        let names: Vec<String> = vec!["A".into(), "B".into()];
        cache.store_failed_batch(&names, 5.0);
        assert_eq!(cache.store_ref().len(), 4);
        assert!(cache.lookup("A", 6.0).unwrap().is_empty());
    }

    #[test]
    fn test_cached_or_batch_ignores_age() {
        let cache = MerchantCategoryCache::with_ttl(MemoryStore::new(), 10.0);
        cache.store("Cafe", &[category(1, "Dining")], 0.0);
        let mut batch = HashMap::new();
        batch.insert("Cafe".to_string(), vec![category(2, "Other")]);
        batch.insert("Garage".to_string(), vec![category(3, "Car")]);

        assert!(cache.lookup("Cafe", 1_000.0).is_none());
        assert_eq!(cache.cached_or_batch("Cafe", &batch)[0].id, 1);
        assert_eq!(cache.cached_or_batch("Garage", &batch)[0].id, 3);
        assert!(cache.cached_or_batch("Nobody", &batch).is_empty());
    }

    #[test]
    fn test_assignment_replaces_cached_categories() {
        let cache = MerchantCategoryCache::new(MemoryStore::new());
        cache.store("Cafe", &[category(1, "Dining")], 0.0);

        cache.store_assignment("Cafe", Some(&category(2, "Coffee")), 1_000.0);
        assert_eq!(cache.lookup("Cafe", 60_000.0).unwrap()[0].id, 2);
        assert_eq!(cache.cached_or_batch("Cafe", &HashMap::new())[0].id, 2);

        cache.store_assignment("Cafe", None, 2_000.0);
        assert!(cache.lookup("Cafe", 60_000.0).unwrap().is_empty());
    }

    #[test]
    fn test_deleted_category_leaves_cached_entries() {
        let cache = MerchantCategoryCache::new(MemoryStore::new());
        cache.store("Cafe", &[category(1, "Dining"), category(2, "Coffee")], 0.0);
        cache.store("Garage", &[category(3, "Car")], 0.0);
        let names: Vec<String> = vec!["Cafe".into(), "Garage".into(), "Unseen".into()];

        cache.remove_category(&names, 1, 10.0);

        let cafe = cache.lookup("Cafe", 20.0).unwrap();
        assert_eq!(cafe.iter().map(|c| c.id).collect::<Vec<_>>(), vec![2]);
        assert_eq!(cache.lookup("Garage", 20.0).unwrap()[0].id, 3);
        // untouched entries keep their original write time
        assert_eq!(cache.store_ref().get_item(&timestamp_key("Garage")).as_deref(), Some("0"));
        assert!(cache.store_ref().get_item(&cache_key("Unseen")).is_none());
    }

    #[test]
    fn test_last_writer_wins() {
        let cache = MerchantCategoryCache::new(MemoryStore::new());
        cache.store("Cafe", &[category(1, "Dining")], 0.0);
        cache.store("Cafe", &[category(2, "Coffee")], 1.0);
        assert_eq!(cache.lookup("Cafe", 2.0).unwrap()[0].id, 2);
    }
}
