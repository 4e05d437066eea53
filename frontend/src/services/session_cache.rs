use gloo::storage::{SessionStorage, Storage};
use shared::CacheStore;

/// `sessionStorage` backed store for the merchant category cache.
///
/// Values are stored raw (not JSON-wrapped by gloo) so entries stay readable
/// as plain `merchant_category_<name>` strings.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SessionStore;

impl CacheStore for SessionStore {
    fn get_item(&self, key: &str) -> Option<String> {
        SessionStorage::raw().get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) {
        if let Err(e) = SessionStorage::raw().set_item(key, value) {
            log::warn!("Failed to write session storage key {}: {:?}", key, e);
        }
    }
}

#[cfg(test)]
mod wasm_tests {
    use super::*;
    use shared::cache::{cache_key, timestamp_key};
    use shared::{Category, MerchantCategoryCache};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_session_store_round_trip() {
        SessionStore.set_item("finance_dashboard_test", "value");
        assert_eq!(SessionStore.get_item("finance_dashboard_test").as_deref(), Some("value"));
        assert_eq!(SessionStore.get_item("finance_dashboard_missing"), None);
    }

    #[wasm_bindgen_test]
    fn test_cache_writes_sibling_timestamp() {
        let cache = MerchantCategoryCache::new(SessionStore);
        let category = Category {
            id: 1,
            name: "Dining".to_string(),
            color: "#7D6B91".to_string(),
            icon: "📊".to_string(),
            merchant_count: None,
        };
        cache.store("Session Cafe", &[category], 42_000.0);
        assert!(SessionStore.get_item(&cache_key("Session Cafe")).is_some());
        assert_eq!(SessionStore.get_item(&timestamp_key("Session Cafe")).as_deref(), Some("42000"));
        assert_eq!(cache.lookup("Session Cafe", 43_000.0).map(|c| c.len()), Some(1));
    }
}
