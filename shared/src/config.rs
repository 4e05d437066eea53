use crate::cache::DEFAULT_TTL_MS;
use crate::endpoints::Endpoints;

pub const DEFAULT_API_BASE: &str = "/api";

/// Tunables of the dashboard. Only the API base can be changed, at build time.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub api_base_url: String,
    pub cache_ttl_ms: f64,
    pub raw_page_size: u32,
    pub monthly_spending_months: u32,
    pub raw_lookup_group_size: usize,
    pub manager_lookup_group_size: usize,
    pub merchants_per_page: usize,
    pub merchant_chart_top: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE.to_string(),
            cache_ttl_ms: DEFAULT_TTL_MS,
            raw_page_size: 1000,
            monthly_spending_months: 6,
            raw_lookup_group_size: 10,
            manager_lookup_group_size: 25,
            merchants_per_page: 50,
            merchant_chart_top: 10,
        }
    }
}

impl DashboardConfig {
    /// Defaults, with the API base taken from `FINANCE_API_BASE_URL` when set at compile time
    pub fn from_build_env() -> Self {
        Self::with_api_base(option_env!("FINANCE_API_BASE_URL"))
    }

    pub fn with_api_base(base: Option<&str>) -> Self {
        let mut config = Self::default();
        if let Some(base) = base.map(str::trim).filter(|b| !b.is_empty()) {
            config.api_base_url = base.to_string();
        }
        config
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints::new(self.api_base_url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.api_base_url, "/api");
        assert_eq!(config.cache_ttl_ms, 300_000.0);
        assert_eq!(config.raw_page_size, 1000);
        assert_eq!(config.raw_lookup_group_size, 10);
        assert_eq!(config.manager_lookup_group_size, 25);
    }

    #[test]
    fn test_api_base_override() {
        assert_eq!(DashboardConfig::with_api_base(Some(" http://localhost:5000/api ")).api_base_url, "http://localhost:5000/api");
        assert_eq!(DashboardConfig::with_api_base(Some("")).api_base_url, "/api");
        assert_eq!(DashboardConfig::with_api_base(None).endpoints().recent(), "/api/transactions/recent");
    }
}
