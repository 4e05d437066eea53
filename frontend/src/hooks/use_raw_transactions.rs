use std::collections::HashMap;

use shared::merchants::primary_category;
use shared::raw_table::{self, export_csv, export_filename, RawFilters, SortConfig, SortKey};
use shared::{Category, Pagination, RawTransaction};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::use_resource::RequestGeneration;
use crate::services::api::ApiClient;
use crate::services::date_utils;
use crate::services::download::download_text;
use crate::services::logging::Logger;

const COMPONENT: &str = "raw-transactions";
pub const LOAD_ERROR: &str = "Failed to load transactions";

#[derive(Clone)]
pub struct RawTransactionsState {
    /// Rows of the current page as returned by the backend
    pub transactions: Vec<RawTransaction>,
    /// Filtered and sorted rows shown in the table
    pub visible: Vec<RawTransaction>,
    pub pagination: Pagination,
    pub loading: bool,
    pub error: Option<String>,
    pub filters: RawFilters,
    pub sort: SortConfig,
    pub show_filters: bool,
    pub categories: Vec<Category>,
    /// Primary category id per merchant name
    pub merchant_categories: HashMap<String, i64>,
    pub export_error: Option<String>,
}

impl RawTransactionsState {
    pub fn category_for(&self, merchant: Option<&str>) -> Option<&Category> {
        let id = self.merchant_categories.get(merchant?)?;
        self.categories.iter().find(|c| c.id == *id)
    }
}

pub struct UseRawTransactionsResult {
    pub state: RawTransactionsState,
    pub actions: UseRawTransactionsActions,
}

#[derive(Clone)]
pub struct UseRawTransactionsActions {
    pub next_page: Callback<()>,
    pub previous_page: Callback<()>,
    pub set_filters: Callback<RawFilters>,
    pub clear_filters: Callback<()>,
    pub toggle_filters: Callback<()>,
    pub sort_by: Callback<SortKey>,
    pub export: Callback<()>,
    pub reload: Callback<()>,
}

#[hook]
pub fn use_raw_transactions(api_client: &ApiClient) -> UseRawTransactionsResult {
    let page_size = api_client.config().raw_page_size;
    let group_size = api_client.config().raw_lookup_group_size;

    let offset = use_state(|| 0u32);
    let reload_count = use_state(|| 0u32);
    let transactions = use_state(Vec::<RawTransaction>::new);
    let pagination = use_state(|| Pagination::first_page(page_size));
    let loading = use_state(|| true);
    let error = use_state(|| Option::<String>::None);
    let filters = use_state(RawFilters::default);
    let sort = use_state(SortConfig::default);
    let show_filters = use_state(|| false);
    let categories = use_state(Vec::<Category>::new);
    let merchant_categories = use_state(HashMap::<String, i64>::new);
    let export_error = use_state(|| Option::<String>::None);
    let generation = use_memo((), |_| RequestGeneration::default());

    {
        let api_client = api_client.clone();
        let categories = categories.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                if let Ok(data) = api_client.get_categories().await {
                    categories.set(data);
                }
            });
            || ()
        });
    }

    // Load the page, then resolve merchant categories group by group
    {
        let api_client = api_client.clone();
        let transactions = transactions.clone();
        let pagination = pagination.clone();
        let loading = loading.clone();
        let error = error.clone();
        let merchant_categories = merchant_categories.clone();
        use_effect_with((*offset, *reload_count), move |(offset, _)| {
            let offset = *offset;
            let ticket = generation.begin();
            loading.set(true);
            error.set(None);
            spawn_local(async move {
                let result = api_client.get_raw_transactions(page_size, offset).await;
                // Paging on or reloading makes this page's answer and lookups obsolete
                if !generation.is_current(ticket) {
                    return;
                }
                match result {
                    Ok(page) => {
                        Logger::info_with_component(
                            COMPONENT,
                            &format!("📋 Loaded {} of {} transactions", page.transactions.len(), page.pagination.total),
                        );
                        let merchants = raw_table::unique_merchants(&page.transactions);
                        pagination.set(page.pagination);
                        transactions.set(page.transactions);
                        loading.set(false);

                        let mut resolved = HashMap::new();
                        api_client
                            .lookup_categories_in_groups(&merchants, group_size, |group| {
                                if !generation.is_current(ticket) {
                                    return;
                                }
                                for (merchant, categories) in group {
                                    if let Some(id) = primary_category(&categories) {
                                        resolved.insert(merchant, id);
                                    }
                                }
                                merchant_categories.set(resolved.clone());
                            })
                            .await;
                    }
                    Err(_) => {
                        error.set(Some(LOAD_ERROR.to_string()));
                        loading.set(false);
                    }
                }
            });
            || ()
        });
    }

    let visible = raw_table::apply(&transactions, &filters, *sort, &merchant_categories);

    let next_page = {
        let offset = offset.clone();
        let pagination = *pagination;
        Callback::from(move |_: ()| {
            if pagination.has_next() {
                offset.set(pagination.next_page().offset);
            }
        })
    };

    let previous_page = {
        let offset = offset.clone();
        let pagination = *pagination;
        Callback::from(move |_: ()| {
            if pagination.has_previous() {
                offset.set(pagination.previous_page().offset);
            }
        })
    };

    let set_filters = {
        let filters = filters.clone();
        Callback::from(move |next: RawFilters| filters.set(next))
    };

    let clear_filters = {
        let filters = filters.clone();
        Callback::from(move |_: ()| filters.set(RawFilters::default()))
    };

    let toggle_filters = {
        let show_filters = show_filters.clone();
        Callback::from(move |_: ()| show_filters.set(!*show_filters))
    };

    let sort_by = {
        let sort = sort.clone();
        Callback::from(move |key: SortKey| sort.set(sort.toggle(key)))
    };

    let export = {
        let rows = visible.clone();
        let export_error = export_error.clone();
        Callback::from(move |_: ()| {
            let result = export_csv(&rows)
                .map_err(anyhow::Error::from)
                .and_then(|csv| download_text(&export_filename(date_utils::today()), &csv, "text/csv;charset=utf-8;"));
            match result {
                Ok(()) => {
                    Logger::info_with_component(COMPONENT, &format!("📤 Exported {} transactions", rows.len()));
                    export_error.set(None);
                }
                Err(e) => {
                    Logger::error_with_component(COMPONENT, &format!("Export failed: {}", e));
                    export_error.set(Some("Failed to export transactions".to_string()));
                }
            }
        })
    };

    let reload = {
        let offset = offset.clone();
        let reload_count = reload_count.clone();
        Callback::from(move |_: ()| {
            offset.set(0);
            reload_count.set(reload_count.wrapping_add(1));
        })
    };

    let state = RawTransactionsState {
        transactions: (*transactions).clone(),
        visible,
        pagination: *pagination,
        loading: *loading,
        error: (*error).clone(),
        filters: (*filters).clone(),
        sort: *sort,
        show_filters: *show_filters,
        categories: (*categories).clone(),
        merchant_categories: (*merchant_categories).clone(),
        export_error: (*export_error).clone(),
    };

    let actions = UseRawTransactionsActions {
        next_page,
        previous_page,
        set_filters,
        clear_filters,
        toggle_filters,
        sort_by,
        export,
        reload,
    };

    UseRawTransactionsResult { state, actions }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_for_uses_primary_assignment() {
        let state = RawTransactionsState {
            transactions: Vec::new(),
            visible: Vec::new(),
            pagination: Pagination::first_page(1000),
            loading: false,
            error: None,
            filters: RawFilters::default(),
            sort: SortConfig::default(),
            show_filters: false,
            categories: vec![Category {
                id: 4,
                name: "Groceries".to_string(),
                color: "#38A169".to_string(),
                icon: "🛒".to_string(),
                merchant_count: None,
            }],
            merchant_categories: HashMap::from([("Woolworths".to_string(), 4), ("Ghost".to_string(), 99)]),
            export_error: None,
        };
        assert_eq!(state.category_for(Some("Woolworths")).map(|c| c.id), Some(4));
        assert!(state.category_for(Some("Ghost")).is_none());
        assert!(state.category_for(None).is_none());
    }
}
