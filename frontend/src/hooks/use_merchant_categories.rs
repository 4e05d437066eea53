use std::rc::Rc;

use shared::merchants::{
    filter_merchants, find_category, primary_category, sort_by_total_spent, AssignmentStep, CategoryFilter, MerchantAssignments,
    PageState,
};
use shared::{Category, MerchantSummary, NewCategory};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::logging::Logger;

const COMPONENT: &str = "category-manager";
pub const MERCHANTS_ERROR: &str = "Failed to load merchants";
pub const CATEGORIES_ERROR: &str = "Failed to load categories";

pub enum AssignmentAction {
    /// Results of one lookup group
    Merge(Vec<(String, Vec<Category>)>),
    Assign(String, i64),
    Unassign(String),
    RemoveCategory(i64),
}

#[derive(Clone, Default, PartialEq)]
pub struct AssignmentsState(pub MerchantAssignments);

impl Reducible for AssignmentsState {
    type Action = AssignmentAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut assignments = self.0.clone();
        match action {
            AssignmentAction::Merge(lookups) => {
                for (merchant, categories) in lookups {
                    match primary_category(&categories) {
                        Some(id) => assignments.assign(&merchant, id),
                        None => assignments.unassign(&merchant),
                    }
                }
            }
            AssignmentAction::Assign(merchant, id) => assignments.assign(&merchant, id),
            AssignmentAction::Unassign(merchant) => assignments.unassign(&merchant),
            AssignmentAction::RemoveCategory(id) => assignments.remove_category(id),
        }
        Rc::new(AssignmentsState(assignments))
    }
}

pub enum CategoryListAction {
    Loaded(Vec<Category>),
    Added(Category),
    Removed(i64),
}

#[derive(Clone, Default, PartialEq)]
pub struct CategoryList(pub Vec<Category>);

impl Reducible for CategoryList {
    type Action = CategoryListAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut categories = self.0.clone();
        match action {
            CategoryListAction::Loaded(loaded) => categories = loaded,
            CategoryListAction::Added(category) => categories.push(category),
            CategoryListAction::Removed(id) => categories.retain(|c| c.id != id),
        }
        Rc::new(CategoryList(categories))
    }
}

#[derive(Clone)]
pub struct MerchantCategoriesState {
    /// Largest spenders first
    pub merchants: Vec<MerchantSummary>,
    pub merchants_loading: bool,
    pub merchants_error: Option<String>,
    pub categories: Vec<Category>,
    pub categories_error: Option<String>,
    pub assignments: MerchantAssignments,
    pub search: String,
    pub filter: CategoryFilter,
    pub page: PageState,
    /// Merchants matching search and filter, before paging
    pub filtered: Vec<MerchantSummary>,
    pub new_category: NewCategory,
    pub action_error: Option<String>,
}

impl MerchantCategoriesState {
    pub fn page_rows(&self) -> &[MerchantSummary] {
        self.page.slice(&self.filtered)
    }
}

pub struct UseMerchantCategoriesResult {
    pub state: MerchantCategoriesState,
    pub actions: UseMerchantCategoriesActions,
}

#[derive(Clone)]
pub struct UseMerchantCategoriesActions {
    pub set_search: Callback<String>,
    pub set_filter: Callback<CategoryFilter>,
    pub go_to_page: Callback<usize>,
    /// Move a merchant to a category, or to none
    pub assign: Callback<(String, Option<i64>)>,
    pub set_new_category: Callback<NewCategory>,
    pub create_category: Callback<()>,
    pub delete_category: Callback<i64>,
}

#[hook]
pub fn use_merchant_categories(api_client: &ApiClient) -> UseMerchantCategoriesResult {
    let per_page = api_client.config().merchants_per_page;
    let group_size = api_client.config().manager_lookup_group_size;

    let merchants = use_state(Vec::<MerchantSummary>::new);
    let merchants_loading = use_state(|| true);
    let merchants_error = use_state(|| Option::<String>::None);
    let categories = use_reducer(CategoryList::default);
    let categories_error = use_state(|| Option::<String>::None);
    let assignments = use_reducer(AssignmentsState::default);
    let search = use_state(String::new);
    let filter = use_state(CategoryFilter::default);
    let page = use_state(|| 1usize);
    let new_category = use_state(NewCategory::default);
    let action_error = use_state(|| Option::<String>::None);

    // Merchants and categories load independently, one failing does not hide the other
    {
        let api_client = api_client.clone();
        let categories = categories.clone();
        let categories_error = categories_error.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match api_client.get_categories().await {
                    Ok(data) => categories.dispatch(CategoryListAction::Loaded(data)),
                    Err(_) => categories_error.set(Some(CATEGORIES_ERROR.to_string())),
                }
            });
            || ()
        });
    }

    {
        let api_client = api_client.clone();
        let merchants = merchants.clone();
        let merchants_loading = merchants_loading.clone();
        let merchants_error = merchants_error.clone();
        let assignments = assignments.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                let mut loaded = match api_client.get_all_merchants().await {
                    Ok(data) => data,
                    Err(_) => {
                        merchants_error.set(Some(MERCHANTS_ERROR.to_string()));
                        merchants_loading.set(false);
                        return;
                    }
                };
                sort_by_total_spent(&mut loaded);
                let names: Vec<String> = loaded.iter().map(|m| m.merchant_name.clone()).collect();
                Logger::info_with_component(COMPONENT, &format!("🏪 Loaded {} merchants", names.len()));
                merchants.set(loaded);
                merchants_loading.set(false);

                // One batch request fills the table early and warms the cache for the grouped lookups
                let batch = api_client.get_merchant_categories_batch(&names).await;
                let seeded = names
                    .iter()
                    .map(|name| (name.clone(), api_client.categories_from_cache_or_batch(name, &batch)))
                    .collect();
                assignments.dispatch(AssignmentAction::Merge(seeded));
                api_client
                    .lookup_categories_in_groups(&names, group_size, |group| {
                        assignments.dispatch(AssignmentAction::Merge(group));
                    })
                    .await;
            });
            || ()
        });
    }

    let filtered: Vec<MerchantSummary> = filter_merchants(&merchants, &search, *filter, &assignments.0)
        .into_iter()
        .cloned()
        .collect();
    let page_state = PageState::new(*page, per_page, filtered.len());

    let set_search = {
        let search = search.clone();
        let page = page.clone();
        Callback::from(move |value: String| {
            search.set(value);
            page.set(1);
        })
    };

    let set_filter = {
        let filter = filter.clone();
        let page = page.clone();
        Callback::from(move |value: CategoryFilter| {
            filter.set(value);
            page.set(1);
        })
    };

    let go_to_page = {
        let page = page.clone();
        Callback::from(move |target: usize| page.set(page_state.go_to(target).current))
    };

    let assign = {
        let api_client = api_client.clone();
        let assignments = assignments.clone();
        let categories = categories.clone();
        let action_error = action_error.clone();
        Callback::from(move |(merchant, target): (String, Option<i64>)| {
            let steps = assignments.0.plan(&merchant, target);
            if steps.is_empty() {
                return;
            }
            let category = target.and_then(|id| find_category(&categories.0, id).cloned());
            if target.is_some() && category.is_none() {
                action_error.set(Some(format!("Unknown category for {}", merchant)));
                return;
            }
            let api_client = api_client.clone();
            let assignments = assignments.clone();
            let action_error = action_error.clone();
            spawn_local(async move {
                for step in steps {
                    let result = match step {
                        AssignmentStep::Remove(id) => api_client.remove_merchant_category(&merchant, id).await,
                        AssignmentStep::Add(id) => api_client.add_merchant_category(&merchant, id).await,
                    };
                    if result.is_err() {
                        action_error.set(Some(format!("Failed to update category for {}", merchant)));
                        return;
                    }
                }
                // Later lookups, and the transactions table, read the cache
                api_client.remember_assignment(&merchant, category.as_ref());
                action_error.set(None);
                match target {
                    Some(id) => assignments.dispatch(AssignmentAction::Assign(merchant, id)),
                    None => assignments.dispatch(AssignmentAction::Unassign(merchant)),
                }
            });
        })
    };

    let set_new_category = {
        let new_category = new_category.clone();
        Callback::from(move |value: NewCategory| new_category.set(value))
    };

    let create_category = {
        let api_client = api_client.clone();
        let categories = categories.clone();
        let new_category = new_category.clone();
        let action_error = action_error.clone();
        Callback::from(move |_: ()| {
            let draft = (*new_category).clone();
            if !draft.is_valid() {
                action_error.set(Some("Category name is required".to_string()));
                return;
            }
            let api_client = api_client.clone();
            let categories = categories.clone();
            let new_category = new_category.clone();
            let action_error = action_error.clone();
            spawn_local(async move {
                match api_client.create_category(&draft).await {
                    Ok(created) => {
                        Logger::info_with_component(COMPONENT, &format!("➕ Created category {}", created.name));
                        categories.dispatch(CategoryListAction::Added(created));
                        new_category.set(NewCategory::default());
                        action_error.set(None);
                    }
                    Err(_) => action_error.set(Some("Failed to create category".to_string())),
                }
            });
        })
    };

    let delete_category = {
        let api_client = api_client.clone();
        let categories = categories.clone();
        let assignments = assignments.clone();
        let merchants = merchants.clone();
        let action_error = action_error.clone();
        Callback::from(move |category_id: i64| {
            let names: Vec<String> = merchants.iter().map(|m| m.merchant_name.clone()).collect();
            let api_client = api_client.clone();
            let categories = categories.clone();
            let assignments = assignments.clone();
            let action_error = action_error.clone();
            spawn_local(async move {
                match api_client.delete_category(category_id).await {
                    Ok(()) => {
                        api_client.forget_category(&names, category_id);
                        categories.dispatch(CategoryListAction::Removed(category_id));
                        assignments.dispatch(AssignmentAction::RemoveCategory(category_id));
                        action_error.set(None);
                    }
                    Err(_) => action_error.set(Some("Failed to delete category".to_string())),
                }
            });
        })
    };

    let state = MerchantCategoriesState {
        merchants: (*merchants).clone(),
        merchants_loading: *merchants_loading,
        merchants_error: (*merchants_error).clone(),
        categories: categories.0.clone(),
        categories_error: (*categories_error).clone(),
        assignments: assignments.0.clone(),
        search: (*search).clone(),
        filter: *filter,
        page: page_state,
        filtered,
        new_category: (*new_category).clone(),
        action_error: (*action_error).clone(),
    };

    let actions = UseMerchantCategoriesActions {
        set_search,
        set_filter,
        go_to_page,
        assign,
        set_new_category,
        create_category,
        delete_category,
    };

    UseMerchantCategoriesResult { state, actions }
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
    fn test_merge_uses_first_category_and_clears_empty_lookups() {
        let state = Rc::new(AssignmentsState::default())
            .reduce(AssignmentAction::Assign("Gym".to_string(), 9))
            .reduce(AssignmentAction::Merge(vec![
                ("Cafe".to_string(), vec![category(2, "Dining"), category(3, "Coffee")]),
                ("Gym".to_string(), Vec::new()),
            ]));
        assert_eq!(state.0.get("Cafe"), Some(2));
        assert_eq!(state.0.get("Gym"), None);
    }

    #[test]
    fn test_deleting_category_clears_merchants() {
        let state = Rc::new(AssignmentsState::default())
            .reduce(AssignmentAction::Assign("Cafe".to_string(), 2))
            .reduce(AssignmentAction::Assign("Bakery".to_string(), 2))
            .reduce(AssignmentAction::Assign("Gym".to_string(), 5))
            .reduce(AssignmentAction::RemoveCategory(2));
        assert_eq!(state.0.count_for(2), 0);
        assert_eq!(state.0.get("Gym"), Some(5));
    }

    #[test]
    fn test_category_list_patches() {
        let list = Rc::new(CategoryList::default())
            .reduce(CategoryListAction::Loaded(vec![category(1, "Bills"), category(2, "Dining")]))
            .reduce(CategoryListAction::Added(category(3, "Travel")))
            .reduce(CategoryListAction::Removed(1));
        let ids: Vec<i64> = list.0.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }
}
