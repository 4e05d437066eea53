use shared::formatters::{format_currency_abs, format_percentage, format_short_date};
use shared::merchants::CategoryFilter;
use shared::{Category, MerchantSummary, NewCategory};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::hooks::use_merchant_categories::{use_merchant_categories, MerchantCategoriesState, UseMerchantCategoriesActions};
use crate::services::api::ApiClient;

#[derive(Properties, PartialEq)]
pub struct MerchantCategoryManagerProps {
    pub api_client: ApiClient,
}

/// Share of all merchant spending, in percent
fn spend_share(merchant: &MerchantSummary, merchants: &[MerchantSummary]) -> f64 {
    let total: f64 = merchants.iter().map(|m| m.total_spent.abs()).sum();
    if total <= 0.0 {
        return 0.0;
    }
    merchant.total_spent.abs() / total * 100.0
}

#[function_component(MerchantCategoryManager)]
pub fn merchant_category_manager(props: &MerchantCategoryManagerProps) -> Html {
    let manager = use_merchant_categories(&props.api_client);
    let state = &manager.state;
    let actions = &manager.actions;

    html! {
        <div class="category-manager">
            <h2>{"Merchant Categories"}</h2>

            {match &state.action_error {
                Some(message) => html! { <div class="error-message">{message}</div> },
                None => html! {},
            }}

            <div class="category-manager-layout">
                {render_category_panel(state, actions)}
                {render_merchant_panel(state, actions)}
            </div>
        </div>
    }
}

fn render_category_panel(state: &MerchantCategoriesState, actions: &UseMerchantCategoriesActions) -> Html {
    let draft_field = |apply: fn(&mut NewCategory, String)| {
        let draft = state.new_category.clone();
        let set_new_category = actions.set_new_category.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = draft.clone();
            apply(&mut next, input.value());
            set_new_category.emit(next);
        })
    };

    let on_submit = {
        let create_category = actions.create_category.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            create_category.emit(());
        })
    };

    html! {
        <section class="category-panel">
            <h3>{"Categories"}</h3>
            <form class="category-form" onsubmit={on_submit}>
                <input
                    type="text"
                    placeholder="Category name"
                    value={state.new_category.name.clone()}
                    oninput={draft_field(|c, v| c.name = v)}
                />
                <input
                    type="color"
                    title="Colour"
                    value={state.new_category.color.clone()}
                    oninput={draft_field(|c, v| c.color = v)}
                />
                <input
                    type="text"
                    class="icon-input"
                    title="Icon"
                    maxlength="2"
                    value={state.new_category.icon.clone()}
                    oninput={draft_field(|c, v| c.icon = v)}
                />
                <button type="submit" disabled={!state.new_category.is_valid()}>{"Add Category"}</button>
            </form>

            {match &state.categories_error {
                Some(message) => html! { <div class="error-message">{message}</div> },
                None if state.categories.is_empty() => html! { <p class="no-data">{"No categories yet"}</p> },
                None => html! {
                    <ul class="category-list">
                        {for state.categories.iter().map(|category| render_category(category, state, actions))}
                    </ul>
                },
            }}
        </section>
    }
}

fn render_category(category: &Category, state: &MerchantCategoriesState, actions: &UseMerchantCategoriesActions) -> Html {
    let id = category.id;
    let on_delete = actions.delete_category.reform(move |_: MouseEvent| id);
    let count = state.assignments.count_for(id);

    html! {
        <li class="category-item" key={id}>
            <span class="category-swatch" style={format!("background-color: {}", category.color)} />
            <span class="category-name">{category.display_name()}</span>
            <span class="merchant-count">
                {format!("{} merchant{}", count, if count == 1 { "" } else { "s" })}
            </span>
            <button class="delete-button" title="Delete category" onclick={on_delete}>{"×"}</button>
        </li>
    }
}

fn render_merchant_panel(state: &MerchantCategoriesState, actions: &UseMerchantCategoriesActions) -> Html {
    let on_search = {
        let set_search = actions.set_search.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            set_search.emit(input.value());
        })
    };

    let on_filter = {
        let set_filter = actions.set_filter.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            set_filter.emit(CategoryFilter::from_value(&select.value()));
        })
    };

    let body = if state.merchants_loading {
        html! { <div class="loading">{"Loading merchants..."}</div> }
    } else if let Some(error) = &state.merchants_error {
        html! { <div class="error-message">{error}</div> }
    } else if state.filtered.is_empty() {
        html! { <p class="no-data">{"No merchants match your search"}</p> }
    } else {
        render_merchant_table(state, actions)
    };

    html! {
        <section class="merchant-panel">
            <div class="merchant-controls">
                <input
                    type="search"
                    placeholder="Search merchants..."
                    value={state.search.clone()}
                    oninput={on_search}
                />
                <select onchange={on_filter}>
                    <option value="all" selected={state.filter == CategoryFilter::All}>{"All Categories"}</option>
                    <option value="uncategorized" selected={state.filter == CategoryFilter::Uncategorized}>
                        {"Uncategorized"}
                    </option>
                    {for state.categories.iter().map(|category| {
                        let option = CategoryFilter::Category(category.id);
                        html! {
                            <option value={option.value()} selected={state.filter == option}>
                                {category.display_name()}
                            </option>
                        }
                    })}
                </select>
            </div>
            {body}
            {render_pagination(state, actions)}
        </section>
    }
}

fn render_merchant_table(state: &MerchantCategoriesState, actions: &UseMerchantCategoriesActions) -> Html {
    html! {
        <div class="table-container">
            <table class="merchant-table">
                <thead>
                    <tr>
                        <th>{"Merchant"}</th>
                        <th>{"Total Spent"}</th>
                        <th>{"Share"}</th>
                        <th>{"Transactions"}</th>
                        <th>{"Last Transaction"}</th>
                        <th>{"Category"}</th>
                    </tr>
                </thead>
                <tbody>
                    {for state.page_rows().iter().map(|merchant| {
                        let current = state.assignments.get(&merchant.merchant_name);
                        let onchange = {
                            let name = merchant.merchant_name.clone();
                            actions.assign.reform(move |e: Event| {
                                let select: HtmlSelectElement = e.target_unchecked_into();
                                (name.clone(), select.value().parse::<i64>().ok())
                            })
                        };
                        html! {
                            <tr key={merchant.merchant_name.clone()}>
                                <td>{&merchant.merchant_name}</td>
                                <td class="currency-value">{format_currency_abs(merchant.total_spent)}</td>
                                <td>{format_percentage(spend_share(merchant, &state.merchants))}</td>
                                <td>{merchant.transaction_count}</td>
                                <td>
                                    {merchant.last_transaction.as_deref().map(format_short_date).unwrap_or_default()}
                                </td>
                                <td>
                                    <select {onchange}>
                                        <option value="" selected={current.is_none()}>{"Uncategorized"}</option>
                                        {for state.categories.iter().map(|category| html! {
                                            <option value={category.id.to_string()} selected={current == Some(category.id)}>
                                                {category.display_name()}
                                            </option>
                                        })}
                                    </select>
                                </td>
                            </tr>
                        }
                    })}
                </tbody>
            </table>
        </div>
    }
}

fn render_pagination(state: &MerchantCategoriesState, actions: &UseMerchantCategoriesActions) -> Html {
    let page = state.page;
    if !page.needs_controls() {
        return html! {};
    }
    let go_to = |target: usize| actions.go_to_page.reform(move |_: MouseEvent| target);

    html! {
        <div class="pagination">
            <button disabled={page.is_first()} onclick={go_to(1)}>{"First"}</button>
            <button disabled={page.is_first()} onclick={go_to(page.current.saturating_sub(1))}>{"Previous"}</button>
            <span class="pagination-info">
                {format!("Page {} of {} ({} merchants)", page.current, page.total_pages(), page.item_count)}
            </span>
            <button disabled={page.is_last()} onclick={go_to(page.current + 1)}>{"Next"}</button>
            <button disabled={page.is_last()} onclick={go_to(page.total_pages())}>{"Last"}</button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merchant(name: &str, total: f64) -> MerchantSummary {
        MerchantSummary {
            merchant_name: name.to_string(),
            transaction_count: 1,
            total_spent: total,
            last_transaction: None,
        }
    }

    #[test]
    fn test_spend_share_of_all_merchants() {
        let merchants = vec![merchant("Grocer", 300.0), merchant("Cafe", 100.0)];
        assert_eq!(spend_share(&merchants[0], &merchants), 75.0);
        assert_eq!(spend_share(&merchant("Nobody", 0.0), &[]), 0.0);
    }
}
