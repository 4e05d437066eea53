pub mod bank_import;
pub mod filter_panel;

use shared::formatters::format_currency;
use shared::raw_table::{unique_sources, unique_types, RawFilters, SortKey};
use shared::RawTransaction;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::hooks::use_raw_transactions::{use_raw_transactions, RawTransactionsState};
use crate::services::api::ApiClient;
use bank_import::BankImport;
use filter_panel::FilterPanel;

#[derive(Properties, PartialEq)]
pub struct RawTransactionsProps {
    pub api_client: ApiClient,
}

fn amount_class(tx: &RawTransaction) -> &'static str {
    if tx.amount < 0.0 {
        "amount negative"
    } else if tx.amount > 0.0 {
        "amount positive"
    } else {
        "amount zero"
    }
}

#[function_component(RawTransactions)]
pub fn raw_transactions(props: &RawTransactionsProps) -> Html {
    let table = use_raw_transactions(&props.api_client);
    let state = &table.state;
    let actions = &table.actions;

    let on_search = {
        let filters = state.filters.clone();
        let set_filters = actions.set_filters.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            set_filters.emit(RawFilters { search: input.value(), ..filters.clone() });
        })
    };

    let body = if state.loading {
        html! { <div class="loading">{"Loading transactions..."}</div> }
    } else if let Some(error) = &state.error {
        html! { <div class="error-message">{error}</div> }
    } else {
        render_table(state, actions.sort_by.clone())
    };

    let (first, last) = state.pagination.showing_range(state.visible.len());

    html! {
        <section class="raw-transactions">
            <div class="raw-transactions-header">
                <h2>{"All Transactions"}</h2>
                <div class="raw-transactions-actions">
                    <input
                        type="search"
                        class="search-input"
                        placeholder="Search transactions..."
                        value={state.filters.search.clone()}
                        oninput={on_search}
                    />
                    <button
                        class={classes!("filter-toggle", state.filters.is_active().then_some("active"))}
                        onclick={actions.toggle_filters.reform(|_: MouseEvent| ())}
                    >
                        {if state.show_filters { "Hide Filters" } else { "Show Filters" }}
                    </button>
                    <button
                        class="export-button"
                        disabled={state.visible.is_empty()}
                        onclick={actions.export.reform(|_: MouseEvent| ())}
                    >
                        {"Export to CSV"}
                    </button>
                </div>
            </div>

            {match &state.export_error {
                Some(message) => html! { <div class="error-message">{message}</div> },
                None => html! {},
            }}

            {if state.show_filters {
                html! {
                    <FilterPanel
                        filters={state.filters.clone()}
                        types={unique_types(&state.transactions)}
                        sources={unique_sources(&state.transactions)}
                        categories={state.categories.clone()}
                        shown={state.visible.len()}
                        total={state.transactions.len()}
                        on_change={actions.set_filters.clone()}
                        on_clear={actions.clear_filters.clone()}
                    />
                }
            } else {
                html! {}
            }}

            {body}

            <div class="pagination">
                <button
                    disabled={!state.pagination.has_previous()}
                    onclick={actions.previous_page.reform(|_: MouseEvent| ())}
                >
                    {"Previous"}
                </button>
                <span class="pagination-info">
                    {format!("Showing {} - {} of {} transactions", first, last, state.pagination.total)}
                </span>
                <button
                    disabled={!state.pagination.has_next()}
                    onclick={actions.next_page.reform(|_: MouseEvent| ())}
                >
                    {"Next"}
                </button>
            </div>

            <BankImport api_client={props.api_client.clone()} on_imported={actions.reload.clone()} />
        </section>
    }
}

fn render_table(state: &RawTransactionsState, sort_by: Callback<SortKey>) -> Html {
    html! {
        <div class="table-container">
            <table class="transactions-table">
                <thead>
                    <tr>
                        {for SortKey::ALL.into_iter().map(|key| html! {
                            <th class="sortable" onclick={sort_by.reform(move |_: MouseEvent| key)}>
                                {key.label()}
                                {state.sort.indicator(key).map(|arrow| format!(" {}", arrow)).unwrap_or_default()}
                            </th>
                        })}
                        <th>{"Category"}</th>
                    </tr>
                </thead>
                <tbody>
                    {if state.visible.is_empty() {
                        html! {
                            <tr>
                                <td class="no-data" colspan="7">{"No transactions match your filters"}</td>
                            </tr>
                        }
                    } else {
                        html! {
                            {for state.visible.iter().map(|tx| html! {
                                <tr key={tx.id}>
                                    <td class="date">{&tx.date}</td>
                                    <td class={amount_class(tx)}>{format_currency(Some(tx.amount))}</td>
                                    <td>{tx.merchant_name.clone().unwrap_or_default()}</td>
                                    <td class="description">{tx.original_description.clone().unwrap_or_default()}</td>
                                    <td>{tx.transaction_type.clone().unwrap_or_default()}</td>
                                    <td>{tx.source.clone().unwrap_or_default()}</td>
                                    <td>
                                        {match state.category_for(tx.merchant_name.as_deref()) {
                                            Some(category) => html! {
                                                <span class="category-tag" style={format!("background-color: {}", category.color)}>
                                                    {category.display_name()}
                                                </span>
                                            },
                                            None => html! { <span class="category-tag uncategorized">{"Uncategorized"}</span> },
                                        }}
                                    </td>
                                </tr>
                            })}
                        }
                    }}
                </tbody>
            </table>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(amount: f64) -> RawTransaction {
        RawTransaction {
            id: 1,
            date: "2024-03-01".to_string(),
            amount,
            balance: None,
            original_description: None,
            merchant_name: None,
            transaction_type: None,
            location: None,
            currency: None,
            last_4_card_number: None,
            source: None,
        }
    }

    #[test]
    fn test_amount_class_by_sign() {
        assert_eq!(amount_class(&row(-4.5)), "amount negative");
        assert_eq!(amount_class(&row(120.0)), "amount positive");
        assert_eq!(amount_class(&row(0.0)), "amount zero");
    }
}
