use shared::formatters::{format_currency, format_time_of_day};
use shared::spending::{
    day_totals, fetch_range, filter_transactions, navigate, scope_title, select_day, spending_total, SpendingFilters,
    SpendingScope,
};
use shared::{TimelineTransaction, ViewMode};
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::hooks::use_resource::{use_resource, Resource};
use crate::services::api::ApiClient;
use crate::services::date_utils;

#[derive(Properties, PartialEq)]
pub struct SpendingTimelineProps {
    pub api_client: ApiClient,
}

fn parse_bound(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

#[function_component(SpendingTimeline)]
pub fn spending_timeline(props: &SpendingTimelineProps) -> Html {
    let scope = use_state(|| SpendingScope::Daily);
    let selected = use_state(date_utils::today);
    let merchant_filter = use_state(String::new);
    let min_amount = use_state(String::new);
    let max_amount = use_state(String::new);

    // One month of rows serves both scopes; moving to another month refetches
    let range = fetch_range(*selected);
    let resource = {
        let api_client = props.api_client.clone();
        use_resource(range, "Failed to load transaction timeline data", move |range| {
            let range = *range;
            async move { api_client.get_timeline(&range, ViewMode::Daily).await }
        })
    };

    let on_scope = {
        let scope = scope.clone();
        move |next: SpendingScope| {
            let scope = scope.clone();
            Callback::from(move |_: MouseEvent| scope.set(next))
        }
    };

    let on_navigate = {
        let scope = scope.clone();
        let selected = selected.clone();
        move |direction: i32| {
            let scope = scope.clone();
            let selected = selected.clone();
            Callback::from(move |_: MouseEvent| selected.set(navigate(*scope, *selected, direction)))
        }
    };

    let text_input = |handle: &UseStateHandle<String>| {
        let handle = handle.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            handle.set(input.value());
        })
    };

    let transactions: &[TimelineTransaction] = match &*resource {
        Resource::Loading => return html! { <p>{"Loading transaction data..."}</p> },
        Resource::Failed(message) => return html! { <p class="error">{message}</p> },
        Resource::Ready(rows) => rows,
    };

    let filters = SpendingFilters {
        merchant: (*merchant_filter).clone(),
        min_amount: parse_bound(&min_amount),
        max_amount: parse_bound(&max_amount),
    };
    let filtered = filter_transactions(transactions, *scope, *selected, &filters);

    let content = match *scope {
        SpendingScope::Daily => render_daily(&filtered),
        SpendingScope::Monthly => {
            let on_day = {
                let scope = scope.clone();
                let selected = selected.clone();
                Callback::from(move |day: u32| {
                    let (next_scope, next_date) = select_day(*selected, day);
                    selected.set(next_date);
                    scope.set(next_scope);
                })
            };
            render_monthly(&filtered, *selected, on_day)
        }
    };

    html! {
        <div class="spending-timeline">
            <div class="timeline-controls">
                <div class="view-toggle">
                    {for [SpendingScope::Daily, SpendingScope::Monthly].into_iter().map(|option| html! {
                        <button
                            class={classes!("view-button", (*scope == option).then_some("active"))}
                            onclick={on_scope(option)}
                        >
                            {option.label()}
                        </button>
                    })}
                </div>
                <div class="date-navigation">
                    <button class="nav-button" onclick={on_navigate(-1)}>{"←"}</button>
                    <h2 class="current-date">{scope_title(*scope, *selected)}</h2>
                    <button class="nav-button" onclick={on_navigate(1)}>{"→"}</button>
                </div>
            </div>

            <div class="filter-controls">
                <div class="filter-group">
                    <label for="merchant-filter">{"Merchant:"}</label>
                    <input
                        id="merchant-filter"
                        type="text"
                        placeholder="Filter by merchant"
                        value={(*merchant_filter).clone()}
                        oninput={text_input(&merchant_filter)}
                    />
                </div>
                <div class="filter-group">
                    <label>{"Amount Range:"}</label>
                    <div class="amount-range">
                        <input type="number" placeholder="Min" value={(*min_amount).clone()} oninput={text_input(&min_amount)} />
                        <span>{"to"}</span>
                        <input type="number" placeholder="Max" value={(*max_amount).clone()} oninput={text_input(&max_amount)} />
                    </div>
                </div>
            </div>

            <div class="timeline-content">{content}</div>
        </div>
    }
}

fn render_daily(transactions: &[TimelineTransaction]) -> Html {
    if transactions.is_empty() {
        return html! { <p class="no-data">{"No transactions on this day"}</p> };
    }

    html! {
        <div class="transaction-list">
            <div class="daily-total">
                <span>{"Total Spending:"}</span>
                <span class="total-amount">{format_currency(Some(spending_total(transactions)))}</span>
            </div>
            {for transactions.iter().map(|tx| html! {
                <div class={classes!("transaction-item", if tx.amount < 0.0 { "expense" } else { "income" })}>
                    <div class="transaction-time">{format_time_of_day(&tx.date)}</div>
                    <div class="transaction-details">
                        <div class="transaction-merchant">{tx.merchant_or_unknown()}</div>
                        <div class="transaction-category">{tx.transaction_type.clone().unwrap_or_default()}</div>
                    </div>
                    <div class="transaction-amount">{format_currency(Some(tx.amount))}</div>
                </div>
            })}
        </div>
    }
}

fn render_monthly(transactions: &[TimelineTransaction], selected: chrono::NaiveDate, on_day: Callback<u32>) -> Html {
    let columns = day_totals(transactions, selected);

    html! {
        <div class="monthly-view">
            <div class="month-summary">
                <div class="month-total">
                    <span>{"Total Monthly Spending:"}</span>
                    <span class="total-amount">{format_currency(Some(spending_total(transactions)))}</span>
                </div>
            </div>
            <div class="day-bars">
                {for columns.into_iter().map(|column| {
                    let day = column.day;
                    let onclick = on_day.reform(move |_: MouseEvent| day);
                    html! {
                        <div class="day-column" {onclick}>
                            <div class="day-bar-container">
                                <div
                                    class="day-bar"
                                    style={format!("height: {:.1}%", column.height_percent)}
                                    title={format_currency(Some(column.total))}
                                >
                                    {if column.transaction_count > 0 {
                                        html! { <span class="transaction-count">{column.transaction_count}</span> }
                                    } else {
                                        html! {}
                                    }}
                                </div>
                            </div>
                            <div class="day-label">{column.day}</div>
                            {if column.total > 0.0 {
                                html! { <div class="day-amount">{format_currency(Some(column.total))}</div> }
                            } else {
                                html! {}
                            }}
                        </div>
                    }
                })}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bound_ignores_blank_input() {
        assert_eq!(parse_bound(" 25.5 "), Some(25.5));
        assert_eq!(parse_bound(""), None);
        assert_eq!(parse_bound("abc"), None);
    }
}
