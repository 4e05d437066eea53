use chrono::NaiveDateTime;
use shared::formatters::{format_currency, percent_of};
use shared::timeline::{
    bar_width_percent, detail_title, is_current_period, leading_blank_cells, period_label, CategorySubtotal,
};
use shared::{PeriodBucket, ViewMode};
use yew::prelude::*;

use crate::hooks::use_financial_calendar::{use_financial_calendar, UseFinancialCalendarActions};
use crate::services::api::ApiClient;

const NO_DATA: &str = "No transaction data found for the selected period";
const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Properties, PartialEq)]
pub struct FinancialCalendarProps {
    pub api_client: ApiClient,
}

/// Share of a bar taken by one category segment
fn segment_percent(segment: &CategorySubtotal, bucket: &PeriodBucket) -> f64 {
    bar_width_percent(segment.amount, bucket.total_spend)
}

#[function_component(FinancialCalendar)]
pub fn financial_calendar(props: &FinancialCalendarProps) -> Html {
    let calendar = use_financial_calendar(&props.api_client);
    let state = &calendar.state;
    let actions = &calendar.actions;
    let view_mode = state.navigator.view_mode();

    if state.loading {
        return html! { <div class="loading">{"Loading financial data..."}</div> };
    }

    let on_navigate = |direction: i32| actions.navigate.reform(move |_: MouseEvent| direction);

    html! {
        <div class="financial-calendar">
            <div class="calendar-toolbar">
                <div class="toolbar-left">
                    <button class="today-button" onclick={actions.go_to_today.reform(|_: MouseEvent| ())}>{"Today"}</button>
                    <div class="navigation-buttons">
                        <button class="nav-button" title="Previous period" onclick={on_navigate(-1)}>{"←"}</button>
                        <button class="nav-button" title="Next period" onclick={on_navigate(1)}>{"→"}</button>
                    </div>
                    <h2 class="period-title">{state.navigator.title()}</h2>
                </div>
                <div class="toolbar-right">
                    {if state.navigator.can_go_back() {
                        html! {
                            <button
                                class="back-button"
                                title="Go back to previous view"
                                onclick={actions.back.reform(|_: MouseEvent| ())}
                            >
                                {"↩ Back"}
                            </button>
                        }
                    } else {
                        html! {}
                    }}
                    <div class="view-selector">
                        {for ViewMode::ALL.into_iter().map(|mode| html! {
                            <button
                                class={classes!((mode == view_mode).then_some("active"))}
                                onclick={actions.set_view_mode.reform(move |_: MouseEvent| mode)}
                            >
                                {mode.label()}
                            </button>
                        })}
                    </div>
                </div>
            </div>

            {match &state.error {
                Some(error) => html! { <div class="error-message">{error}</div> },
                None if !state.has_data => html! { <div class="error-message">{NO_DATA}</div> },
                None => html! {},
            }}

            <div class="calendar-container">
                {if view_mode == ViewMode::Daily {
                    html! {
                        <div class="calendar-header-row">
                            {for WEEKDAYS.iter().map(|day| html! { <div class="header-cell">{*day}</div> })}
                        </div>
                    }
                } else {
                    html! {}
                }}
                <div class="calendar-grid" style={format!("grid-template-columns: {}", view_mode.grid_columns())}>
                    {for (0..leading_blank_cells(view_mode, state.navigator.anchor())).map(|_| html! {
                        <div class="time-block blank"></div>
                    })}
                    {for state.periods.iter().map(|bucket| render_time_block(
                        bucket,
                        view_mode,
                        state.max_total,
                        state.navigator.selected_period() == Some(bucket.key.as_str()),
                        state.now,
                        actions,
                    ))}
                </div>
                {match state.selected_bucket() {
                    Some(bucket) => render_detail_panel(bucket, view_mode, state.navigator.can_drill_down(), actions),
                    None => html! {},
                }}
            </div>
        </div>
    }
}

fn render_time_block(
    bucket: &PeriodBucket,
    view_mode: ViewMode,
    max_total: f64,
    selected: bool,
    now: NaiveDateTime,
    actions: &UseFinancialCalendarActions,
) -> Html {
    let key = bucket.key.clone();
    let onclick = actions.click_period.reform(move |_: MouseEvent| key.clone());
    let bar_height = bar_width_percent(bucket.total_spend, max_total);
    let classes = classes!(
        "time-block",
        selected.then_some("selected"),
        is_current_period(view_mode, &bucket.key, now).then_some("today"),
        bucket.is_empty().then_some("empty"),
    );

    html! {
        <div class={classes} {onclick}>
            <div class="time-block-header">
                <span class="period-label">{period_label(view_mode, &bucket.key)}</span>
                <span class="total-amount">{format_currency(Some(bucket.total_spend))}</span>
            </div>
            <div class="spending-bar-container">
                <div
                    class="spending-bar"
                    style={format!("height: {:.1}%", bar_height)}
                    title={format!("Total: {}", format_currency(Some(bucket.total_spend)))}
                >
                    {for bucket.breakdown().iter().map(|segment| html! {
                        <div
                            class="category-portion"
                            style={format!("height: {:.1}%; background: {}", segment_percent(segment, bucket), segment.color)}
                            title={format!("{}: {}", segment.name, format_currency(Some(segment.amount)))}
                        />
                    })}
                </div>
            </div>
            <div class="merchant-tags">
                {for bucket.top_transactions.iter().map(|tx| {
                    let merchant = tx.merchant_or_unknown();
                    html! {
                        <span class="merchant-tag" title={format!("{}: {}", merchant, format_currency(Some(tx.amount)))}>
                            {merchant.split_whitespace().next().unwrap_or(merchant)}
                        </span>
                    }
                })}
            </div>
        </div>
    }
}

fn render_detail_panel(
    bucket: &PeriodBucket,
    view_mode: ViewMode,
    can_drill_down: bool,
    actions: &UseFinancialCalendarActions,
) -> Html {
    let key = bucket.key.clone();
    let on_zoom = actions.drill_down.reform(move |_: MouseEvent| key.clone());
    let breakdown = bucket.breakdown();

    html! {
        <div class="detail-panel">
            <div class="detail-header">
                <h3>{detail_title(view_mode, &bucket.key)}</h3>
                <div class="detail-actions">
                    <button class="drill-down-button" onclick={on_zoom} disabled={!can_drill_down}>{"Zoom In"}</button>
                    <button class="close-button" onclick={actions.clear_selection.reform(|_: MouseEvent| ())}>{"×"}</button>
                </div>
            </div>

            <div class="detail-summary">
                <div class="total-spending">
                    <span class="label">{"Total Spending"}</span>
                    <span class="value">{format_currency(Some(bucket.total_spend))}</span>
                </div>
                <div class="spending-breakdown">
                    {for breakdown.iter().map(|segment| html! {
                        <div class="category-spending">
                            <span class="category-swatch" style={format!("background: {}", segment.color)} />
                            <span class="label">{format!("{} {}", segment.icon, segment.name)}</span>
                            <span class="value">{format_currency(Some(segment.amount))}</span>
                            <span class="percentage">
                                {format!("({}%)", percent_of(segment.amount, bucket.total_spend))}
                            </span>
                        </div>
                    })}
                </div>
                {if bucket.income > 0.0 {
                    html! {
                        <div class="income-summary">
                            <span class="label">{"Income"}</span>
                            <span class="value">{format_currency(Some(bucket.income))}</span>
                        </div>
                    }
                } else {
                    html! {}
                }}
            </div>

            <div class="transactions-container">
                <div class="transactions-section">
                    <h4>{format!("Top Transactions ({} total)", bucket.transaction_count)}</h4>
                    {if bucket.top_transactions.is_empty() {
                        html! { <div class="no-data">{"No spending in this period"}</div> }
                    } else {
                        html! {
                            <div class="transaction-list">
                                {for bucket.top_transactions.iter().map(|tx| html! {
                                    <div class="transaction-item">
                                        <span class="merchant">{tx.merchant_or_unknown()}</span>
                                        <span class="amount">{format_currency(Some(tx.amount))}</span>
                                    </div>
                                })}
                            </div>
                        }
                    }}
                </div>
            </div>
        </div>
    }
}
