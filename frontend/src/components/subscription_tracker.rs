use std::collections::BTreeMap;

use chrono::Datelike;
use shared::dates::{month_grid, month_name, shift_month};
use shared::formatters::format_currency_abs;
use shared::subscriptions::{charges_by_day, merge_subscriptions, total_yearly_cost, visible, DayCharges};
use shared::subscriptions::SubscriptionRecord;
use shared::CalendarDayType;
use yew::prelude::*;

use crate::hooks::use_resource::use_resource;
use crate::services::api::ApiClient;
use crate::services::date_utils;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Properties, PartialEq)]
pub struct SubscriptionTrackerProps {
    pub api_client: ApiClient,
}

#[function_component(SubscriptionTracker)]
pub fn subscription_tracker(props: &SubscriptionTrackerProps) -> Html {
    let today = date_utils::today();
    let year = use_state(|| today.year());
    let month = use_state(|| today.month());
    let selected_day = use_state(|| Option::<u32>::None);
    let show_all = use_state(|| false);

    let patterns = {
        let api_client = props.api_client.clone();
        use_resource((), "Failed to load subscription data", move |_| async move {
            api_client.get_subscriptions().await
        })
    };
    let recurring = {
        let api_client = props.api_client.clone();
        use_resource((), "Failed to load recurring transactions", move |_| async move {
            api_client.get_recurring_transactions().await
        })
    };

    let on_navigate = {
        let year = year.clone();
        let month = month.clone();
        let selected_day = selected_day.clone();
        move |direction: i32| {
            let year = year.clone();
            let month = month.clone();
            let selected_day = selected_day.clone();
            Callback::from(move |_: MouseEvent| {
                let (next_year, next_month) = shift_month(*year, *month, direction);
                year.set(next_year);
                month.set(next_month);
                selected_day.set(None);
            })
        }
    };

    let on_toggle_show_all = {
        let show_all = show_all.clone();
        Callback::from(move |_: Event| show_all.set(!*show_all))
    };

    let close_detail = {
        let selected_day = selected_day.clone();
        Callback::from(move |_: MouseEvent| selected_day.set(None))
    };

    if patterns.is_loading() || recurring.is_loading() {
        return html! { <p>{"Loading subscription data..."}</p> };
    }
    if let Some(message) = patterns.error() {
        return html! { <p class="error">{message}</p> };
    }
    let patterns = patterns.ready().map(Vec::as_slice).unwrap_or_default();
    // Recurring rows only enrich the list, the tracker works without them
    let recurring = recurring.ready().map(Vec::as_slice).unwrap_or_default();

    let records = merge_subscriptions(patterns, recurring);
    let shown = visible(&records, *show_all);
    let days = charges_by_day(shown.iter().copied(), *year, *month);

    html! {
        <div class="subscription-tracker">
            <div class="month-navigation">
                <button class="nav-button" onclick={on_navigate(-1)}>{"←"}</button>
                <h2 class="current-month">{format!("{} {}", month_name(*month), *year)}</h2>
                <button class="nav-button" onclick={on_navigate(1)}>{"→"}</button>
            </div>

            {render_calendar(*year, *month, &days, &selected_day)}
            {render_subscription_list(&shown, *show_all, on_toggle_show_all)}
            {render_detail(*year, *month, *selected_day, &days, close_detail)}
        </div>
    }
}

fn render_calendar(year: i32, month: u32, days: &BTreeMap<u32, DayCharges>, selected_day: &UseStateHandle<Option<u32>>) -> Html {
    html! {
        <div class="calendar-grid">
            <div class="calendar-header">
                {for WEEKDAYS.iter().map(|day| html! { <div class="calendar-weekday">{*day}</div> })}
            </div>
            <div class="calendar-days">
                {for month_grid(year, month).into_iter().map(|cell| {
                    if cell.day_type != CalendarDayType::MonthDay {
                        return html! { <div class="calendar-day empty"></div> };
                    }
                    match days.get(&cell.day) {
                        Some(charges) => {
                            let onclick = {
                                let selected_day = selected_day.clone();
                                let day = cell.day;
                                Callback::from(move |_: MouseEvent| selected_day.set(Some(day)))
                            };
                            html! {
                                <div class="calendar-day has-subscriptions" {onclick}>
                                    <div class="day-header">
                                        <span class="day-number">{cell.day}</span>
                                        <span class="day-amount">{format_currency_abs(charges.total)}</span>
                                    </div>
                                    <div class="day-subscriptions">
                                        {for charges.charges.iter().map(|charge| html! {
                                            <div class="day-subscription-item">{&charge.merchant}</div>
                                        })}
                                    </div>
                                </div>
                            }
                        }
                        None => html! {
                            <div class="calendar-day">
                                <div class="day-header">
                                    <span class="day-number">{cell.day}</span>
                                </div>
                            </div>
                        },
                    }
                })}
            </div>
        </div>
    }
}

fn render_subscription_list(records: &[&SubscriptionRecord], show_all: bool, on_toggle: Callback<Event>) -> Html {
    html! {
        <div class="subscription-list">
            <div class="subscription-header-controls">
                <h3>{"Detected Subscriptions"}</h3>
                <label class="show-all-toggle">
                    <input type="checkbox" checked={show_all} onchange={on_toggle} />
                    <span class="toggle-label">{"Show all recurring transactions"}</span>
                </label>
            </div>

            {if records.is_empty() {
                html! {
                    <p>{"No subscription patterns detected. Try enabling \"Show all recurring transactions\"."}</p>
                }
            } else {
                html! {
                    <>
                        <p class="subscription-total">
                            {format!("Estimated yearly cost: {}", format_currency_abs(total_yearly_cost(records.iter().copied())))}
                        </p>
                        <div class="subscription-items">
                            {for records.iter().map(|record| render_subscription(record))}
                        </div>
                    </>
                }
            }}
        </div>
    }
}

fn render_subscription(record: &SubscriptionRecord) -> Html {
    html! {
        <div class="subscription-item">
            <div class="subscription-header">
                <div>
                    <h4>{&record.merchant}</h4>
                    <div class="subscription-frequency">{record.frequency_label()}</div>
                </div>
                <div class="subscription-amount">
                    <div class="amount-value">{format_currency_abs(record.avg_amount)}</div>
                    <div class="amount-yearly">
                        {record.yearly_cost().map(|cost| format!("~{}/year", format_currency_abs(cost))).unwrap_or_default()}
                    </div>
                </div>
            </div>

            {if record.transactions.is_empty() {
                html! {}
            } else {
                html! {
                    <div class="subscription-transactions">
                        <div class="transactions-header">{"Recent transactions:"}</div>
                        <div class="transactions-list">
                            {for record.recent_charges().iter().map(|charge| html! {
                                <div class="transaction-item">
                                    <span>{&charge.date}</span>
                                    <span>{format_currency_abs(charge.amount)}</span>
                                </div>
                            })}
                        </div>
                    </div>
                }
            }}
        </div>
    }
}

fn render_detail(
    year: i32,
    month: u32,
    selected_day: Option<u32>,
    days: &BTreeMap<u32, DayCharges>,
    on_close: Callback<MouseEvent>,
) -> Html {
    let Some((day, charges)) = selected_day.and_then(|day| days.get(&day).map(|c| (day, c))) else {
        return html! {};
    };

    html! {
        <div class="subscription-detail-overlay" onclick={on_close.clone()}>
            <div class="subscription-detail-modal" onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}>
                <div class="detail-header">
                    <h3>{format!("Subscriptions on {} {}, {}", month_name(month), day, year)}</h3>
                    <button class="close-button" onclick={on_close}>{"×"}</button>
                </div>
                <div class="detail-transactions">
                    {for charges.charges.iter().map(|charge| html! {
                        <div class="detail-transaction-item">
                            <div class="transaction-header">
                                <h4>{&charge.merchant}</h4>
                                <span class="transaction-amount">{format_currency_abs(charge.amount)}</span>
                            </div>
                            <div class="transaction-description">{charge.desc.clone().unwrap_or_default()}</div>
                        </div>
                    })}
                </div>
            </div>
        </div>
    }
}
