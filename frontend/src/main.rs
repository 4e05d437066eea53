use yew::prelude::*;

mod components;
mod hooks;
mod services;

use components::financial_calendar::FinancialCalendar;
use components::merchant_category_manager::MerchantCategoryManager;
use components::merchant_counts::MerchantCounts;
use components::monthly_spending::MonthlySpendingView;
use components::raw_transactions::RawTransactions;
use components::recent_transaction::RecentTransactionCard;
use components::recurring_transactions::RecurringTransactions;
use components::spending_timeline::SpendingTimeline;
use components::subscription_tracker::SubscriptionTracker;
use components::tab_bar::{Tab, TabBar};
use services::api::ApiClient;
use services::logging::Logger;

#[function_component(App)]
fn app() -> Html {
    let active_tab = use_state(Tab::default);
    let api_client = use_state(ApiClient::new);

    let on_select = {
        let active_tab = active_tab.clone();
        Callback::from(move |tab: Tab| {
            Logger::debug_with_component("app", &format!("Switching to {}", tab.label()));
            active_tab.set(tab);
        })
    };

    // Each view loads its own data when it mounts
    let api_client = (*api_client).clone();
    let view = match *active_tab {
        Tab::Subscriptions => html! { <SubscriptionTracker api_client={api_client.clone()} /> },
        Tab::Calendar => html! { <FinancialCalendar api_client={api_client.clone()} /> },
        Tab::Timeline => html! { <SpendingTimeline api_client={api_client.clone()} /> },
        Tab::Recurring => html! {
            <>
                <RecentTransactionCard api_client={api_client.clone()} />
                <RecurringTransactions api_client={api_client.clone()} />
            </>
        },
        Tab::Monthly => html! { <MonthlySpendingView api_client={api_client.clone()} /> },
        Tab::Merchants => html! { <MerchantCounts api_client={api_client.clone()} /> },
        Tab::Transactions => html! { <RawTransactions api_client={api_client.clone()} /> },
        Tab::Categories => html! { <MerchantCategoryManager api_client={api_client.clone()} /> },
    };

    html! {
        <>
            <TabBar active={*active_tab} {on_select} />
            <main class="main">
                <div class="container">
                    <div class="card">{view}</div>
                </div>
            </main>
        </>
    }
}

fn main() {
    console_error_panic_hook::set_once();
    services::logging::init(log::LevelFilter::Info);
    log::info!("🚀 Finance dashboard starting");
    yew::Renderer::<App>::new().render();
}
