use shared::formatters::{format_currency, format_short_date};
use yew::prelude::*;

use crate::hooks::use_resource::{use_resource, Resource};
use crate::services::api::ApiClient;

#[derive(Properties, PartialEq)]
pub struct RecentTransactionProps {
    pub api_client: ApiClient,
}

#[function_component(RecentTransactionCard)]
pub fn recent_transaction(props: &RecentTransactionProps) -> Html {
    let api_client = props.api_client.clone();
    let resource = use_resource((), "Failed to load recent transaction", move |_| async move {
        api_client.get_recent_transaction().await
    });

    let tx = match &*resource {
        Resource::Loading => return html! { <p>{"Loading recent transaction..."}</p> },
        Resource::Failed(message) => return html! { <p class="error">{message}</p> },
        Resource::Ready(tx) if tx.is_empty() => return html! { <p>{"No recent transaction found"}</p> },
        Resource::Ready(tx) => tx,
    };
    let text = |value: &Option<String>| value.clone().unwrap_or_default();

    html! {
        <div>
            <h2>{"Most Recent Transaction"}</h2>
            <div class="table-container">
                <table>
                    <thead>
                        <tr>
                            <th>{"Date"}</th>
                            <th>{"Amount"}</th>
                            <th>{"Merchant"}</th>
                            <th>{"Type"}</th>
                            <th>{"Source"}</th>
                        </tr>
                    </thead>
                    <tbody>
                        <tr>
                            <td>{tx.date.as_deref().map(format_short_date).unwrap_or_default()}</td>
                            <td class="currency-value">{format_currency(tx.amount)}</td>
                            <td>{text(&tx.merchant_name)}</td>
                            <td>{text(&tx.transaction_type)}</td>
                            <td>{text(&tx.source)}</td>
                        </tr>
                    </tbody>
                </table>
            </div>
        </div>
    }
}
