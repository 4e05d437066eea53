use shared::formatters::format_currency;
use shared::RecurringTransaction;
use yew::prelude::*;

use crate::hooks::use_resource::{use_resource, Resource};
use crate::services::api::ApiClient;

#[derive(Properties, PartialEq)]
pub struct RecurringTransactionsProps {
    pub api_client: ApiClient,
}

#[function_component(RecurringTransactions)]
pub fn recurring_transactions(props: &RecurringTransactionsProps) -> Html {
    let api_client = props.api_client.clone();
    let resource = use_resource((), "Failed to load recurring transactions", move |_| async move {
        api_client.get_recurring_transactions().await
    });

    let rows: &Vec<RecurringTransaction> = match &*resource {
        Resource::Loading => return html! { <p>{"Loading recurring transactions..."}</p> },
        Resource::Failed(message) => return html! { <p class="error">{message}</p> },
        Resource::Ready(rows) if rows.is_empty() => return html! { <p>{"No recurring transactions found"}</p> },
        Resource::Ready(rows) => rows,
    };

    html! {
        <div>
            <h2>{"Recurring Transactions"}</h2>
            <div class="table-container">
                <table>
                    <thead>
                        <tr>
                            <th>{"Merchant"}</th>
                            <th>{"Amount"}</th>
                            <th>{"Occurrences"}</th>
                        </tr>
                    </thead>
                    <tbody>
                        {for rows.iter().map(|tx| html! {
                            <tr>
                                <td>{&tx.merchant_name}</td>
                                <td class="currency-value">{format_currency(Some(tx.amount))}</td>
                                <td class="currency-value">{tx.occurrence_count}</td>
                            </tr>
                        })}
                    </tbody>
                </table>
            </div>
        </div>
    }
}
