use shared::formatters::format_currency;
use yew::prelude::*;

use super::charts::monthly_spending::MonthlySpendingChart;
use crate::hooks::use_resource::{use_resource, Resource};
use crate::services::api::ApiClient;

#[derive(Properties, PartialEq)]
pub struct MonthlySpendingProps {
    pub api_client: ApiClient,
}

#[function_component(MonthlySpendingView)]
pub fn monthly_spending(props: &MonthlySpendingProps) -> Html {
    let api_client = props.api_client.clone();
    let months = props.api_client.config().monthly_spending_months;
    let resource = use_resource(months, "Failed to load monthly spending data", move |months| {
        let months = *months;
        async move { api_client.get_monthly_spending(months).await }
    });

    let data = match &*resource {
        Resource::Loading => return html! { <p>{"Loading monthly spending data..."}</p> },
        Resource::Failed(message) => return html! { <p class="error">{message}</p> },
        Resource::Ready(data) if data.is_empty() => return html! { <p>{"No monthly spending data found"}</p> },
        Resource::Ready(data) => data,
    };

    html! {
        <div>
            <h2>{"Monthly Spending Analysis"}</h2>
            <MonthlySpendingChart data={data.clone()} />
            <div class="table-container">
                <table>
                    <thead>
                        <tr>
                            <th>{"Month"}</th>
                            <th>{"Merchant"}</th>
                            <th>{"Transfer"}</th>
                            <th>{"Fee"}</th>
                            <th>{"Total"}</th>
                        </tr>
                    </thead>
                    <tbody>
                        {for data.iter().map(|month| html! {
                            <tr>
                                <td>{&month.month}</td>
                                <td class="currency-value">{format_currency(Some(month.merchant))}</td>
                                <td class="currency-value">{format_currency(Some(month.transfer))}</td>
                                <td class="currency-value">{format_currency(Some(month.fee))}</td>
                                <td class="currency-value">{format_currency(Some(month.total()))}</td>
                            </tr>
                        })}
                    </tbody>
                </table>
            </div>
        </div>
    }
}
