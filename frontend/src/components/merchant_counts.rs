use yew::prelude::*;

use super::charts::merchant_bars::MerchantBarChart;
use crate::hooks::use_resource::{use_resource, Resource};
use crate::services::api::ApiClient;

#[derive(Properties, PartialEq)]
pub struct MerchantCountsProps {
    pub api_client: ApiClient,
}

/// Transaction counts per merchant, as a top-N chart above the full table
#[function_component(MerchantCounts)]
pub fn merchant_counts(props: &MerchantCountsProps) -> Html {
    let api_client = props.api_client.clone();
    let top = props.api_client.config().merchant_chart_top;
    let resource = use_resource((), "Failed to load merchant counts", move |_| async move {
        api_client.get_merchant_counts().await
    });

    let merchants = match &*resource {
        Resource::Loading => return html! { <p>{"Loading merchant counts..."}</p> },
        Resource::Failed(message) => return html! { <p class="error">{message}</p> },
        Resource::Ready(merchants) if merchants.is_empty() => return html! { <p>{"No merchant data found"}</p> },
        Resource::Ready(merchants) => merchants,
    };

    html! {
        <div>
            <h2>{"Merchant Transaction Counts"}</h2>
            <MerchantBarChart merchants={merchants.clone()} top={top} />

            <h2>{"All Merchant Counts"}</h2>
            <div class="table-container">
                <table>
                    <thead>
                        <tr>
                            <th>{"Merchant"}</th>
                            <th>{"Transaction Count"}</th>
                        </tr>
                    </thead>
                    <tbody>
                        {for merchants.iter().map(|merchant| html! {
                            <tr>
                                <td>{&merchant.merchant_name}</td>
                                <td class="currency-value">{merchant.transaction_count}</td>
                            </tr>
                        })}
                    </tbody>
                </table>
            </div>
        </div>
    }
}
