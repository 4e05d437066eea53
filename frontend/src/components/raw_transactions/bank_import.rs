use shared::models::is_csv_file_name;
use shared::ApiImportRequest;
use wasm_bindgen_futures::spawn_local;
use web_sys::{File, HtmlInputElement};
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::logging::Logger;

const COMPONENT: &str = "bank-import";

#[derive(Clone, PartialEq)]
enum ImportStatus {
    Idle,
    Working,
    Done(String),
    Failed(String),
}

#[derive(Properties, PartialEq)]
pub struct BankImportProps {
    pub api_client: ApiClient,
    /// Fired after a successful import so the table can reload
    pub on_imported: Callback<()>,
}

/// `since` is optional; anything that is not a date is sent as none
fn since_param(value: &str) -> Option<String> {
    let value = value.trim();
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").ok().map(|_| value.to_string())
}

#[function_component(BankImport)]
pub fn bank_import(props: &BankImportProps) -> Html {
    let selected_file = use_state(|| Option::<File>::None);
    let api_key = use_state(String::new);
    let since = use_state(String::new);
    let status = use_state(|| ImportStatus::Idle);

    let on_file_change = {
        let selected_file = selected_file.clone();
        let status = status.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let file = input.files().and_then(|files| files.get(0));
            match file {
                Some(file) if !is_csv_file_name(&file.name()) => {
                    status.set(ImportStatus::Failed("Please select a CSV file".to_string()));
                    selected_file.set(None);
                }
                file => {
                    status.set(ImportStatus::Idle);
                    selected_file.set(file);
                }
            }
        })
    };

    let on_upload = {
        let api_client = props.api_client.clone();
        let on_imported = props.on_imported.clone();
        let selected_file = selected_file.clone();
        let status = status.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let Some(file) = (*selected_file).clone() else {
                status.set(ImportStatus::Failed("Choose a statement to upload".to_string()));
                return;
            };
            let api_client = api_client.clone();
            let on_imported = on_imported.clone();
            let selected_file = selected_file.clone();
            let status = status.clone();
            status.set(ImportStatus::Working);
            spawn_local(async move {
                match api_client.upload_statement(&file).await {
                    Ok(summary) => {
                        Logger::info_with_component(COMPONENT, &format!("📥 {}", summary.describe()));
                        status.set(ImportStatus::Done(summary.describe()));
                        selected_file.set(None);
                        on_imported.emit(());
                    }
                    Err(_) => status.set(ImportStatus::Failed("Failed to upload transactions".to_string())),
                }
            });
        })
    };

    let on_api_import = {
        let api_client = props.api_client.clone();
        let on_imported = props.on_imported.clone();
        let api_key = api_key.clone();
        let since = since.clone();
        let status = status.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let key = api_key.trim().to_string();
            if key.is_empty() {
                status.set(ImportStatus::Failed("An API key is required".to_string()));
                return;
            }
            let request = ApiImportRequest { api_key: key, since: since_param(&since) };
            let api_client = api_client.clone();
            let on_imported = on_imported.clone();
            let status = status.clone();
            status.set(ImportStatus::Working);
            spawn_local(async move {
                match api_client.import_from_api(&request).await {
                    Ok(summary) => {
                        Logger::info_with_component(COMPONENT, &format!("🏦 {}", summary.describe()));
                        status.set(ImportStatus::Done(summary.describe()));
                        on_imported.emit(());
                    }
                    Err(_) => status.set(ImportStatus::Failed("Failed to import transactions from the bank API".to_string())),
                }
            });
        })
    };

    let text_input = |handle: &UseStateHandle<String>| {
        let handle = handle.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            handle.set(input.value());
        })
    };

    let working = *status == ImportStatus::Working;

    html! {
        <section class="bank-import">
            <h3>{"Import Transactions"}</h3>

            {match &*status {
                ImportStatus::Done(message) => html! { <div class="form-message success">{message}</div> },
                ImportStatus::Failed(message) => html! { <div class="form-message error">{message}</div> },
                ImportStatus::Working => html! { <div class="form-message info">{"Importing..."}</div> },
                ImportStatus::Idle => html! {},
            }}

            <form class="upload-form" onsubmit={on_upload}>
                <label for="statement-file">{"CommBank statement (CSV)"}</label>
                <input id="statement-file" type="file" accept=".csv" onchange={on_file_change} />
                <button type="submit" class="upload-button" disabled={working || selected_file.is_none()}>
                    {"Upload"}
                </button>
            </form>

            <form class="api-import-form" onsubmit={on_api_import}>
                <label for="api-key">{"Bank API key"}</label>
                <input
                    id="api-key"
                    type="password"
                    placeholder="API key"
                    value={(*api_key).clone()}
                    oninput={text_input(&api_key)}
                />
                <label for="import-since">{"Since"}</label>
                <input id="import-since" type="date" value={(*since).clone()} oninput={text_input(&since)} />
                <button type="submit" class="import-button" disabled={working}>{"Import from API"}</button>
            </form>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_since_param_requires_a_date() {
        assert_eq!(since_param("2024-01-31").as_deref(), Some("2024-01-31"));
        assert_eq!(since_param(" "), None);
        assert_eq!(since_param("last week"), None);
    }
}
