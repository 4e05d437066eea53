use shared::raw_table::RawFilters;
use shared::Category;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct FilterPanelProps {
    pub filters: RawFilters,
    pub types: Vec<String>,
    pub sources: Vec<String>,
    pub categories: Vec<Category>,
    pub shown: usize,
    pub total: usize,
    pub on_change: Callback<RawFilters>,
    pub on_clear: Callback<()>,
}

fn optional_text(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

fn optional_amount(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok()
}

#[function_component(FilterPanel)]
pub fn filter_panel(props: &FilterPanelProps) -> Html {
    // Each control patches one field of the current filters
    let input = |apply: fn(&mut RawFilters, String)| {
        let filters = props.filters.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = filters.clone();
            apply(&mut next, input.value());
            on_change.emit(next);
        })
    };
    let select = |apply: fn(&mut RawFilters, String)| {
        let filters = props.filters.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let mut next = filters.clone();
            apply(&mut next, select.value());
            on_change.emit(next);
        })
    };
    let amount_text = |value: Option<f64>| value.map(|v| v.to_string()).unwrap_or_default();
    let filters = &props.filters;

    html! {
        <div class="filters-panel">
            <div class="filters-grid">
                <div class="filter-group">
                    <label>{"Date Range"}</label>
                    <div class="date-range">
                        <input type="date" value={filters.date_from.clone()}
                            onchange={input(|f, v| f.date_from = v)} />
                        <span>{"to"}</span>
                        <input type="date" value={filters.date_to.clone()}
                            onchange={input(|f, v| f.date_to = v)} />
                    </div>
                </div>

                <div class="filter-group">
                    <label>{"Amount Range"}</label>
                    <div class="amount-range">
                        <input type="number" placeholder="Min" value={amount_text(filters.amount_min)}
                            onchange={input(|f, v| f.amount_min = optional_amount(&v))} />
                        <span>{"to"}</span>
                        <input type="number" placeholder="Max" value={amount_text(filters.amount_max)}
                            onchange={input(|f, v| f.amount_max = optional_amount(&v))} />
                    </div>
                </div>

                <div class="filter-group">
                    <label>{"Transaction Type"}</label>
                    <select onchange={select(|f, v| f.transaction_type = optional_text(v))}>
                        <option value="" selected={filters.transaction_type.is_none()}>{"All Types"}</option>
                        {for props.types.iter().map(|kind| html! {
                            <option value={kind.clone()} selected={filters.transaction_type.as_ref() == Some(kind)}>
                                {kind}
                            </option>
                        })}
                    </select>
                </div>

                <div class="filter-group">
                    <label>{"Source"}</label>
                    <select onchange={select(|f, v| f.source = optional_text(v))}>
                        <option value="" selected={filters.source.is_none()}>{"All Sources"}</option>
                        {for props.sources.iter().map(|source| html! {
                            <option value={source.clone()} selected={filters.source.as_ref() == Some(source)}>
                                {source}
                            </option>
                        })}
                    </select>
                </div>

                <div class="filter-group">
                    <label>{"Category"}</label>
                    <select onchange={select(|f, v| f.category = v.parse().ok())}>
                        <option value="" selected={filters.category.is_none()}>{"All Categories"}</option>
                        {for props.categories.iter().map(|category| html! {
                            <option value={category.id.to_string()} selected={filters.category == Some(category.id)}>
                                {category.display_name()}
                            </option>
                        })}
                    </select>
                </div>
            </div>

            <div class="filter-actions">
                <button class="clear-filters-button" onclick={props.on_clear.reform(|_: MouseEvent| ())}>
                    {"Clear Filters"}
                </button>
                <div class="filter-stats">
                    {format!("Showing {} of {} transactions", props.shown, props.total)}
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_controls_mean_no_constraint() {
        assert_eq!(optional_text(String::new()), None);
        assert_eq!(optional_text("Merchant".to_string()).as_deref(), Some("Merchant"));
        assert_eq!(optional_amount(""), None);
        assert_eq!(optional_amount(" -12.5 "), Some(-12.5));
    }
}
