use yew::prelude::*;

/// Dashboard views, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Subscriptions,
    Calendar,
    Timeline,
    Recurring,
    Monthly,
    Merchants,
    Transactions,
    Categories,
}

impl Tab {
    pub const ALL: [Tab; 8] = [
        Tab::Subscriptions,
        Tab::Calendar,
        Tab::Timeline,
        Tab::Recurring,
        Tab::Monthly,
        Tab::Merchants,
        Tab::Transactions,
        Tab::Categories,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Subscriptions => "Subscriptions",
            Tab::Calendar => "Financial Calendar",
            Tab::Timeline => "Spending Timeline",
            Tab::Recurring => "Recurring",
            Tab::Monthly => "Monthly Spending",
            Tab::Merchants => "Merchants",
            Tab::Transactions => "Transactions",
            Tab::Categories => "Categories",
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct TabBarProps {
    pub active: Tab,
    pub on_select: Callback<Tab>,
}

#[function_component(TabBar)]
pub fn tab_bar(props: &TabBarProps) -> Html {
    html! {
        <header class="header">
            <div class="container">
                <h1>{"Finance Dashboard"}</h1>
                <nav class="tabs">
                    {for Tab::ALL.into_iter().map(|tab| html! {
                        <button
                            class={classes!("tab", (tab == props.active).then_some("active"))}
                            onclick={props.on_select.reform(move |_: MouseEvent| tab)}
                        >
                            {tab.label()}
                        </button>
                    })}
                </nav>
            </div>
        </header>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscriptions_is_the_landing_tab() {
        assert_eq!(Tab::default(), Tab::Subscriptions);
        assert_eq!(Tab::ALL[0], Tab::default());
    }
}
