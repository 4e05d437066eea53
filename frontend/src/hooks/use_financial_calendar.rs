use std::rc::Rc;

use chrono::{NaiveDate, NaiveDateTime};
use shared::timeline::{build_buckets, fill_periods, max_bucket_total, DateRange};
use shared::{CalendarNavigator, Category, PeriodBucket, TimelineTransaction, ViewMode};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::use_resource::RequestGeneration;
use crate::services::api::ApiClient;
use crate::services::date_utils;
use crate::services::logging::Logger;

const COMPONENT: &str = "financial-calendar";
pub const LOAD_ERROR: &str = "Failed to load transaction data";

pub enum NavigatorAction {
    ClickPeriod(String),
    DrillDown(String),
    Back,
    SetViewMode(ViewMode, NaiveDate),
    Navigate(i32),
    GoToToday(NaiveDate),
    ClearSelection,
}

#[derive(Clone, PartialEq)]
pub struct NavigatorState(pub CalendarNavigator);

impl Reducible for NavigatorState {
    type Action = NavigatorAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut navigator = self.0.clone();
        match action {
            NavigatorAction::ClickPeriod(key) => navigator.click_period(&key),
            NavigatorAction::DrillDown(key) => {
                navigator.drill_down(&key);
            }
            NavigatorAction::Back => {
                navigator.back();
            }
            NavigatorAction::SetViewMode(mode, today) => navigator.set_view_mode(mode, today),
            NavigatorAction::Navigate(direction) => navigator.navigate(direction),
            NavigatorAction::GoToToday(today) => navigator.go_to_today(today),
            NavigatorAction::ClearSelection => navigator.clear_selection(),
        }
        Rc::new(NavigatorState(navigator))
    }
}

/// Outcome of a timeline request, together with the range it answers
#[derive(Clone, PartialEq)]
struct LoadedRange {
    range: DateRange,
    view_mode: ViewMode,
    result: Result<Vec<TimelineTransaction>, &'static str>,
}

impl LoadedRange {
    /// The outcome, if it belongs to the range on screen
    fn for_view(&self, range: DateRange, view_mode: ViewMode) -> Option<&Result<Vec<TimelineTransaction>, &'static str>> {
        (self.range == range && self.view_mode == view_mode).then_some(&self.result)
    }
}

#[derive(Clone)]
pub struct FinancialCalendarState {
    pub navigator: CalendarNavigator,
    /// Every period of the visible range, including empty ones
    pub periods: Vec<PeriodBucket>,
    pub max_total: f64,
    pub has_data: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub now: NaiveDateTime,
}

impl FinancialCalendarState {
    pub fn selected_bucket(&self) -> Option<&PeriodBucket> {
        let key = self.navigator.selected_period()?;
        self.periods.iter().find(|b| b.key == key)
    }
}

pub struct UseFinancialCalendarResult {
    pub state: FinancialCalendarState,
    pub actions: UseFinancialCalendarActions,
}

#[derive(Clone)]
pub struct UseFinancialCalendarActions {
    pub click_period: Callback<String>,
    pub drill_down: Callback<String>,
    pub back: Callback<()>,
    pub set_view_mode: Callback<ViewMode>,
    pub navigate: Callback<i32>,
    pub go_to_today: Callback<()>,
    pub clear_selection: Callback<()>,
}

#[hook]
pub fn use_financial_calendar(api_client: &ApiClient) -> UseFinancialCalendarResult {
    let navigator = use_reducer(|| NavigatorState(CalendarNavigator::new(ViewMode::Monthly, date_utils::today())));
    let categories = use_state(Vec::<Category>::new);
    let loaded = use_state(|| Option::<LoadedRange>::None);
    let generation = use_memo((), |_| RequestGeneration::default());

    // Categories only colour the bars, a failure leaves everything uncategorized
    {
        let api_client = api_client.clone();
        let categories = categories.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match api_client.get_categories().await {
                    Ok(data) => categories.set(data),
                    Err(e) => Logger::warn_with_component(COMPONENT, &format!("Continuing without categories: {}", e)),
                }
            });
            || ()
        });
    }

    let range = navigator.0.date_range();
    let view_mode = navigator.0.view_mode();

    // Refetch whenever the visible range or granularity changes
    {
        let api_client = api_client.clone();
        let loaded = loaded.clone();
        use_effect_with((range, view_mode), move |(range, view_mode)| {
            let range = *range;
            let view_mode = *view_mode;
            let ticket = generation.begin();
            spawn_local(async move {
                Logger::info_with_component(
                    COMPONENT,
                    &format!("📅 Loading {} timeline {} .. {}", view_mode.as_str(), range.start_param(), range.end_param()),
                );
                let result = api_client
                    .get_timeline_with_categories(&range, view_mode)
                    .await
                    .map_err(|_| LOAD_ERROR);
                if generation.is_current(ticket) {
                    loaded.set(Some(LoadedRange { range, view_mode, result }));
                }
            });
            || ()
        });
    }

    // Success or failure of a previous range never shows over the current one
    let current = (*loaded).as_ref().and_then(|l| l.for_view(range, view_mode));
    let loading = current.is_none();
    let error = current.and_then(|r| r.as_ref().err()).map(|message| message.to_string());
    let (periods, has_data) = match current {
        Some(Ok(transactions)) => {
            let buckets = build_buckets(view_mode, transactions, &categories);
            let has_data = !buckets.is_empty();
            (fill_periods(view_mode, navigator.0.anchor(), buckets), has_data)
        }
        _ => (Vec::new(), false),
    };

    let click_period = {
        let navigator = navigator.clone();
        Callback::from(move |key: String| navigator.dispatch(NavigatorAction::ClickPeriod(key)))
    };
    let drill_down = {
        let navigator = navigator.clone();
        Callback::from(move |key: String| navigator.dispatch(NavigatorAction::DrillDown(key)))
    };
    let back = {
        let navigator = navigator.clone();
        Callback::from(move |_: ()| navigator.dispatch(NavigatorAction::Back))
    };
    let set_view_mode = {
        let navigator = navigator.clone();
        Callback::from(move |mode: ViewMode| {
            navigator.dispatch(NavigatorAction::SetViewMode(mode, date_utils::today()))
        })
    };
    let navigate = {
        let navigator = navigator.clone();
        Callback::from(move |direction: i32| navigator.dispatch(NavigatorAction::Navigate(direction)))
    };
    let go_to_today = {
        let navigator = navigator.clone();
        Callback::from(move |_: ()| navigator.dispatch(NavigatorAction::GoToToday(date_utils::today())))
    };
    let clear_selection = {
        let navigator = navigator.clone();
        Callback::from(move |_: ()| navigator.dispatch(NavigatorAction::ClearSelection))
    };

    let state = FinancialCalendarState {
        navigator: navigator.0.clone(),
        max_total: max_bucket_total(&periods),
        periods,
        has_data,
        loading,
        error,
        now: date_utils::now(),
    };

    let actions = UseFinancialCalendarActions {
        click_period,
        drill_down,
        back,
        set_view_mode,
        navigate,
        go_to_today,
        clear_selection,
    };

    UseFinancialCalendarResult { state, actions }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> Rc<NavigatorState> {
        let today = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        Rc::new(NavigatorState(CalendarNavigator::new(ViewMode::Monthly, today)))
    }

    #[test]
    fn test_reducer_drills_down_on_second_click() {
        let selected = state().reduce(NavigatorAction::ClickPeriod("2024-03".to_string()));
        assert_eq!(selected.0.selected_period(), Some("2024-03"));

        let drilled = selected.reduce(NavigatorAction::ClickPeriod("2024-03".to_string()));
        assert_eq!(drilled.0.view_mode(), ViewMode::Daily);
        assert!(drilled.0.can_go_back());

        let restored = drilled.reduce(NavigatorAction::Back);
        assert_eq!(restored.0.view_mode(), ViewMode::Monthly);
        assert_eq!(restored.0.selected_period(), Some("2024-03"));
    }

    #[test]
    fn test_failure_only_reported_for_its_own_range() {
        let march = DateRange {
            start: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        };
        let april = DateRange {
            start: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(),
        };
        let failed = LoadedRange { range: march, view_mode: ViewMode::Daily, result: Err(LOAD_ERROR) };

        assert_eq!(failed.for_view(march, ViewMode::Daily), Some(&Err(LOAD_ERROR)));
        assert_eq!(failed.for_view(april, ViewMode::Daily), None);
        assert_eq!(failed.for_view(march, ViewMode::Monthly), None);
    }

    #[test]
    fn test_reducer_view_mode_resets_history() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let drilled = state().reduce(NavigatorAction::DrillDown("2024-03".to_string()));
        let reset = drilled.reduce(NavigatorAction::SetViewMode(ViewMode::Yearly, today));
        assert!(!reset.0.can_go_back());
        assert_eq!(reset.0.anchor(), today);
    }
}
