use chrono::{NaiveDate, NaiveDateTime};
use js_sys::Date;

/// Milliseconds since the epoch, the clock used for cache timestamps
pub fn now_ms() -> f64 {
    Date::now()
}

/// Current local date and time from the browser clock
pub fn now() -> NaiveDateTime {
    let now = Date::new_0();
    let date = NaiveDate::from_ymd_opt(now.get_full_year() as i32, now.get_month() + 1, now.get_date())
        .unwrap_or_default();
    date.and_hms_opt(now.get_hours(), now.get_minutes(), now.get_seconds())
        .unwrap_or_default()
}

/// Get current local date
pub fn today() -> NaiveDate {
    now().date()
}

#[cfg(test)]
mod wasm_tests {
    use super::*;
    use chrono::Datelike;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_today_matches_browser_clock() {
        let js = Date::new_0();
        let today = today();
        assert_eq!(today.year(), js.get_full_year() as i32);
        assert_eq!(today.month(), js.get_month() + 1);
        assert!(now_ms() > 0.0);
    }
}
