//! Mapping from catalog views to `/games` query parameters.

use chrono::{Days, NaiveDate};
use reelpick_catalog::{PageRequest, View};

/// Length of the trending window.
pub const TRENDING_WINDOW_DAYS: u64 = 30;

/// `dates` filter covering the trending window ending on `today`.
#[must_use]
pub fn trending_window(today: NaiveDate) -> String {
    let start = today
        .checked_sub_days(Days::new(TRENDING_WINDOW_DAYS))
        .unwrap_or(NaiveDate::MIN);
    format!("{},{}", start.format("%Y-%m-%d"), today.format("%Y-%m-%d"))
}

/// Filter parameters selecting `view`.
#[must_use]
pub fn view_params(view: &View, today: NaiveDate) -> Vec<(&'static str, String)> {
    match view {
        View::Popular => vec![("ordering", "-rating".to_string())],
        View::Trending => vec![
            ("dates", trending_window(today)),
            ("ordering", "-added".to_string()),
        ],
        View::Genre(id) => vec![("genres", id.to_string())],
        View::Platform(id) => vec![
            ("platforms", id.to_string()),
            ("ordering", "-rating".to_string()),
        ],
        View::Search(text) => vec![("search", text.clone())],
    }
}

/// Full query for one page of a view.
#[must_use]
pub fn page_params(request: &PageRequest, today: NaiveDate) -> Vec<(&'static str, String)> {
    let mut params = view_params(&request.view, today);
    params.push(("page", request.page.to_string()));
    params.push(("page_size", request.page_size.to_string()));
    params
}
