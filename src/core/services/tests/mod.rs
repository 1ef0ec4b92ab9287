mod analytics_service_tests;
mod recommend_service_tests;

use chrono::NaiveDate;

use crate::ledger::Category;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub(super) fn categories(names: &[&str]) -> Vec<Category> {
    names.iter().map(|name| Category::new(*name)).collect()
}
