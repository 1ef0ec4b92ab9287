use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// How the analytics engines count the days of the current month when
/// spreading a monthly budget into a daily one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DayCountPolicy {
    /// January, March, May, July, August, October and December count 31 days;
    /// every other month, February included, counts 30.
    #[default]
    ListedMonths,
    /// Every month counts 30 days.
    FlatThirty,
    /// True calendar length, leap years included.
    Calendar,
}

impl DayCountPolicy {
    pub fn days_in(&self, date: NaiveDate) -> u32 {
        match self {
            DayCountPolicy::ListedMonths => match date.month() {
                1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
                _ => 30,
            },
            DayCountPolicy::FlatThirty => 30,
            DayCountPolicy::Calendar => days_in_month(date.year(), date.month()),
        }
    }
}

/// Actual number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .map(|first_next| (first_next - Duration::days(1)).day())
        .unwrap_or(28)
}

/// Moves `date` by whole months, clamping the day to the target month's length.
pub fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let step = Months::new(months.unsigned_abs());
    let shifted = if months < 0 {
        date.checked_sub_months(step)
    } else {
        date.checked_add_months(step)
    };
    shifted.unwrap_or(date)
}
