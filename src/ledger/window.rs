use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::calendar::{days_in_month, shift_month};
use crate::errors::{InsightError, RangeField, Result};

/// Inclusive date range used by filters and analytics windows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(InsightError::invalid_range(RangeField::Date, start, end));
        }
        Ok(Self { start, end })
    }

    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of days covered, counting both ends.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// The full calendar month containing `date`.
    pub fn calendar_month(date: NaiveDate) -> Self {
        let start = first_of_month(date);
        let end = start
            .with_day(days_in_month(date.year(), date.month()))
            .unwrap_or(start);
        Self { start, end }
    }

    /// From the first of `today`'s month through `today`.
    pub fn month_to_date(today: NaiveDate) -> Self {
        Self {
            start: first_of_month(today),
            end: today,
        }
    }

    /// The same month-to-date window one month earlier.
    ///
    /// The end day is clamped to the length of the prior month, so March 31st
    /// compares against the last day of February.
    pub fn prior_month_to_date(today: NaiveDate) -> Self {
        let end = shift_month(today, -1);
        Self {
            start: first_of_month(end),
            end,
        }
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Inclusive bounds on a record amount.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AmountRange {
    pub min: u64,
    pub max: u64,
}

impl AmountRange {
    pub fn new(min: u64, max: u64) -> Result<Self> {
        if min > max {
            return Err(InsightError::invalid_range(RangeField::Amount, min, max));
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, amount: u64) -> bool {
        amount >= self.min && amount <= self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rejects_inverted_ranges() {
        let err = DateWindow::new(date(2023, 11, 2), date(2023, 11, 1)).unwrap_err();
        assert!(matches!(
            err,
            InsightError::InvalidRange {
                field: RangeField::Date,
                ..
            }
        ));
        assert!(AmountRange::new(10, 5).is_err());
        assert!(DateWindow::new(date(2023, 11, 1), date(2023, 11, 1)).is_ok());
        assert!(AmountRange::new(5, 5).is_ok());
    }

    #[test]
    fn bounds_are_inclusive() {
        let window = DateWindow::new(date(2023, 11, 1), date(2023, 11, 30)).unwrap();
        assert!(window.contains(date(2023, 11, 1)));
        assert!(window.contains(date(2023, 11, 30)));
        assert!(!window.contains(date(2023, 12, 1)));
        assert_eq!(window.days(), 30);

        let amounts = AmountRange::new(1_000, 2_000).unwrap();
        assert!(amounts.contains(1_000));
        assert!(amounts.contains(2_000));
        assert!(!amounts.contains(2_001));
    }

    #[test]
    fn month_windows_follow_the_calendar() {
        let today = date(2024, 3, 31);
        assert_eq!(
            DateWindow::month_to_date(today),
            DateWindow::new(date(2024, 3, 1), today).unwrap()
        );
        assert_eq!(
            DateWindow::prior_month_to_date(today),
            DateWindow::new(date(2024, 2, 1), date(2024, 2, 29)).unwrap()
        );
        assert_eq!(
            DateWindow::prior_month_to_date(date(2024, 1, 15)),
            DateWindow::new(date(2023, 12, 1), date(2023, 12, 15)).unwrap()
        );
        assert_eq!(
            DateWindow::calendar_month(date(2023, 2, 10)),
            DateWindow::new(date(2023, 2, 1), date(2023, 2, 28)).unwrap()
        );
    }
}
