use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AmountRange, DateWindow, MonetaryRecord};
use crate::errors::Result;

/// Predicate over [`MonetaryRecord`]s. Every populated field must match.
///
/// The same shape doubles as the query handed to a record source, so a
/// source and the in-process aggregation agree on what "matching" means.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_user: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<DateWindow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amounts: Option<AmountRange>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(mut self, user: Uuid) -> Self {
        self.user = Some(user);
        self
    }

    /// Matches everyone except `user`; the peer cohort.
    pub fn others_than(mut self, user: Uuid) -> Self {
        self.exclude_user = Some(user);
        self
    }

    pub fn category(mut self, category: Uuid) -> Self {
        self.category = Some(category);
        self
    }

    pub fn window(mut self, window: DateWindow) -> Self {
        self.window = Some(window);
        self
    }

    /// Restricts to the inclusive range `start..=end`, rejecting `start > end`.
    pub fn dates(self, start: NaiveDate, end: NaiveDate) -> Result<Self> {
        Ok(self.window(DateWindow::new(start, end)?))
    }

    pub fn on(self, date: NaiveDate) -> Self {
        self.window(DateWindow::single(date))
    }

    /// Restricts to amounts in `min..=max`, rejecting `min > max`.
    pub fn amounts(mut self, min: u64, max: u64) -> Result<Self> {
        self.amounts = Some(AmountRange::new(min, max)?);
        Ok(self)
    }

    pub fn matches(&self, record: &MonetaryRecord) -> bool {
        if self.user.is_some_and(|user| record.user_id != user) {
            return false;
        }
        if self.exclude_user.is_some_and(|user| record.user_id == user) {
            return false;
        }
        if self.category.is_some_and(|category| record.category_id != category) {
            return false;
        }
        if let Some(window) = &self.window {
            if !record.within(window) {
                return false;
            }
        }
        if let Some(range) = &self.amounts {
            if !range.contains(record.amount) {
                return false;
            }
        }
        true
    }

    /// Clones the matching records out of `records`.
    pub fn select(&self, records: &[MonetaryRecord]) -> Vec<MonetaryRecord> {
        records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::InsightError;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn combines_every_populated_field() {
        let me = Uuid::new_v4();
        let food = Uuid::new_v4();
        let spend = MonetaryRecord::spend(me, food, 12_000, date(2023, 11, 5));

        let filter = RecordFilter::new()
            .user(me)
            .category(food)
            .dates(date(2023, 11, 1), date(2023, 11, 30))
            .unwrap()
            .amounts(10_000, 12_000)
            .unwrap();
        assert!(filter.matches(&spend));

        assert!(!RecordFilter::new().others_than(me).matches(&spend));
        assert!(!RecordFilter::new().category(Uuid::new_v4()).matches(&spend));
        assert!(!RecordFilter::new().on(date(2023, 11, 6)).matches(&spend));
        assert!(!RecordFilter::new().amounts(0, 11_999).unwrap().matches(&spend));
        assert!(RecordFilter::new().matches(&spend));
    }

    #[test]
    fn inverted_ranges_are_rejected() {
        let err = RecordFilter::new()
            .dates(date(2023, 11, 30), date(2023, 11, 1))
            .unwrap_err();
        assert!(matches!(err, InsightError::InvalidRange { .. }));
        assert!(RecordFilter::new().amounts(10, 1).is_err());
    }
}
