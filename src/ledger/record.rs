use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DateWindow;

/// Distinguishes planned amounts from actual transactions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Budget,
    Spend,
}

/// Shape shared by budget entries and spend entries.
///
/// Budgets cover the inclusive period `start..=end`; spends carry their
/// transaction date in both fields. Amounts are in the smallest currency unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonetaryRecord {
    pub id: Uuid,
    pub kind: RecordKind,
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub amount: u64,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

impl MonetaryRecord {
    pub fn budget(
        user_id: Uuid,
        category_id: Uuid,
        amount: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: RecordKind::Budget,
            user_id,
            category_id,
            amount,
            start,
            end,
            memo: None,
        }
    }

    pub fn spend(user_id: Uuid, category_id: Uuid, amount: u64, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: RecordKind::Spend,
            user_id,
            category_id,
            amount,
            start: date,
            end: date,
            memo: None,
        }
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    /// Transaction date of a spend, or the period start of a budget.
    pub fn date(&self) -> NaiveDate {
        self.start
    }

    /// True when the record falls inside `window`.
    ///
    /// A budget matches only when its whole period lies within the window.
    pub fn within(&self, window: &DateWindow) -> bool {
        match self.kind {
            RecordKind::Spend => window.contains(self.start),
            RecordKind::Budget => self.start >= window.start && self.end <= window.end,
        }
    }

    /// True when any day of the record's period falls inside `window`.
    pub fn overlaps(&self, window: &DateWindow) -> bool {
        self.start <= window.end && self.end >= window.start
    }
}
