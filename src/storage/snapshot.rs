use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{RecordQuery, RecordSource};
use crate::{
    errors::Result,
    ledger::{category, Category, MonetaryRecord, RecordKind},
};

pub const SNAPSHOT_SCHEMA_VERSION: u8 = 1;

/// In-memory record store, serialized as `{categories, budgets, spends}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapshotStore {
    #[serde(default = "SnapshotStore::schema_version_default")]
    pub schema_version: u8,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub budgets: Vec<MonetaryRecord>,
    #[serde(default)]
    pub spends: Vec<MonetaryRecord>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            ..Self::default()
        }
    }

    pub fn schema_version_default() -> u8 {
        SNAPSHOT_SCHEMA_VERSION
    }

    /// Returns the id of the category named `name`, creating it when missing.
    pub fn add_category(&mut self, name: impl Into<String>) -> Uuid {
        let name = name.into();
        if let Some(existing) = category::find_by_name(&self.categories, &name) {
            return existing.id;
        }
        let category = Category::new(name.trim());
        let id = category.id;
        self.categories.push(category);
        id
    }

    /// Files the record under budgets or spends according to its kind.
    pub fn add_record(&mut self, record: MonetaryRecord) -> Uuid {
        let id = record.id;
        match record.kind {
            RecordKind::Budget => self.budgets.push(record),
            RecordKind::Spend => self.spends.push(record),
        }
        id
    }

    pub fn records(&self, kind: RecordKind) -> &[MonetaryRecord] {
        match kind {
            RecordKind::Budget => &self.budgets,
            RecordKind::Spend => &self.spends,
        }
    }

    /// Every user id that appears in a record, in first-seen order.
    pub fn users(&self) -> Vec<Uuid> {
        let mut users = Vec::new();
        for record in self.budgets.iter().chain(self.spends.iter()) {
            if !users.contains(&record.user_id) {
                users.push(record.user_id);
            }
        }
        users
    }

    pub fn record_count(&self) -> usize {
        self.budgets.len() + self.spends.len()
    }
}

impl RecordSource for SnapshotStore {
    fn fetch_records(&self, kind: RecordKind, query: &RecordQuery) -> Result<Vec<MonetaryRecord>> {
        Ok(query.select(self.records(kind)))
    }

    fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(self.categories.clone())
    }
}
