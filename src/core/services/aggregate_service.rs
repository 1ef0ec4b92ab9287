//! Sum/count/average reductions over filtered record sets.

use serde::{Deserialize, Serialize};

use crate::ledger::{Category, MonetaryRecord, RecordFilter};

/// Mean of the aggregated amounts, or an explicit marker for an empty set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Average {
    NoData,
    Value(f64),
}

impl Average {
    pub fn value(&self) -> Option<f64> {
        match self {
            Average::Value(value) => Some(*value),
            Average::NoData => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AggregateResult {
    pub sum: u64,
    pub count: u64,
    pub average: Average,
}

impl AggregateResult {
    pub fn empty() -> Self {
        Self {
            sum: 0,
            count: 0,
            average: Average::NoData,
        }
    }

    pub fn from_parts(sum: u64, count: u64) -> Self {
        let average = if count == 0 {
            Average::NoData
        } else {
            Average::Value(sum as f64 / count as f64)
        };
        Self {
            sum,
            count,
            average,
        }
    }

    pub fn has_data(&self) -> bool {
        self.count > 0
    }
}

impl Default for AggregateResult {
    fn default() -> Self {
        Self::empty()
    }
}

/// Per-category aggregate, keyed by the category's display name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryAggregate {
    pub category: String,
    pub result: AggregateResult,
}

/// Stateless reductions over record slices supplied by the caller.
pub struct AggregateService;

impl AggregateService {
    pub fn aggregate(records: &[MonetaryRecord], filter: &RecordFilter) -> AggregateResult {
        let (sum, count) = records
            .iter()
            .filter(|record| filter.matches(record))
            .fold((0u64, 0u64), |(sum, count), record| {
                (sum.saturating_add(record.amount), count + 1)
            });
        AggregateResult::from_parts(sum, count)
    }

    pub fn aggregate_all(records: &[MonetaryRecord]) -> AggregateResult {
        Self::aggregate(records, &RecordFilter::default())
    }

    pub fn sum(records: &[MonetaryRecord], filter: &RecordFilter) -> u64 {
        Self::aggregate(records, filter).sum
    }

    /// One aggregate per category, in the order of `categories`.
    ///
    /// `filter` applies on top of the category restriction; its own category
    /// field, if any, is overridden.
    pub fn by_category(
        records: &[MonetaryRecord],
        categories: &[Category],
        filter: &RecordFilter,
    ) -> Vec<CategoryAggregate> {
        categories
            .iter()
            .map(|category| {
                let scoped = filter.clone().category(category.id);
                CategoryAggregate {
                    category: category.name.clone(),
                    result: Self::aggregate(records, &scoped),
                }
            })
            .collect()
    }
}
