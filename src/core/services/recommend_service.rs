//! Proportional budget allocation over historical per-category averages.

use serde::{ser::SerializeMap, Serialize, Serializer};
use tracing::{debug, warn};

use super::aggregate_service::CategoryAggregate;
use crate::{
    config::EngineConfig,
    errors::{InsightError, Result},
    utils::rounding::div_round,
};

pub const OTHERS_KEY: &str = "others";

const FULL_SHARE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationEntry {
    pub category: String,
    /// Rounded share of the historical total, in hundredths.
    pub share_hundredths: u32,
    pub amount: u64,
    /// True when the share was small enough to move into `others`.
    pub folded: bool,
}

/// Recommended split of a total budget.
///
/// Serializes as a flat `{category: amount, ..., "others": amount}` object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationResult {
    pub total_budget: u64,
    pub entries: Vec<AllocationEntry>,
    pub others_share_hundredths: u32,
    pub others: u64,
}

impl AllocationResult {
    pub fn get(&self, key: &str) -> Option<u64> {
        if key == OTHERS_KEY {
            return Some(self.others);
        }
        self.entries
            .iter()
            .find(|entry| entry.category == key)
            .map(|entry| entry.amount)
    }

    pub fn allocated_total(&self) -> u64 {
        self.entries.iter().map(|entry| entry.amount).sum::<u64>() + self.others
    }

    pub fn folded(&self) -> impl Iterator<Item = &AllocationEntry> {
        self.entries.iter().filter(|entry| entry.folded)
    }

    /// Pulls allocations back under the total when rounded shares overshoot it.
    fn trim_overshoot(&mut self) {
        let allocated = self.allocated_total();
        if allocated <= self.total_budget {
            return;
        }
        let excess = allocated - self.total_budget;
        let largest = self
            .entries
            .iter_mut()
            .map(|entry| &mut entry.amount)
            .chain(std::iter::once(&mut self.others))
            .fold(None::<&mut u64>, |best, amount| match best {
                Some(current) if *current >= *amount => Some(current),
                _ => Some(amount),
            });
        if let Some(amount) = largest {
            *amount = amount.saturating_sub(excess);
        }
        debug!(excess, "trimmed rounded allocation overshoot");
    }
}

impl Serialize for AllocationResult {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len() + 1))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.category, &entry.amount)?;
        }
        map.serialize_entry(OTHERS_KEY, &self.others)?;
        map.end()
    }
}

pub struct RecommendService;

impl RecommendService {
    /// Splits `total_budget` in proportion to each category's historical average.
    ///
    /// Categories without history get nothing and stay out of the denominator.
    /// Shares at or below the configured threshold are folded into `others`.
    pub fn recommend(
        total_budget: i64,
        history: &[CategoryAggregate],
        config: &EngineConfig,
    ) -> Result<AllocationResult> {
        if total_budget <= 0 {
            return Err(InsightError::InvalidAmount(total_budget));
        }
        let total = total_budget as u64;

        let weights = average_weights(history);
        let denominator: i128 = weights.iter().flatten().sum();
        if denominator <= 0 {
            warn!(categories = history.len(), "no spend history to base a recommendation on");
            return Err(InsightError::InsufficientData(
                "no category has recorded spend history".into(),
            ));
        }

        let mut others_share = 0u32;
        let entries = history
            .iter()
            .zip(&weights)
            .map(|(item, weight)| {
                let Some(weight) = *weight else {
                    return AllocationEntry {
                        category: item.category.clone(),
                        share_hundredths: 0,
                        amount: 0,
                        folded: false,
                    };
                };
                let share = share_hundredths(weight, denominator);
                if share <= config.others_threshold_hundredths {
                    others_share += share;
                    AllocationEntry {
                        category: item.category.clone(),
                        share_hundredths: share,
                        amount: 0,
                        folded: true,
                    }
                } else {
                    AllocationEntry {
                        category: item.category.clone(),
                        share_hundredths: share,
                        amount: apply_share(share, total),
                        folded: false,
                    }
                }
            })
            .collect::<Vec<_>>();

        let others_share = others_share.min(FULL_SHARE);
        let mut result = AllocationResult {
            total_budget: total,
            entries,
            others_share_hundredths: others_share,
            others: apply_share(others_share, total),
        };
        result.trim_overshoot();

        debug!(
            total_budget = total,
            folded = result.folded().count(),
            others = result.others,
            "budget recommendation computed"
        );
        Ok(result)
    }
}

/// Scale for averages when the counts share no representable common multiple.
const FALLBACK_SCALE: i128 = 1_000_000_000_000;

/// Each category's average as an integer weight over a shared denominator.
///
/// `None` marks a category without history. Weights are exact when the least
/// common multiple of the counts fits, otherwise averages are fixed at
/// `FALLBACK_SCALE` precision.
fn average_weights(history: &[CategoryAggregate]) -> Vec<Option<i128>> {
    exact_weights(history).unwrap_or_else(|| {
        debug!("count multiple overflowed, using scaled averages");
        history
            .iter()
            .map(|item| {
                let result = &item.result;
                result.has_data().then(|| {
                    div_round(result.sum as i128 * FALLBACK_SCALE, result.count as i128)
                        .unwrap_or_default()
                })
            })
            .collect()
    })
}

fn exact_weights(history: &[CategoryAggregate]) -> Option<Vec<Option<i128>>> {
    let multiple = history
        .iter()
        .filter(|item| item.result.has_data())
        .try_fold(1i128, |acc, item| lcm(acc, item.result.count as i128))?;
    let weights = history
        .iter()
        .map(|item| {
            let result = &item.result;
            if !result.has_data() {
                return Some(None);
            }
            (result.sum as i128)
                .checked_mul(multiple / result.count as i128)
                .filter(|weight| weight.checked_mul(FULL_SHARE as i128).is_some())
                .map(Some)
        })
        .collect::<Option<Vec<_>>>()?;
    weights
        .iter()
        .flatten()
        .try_fold(0i128, |acc, weight| acc.checked_add(*weight))?;
    Some(weights)
}

fn gcd(mut a: i128, mut b: i128) -> i128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn lcm(a: i128, b: i128) -> Option<i128> {
    (a / gcd(a, b)).checked_mul(b)
}

/// `round(weight / denominator, 2)` expressed in hundredths, halves rounded up.
fn share_hundredths(weight: i128, denominator: i128) -> u32 {
    div_round(weight * FULL_SHARE as i128, denominator)
        .unwrap_or_default()
        .clamp(0, FULL_SHARE as i128) as u32
}

/// `floor(share * total)` with the share in hundredths.
fn apply_share(share_hundredths: u32, total: u64) -> u64 {
    (share_hundredths as u128 * total as u128 / FULL_SHARE as u128) as u64
}
