//! Safe daily spend allowance for the rest of a budget period.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    config::EngineConfig,
    errors::{InsightError, RangeField, Result},
    ledger::DateWindow,
    utils::rounding,
};

/// Which advisory floor applies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PacingTier {
    Overall,
    Category,
}

impl PacingTier {
    pub fn floor(&self, config: &EngineConfig) -> i64 {
        match self {
            PacingTier::Overall => config.overall_floor,
            PacingTier::Category => config.category_floor,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    OverBudget,
    NearLimit,
    Healthy,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PacingAdvisory {
    /// Remaining budget per remaining day, possibly negative.
    pub raw_daily: i64,
    /// What to suggest: `raw_daily` when healthy, otherwise the floor.
    pub daily_allowance: i64,
    pub severity: Severity,
    pub floor_amount: i64,
    pub remaining_days: i64,
}

impl PacingAdvisory {
    pub fn floored(&self) -> bool {
        self.severity != Severity::Healthy
    }
}

pub struct PacingService;

impl PacingService {
    /// Paces `budgeted_total - spent_so_far` over the days left in the period.
    pub fn pace(
        period_start: NaiveDate,
        period_end: NaiveDate,
        spent_so_far: u64,
        budgeted_total: u64,
        as_of: NaiveDate,
        tier: PacingTier,
        config: &EngineConfig,
    ) -> Result<PacingAdvisory> {
        let period = DateWindow::new(period_start, period_end)
            .map_err(|_| InsightError::invalid_range(RangeField::Period, period_start, period_end))?;
        Ok(Self::pace_window(
            &period,
            spent_so_far,
            budgeted_total,
            as_of,
            tier,
            config,
        ))
    }

    pub fn pace_window(
        period: &DateWindow,
        spent_so_far: u64,
        budgeted_total: u64,
        as_of: NaiveDate,
        tier: PacingTier,
        config: &EngineConfig,
    ) -> PacingAdvisory {
        let remaining_days = Self::remaining_days(period, as_of);
        let left = budgeted_total as i64 - spent_so_far as i64;
        let raw_daily =
            rounding::round_to_unit(left, remaining_days, config.rounding_unit).unwrap_or(0);
        let floor_amount = tier.floor(config);

        let (severity, daily_allowance) = if raw_daily <= 0 {
            (Severity::OverBudget, floor_amount)
        } else if raw_daily < floor_amount {
            (Severity::NearLimit, floor_amount)
        } else {
            (Severity::Healthy, raw_daily)
        };

        debug!(?tier, ?severity, raw_daily, remaining_days, "pacing computed");
        PacingAdvisory {
            raw_daily,
            daily_allowance,
            severity,
            floor_amount,
            remaining_days,
        }
    }

    /// Days from `as_of` through the period end, both inclusive, never below one.
    pub fn remaining_days(period: &DateWindow, as_of: NaiveDate) -> i64 {
        ((period.end - as_of).num_days() + 1).max(1)
    }
}
