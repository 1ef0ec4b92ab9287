//! Morning consult and evening report for a single user.
//!
//! Both digests work on the user's current budget plan: the period of the
//! budget record that starts last. Delivery of the rendered text is left to
//! the caller.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use super::{
    aggregate_service::AggregateService,
    pacing_service::{PacingAdvisory, PacingService, PacingTier, Severity},
};
use crate::{
    config::EngineConfig,
    core::ratio::Ratio,
    errors::{InsightError, Result},
    ledger::{Category, DateWindow, MonetaryRecord, RecordFilter, RecordKind},
    utils::rounding,
};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryPacing {
    pub category: String,
    pub budget_total: u64,
    pub spent: u64,
    pub advisory: PacingAdvisory,
}

/// How much can still be spent today, overall and per category.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DailyConsult {
    pub as_of: NaiveDate,
    pub plan: DateWindow,
    pub budget_total: u64,
    pub spent: u64,
    pub overall: PacingAdvisory,
    pub per_category: Vec<CategoryPacing>,
}

impl DailyConsult {
    pub fn render(&self) -> String {
        let overall = &self.overall;
        let headline = match overall.severity {
            Severity::OverBudget => format!(
                "Today's allowance: {} (minimum), {} by the numbers. The total budget is already exceeded.",
                group_digits(overall.daily_allowance),
                group_digits(overall.raw_daily)
            ),
            Severity::NearLimit => format!(
                "Today's allowance: {} (minimum), {} by the numbers. The total budget is nearly spent.",
                group_digits(overall.daily_allowance),
                group_digits(overall.raw_daily)
            ),
            Severity::Healthy => format!(
                "Today's allowance: {}. There is room left in the budget.",
                group_digits(overall.daily_allowance)
            ),
        };
        let categories = self.per_category.iter().map(|line| {
            let advisory = &line.advisory;
            match advisory.severity {
                Severity::OverBudget => format!(
                    "{}: {} (minimum), {} by the numbers. This category is over budget.",
                    line.category,
                    group_digits(advisory.daily_allowance),
                    group_digits(advisory.raw_daily)
                ),
                Severity::NearLimit => format!(
                    "{}: {} (minimum), {} by the numbers. This category is close to its limit.",
                    line.category,
                    group_digits(advisory.daily_allowance),
                    group_digits(advisory.raw_daily)
                ),
                Severity::Healthy => format!(
                    "{}: {}. On track.",
                    line.category,
                    group_digits(advisory.daily_allowance)
                ),
            }
        });
        std::iter::once(headline)
            .chain(categories)
            .map(|line| line + "\n")
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryReport {
    pub category: String,
    pub budget_total: u64,
    /// The plan's category budget spread evenly over the month.
    pub fit_spend: i64,
    pub spent_today: u64,
    /// Today's spend as a share of `fit_spend`.
    pub risk: Ratio,
}

/// What was spent today against what the plan allows per day.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub plan: DateWindow,
    pub today_total: u64,
    pub per_category: Vec<CategoryReport>,
}

impl DailyReport {
    pub fn render(&self) -> String {
        let headline = format!("Spent today: {}", group_digits(self.today_total as i64));
        let categories = self.per_category.iter().map(|line| {
            format!(
                "{}: budget {}, fitting {}, spent {}, risk {}",
                line.category,
                group_digits(line.budget_total as i64),
                group_digits(line.fit_spend),
                group_digits(line.spent_today as i64),
                line.risk
            )
        });
        std::iter::once(headline)
            .chain(categories)
            .map(|line| line + "\n")
            .collect()
    }
}

pub struct DigestService;

impl DigestService {
    /// Period of the latest-starting budget, ties going to the later end.
    pub fn current_plan(budgets: &[MonetaryRecord]) -> Option<DateWindow> {
        budgets
            .iter()
            .filter(|record| record.kind == RecordKind::Budget)
            .max_by_key(|record| (record.start, record.end))
            .map(|record| DateWindow {
                start: record.start,
                end: record.end,
            })
    }

    pub fn consult(
        budgets: &[MonetaryRecord],
        spends: &[MonetaryRecord],
        categories: &[Category],
        today: NaiveDate,
        config: &EngineConfig,
    ) -> Result<DailyConsult> {
        let plan = Self::plan_or_error(budgets)?;
        let in_plan = RecordFilter::new().window(plan);

        let budget_total = AggregateService::sum(budgets, &in_plan);
        let spent = AggregateService::sum(spends, &in_plan);
        let overall = PacingService::pace_window(
            &plan,
            spent,
            budget_total,
            today,
            PacingTier::Overall,
            config,
        );

        let per_category = categories
            .iter()
            .map(|category| {
                let scoped = in_plan.clone().category(category.id);
                let budget_total = AggregateService::sum(budgets, &scoped);
                let spent = AggregateService::sum(spends, &scoped);
                CategoryPacing {
                    category: category.name.clone(),
                    budget_total,
                    spent,
                    advisory: PacingService::pace_window(
                        &plan,
                        spent,
                        budget_total,
                        today,
                        PacingTier::Category,
                        config,
                    ),
                }
            })
            .collect();

        debug!(%today, severity = ?overall.severity, "daily consult prepared");
        Ok(DailyConsult {
            as_of: today,
            plan,
            budget_total,
            spent,
            overall,
            per_category,
        })
    }

    pub fn report(
        budgets: &[MonetaryRecord],
        spends: &[MonetaryRecord],
        categories: &[Category],
        today: NaiveDate,
        config: &EngineConfig,
    ) -> Result<DailyReport> {
        let plan = Self::plan_or_error(budgets)?;
        let in_plan = RecordFilter::new().window(plan);
        let on_today = RecordFilter::new().on(today);
        let month_days = config.day_count.days_in(today) as i64;

        let per_category = categories
            .iter()
            .map(|category| {
                let budget_total =
                    AggregateService::sum(budgets, &in_plan.clone().category(category.id));
                let spent_today =
                    AggregateService::sum(spends, &on_today.clone().category(category.id));
                let fit_spend =
                    rounding::round_to_unit(budget_total as i64, month_days, config.rounding_unit)
                        .unwrap_or(0);
                let risk = if fit_spend > 0 {
                    Ratio::of(spent_today, fit_spend as u64)
                } else {
                    Ratio::NoData
                };
                CategoryReport {
                    category: category.name.clone(),
                    budget_total,
                    fit_spend,
                    spent_today,
                    risk,
                }
            })
            .collect();

        Ok(DailyReport {
            date: today,
            plan,
            today_total: AggregateService::sum(spends, &on_today),
            per_category,
        })
    }

    fn plan_or_error(budgets: &[MonetaryRecord]) -> Result<DateWindow> {
        Self::current_plan(budgets).ok_or_else(|| {
            warn!("digest requested for a user without budgets");
            InsightError::InsufficientData("no budget plan recorded for this user".into())
        })
    }
}

/// Formats an amount with thousands separators, e.g. `-13,600`.
pub fn group_digits(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
