//! Month-over-month, weekday and peer pacing comparisons.

use chrono::{Datelike, NaiveDate};
use serde::{ser::SerializeMap, Serialize, Serializer};
use tracing::debug;

use super::aggregate_service::{AggregateResult, AggregateService};
use crate::{
    core::ratio::Ratio,
    ledger::{Category, DateWindow, DayCountPolicy, MonetaryRecord, RecordFilter},
    utils::rounding,
};

const TOTAL_KEY: &str = "total";

/// Everything one analytics request needs, fetched by the caller beforehand.
#[derive(Debug, Clone, Copy)]
pub struct AnalyticsInput<'a> {
    pub user_spends: &'a [MonetaryRecord],
    pub other_spends: &'a [MonetaryRecord],
    pub categories: &'a [Category],
    pub user_budgets: &'a [MonetaryRecord],
    pub other_budgets: &'a [MonetaryRecord],
    pub today: NaiveDate,
}

/// Serializes as `{"total": ..., "<category>": ...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthOverMonth {
    pub total: Ratio,
    pub per_category: Vec<(String, Ratio)>,
}

impl MonthOverMonth {
    pub fn category(&self, name: &str) -> Option<Ratio> {
        self.per_category
            .iter()
            .find(|(category, _)| category == name)
            .map(|(_, ratio)| *ratio)
    }
}

impl Serialize for MonthOverMonth {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.per_category.len() + 1))?;
        map.serialize_entry(TOTAL_KEY, &self.total)?;
        for (category, ratio) in &self.per_category {
            map.serialize_entry(category, ratio)?;
        }
        map.end()
    }
}

/// Daily pacing of the user against everyone else.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PeerComparison {
    pub user_percent: Option<i64>,
    pub other_percent: Option<i64>,
    pub ratio: Ratio,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AnalyticsResult {
    pub month_over_month: MonthOverMonth,
    pub weekday: Ratio,
    pub peer: PeerComparison,
}

pub struct AnalyticsService;

impl AnalyticsService {
    pub fn analyze(input: &AnalyticsInput<'_>, day_count: DayCountPolicy) -> AnalyticsResult {
        let result = AnalyticsResult {
            month_over_month: Self::month_over_month(
                input.user_spends,
                input.categories,
                input.today,
            ),
            weekday: Self::weekday_ratio(input.user_spends, input.today),
            peer: Self::peer_comparison(input, day_count),
        };
        debug!(
            today = %input.today,
            total = %result.month_over_month.total,
            weekday = %result.weekday,
            peer = %result.peer.ratio,
            "spend analytics computed"
        );
        result
    }

    /// This month to date against the same stretch of last month.
    pub fn month_over_month(
        spends: &[MonetaryRecord],
        categories: &[Category],
        today: NaiveDate,
    ) -> MonthOverMonth {
        let current = RecordFilter::new().window(DateWindow::month_to_date(today));
        let prior = RecordFilter::new().window(DateWindow::prior_month_to_date(today));

        let ratio = |current: &RecordFilter, prior: &RecordFilter| {
            Ratio::of(
                AggregateService::sum(spends, current),
                AggregateService::sum(spends, prior),
            )
        };

        let per_category = categories
            .iter()
            .map(|category| {
                let ratio = ratio(
                    &current.clone().category(category.id),
                    &prior.clone().category(category.id),
                );
                (category.name.clone(), ratio)
            })
            .collect();

        MonthOverMonth {
            total: ratio(&current, &prior),
            per_category,
        }
    }

    /// Today's spend against all earlier spend on the same weekday.
    pub fn weekday_ratio(spends: &[MonetaryRecord], today: NaiveDate) -> Ratio {
        let weekday = today.weekday();
        let today_sum = AggregateService::sum(spends, &RecordFilter::new().on(today));
        let history_sum = spends
            .iter()
            .filter(|spend| spend.date() < today && spend.date().weekday() == weekday)
            .map(|spend| spend.amount)
            .sum::<u64>();
        Ratio::of(today_sum, history_sum)
    }

    pub fn peer_comparison(input: &AnalyticsInput<'_>, day_count: DayCountPolicy) -> PeerComparison {
        let user_percent = Self::cohort_pacing_percent(
            input.user_spends,
            input.user_budgets,
            input.today,
            day_count,
        );
        let other_percent = Self::cohort_pacing_percent(
            input.other_spends,
            input.other_budgets,
            input.today,
            day_count,
        );
        let ratio = match (user_percent, other_percent) {
            (Some(user), Some(other)) => Self::combine_percents(user, other),
            _ => Ratio::NoData,
        };
        PeerComparison {
            user_percent,
            other_percent,
            ratio,
        }
    }

    /// Today's average spend as a percentage of the cohort's average daily budget.
    ///
    /// `None` when the cohort spent nothing today or has no budget active this month.
    pub fn cohort_pacing_percent(
        spends: &[MonetaryRecord],
        budgets: &[MonetaryRecord],
        today: NaiveDate,
        day_count: DayCountPolicy,
    ) -> Option<i64> {
        let spent_today = AggregateService::aggregate(spends, &RecordFilter::new().on(today));
        let month = DateWindow::calendar_month(today);
        let (budget_sum, budget_count) = budgets
            .iter()
            .filter(|budget| budget.overlaps(&month))
            .fold((0u64, 0u64), |(sum, count), budget| {
                (sum.saturating_add(budget.amount), count + 1)
            });
        let active = AggregateResult::from_parts(budget_sum, budget_count);
        if !spent_today.has_data() || !active.has_data() {
            return None;
        }

        // (spent / n_spent) / ((budget / n_budget) / days) * 100, kept exact.
        let days = day_count.days_in(today) as i128;
        let numer = spent_today.sum as i128 * active.count as i128 * days * 100;
        let denom = spent_today.count as i128 * active.sum as i128;
        rounding::div_round(numer, denom).map(|value| value as i64)
    }

    /// Expresses the user's pacing relative to the cohort's, 100% meaning equal.
    pub fn combine_percents(user_percent: i64, other_percent: i64) -> Ratio {
        if other_percent == 0 {
            return Ratio::NoData;
        }
        let delta = user_percent - other_percent;
        let relative = |gap: i64| {
            rounding::div_round(gap as i128 * 100, other_percent as i128).map(|value| value as i64)
        };
        match delta.signum() {
            1 => relative(delta).map(|value| 100 + value).into(),
            0 => Ratio::Percent(100),
            _ => relative(delta.abs()).map(|value| 100 - value).into(),
        }
    }
}
