//! Request-level orchestration: fetch from a [`RecordSource`], run an engine.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use super::{
    aggregate_service::{AggregateResult, AggregateService},
    analytics_service::{AnalyticsInput, AnalyticsService, MonthOverMonth},
    digest_service::{DailyConsult, DailyReport, DigestService},
    pacing_service::PacingAdvisory,
    recommend_service::{AllocationResult, RecommendService},
};
use crate::{
    config::EngineConfig,
    core::ratio::Ratio,
    errors::{InsightError, Result},
    ledger::{category, AmountRange, Category, DateWindow, MonetaryRecord, RecordFilter, RecordKind},
    storage::RecordSource,
};

pub type RecommendResponse = AllocationResult;

/// Analytics in the shape clients consume.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AnalyticsResponse {
    pub spend_per_last_month: MonthOverMonth,
    pub spend_per_last_weekdays: Ratio,
    pub spend_per_others: Ratio,
}

/// Filters for listing a user's spends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpendSearch {
    pub window: DateWindow,
    pub category: Option<String>,
    pub amounts: Option<AmountRange>,
}

impl SpendSearch {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        Ok(Self {
            window: DateWindow::new(start, end)?,
            category: None,
            amounts: None,
        })
    }

    pub fn category(mut self, name: impl Into<String>) -> Self {
        self.category = Some(name.into());
        self
    }

    pub fn amounts(mut self, min: u64, max: u64) -> Result<Self> {
        self.amounts = Some(AmountRange::new(min, max)?);
        Ok(self)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SpendSearchResult {
    pub records: Vec<MonetaryRecord>,
    pub summary: AggregateResult,
}

/// Entry point for every insight request against one record source.
pub struct InsightService<S: RecordSource> {
    source: S,
    config: EngineConfig,
}

impl<S: RecordSource> InsightService<S> {
    pub fn new(source: S, config: EngineConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Splits `amount` across categories by everyone's historical spend.
    pub fn recommend(&self, amount: i64) -> Result<RecommendResponse> {
        if amount <= 0 {
            return Err(InsightError::InvalidAmount(amount));
        }
        let categories = self.source.list_categories()?;
        let spends = self
            .source
            .fetch_records(RecordKind::Spend, &RecordFilter::new())?;
        let history = AggregateService::by_category(&spends, &categories, &RecordFilter::new());
        let result = RecommendService::recommend(amount, &history, &self.config)?;
        info!(
            amount,
            categories = result.entries.len(),
            others = result.others,
            "recommendation served"
        );
        Ok(result)
    }

    pub fn analytics(&self, user: Uuid, today: NaiveDate) -> Result<AnalyticsResponse> {
        let categories = self.source.list_categories()?;
        let mine = RecordFilter::new().user(user);
        let others = RecordFilter::new().others_than(user);
        let user_spends = self.source.fetch_records(RecordKind::Spend, &mine)?;
        let other_spends = self.source.fetch_records(RecordKind::Spend, &others)?;
        let user_budgets = self.source.fetch_records(RecordKind::Budget, &mine)?;
        let other_budgets = self.source.fetch_records(RecordKind::Budget, &others)?;

        let input = AnalyticsInput {
            user_spends: &user_spends,
            other_spends: &other_spends,
            categories: &categories,
            user_budgets: &user_budgets,
            other_budgets: &other_budgets,
            today,
        };
        let result = AnalyticsService::analyze(&input, self.config.day_count);
        Ok(AnalyticsResponse {
            spend_per_last_month: result.month_over_month,
            spend_per_last_weekdays: result.weekday,
            spend_per_others: result.peer.ratio,
        })
    }

    /// Overall daily allowance for the user's current plan.
    pub fn pace(&self, user: Uuid, today: NaiveDate) -> Result<PacingAdvisory> {
        Ok(self.consult(user, today)?.overall)
    }

    pub fn consult(&self, user: Uuid, today: NaiveDate) -> Result<DailyConsult> {
        let (categories, budgets, spends) = self.user_records(user)?;
        DigestService::consult(&budgets, &spends, &categories, today, &self.config)
    }

    pub fn report(&self, user: Uuid, today: NaiveDate) -> Result<DailyReport> {
        let (categories, budgets, spends) = self.user_records(user)?;
        DigestService::report(&budgets, &spends, &categories, today, &self.config)
    }

    pub fn search_spends(&self, user: Uuid, search: &SpendSearch) -> Result<SpendSearchResult> {
        let mut filter = RecordFilter::new().user(user).window(search.window);
        if let Some(name) = &search.category {
            let categories = self.source.list_categories()?;
            let category = category::find_by_name(&categories, name)
                .ok_or_else(|| InsightError::UnknownCategory(name.trim().to_string()))?;
            filter = filter.category(category.id);
        }
        filter.amounts = search.amounts;

        let records = self.source.fetch_records(RecordKind::Spend, &filter)?;
        let summary = AggregateService::aggregate_all(&records);
        debug!(%user, matched = summary.count, "spend search");
        Ok(SpendSearchResult { records, summary })
    }

    fn user_records(
        &self,
        user: Uuid,
    ) -> Result<(Vec<Category>, Vec<MonetaryRecord>, Vec<MonetaryRecord>)> {
        let mine = RecordFilter::new().user(user);
        Ok((
            self.source.list_categories()?,
            self.source.fetch_records(RecordKind::Budget, &mine)?,
            self.source.fetch_records(RecordKind::Spend, &mine)?,
        ))
    }
}
