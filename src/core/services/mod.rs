pub mod aggregate_service;
pub mod analytics_service;
pub mod digest_service;
pub mod insight_service;
pub mod pacing_service;
pub mod recommend_service;

pub use aggregate_service::{AggregateResult, AggregateService, Average, CategoryAggregate};
pub use analytics_service::{
    AnalyticsInput, AnalyticsResult, AnalyticsService, MonthOverMonth, PeerComparison,
};
pub use digest_service::{
    CategoryPacing, CategoryReport, DailyConsult, DailyReport, DigestService,
};
pub use insight_service::{
    AnalyticsResponse, InsightService, RecommendResponse, SpendSearch, SpendSearchResult,
};
pub use pacing_service::{PacingAdvisory, PacingService, PacingTier, Severity};
pub use recommend_service::{AllocationEntry, AllocationResult, RecommendService, OTHERS_KEY};

#[cfg(test)]
mod tests;
