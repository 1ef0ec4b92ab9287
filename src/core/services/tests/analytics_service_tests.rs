use uuid::Uuid;

use super::{categories, date};
use crate::core::ratio::Ratio;
use crate::core::services::{AnalyticsInput, AnalyticsService};
use crate::ledger::{DayCountPolicy, MonetaryRecord};

#[test]
fn month_over_month_compares_matching_stretches() {
    let universe = categories(&["food", "house", "misc"]);
    let (food, house) = (universe[0].id, universe[1].id);
    let me = Uuid::new_v4();
    let spends = vec![
        MonetaryRecord::spend(me, food, 30_000, date(2023, 11, 5)),
        MonetaryRecord::spend(me, house, 90_000, date(2023, 11, 10)),
        MonetaryRecord::spend(me, food, 20_000, date(2023, 10, 3)),
        MonetaryRecord::spend(me, house, 100_000, date(2023, 10, 15)),
        // Past the matching day of last month.
        MonetaryRecord::spend(me, house, 70_000, date(2023, 10, 25)),
    ];

    let result = AnalyticsService::month_over_month(&spends, &universe, date(2023, 11, 20));
    assert_eq!(result.total, Ratio::Percent(100));
    assert_eq!(result.category("food"), Some(Ratio::Percent(150)));
    assert_eq!(result.category("house"), Some(Ratio::Percent(90)));
    assert_eq!(result.category("misc"), Some(Ratio::NoData));
    assert_eq!(
        serde_json::to_string(&result).unwrap(),
        r#"{"total":"100%","food":"150%","house":"90%","misc":"No Data"}"#
    );
}

#[test]
fn month_over_month_clamps_to_the_shorter_prior_month() {
    let universe = categories(&["food"]);
    let me = Uuid::new_v4();
    let spends = vec![
        MonetaryRecord::spend(me, universe[0].id, 5_000, date(2024, 3, 31)),
        MonetaryRecord::spend(me, universe[0].id, 10_000, date(2024, 2, 29)),
    ];

    let result = AnalyticsService::month_over_month(&spends, &universe, date(2024, 3, 31));
    assert_eq!(result.total, Ratio::Percent(50));
}

#[test]
fn weekday_history_excludes_today_and_later_days() {
    let food = Uuid::new_v4();
    let me = Uuid::new_v4();
    // 2023-11-20 is a Monday.
    let spends = vec![
        MonetaryRecord::spend(me, food, 20_000, date(2023, 11, 20)),
        MonetaryRecord::spend(me, food, 10_000, date(2023, 11, 13)),
        MonetaryRecord::spend(me, food, 30_000, date(2023, 11, 6)),
        MonetaryRecord::spend(me, food, 50_000, date(2023, 11, 14)),
        MonetaryRecord::spend(me, food, 99_999, date(2023, 11, 27)),
    ];

    assert_eq!(
        AnalyticsService::weekday_ratio(&spends, date(2023, 11, 20)),
        Ratio::Percent(50)
    );
    assert_eq!(
        AnalyticsService::weekday_ratio(&spends[..1], date(2023, 11, 20)),
        Ratio::NoData
    );
}

#[test]
fn peer_pacing_relates_both_cohorts() {
    let food = Uuid::new_v4();
    let me = Uuid::new_v4();
    let peer = Uuid::new_v4();
    let today = date(2023, 11, 20);
    let (start, end) = (date(2023, 11, 1), date(2023, 11, 30));

    let user_spends = vec![
        MonetaryRecord::spend(me, food, 3_000, today),
        MonetaryRecord::spend(me, food, 5_000, today),
    ];
    let user_budgets = vec![MonetaryRecord::budget(me, food, 300_000, start, end)];
    let other_spends = vec![MonetaryRecord::spend(peer, food, 5_000, today)];
    let other_budgets = vec![
        MonetaryRecord::budget(peer, food, 300_000, start, end),
        MonetaryRecord::budget(peer, food, 300_000, start, end),
    ];
    let input = AnalyticsInput {
        user_spends: &user_spends,
        other_spends: &other_spends,
        categories: &[],
        user_budgets: &user_budgets,
        other_budgets: &other_budgets,
        today,
    };

    let peer = AnalyticsService::peer_comparison(&input, DayCountPolicy::ListedMonths);
    assert_eq!(peer.user_percent, Some(40));
    assert_eq!(peer.other_percent, Some(50));
    assert_eq!(peer.ratio, Ratio::Percent(80));

    let without_peer_budgets = AnalyticsInput {
        other_budgets: &[],
        ..input
    };
    let peer = AnalyticsService::peer_comparison(&without_peer_budgets, DayCountPolicy::ListedMonths);
    assert_eq!(peer.other_percent, None);
    assert_eq!(peer.ratio, Ratio::NoData);
}

#[test]
fn combining_percents_is_relative_to_the_peers() {
    assert_eq!(AnalyticsService::combine_percents(60, 50), Ratio::Percent(120));
    assert_eq!(AnalyticsService::combine_percents(50, 50), Ratio::Percent(100));
    assert_eq!(AnalyticsService::combine_percents(25, 50), Ratio::Percent(50));
    assert_eq!(AnalyticsService::combine_percents(10, 0), Ratio::NoData);
}

#[test]
fn analysis_is_idempotent() {
    let universe = categories(&["food", "house"]);
    let me = Uuid::new_v4();
    let peer = Uuid::new_v4();
    let today = date(2023, 11, 20);
    let user_spends = vec![
        MonetaryRecord::spend(me, universe[0].id, 7_000, today),
        MonetaryRecord::spend(me, universe[1].id, 12_000, date(2023, 10, 2)),
    ];
    let other_spends = vec![MonetaryRecord::spend(peer, universe[0].id, 9_000, today)];
    let budgets = vec![MonetaryRecord::budget(
        me,
        universe[0].id,
        90_000,
        date(2023, 11, 1),
        date(2023, 11, 30),
    )];
    let input = AnalyticsInput {
        user_spends: &user_spends,
        other_spends: &other_spends,
        categories: &universe,
        user_budgets: &budgets,
        other_budgets: &budgets,
        today,
    };

    let first = serde_json::to_string(&AnalyticsService::analyze(&input, DayCountPolicy::default()))
        .unwrap();
    let second =
        serde_json::to_string(&AnalyticsService::analyze(&input, DayCountPolicy::default()))
            .unwrap();
    assert_eq!(first, second);
}
