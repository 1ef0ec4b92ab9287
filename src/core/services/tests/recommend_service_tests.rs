use crate::config::EngineConfig;
use crate::core::services::{AggregateResult, CategoryAggregate, RecommendService, OTHERS_KEY};
use crate::errors::InsightError;

fn history(entries: &[(&str, u64, u64)]) -> Vec<CategoryAggregate> {
    entries
        .iter()
        .map(|(name, sum, count)| CategoryAggregate {
            category: name.to_string(),
            result: AggregateResult::from_parts(*sum, *count),
        })
        .collect()
}

#[test]
fn splits_in_proportion_to_averages() {
    let history = history(&[("house", 160_000, 2), ("food", 20_000, 1)]);
    let result = RecommendService::recommend(100_000, &history, &EngineConfig::default()).unwrap();

    assert_eq!(result.get("house"), Some(80_000));
    assert_eq!(result.get("food"), Some(20_000));
    assert_eq!(result.get(OTHERS_KEY), Some(0));
    assert_eq!(
        serde_json::to_string(&result).unwrap(),
        r#"{"house":80000,"food":20000,"others":0}"#
    );
}

#[test]
fn small_shares_fold_into_others() {
    let history = history(&[("house", 900, 1), ("food", 50, 1), ("misc", 50, 1)]);
    let result = RecommendService::recommend(100_000, &history, &EngineConfig::default()).unwrap();

    assert_eq!(result.get("house"), Some(90_000));
    assert_eq!(result.get("food"), Some(0));
    assert_eq!(result.get("misc"), Some(0));
    assert_eq!(result.others_share_hundredths, 10);
    assert_eq!(result.others, 10_000);
    assert_eq!(result.folded().count(), 2);
}

#[test]
fn threshold_is_configurable() {
    let history = history(&[("house", 900, 1), ("food", 100, 1)]);
    let config = EngineConfig {
        others_threshold_hundredths: 5,
        ..EngineConfig::default()
    };
    let result = RecommendService::recommend(1_000, &history, &config).unwrap();
    assert_eq!(result.get("food"), Some(100));
    assert_eq!(result.others, 0);
}

#[test]
fn rounded_up_shares_never_exceed_the_total() {
    // 12.5 + 12.5 + 75 rounds to 101 hundredths.
    let history = history(&[("food", 32, 1), ("fun", 32, 1), ("house", 192, 1)]);
    let result = RecommendService::recommend(100_000, &history, &EngineConfig::default()).unwrap();

    assert_eq!(result.get("food"), Some(13_000));
    assert_eq!(result.get("fun"), Some(13_000));
    assert_eq!(result.get("house"), Some(74_000));
    assert_eq!(result.allocated_total(), 100_000);
}

#[test]
fn exact_half_shares_round_up() {
    // 14.5 and 85.5 hundredths both round away from zero.
    let history = history(&[("a", 145, 1), ("b", 855, 1)]);
    let result = RecommendService::recommend(100_000, &history, &EngineConfig::default()).unwrap();

    let shares: Vec<u32> = result.entries.iter().map(|entry| entry.share_hundredths).collect();
    assert_eq!(shares, vec![15, 86]);
    assert_eq!(result.get("a"), Some(15_000));
    assert_eq!(result.get("b"), Some(85_000));
    assert!(result.allocated_total() <= 100_000);
}

#[test]
fn fractional_averages_share_exactly() {
    // Averages 1/3 and 2/3 of a unit: shares 33.33.. and 66.66...
    let history = history(&[("a", 1, 3), ("b", 2, 3)]);
    let result = RecommendService::recommend(300, &history, &EngineConfig::default()).unwrap();

    let shares: Vec<u32> = result.entries.iter().map(|entry| entry.share_hundredths).collect();
    assert_eq!(shares, vec![33, 67]);
    assert_eq!(result.allocated_total(), 300);
}

#[test]
fn coprime_counts_beyond_a_common_multiple_still_split() {
    let counts: [u64; 4] = [2_305_843_009_213_693_951, 2_147_483_647, 1_000_000_007, 998_244_353];
    let history = history(&[
        ("a", counts[0] * 4, counts[0]),
        ("b", counts[1] * 3, counts[1]),
        ("c", counts[2] * 2, counts[2]),
        ("d", counts[3], counts[3]),
    ]);
    let config = EngineConfig {
        others_threshold_hundredths: 5,
        ..EngineConfig::default()
    };
    let result = RecommendService::recommend(1_000, &history, &config).unwrap();

    let shares: Vec<u32> = result.entries.iter().map(|entry| entry.share_hundredths).collect();
    assert_eq!(shares, vec![40, 30, 20, 10]);
    assert_eq!(result.allocated_total(), 1_000);
}

#[test]
fn categories_without_history_get_nothing() {
    let history = history(&[("house", 50_000, 1), ("travel", 0, 0)]);
    let result = RecommendService::recommend(10_000, &history, &EngineConfig::default()).unwrap();

    assert_eq!(result.get("house"), Some(10_000));
    assert_eq!(result.get("travel"), Some(0));
    assert_eq!(result.folded().count(), 0);
}

#[test]
fn rejects_non_positive_totals() {
    let history = history(&[("house", 1, 1)]);
    let config = EngineConfig::default();
    assert_eq!(
        RecommendService::recommend(-1, &history, &config),
        Err(InsightError::InvalidAmount(-1))
    );
    assert_eq!(
        RecommendService::recommend(0, &history, &config),
        Err(InsightError::InvalidAmount(0))
    );
}

#[test]
fn empty_history_is_insufficient() {
    let config = EngineConfig::default();
    let err = RecommendService::recommend(10_000, &[], &config).unwrap_err();
    assert!(matches!(err, InsightError::InsufficientData(_)));

    let zero_only = history(&[("house", 0, 3)]);
    let err = RecommendService::recommend(10_000, &zero_only, &config).unwrap_err();
    assert!(matches!(err, InsightError::InsufficientData(_)));
}
