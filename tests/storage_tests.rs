mod common;

use budget_insight::{
    ledger::{RecordFilter, RecordKind},
    storage::{load_snapshot_from_path, JsonStorage, RecordSource},
    InsightError,
};
use tempfile::TempDir;

use common::{household, write_snapshot};

#[test]
fn snapshot_round_trip_preserves_records() {
    let fixture = household();
    let (_guard, path) = write_snapshot(&fixture.store);

    let loaded = load_snapshot_from_path(&path).unwrap();
    assert_eq!(loaded, fixture.store);
    assert!(!path.with_extension("json.tmp").exists());

    let mine = loaded
        .fetch_records(RecordKind::Spend, &RecordFilter::new().user(fixture.me))
        .unwrap();
    assert_eq!(mine.len(), 6);
    assert!(mine.iter().any(|spend| spend.memo.as_deref() == Some("groceries")));
}

#[test]
fn named_snapshots_are_listed_and_reloaded() {
    let temp = TempDir::new().unwrap();
    let storage = JsonStorage::new(Some(temp.path().to_path_buf())).unwrap();
    let fixture = household();

    storage.save(&fixture.store, "Household 2023").unwrap();
    storage.save(&fixture.store, "archive").unwrap();

    assert_eq!(storage.list().unwrap(), vec!["archive", "household_2023"]);
    assert_eq!(storage.load("household 2023").unwrap(), fixture.store);
}

#[test]
fn missing_and_corrupt_snapshots_are_storage_errors() {
    let temp = TempDir::new().unwrap();
    let storage = JsonStorage::new(Some(temp.path().to_path_buf())).unwrap();
    assert!(matches!(
        storage.load("nothing"),
        Err(InsightError::Storage(_))
    ));

    let broken = temp.path().join("broken.json");
    std::fs::write(&broken, "{ not json").unwrap();
    assert!(matches!(
        load_snapshot_from_path(&broken),
        Err(InsightError::Storage(_))
    ));
}

#[test]
fn snapshots_without_schema_version_still_load() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("legacy.json");
    std::fs::write(&path, r#"{"categories": [], "spends": []}"#).unwrap();

    let loaded = load_snapshot_from_path(&path).unwrap();
    assert_eq!(loaded.schema_version, 1);
    assert!(loaded.budgets.is_empty());
}
