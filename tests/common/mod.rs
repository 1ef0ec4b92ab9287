#![allow(dead_code)]

use std::path::PathBuf;

use budget_insight::{
    ledger::MonetaryRecord,
    storage::{save_snapshot_to_path, SnapshotStore},
};
use chrono::NaiveDate;
use tempfile::TempDir;
use uuid::Uuid;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Reference date of the household fixture, a Monday.
pub fn today() -> NaiveDate {
    date(2023, 11, 20)
}

pub struct Household {
    pub store: SnapshotStore,
    pub me: Uuid,
    pub peer: Uuid,
}

/// Two users sharing the categories house, food and travel, with November plans.
pub fn household() -> Household {
    let mut store = SnapshotStore::new();
    let house = store.add_category("house");
    let food = store.add_category("food");
    store.add_category("travel");
    let me = Uuid::new_v4();
    let peer = Uuid::new_v4();
    let (start, end) = (date(2023, 11, 1), date(2023, 11, 30));

    for record in [
        MonetaryRecord::budget(me, house, 240_000, start, end),
        MonetaryRecord::budget(me, food, 60_000, start, end),
        MonetaryRecord::budget(peer, house, 200_000, start, end),
        MonetaryRecord::budget(peer, food, 100_000, start, end),
        MonetaryRecord::spend(me, house, 60_000, date(2023, 10, 3)),
        MonetaryRecord::spend(me, food, 20_000, date(2023, 10, 16)),
        MonetaryRecord::spend(me, house, 80_000, date(2023, 11, 3)),
        MonetaryRecord::spend(me, food, 15_000, date(2023, 11, 4)),
        MonetaryRecord::spend(me, food, 3_000, date(2023, 11, 13)),
        MonetaryRecord::spend(me, food, 4_000, today()).with_memo("groceries"),
        MonetaryRecord::spend(peer, house, 80_000, date(2023, 11, 5)),
        MonetaryRecord::spend(peer, food, 25_000, date(2023, 11, 6)),
        MonetaryRecord::spend(peer, food, 6_000, today()),
    ] {
        store.add_record(record);
    }

    Household { store, me, peer }
}

/// Writes `store` into a fresh temp dir; keep the guard alive while the file is used.
pub fn write_snapshot(store: &SnapshotStore) -> (TempDir, PathBuf) {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().join("household.json");
    save_snapshot_to_path(store, &path).expect("write snapshot");
    (temp, path)
}
