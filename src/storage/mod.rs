pub mod json_backend;
pub mod snapshot;

use crate::{
    errors::Result,
    ledger::{Category, MonetaryRecord, RecordFilter, RecordKind},
};

/// Query handed to a [`RecordSource`]; the same predicate the aggregator applies.
pub type RecordQuery = RecordFilter;

/// Read access to categories and monetary records, whatever holds them.
pub trait RecordSource {
    fn fetch_records(&self, kind: RecordKind, query: &RecordQuery) -> Result<Vec<MonetaryRecord>>;

    fn list_categories(&self) -> Result<Vec<Category>>;
}

impl<T: RecordSource + ?Sized> RecordSource for &T {
    fn fetch_records(&self, kind: RecordKind, query: &RecordQuery) -> Result<Vec<MonetaryRecord>> {
        (**self).fetch_records(kind, query)
    }

    fn list_categories(&self) -> Result<Vec<Category>> {
        (**self).list_categories()
    }
}

pub use json_backend::{load_snapshot_from_path, save_snapshot_to_path, JsonStorage};
pub use snapshot::{SnapshotStore, SNAPSHOT_SCHEMA_VERSION};
