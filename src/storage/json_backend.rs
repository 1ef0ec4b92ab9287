use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use super::snapshot::SnapshotStore;
use crate::{
    config::{app_data_dir, tmp_path, write_file},
    errors::{InsightError, Result},
};

const SNAPSHOT_DIR: &str = "snapshots";
const SNAPSHOT_EXTENSION: &str = "json";

/// Named snapshots kept under `<base>/snapshots/<name>.json`.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    snapshots_dir: PathBuf,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let base = root.unwrap_or_else(app_data_dir);
        let snapshots_dir = base.join(SNAPSHOT_DIR);
        fs::create_dir_all(&snapshots_dir)?;
        Ok(Self { snapshots_dir })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn snapshot_path(&self, name: &str) -> PathBuf {
        self.snapshots_dir
            .join(format!("{}.{}", canonical_name(name), SNAPSHOT_EXTENSION))
    }

    pub fn save(&self, store: &SnapshotStore, name: &str) -> Result<PathBuf> {
        let path = self.snapshot_path(name);
        save_snapshot_to_path(store, &path)?;
        Ok(path)
    }

    pub fn load(&self, name: &str) -> Result<SnapshotStore> {
        let path = self.snapshot_path(name);
        if !path.exists() {
            return Err(InsightError::Storage(format!(
                "snapshot `{}` not found at {}",
                name,
                path.display()
            )));
        }
        load_snapshot_from_path(&path)
    }

    /// Names of the stored snapshots, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.snapshots_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(SNAPSHOT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

pub fn save_snapshot_to_path(store: &SnapshotStore, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(store)?;
    let tmp = tmp_path(path);
    write_file(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    info!(
        path = %path.display(),
        records = store.record_count(),
        "snapshot saved"
    );
    Ok(())
}

pub fn load_snapshot_from_path(path: &Path) -> Result<SnapshotStore> {
    let data = fs::read_to_string(path)?;
    let store: SnapshotStore = serde_json::from_str(&data)?;
    debug!(
        path = %path.display(),
        categories = store.categories.len(),
        records = store.record_count(),
        "snapshot loaded"
    );
    Ok(store)
}

fn canonical_name(name: &str) -> String {
    let trimmed = name.trim();
    let mut canonical = String::with_capacity(trimmed.len());
    for ch in trimmed.chars() {
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
            canonical.push(ch.to_ascii_lowercase());
        } else if ch.is_whitespace() {
            canonical.push('_');
        }
    }
    if canonical.is_empty() {
        "snapshot".into()
    } else {
        canonical
    }
}
