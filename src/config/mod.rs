use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    errors::{InsightError, Result},
    ledger::DayCountPolicy,
};

const DEFAULT_DIR_NAME: &str = ".budget_insight";
const HOME_ENV: &str = "BUDGET_INSIGHT_HOME";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

/// Tunable constants of the recommendation and pacing engines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineConfig {
    /// Categories whose share is at or below this many hundredths fold into `others`.
    #[serde(default = "EngineConfig::default_others_threshold")]
    pub others_threshold_hundredths: u32,
    /// Minimum daily allowance suggested for the overall budget.
    #[serde(default = "EngineConfig::default_overall_floor")]
    pub overall_floor: i64,
    /// Minimum daily allowance suggested per category.
    #[serde(default = "EngineConfig::default_category_floor")]
    pub category_floor: i64,
    /// Daily allowances are rounded to the nearest multiple of this unit.
    #[serde(default = "EngineConfig::default_rounding_unit")]
    pub rounding_unit: i64,
    #[serde(default)]
    pub day_count: DayCountPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            others_threshold_hundredths: Self::default_others_threshold(),
            overall_floor: Self::default_overall_floor(),
            category_floor: Self::default_category_floor(),
            rounding_unit: Self::default_rounding_unit(),
            day_count: DayCountPolicy::default(),
        }
    }
}

impl EngineConfig {
    pub fn default_others_threshold() -> u32 {
        10
    }

    pub fn default_overall_floor() -> i64 {
        10_000
    }

    pub fn default_category_floor() -> i64 {
        5_000
    }

    pub fn default_rounding_unit() -> i64 {
        100
    }

    /// Rejects values the engines cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.others_threshold_hundredths > 100 {
            return Err(InsightError::Config(format!(
                "others threshold must be at most 100 hundredths, got {}",
                self.others_threshold_hundredths
            )));
        }
        if self.overall_floor < 0 || self.category_floor < 0 {
            return Err(InsightError::Config("advisory floors must not be negative".into()));
        }
        if self.rounding_unit <= 0 {
            return Err(InsightError::Config(format!(
                "rounding unit must be positive, got {}",
                self.rounding_unit
            )));
        }
        Ok(())
    }
}

/// Loads and stores [`EngineConfig`] under the application data directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        let config_dir = base.join(CONFIG_DIR);
        fs::create_dir_all(&config_dir)?;
        Ok(Self {
            path: config_dir.join(CONFIG_FILE),
        })
    }

    pub fn load(&self) -> Result<EngineConfig> {
        if !self.path.exists() {
            return Ok(EngineConfig::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: EngineConfig = serde_json::from_str(&data)
            .map_err(|err| InsightError::Config(format!("{}: {err}", self.path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &EngineConfig) -> Result<()> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_file(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Application data directory, `~/.budget_insight` unless `BUDGET_INSIGHT_HOME` is set.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

pub(crate) fn write_file(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
