use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::utils::rounding;

const NO_DATA_LABEL: &str = "No Data";

/// A whole-number percentage, or an explicit marker that the denominator was empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ratio {
    Percent(i64),
    NoData,
}

impl Ratio {
    /// `part / whole` as a rounded percentage; `NoData` when `whole` is zero.
    pub fn of(part: u64, whole: u64) -> Self {
        rounding::percent(part, whole).into()
    }

    pub fn percent(&self) -> Option<i64> {
        match self {
            Ratio::Percent(value) => Some(*value),
            Ratio::NoData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Ratio::NoData)
    }
}

impl From<Option<i64>> for Ratio {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Ratio::NoData, Ratio::Percent)
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ratio::Percent(value) => write!(f, "{value}%"),
            Ratio::NoData => f.write_str(NO_DATA_LABEL),
        }
    }
}

impl Serialize for Ratio {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Ratio {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let trimmed = raw.trim();
        if trimmed == NO_DATA_LABEL {
            return Ok(Ratio::NoData);
        }
        trimmed
            .strip_suffix('%')
            .and_then(|digits| digits.parse::<i64>().ok())
            .map(Ratio::Percent)
            .ok_or_else(|| de::Error::custom(format!("invalid ratio `{raw}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_denominator_is_no_data() {
        assert_eq!(Ratio::of(10, 0), Ratio::NoData);
        assert_eq!(Ratio::of(0, 10), Ratio::Percent(0));
        assert_eq!(Ratio::of(15, 10), Ratio::Percent(150));
    }

    #[test]
    fn serializes_as_display_text() {
        assert_eq!(serde_json::to_string(&Ratio::Percent(85)).unwrap(), "\"85%\"");
        assert_eq!(serde_json::to_string(&Ratio::NoData).unwrap(), "\"No Data\"");
        let parsed: Ratio = serde_json::from_str("\"-12%\"").unwrap();
        assert_eq!(parsed, Ratio::Percent(-12));
        assert!(serde_json::from_str::<Ratio>("\"twelve\"").is_err());
    }
}
