use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Seniority level of a labor category. Ordered from most junior to `Pending`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LcatLevel {
    #[default]
    I,
    II,
    III,
    IV,
    V,
    #[serde(rename = "PENDING")]
    Pending,
}

impl LcatLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LcatLevel::I => "I",
            LcatLevel::II => "II",
            LcatLevel::III => "III",
            LcatLevel::IV => "IV",
            LcatLevel::V => "V",
            LcatLevel::Pending => "PENDING",
        }
    }

    /// Positions are staffed at a concrete level; `Pending` only applies to candidates.
    pub fn is_staffable(&self) -> bool {
        !matches!(self, LcatLevel::Pending)
    }
}

impl fmt::Display for LcatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLevel(pub String);

impl fmt::Display for UnknownLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown LCAT level '{}'", self.0)
    }
}

impl std::error::Error for UnknownLevel {}

impl FromStr for LcatLevel {
    type Err = UnknownLevel;

    /// Accepts the six symbols case-insensitively, with an optional "Level " prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let symbol = trimmed
            .strip_prefix("Level ")
            .or_else(|| trimmed.strip_prefix("level "))
            .unwrap_or(trimmed)
            .trim();
        match symbol.to_ascii_uppercase().as_str() {
            "I" => Ok(LcatLevel::I),
            "II" => Ok(LcatLevel::II),
            "III" => Ok(LcatLevel::III),
            "IV" => Ok(LcatLevel::IV),
            "V" => Ok(LcatLevel::V),
            "PENDING" => Ok(LcatLevel::Pending),
            _ => Err(UnknownLevel(s.to_string())),
        }
    }
}
