use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What the ranker returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMode {
    /// Winner plus at most one fallback.
    #[default]
    Select,
    /// Every surviving candidate, best first.
    All,
}

impl RankingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankingMode::Select => "select",
            RankingMode::All => "all",
        }
    }
}

impl FromStr for RankingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "select" => Ok(RankingMode::Select),
            "all" => Ok(RankingMode::All),
            other => Err(format!("unknown ranking mode: {}", other)),
        }
    }
}

/// Per-request ranking knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingOptions {
    pub prefer_quality: bool,
    pub higher_tier_fallback: bool,
    /// 0 = unlimited.
    pub max_size_bytes: u64,
    /// Most preferred first.
    pub languages: Vec<String>,
    pub mode: RankingMode,
}

impl Default for RankingOptions {
    fn default() -> Self {
        Self {
            prefer_quality: true,
            higher_tier_fallback: true,
            max_size_bytes: 0,
            languages: Vec::new(),
            mode: RankingMode::Select,
        }
    }
}
