//! Length tiers and their budgets
//!
//! Both the remote client and the fallback summarizer read their limits
//! from [`LengthTier::budget`], so the two paths cannot disagree on what
//! "short" or "long" means.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Requested summary length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthTier {
    Short,
    #[default]
    Medium,
    Long,
}

/// Per-tier limits shared by the remote and fallback paths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierBudget {
    /// `max_tokens` sent to the completion endpoint
    pub max_tokens: u32,
    /// Character ceiling when the fallback truncates short texts
    pub truncate_chars: usize,
    /// Character ceiling on the joined fallback summary
    pub summary_chars: usize,
    /// Length wording used in the remote prompt
    pub descriptor: &'static str,
}

const SHORT: TierBudget = TierBudget {
    max_tokens: 100,
    truncate_chars: 100,
    summary_chars: 150,
    descriptor: "brief (1-2 sentences)",
};

const MEDIUM: TierBudget = TierBudget {
    max_tokens: 200,
    truncate_chars: 200,
    summary_chars: 300,
    descriptor: "moderate (3-5 sentences)",
};

const LONG: TierBudget = TierBudget {
    max_tokens: 400,
    truncate_chars: 400,
    summary_chars: 500,
    descriptor: "detailed (a full paragraph)",
};

impl LengthTier {
    pub const ALL: [LengthTier; 3] = [LengthTier::Short, LengthTier::Medium, LengthTier::Long];

    pub fn budget(self) -> &'static TierBudget {
        match self {
            LengthTier::Short => &SHORT,
            LengthTier::Medium => &MEDIUM,
            LengthTier::Long => &LONG,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LengthTier::Short => "short",
            LengthTier::Medium => "medium",
            LengthTier::Long => "long",
        }
    }

    /// Parse a client-supplied value, treating anything unknown as the default tier
    pub fn parse_or_default(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for LengthTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown length tier
#[derive(Debug, thiserror::Error)]
#[error("Unknown summary length: {0}")]
pub struct UnknownTier(String);

impl FromStr for LengthTier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(LengthTier::Short),
            "medium" => Ok(LengthTier::Medium),
            "long" => Ok(LengthTier::Long),
            other => Err(UnknownTier(other.to_string())),
        }
    }
}
