use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_VAGUE_LINK_PHRASES: &[&str] = &["here", "click here", "read more"];
pub const DEFAULT_LARGE_TEXT_SIZE: f32 = 16.0;
pub const DEFAULT_MIN_LARGE_RATIO: f64 = 0.02;

/// How run text is compared against the vague-phrase list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkTextMatch {
    /// Trimmed, lowercased run text equals a phrase.
    #[default]
    Exact,
    /// Run text contains a phrase on word boundaries.
    Contains,
}

impl fmt::Display for LinkTextMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkTextMatch::Exact => write!(f, "exact"),
            LinkTextMatch::Contains => write!(f, "contains"),
        }
    }
}

impl FromStr for LinkTextMatch {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exact" => Ok(LinkTextMatch::Exact),
            "contains" => Ok(LinkTextMatch::Contains),
            other => Err(format!("Unknown link text match mode: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkTextPolicy {
    pub mode: LinkTextMatch,
    pub phrases: Vec<String>,
}

impl Default for LinkTextPolicy {
    fn default() -> Self {
        Self {
            mode: LinkTextMatch::default(),
            phrases: DEFAULT_VAGUE_LINK_PHRASES
                .iter()
                .map(|phrase| phrase.to_string())
                .collect(),
        }
    }
}

/// Tunable constants behind the heuristic checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeuristicPolicy {
    pub link_text: LinkTextPolicy,
    /// Font size at or above which a PDF text span counts as large.
    pub large_text_size: f32,
    /// The heading warning fires when large/total is strictly below this.
    pub min_large_ratio: f64,
}

impl Default for HeuristicPolicy {
    fn default() -> Self {
        Self {
            link_text: LinkTextPolicy::default(),
            large_text_size: DEFAULT_LARGE_TEXT_SIZE,
            min_large_ratio: DEFAULT_MIN_LARGE_RATIO,
        }
    }
}

impl Validate for HeuristicPolicy {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_list("link_text.phrases", &self.link_text.phrases)?;
        for phrase in &self.link_text.phrases {
            validation::validate_non_empty_string("link_text.phrases", phrase)?;
        }
        validation::validate_range("heuristics.large_text_size", self.large_text_size, 1.0, 500.0)?;
        validation::validate_range("heuristics.min_large_ratio", self.min_large_ratio, 0.0, 1.0)?;
        Ok(())
    }
}
