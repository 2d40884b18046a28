use crate::domain::policy::{HeuristicPolicy, LinkTextMatch};
use crate::report::ReportFormat;
use crate::utils::error::{AuditError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional policy file. Every section and key may be omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    pub heuristics: Option<HeuristicsSection>,
    pub link_text: Option<LinkTextSection>,
    pub report: Option<ReportSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeuristicsSection {
    pub large_text_size: Option<f32>,
    pub min_large_ratio: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkTextSection {
    #[serde(rename = "match")]
    pub match_mode: Option<LinkTextMatch>,
    pub phrases: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportSection {
    pub output_path: Option<String>,
    pub formats: Option<Vec<ReportFormat>>,
    pub bundle: Option<bool>,
}

impl PolicyConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AuditError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AuditError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AuditError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// The default policy with this file's overrides applied.
    pub fn heuristic_policy(&self) -> HeuristicPolicy {
        let mut policy = HeuristicPolicy::default();

        if let Some(heuristics) = &self.heuristics {
            if let Some(size) = heuristics.large_text_size {
                policy.large_text_size = size;
            }
            if let Some(ratio) = heuristics.min_large_ratio {
                policy.min_large_ratio = ratio;
            }
        }

        if let Some(link_text) = &self.link_text {
            if let Some(mode) = link_text.match_mode {
                policy.link_text.mode = mode;
            }
            if let Some(phrases) = &link_text.phrases {
                policy.link_text.phrases = phrases.clone();
            }
        }

        policy
    }
}

impl Validate for PolicyConfig {
    fn validate(&self) -> Result<()> {
        if let Some(report) = &self.report {
            if let Some(path) = &report.output_path {
                validation::validate_path("report.output_path", path)?;
            }
            if let Some(formats) = &report.formats {
                validation::validate_non_empty_list("report.formats", formats)?;
            }
        }
        self.heuristic_policy().validate()
    }
}
