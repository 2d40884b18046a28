use crate::config::PolicyConfig;
use crate::domain::policy::{HeuristicPolicy, LinkTextMatch};
use crate::domain::ports::ConfigProvider;
use crate::report::ReportFormat;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const DEFAULT_FORMATS: &[ReportFormat] = &[ReportFormat::Csv, ReportFormat::Html];

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "preflight-a11y")]
#[command(about = "Accessibility pre-flight checks for .docx, .pptx and .pdf files")]
pub struct CliConfig {
    /// Documents to check, reported in the order given
    #[arg(required = true)]
    pub files: Vec<String>,

    #[arg(long, help = "Directory for report files [default: ./output]")]
    pub output_path: Option<String>,

    #[arg(long, value_delimiter = ',', help = "Report formats: csv, html, json [default: csv,html]")]
    pub formats: Vec<ReportFormat>,

    #[arg(long, help = "TOML policy file")]
    pub config: Option<String>,

    #[arg(long, help = "Vague link text matching: exact or contains")]
    pub link_match: Option<LinkTextMatch>,

    #[arg(long, help = "Also pack every report into accessibility_report.zip")]
    pub bundle: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(skip)]
    #[serde(skip)]
    policy: HeuristicPolicy,
}

impl CliConfig {
    /// Folds in the policy file, if any. Command-line values win over the file.
    pub fn resolve(&mut self, file: Option<&PolicyConfig>) {
        self.policy = file
            .map(PolicyConfig::heuristic_policy)
            .unwrap_or_default();

        if let Some(report) = file.and_then(|f| f.report.as_ref()) {
            if self.output_path.is_none() {
                self.output_path = report.output_path.clone();
            }
            if self.formats.is_empty() {
                if let Some(formats) = &report.formats {
                    self.formats = formats.clone();
                }
            }
            self.bundle |= report.bundle.unwrap_or(false);
        }

        if let Some(mode) = self.link_match {
            self.policy.link_text.mode = mode;
        }
    }
}

impl ConfigProvider for CliConfig {
    fn input_files(&self) -> &[String] {
        &self.files
    }

    fn output_path(&self) -> &str {
        self.output_path.as_deref().unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    fn report_formats(&self) -> Vec<ReportFormat> {
        let mut formats = Vec::new();
        let chosen: &[ReportFormat] = if self.formats.is_empty() {
            DEFAULT_FORMATS
        } else {
            &self.formats
        };
        for format in chosen {
            if !formats.contains(format) {
                formats.push(*format);
            }
        }
        formats
    }

    fn bundle_reports(&self) -> bool {
        self.bundle
    }

    fn policy(&self) -> &HeuristicPolicy {
        &self.policy
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_list("files", &self.files)?;
        for file in &self.files {
            validation::validate_non_empty_string("files", file)?;
        }
        validation::validate_path("output_path", self.output_path())?;
        self.policy.validate()
    }
}
