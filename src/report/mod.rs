//! Report rendering for a finished batch.
//!
//! Every format carries the same two columns, `File` and `Issues`, one row
//! per document in upload order. Output is a pure function of the table.

use crate::domain::model::ResultTable;
use crate::utils::error::{AuditError, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const REPORT_BASENAME: &str = "accessibility_report";

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Csv,
    Html,
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Html => "html",
            ReportFormat::Json => "json",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", REPORT_BASENAME, self.extension())
    }

    pub fn render(&self, table: &ResultTable) -> Result<String> {
        match self {
            ReportFormat::Csv => render_csv(table),
            ReportFormat::Html => Ok(render_html(table)),
            ReportFormat::Json => render_json(table),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ReportFormat::Csv),
            "html" => Ok(ReportFormat::Html),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("Unknown report format: {}", other)),
        }
    }
}

/// Header `File,Issues`; cells are quoted when they contain separators.
pub fn render_csv(table: &ResultTable) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    // An empty table still gets its header row.
    if table.is_empty() {
        writer.write_record(["File", "Issues"])?;
    }
    for row in table.rows() {
        writer.serialize(row)?;
    }

    let bytes = writer.into_inner().map_err(|e| AuditError::ProcessingError {
        message: format!("failed to flush CSV report: {}", e.error()),
    })?;
    String::from_utf8(bytes).map_err(|e| AuditError::ProcessingError {
        message: format!("CSV report is not valid UTF-8: {}", e),
    })
}

pub fn render_html(table: &ResultTable) -> String {
    let mut html = String::new();
    html.push_str("<table border=\"1\" class=\"dataframe\">\n");
    html.push_str("  <thead>\n    <tr style=\"text-align: right;\">\n");
    html.push_str("      <th>File</th>\n      <th>Issues</th>\n");
    html.push_str("    </tr>\n  </thead>\n  <tbody>\n");

    for row in table.rows() {
        html.push_str("    <tr>\n");
        html.push_str(&format!("      <td>{}</td>\n", escape_html(&row.file)));
        html.push_str(&format!("      <td>{}</td>\n", escape_html(&row.issues)));
        html.push_str("    </tr>\n");
    }

    html.push_str("  </tbody>\n</table>\n");
    html
}

pub fn render_json(table: &ResultTable) -> Result<String> {
    Ok(serde_json::to_string_pretty(&table.rows())?)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Packs already rendered reports into a single ZIP archive.
pub fn bundle(reports: &[(String, String)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    for (name, content) in reports {
        zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
        zip.write_all(content.as_bytes())?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
