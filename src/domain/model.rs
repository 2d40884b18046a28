use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Substituted when a document produced no findings at all.
pub const NO_ISSUES_FINDING: &str = "No major issues found.";

/// Separator used to join findings into the `Issues` column.
pub const ISSUE_SEPARATOR: &str = "; ";

/// Raw bytes of one uploaded file together with its declared name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedDocument {
    name: String,
    bytes: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lowercased extension of the declared name, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
    }
}

/// One human-readable accessibility observation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Finding(String);

impl Finding {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Finding {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for Finding {
    fn from(message: String) -> Self {
        Self(message)
    }
}

/// Findings for one document. `findings` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisRecord {
    filename: String,
    findings: Vec<Finding>,
}

impl AnalysisRecord {
    pub fn new(filename: impl Into<String>, findings: Vec<Finding>) -> Self {
        let findings = if findings.is_empty() {
            vec![Finding::new(NO_ISSUES_FINDING)]
        } else {
            findings
        };

        Self {
            filename: filename.into(),
            findings,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// The `Issues` column: findings joined with `"; "` in detection order.
    pub fn issues(&self) -> String {
        self.findings
            .iter()
            .map(Finding::as_str)
            .collect::<Vec<_>>()
            .join(ISSUE_SEPARATOR)
    }
}

/// One exported row. Field names are the column headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(rename = "File")]
    pub file: String,
    #[serde(rename = "Issues")]
    pub issues: String,
}

/// All records of one batch, in upload order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    records: Vec<AnalysisRecord>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: AnalysisRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[AnalysisRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn rows(&self) -> Vec<ReportRow> {
        self.records
            .iter()
            .map(|record| ReportRow {
                file: record.filename().to_string(),
                issues: record.issues(),
            })
            .collect()
    }
}

impl FromIterator<AnalysisRecord> for ResultTable {
    fn from_iter<I: IntoIterator<Item = AnalysisRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
