use crate::core::aggregator::aggregate;
use crate::core::analyzers::{Analyzer, PdfAnalyzer, PresentationAnalyzer, WordAnalyzer};
use crate::domain::model::{AnalysisRecord, Finding, ResultTable, UploadedDocument};
use crate::domain::policy::HeuristicPolicy;
use crate::utils::error::{AuditError, Result};

pub const UNSUPPORTED_FILE_TYPE: &str = "Unsupported file type.";

/// Dispatches uploads to the analyzer registered for their extension.
pub struct BatchOrchestrator {
    analyzers: Vec<Box<dyn Analyzer>>,
}

impl BatchOrchestrator {
    pub fn new(policy: &HeuristicPolicy) -> Result<Self> {
        let analyzers: Vec<Box<dyn Analyzer>> = vec![
            Box::new(WordAnalyzer::new(&policy.link_text)?),
            Box::new(PresentationAnalyzer),
            Box::new(PdfAnalyzer::new(policy)),
        ];
        Ok(Self { analyzers })
    }

    pub fn analyzer_for(&self, document: &UploadedDocument) -> Option<&dyn Analyzer> {
        let ext = document.extension()?;
        self.analyzers
            .iter()
            .find(|analyzer| analyzer.applicable_extensions().contains(&ext.as_str()))
            .map(|analyzer| &**analyzer)
    }

    /// Never fails: malformed content becomes a finding of its own.
    pub fn analyze_document(&self, document: &UploadedDocument) -> AnalysisRecord {
        let Some(analyzer) = self.analyzer_for(document) else {
            tracing::info!("⏭️ {}: unsupported file type", document.name());
            return aggregate(document.name(), [vec![Finding::new(UNSUPPORTED_FILE_TYPE)]]);
        };

        tracing::info!("🔍 {}: running {}", document.name(), analyzer.name());
        let findings = match analyzer.analyze(document) {
            Ok(findings) => findings,
            Err(e) => {
                tracing::warn!("⚠️ {}: {}", document.name(), e);
                vec![failure_finding(document.name(), &e)]
            }
        };

        let record = aggregate(document.name(), [findings]);
        tracing::debug!("{}: {} finding(s)", document.name(), record.findings().len());
        record
    }

    /// Analyzes every document in upload order.
    pub fn run(&self, documents: &[UploadedDocument]) -> ResultTable {
        documents
            .iter()
            .map(|document| self.analyze_document(document))
            .collect()
    }
}

fn failure_finding(filename: &str, error: &AuditError) -> Finding {
    let reason = match error {
        AuditError::MalformedDocument { reason, .. } => reason.clone(),
        other => other.to_string(),
    };
    Finding::new(format!("Could not analyze {}: {}", filename, reason))
}
