use crate::adapters::pdf::PdfDocument;
use crate::core::analyzers::Analyzer;
use crate::domain::model::{Finding, UploadedDocument};
use crate::domain::policy::HeuristicPolicy;
use crate::utils::error::Result;

pub const NOT_TAGGED: &str =
    "PDF is not tagged (no accessibility structure). Export with 'Create tagged PDF' enabled.";
pub const FEW_LARGE_SPANS: &str = "Few/no large text spans detected, so headings may be missing \
    (font-size estimate only, not a structural check). Use heading styles in the source doc.";
pub const LINK_TEXT_REMINDER: &str =
    "Review links for descriptive text (avoid 'click here'). Edit in source, then re-export.";

pub struct PdfAnalyzer {
    large_text_size: f32,
    min_large_ratio: f64,
}

impl PdfAnalyzer {
    pub fn new(policy: &HeuristicPolicy) -> Self {
        Self {
            large_text_size: policy.large_text_size,
            min_large_ratio: policy.min_large_ratio,
        }
    }

    pub fn check_tagged(document: &PdfDocument) -> Option<Finding> {
        (!document.tagged).then(|| Finding::new(NOT_TAGGED))
    }

    /// `None` when there are no spans at all or the ratio reaches the minimum.
    pub fn heading_density(&self, large: usize, total: usize) -> Option<Finding> {
        if total == 0 {
            return None;
        }

        let ratio = large as f64 / total as f64;
        tracing::debug!("large text spans: {}/{} (ratio {:.4})", large, total, ratio);
        (ratio < self.min_large_ratio).then(|| Finding::new(FEW_LARGE_SPANS))
    }

    pub fn check_headings(&self, document: &PdfDocument) -> Option<Finding> {
        let (mut large, mut total) = (0, 0);
        for page in &document.pages {
            for span in &page.spans {
                total += 1;
                if span.size >= self.large_text_size {
                    large += 1;
                    tracing::debug!("page {}: large span {:.1}pt {:?}", page.number, span.size, span.text);
                }
            }
        }
        self.heading_density(large, total)
    }

    pub fn analyze_model(&self, document: &PdfDocument) -> Vec<Finding> {
        let mut findings = Vec::new();
        findings.extend(Self::check_tagged(document));
        findings.extend(self.check_headings(document));
        findings.push(Finding::new(LINK_TEXT_REMINDER));
        findings
    }
}

impl Analyzer for PdfAnalyzer {
    fn name(&self) -> &str {
        "PDF Analyzer"
    }

    fn applicable_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn analyze(&self, upload: &UploadedDocument) -> Result<Vec<Finding>> {
        let document = PdfDocument::from_bytes(upload.name(), upload.bytes())?;
        tracing::debug!(
            "{}: {} page(s), tagged: {}",
            upload.name(),
            document.pages.len(),
            document.tagged
        );
        Ok(self.analyze_model(&document))
    }
}
