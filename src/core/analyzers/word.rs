//! Word-processing checks: heading presence, vague link text, alt text.

use crate::adapters::docx::WordDocument;
use crate::core::analyzers::Analyzer;
use crate::domain::model::{Finding, UploadedDocument};
use crate::domain::policy::{LinkTextMatch, LinkTextPolicy};
use crate::utils::error::{AuditError, Result};
use regex::Regex;

pub const NO_HEADINGS: &str = "No headings found (use Heading 1/2/3 styles for document structure).";
pub const VAGUE_LINK_TEXT: &str =
    "Avoid vague link text like 'click here'. Use descriptive link text.";

const HEADING_STYLE_PREFIX: &str = "Heading";

/// How much of the image alt text could be inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AltTextCoverage {
    NoImages,
    /// Descriptive text was readable for every image.
    PerImage { total: usize, missing: usize },
    /// Only image references could be counted.
    ReferenceCount(usize),
}

impl AltTextCoverage {
    pub fn of(document: &WordDocument) -> Self {
        if document.images.is_empty() {
            // Legacy VML pictures are not enumerated but still referenced.
            return match document.image_relationships {
                0 => AltTextCoverage::NoImages,
                count => AltTextCoverage::ReferenceCount(count),
            };
        }

        if !document.descriptive_text_available() {
            return AltTextCoverage::ReferenceCount(document.image_relationships);
        }

        let missing = document
            .images
            .iter()
            .filter(|image| {
                document
                    .try_read_descriptive_text(image)
                    .map_or(true, |text| text.trim().is_empty())
            })
            .count();

        AltTextCoverage::PerImage {
            total: document.images.len(),
            missing,
        }
    }

    pub fn finding(&self) -> Option<Finding> {
        match *self {
            AltTextCoverage::NoImages
            | AltTextCoverage::ReferenceCount(0)
            | AltTextCoverage::PerImage { total: 0, .. } => None,
            AltTextCoverage::PerImage { total, missing: 0 } => {
                Some(Finding::new(format!("All {} image(s) have alt text.", total)))
            }
            AltTextCoverage::PerImage { total, missing } => Some(Finding::new(format!(
                "{} of {} image(s) appear to lack alt text. \
                 Add concise, purpose-focused descriptions (≤125 characters).",
                missing, total
            ))),
            AltTextCoverage::ReferenceCount(count) => Some(Finding::new(format!(
                "Found {} image(s). Verify Alt Text for each (Right-click image → View Alt Text).",
                count
            ))),
        }
    }
}

enum PhraseMatcher {
    Exact(Vec<String>),
    Contains(Regex),
}

impl PhraseMatcher {
    fn new(policy: &LinkTextPolicy) -> Result<Self> {
        let phrases: Vec<String> = policy
            .phrases
            .iter()
            .map(|phrase| phrase.trim().to_lowercase())
            .collect();

        match policy.mode {
            LinkTextMatch::Exact => Ok(PhraseMatcher::Exact(phrases)),
            LinkTextMatch::Contains => {
                let alternatives: Vec<String> = phrases
                    .iter()
                    .map(|phrase| {
                        phrase
                            .split_whitespace()
                            .map(regex::escape)
                            .collect::<Vec<_>>()
                            .join(r"\s+")
                    })
                    .collect();
                let pattern = format!(r"\b(?:{})\b", alternatives.join("|"));
                let regex = Regex::new(&pattern).map_err(|e| AuditError::ConfigError {
                    message: format!("invalid link text phrases: {}", e),
                })?;
                Ok(PhraseMatcher::Contains(regex))
            }
        }
    }

    /// `text` is already trimmed and lowercased.
    fn is_match(&self, text: &str) -> bool {
        match self {
            PhraseMatcher::Exact(phrases) => phrases.iter().any(|phrase| phrase == text),
            PhraseMatcher::Contains(regex) => regex.is_match(text),
        }
    }
}

pub struct WordAnalyzer {
    link_phrases: PhraseMatcher,
}

impl WordAnalyzer {
    pub fn new(link_text: &LinkTextPolicy) -> Result<Self> {
        Ok(Self {
            link_phrases: PhraseMatcher::new(link_text)?,
        })
    }

    pub fn check_headings(&self, document: &WordDocument) -> Option<Finding> {
        let has_heading = document.paragraphs.iter().any(|paragraph| {
            paragraph
                .style_name
                .as_deref()
                .is_some_and(|name| name.starts_with(HEADING_STYLE_PREFIX))
        });

        if has_heading {
            None
        } else {
            Some(Finding::new(NO_HEADINGS))
        }
    }

    /// One finding per offending run.
    pub fn check_link_text(&self, document: &WordDocument) -> Vec<Finding> {
        document
            .runs()
            .filter(|run| {
                let text = run.text.trim().to_lowercase();
                !text.is_empty() && self.link_phrases.is_match(&text)
            })
            .map(|_| Finding::new(VAGUE_LINK_TEXT))
            .collect()
    }

    pub fn check_alt_text(&self, document: &WordDocument) -> Option<Finding> {
        let coverage = AltTextCoverage::of(document);
        match coverage {
            AltTextCoverage::ReferenceCount(count) => tracing::debug!(
                "descriptive text not readable, falling back to {} image reference(s)",
                count
            ),
            AltTextCoverage::PerImage { missing, .. } if missing > 0 => {
                for image in &document.images {
                    let props = image.doc_properties.as_ref();
                    if props.and_then(|p| p.descr.as_deref()).map_or(true, |d| d.trim().is_empty()) {
                        let name = props.and_then(|p| p.name.as_deref()).unwrap_or("unnamed");
                        tracing::debug!("image '{}' has no alt text", name);
                    }
                }
            }
            _ => {}
        }
        coverage.finding()
    }

    pub fn analyze_model(&self, document: &WordDocument) -> Vec<Finding> {
        let mut findings = Vec::new();
        findings.extend(self.check_headings(document));
        findings.extend(self.check_link_text(document));
        findings.extend(self.check_alt_text(document));
        findings
    }
}

impl Analyzer for WordAnalyzer {
    fn name(&self) -> &str {
        "Word Analyzer"
    }

    fn applicable_extensions(&self) -> &[&str] {
        &["docx"]
    }

    fn analyze(&self, upload: &UploadedDocument) -> Result<Vec<Finding>> {
        let document = WordDocument::from_bytes(upload.name(), upload.bytes())?;
        tracing::debug!(
            "{}: {} paragraph(s), {} image(s)",
            upload.name(),
            document.paragraphs.len(),
            document.images.len()
        );
        Ok(self.analyze_model(&document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::docx::{DocProperties, DrawingImage, Paragraph, Run};

    fn paragraph(style: Option<&str>, runs: &[&str]) -> Paragraph {
        Paragraph {
            style_name: style.map(str::to_string),
            runs: runs
                .iter()
                .map(|text| Run {
                    text: text.to_string(),
                })
                .collect(),
        }
    }

    fn image(descr: Option<&str>) -> DrawingImage {
        DrawingImage {
            doc_properties: Some(DocProperties {
                name: Some("Picture".to_string()),
                descr: descr.map(str::to_string),
            }),
        }
    }

    fn analyzer(mode: LinkTextMatch) -> WordAnalyzer {
        let policy = LinkTextPolicy {
            mode,
            ..LinkTextPolicy::default()
        };
        WordAnalyzer::new(&policy).unwrap()
    }

    #[test]
    fn test_heading_style_suppresses_finding() {
        let doc = WordDocument {
            paragraphs: vec![paragraph(Some("Normal"), &["x"]), paragraph(Some("Heading 2"), &["y"])],
            ..WordDocument::default()
        };
        assert!(analyzer(LinkTextMatch::Exact).check_headings(&doc).is_none());
    }

    #[test]
    fn test_missing_headings_reported() {
        let doc = WordDocument {
            paragraphs: vec![paragraph(Some("Normal"), &["x"]), paragraph(None, &[])],
            ..WordDocument::default()
        };
        assert_eq!(
            analyzer(LinkTextMatch::Exact).check_headings(&doc),
            Some(Finding::new(NO_HEADINGS))
        );
    }

    #[test]
    fn test_exact_link_match_one_finding_per_run() {
        let doc = WordDocument {
            paragraphs: vec![paragraph(
                None,
                &["  Click Here ", "read more", "Click here for the full report"],
            )],
            ..WordDocument::default()
        };
        let findings = analyzer(LinkTextMatch::Exact).check_link_text(&doc);
        assert_eq!(findings.len(), 2);
        assert!(findings.iter().all(|f| f.as_str() == VAGUE_LINK_TEXT));
    }

    #[test]
    fn test_contains_link_match_respects_word_boundaries() {
        let doc = WordDocument {
            paragraphs: vec![paragraph(
                None,
                &["Click here for the full report", "Where is it?", "Read  more"],
            )],
            ..WordDocument::default()
        };
        let findings = analyzer(LinkTextMatch::Contains).check_link_text(&doc);
        assert_eq!(findings.len(), 2);
    }

    #[test]
    fn test_alt_text_partial_coverage() {
        let doc = WordDocument {
            images: vec![image(Some("Org chart")), image(Some("  ")), image(None)],
            image_relationships: 3,
            ..WordDocument::default()
        };
        assert_eq!(
            AltTextCoverage::of(&doc),
            AltTextCoverage::PerImage { total: 3, missing: 2 }
        );
        let finding = analyzer(LinkTextMatch::Exact).check_alt_text(&doc).unwrap();
        assert!(finding.as_str().starts_with("2 of 3 image(s) appear to lack alt text."));
    }

    #[test]
    fn test_alt_text_full_coverage() {
        let doc = WordDocument {
            images: vec![image(Some("Logo of the agency"))],
            image_relationships: 1,
            ..WordDocument::default()
        };
        let finding = analyzer(LinkTextMatch::Exact).check_alt_text(&doc).unwrap();
        assert_eq!(finding.as_str(), "All 1 image(s) have alt text.");
    }

    #[test]
    fn test_alt_text_falls_back_to_reference_count() {
        let doc = WordDocument {
            images: vec![image(Some("ok")), DrawingImage { doc_properties: None }],
            image_relationships: 4,
            ..WordDocument::default()
        };
        assert_eq!(AltTextCoverage::of(&doc), AltTextCoverage::ReferenceCount(4));
        let finding = analyzer(LinkTextMatch::Exact).check_alt_text(&doc).unwrap();
        assert!(finding.as_str().starts_with("Found 4 image(s). Verify Alt Text"));
        assert!(!finding.as_str().contains("lack"));
    }

    #[test]
    fn test_no_images_no_finding() {
        let doc = WordDocument::default();
        assert!(analyzer(LinkTextMatch::Exact).check_alt_text(&doc).is_none());
    }

    #[test]
    fn test_findings_in_check_order() {
        let doc = WordDocument {
            paragraphs: vec![paragraph(None, &["here"])],
            images: vec![image(None)],
            image_relationships: 1,
        };
        let findings = analyzer(LinkTextMatch::Exact).analyze_model(&doc);
        assert_eq!(findings.len(), 3);
        assert_eq!(findings[0].as_str(), NO_HEADINGS);
        assert_eq!(findings[1].as_str(), VAGUE_LINK_TEXT);
        assert!(findings[2].as_str().starts_with("1 of 1 image(s)"));
    }
}
