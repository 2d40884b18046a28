use crate::adapters::pptx::Presentation;
use crate::core::analyzers::Analyzer;
use crate::domain::model::{Finding, UploadedDocument};
use crate::utils::error::Result;

/// Contrast is never measured; this advisory always closes a presentation report.
pub const CONTRAST_ADVISORY: &str =
    "Contrast not evaluated. Aim for WCAG AA contrast ratio of at least 4.5:1 for normal text.";

pub struct PresentationAnalyzer;

impl PresentationAnalyzer {
    /// 1-based numbers of slides with neither a title nor visible text.
    pub fn untitled_slides(presentation: &Presentation) -> Vec<usize> {
        presentation
            .slides
            .iter()
            .enumerate()
            .filter(|(_, slide)| !slide.has_title() && !slide.has_visible_text())
            .map(|(index, _)| index + 1)
            .collect()
    }

    pub fn check_titles(presentation: &Presentation) -> Option<Finding> {
        let untitled = Self::untitled_slides(presentation);
        if untitled.is_empty() {
            return None;
        }

        let numbers: Vec<String> = untitled.iter().map(|n| n.to_string()).collect();
        Some(Finding::new(format!(
            "Slides without a clear title/text: [{}]. Use a Title layout or add a heading.",
            numbers.join(", ")
        )))
    }

    pub fn check_images(presentation: &Presentation) -> Option<Finding> {
        let count = presentation.shapes().filter(|shape| shape.is_image()).count();
        (count > 0).then(|| {
            Finding::new(format!(
                "Found {} image(s). Verify Alt Text for each (Format Picture → Alt Text).",
                count
            ))
        })
    }

    pub fn analyze_model(presentation: &Presentation) -> Vec<Finding> {
        let mut findings = Vec::new();
        findings.extend(Self::check_titles(presentation));
        findings.extend(Self::check_images(presentation));
        findings.push(Finding::new(CONTRAST_ADVISORY));
        findings
    }
}

impl Analyzer for PresentationAnalyzer {
    fn name(&self) -> &str {
        "Presentation Analyzer"
    }

    fn applicable_extensions(&self) -> &[&str] {
        &["pptx"]
    }

    fn analyze(&self, upload: &UploadedDocument) -> Result<Vec<Finding>> {
        let presentation = Presentation::from_bytes(upload.name(), upload.bytes())?;
        tracing::debug!("{}: {} slide(s)", upload.name(), presentation.slides.len());
        Ok(Self::analyze_model(&presentation))
    }
}
