//! Per-format accessibility analyzers.
//!
//! Each analyzer builds its own document model from the upload bytes and
//! runs a fixed sequence of heuristic checks. Findings come back in check
//! order; always-on advisories are emitted last.

pub mod pdf;
pub mod presentation;
pub mod word;

use crate::domain::model::{Finding, UploadedDocument};
use crate::utils::error::Result;

pub use pdf::PdfAnalyzer;
pub use presentation::PresentationAnalyzer;
pub use word::WordAnalyzer;

/// Trait implemented by all analyzers
pub trait Analyzer: Send + Sync {
    /// Human-readable name of this analyzer
    fn name(&self) -> &str;

    /// Lowercase file extensions this analyzer handles
    fn applicable_extensions(&self) -> &[&str];

    /// Analyze one document. Fails only with `MalformedDocument`.
    fn analyze(&self, document: &UploadedDocument) -> Result<Vec<Finding>>;
}
