// Adapters layer: document model adapters over raw upload bytes, and storage backends.

pub mod docx;
pub mod ooxml;
pub mod pdf;
pub mod pptx;
pub mod storage;

pub use docx::WordDocument;
pub use pdf::PdfDocument;
pub use pptx::Presentation;
pub use storage::LocalStorage;
