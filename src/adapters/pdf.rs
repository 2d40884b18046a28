//! Fixed-layout view over a PDF: tagging flag plus sized text spans.
//!
//! Span sizes are approximate. The size is the `Tf` operand scaled by the
//! vertical scale of the text matrix; the CTM and form XObjects are not
//! followed.

use crate::utils::error::{AuditError, Result};
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object};

const PDF_SIGNATURE: &[u8] = b"%PDF-";

#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub size: f32,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfPage {
    /// 1-based page number.
    pub number: u32,
    pub spans: Vec<TextSpan>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfDocument {
    /// The catalog declares accessibility structure.
    pub tagged: bool,
    pub pages: Vec<PdfPage>,
}

impl PdfDocument {
    pub fn from_bytes(filename: &str, bytes: &[u8]) -> Result<Self> {
        if !has_pdf_signature(bytes) {
            return Err(AuditError::malformed(filename, "missing %PDF- signature"));
        }

        let document = Document::load_mem(bytes).map_err(|e| AuditError::malformed(filename, e))?;
        let tagged = is_tagged(&document);

        let mut pages = Vec::new();
        for (number, page_id) in document.get_pages() {
            // A broken content stream degrades to a page without spans.
            let spans = match document
                .get_page_content(page_id)
                .and_then(|content| Content::decode(&content))
            {
                Ok(content) => text_spans(&content),
                Err(e) => {
                    tracing::warn!("{}: page {} content unreadable: {}", filename, number, e);
                    Vec::new()
                }
            };
            pages.push(PdfPage { number, spans });
        }

        Ok(Self { tagged, pages })
    }
}

/// Tolerates leading garbage the way most readers do (first 1 KiB).
fn has_pdf_signature(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(1024)];
    head.windows(PDF_SIGNATURE.len()).any(|window| window == PDF_SIGNATURE)
}

fn resolve<'a>(document: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => document.get_object(*id).ok(),
        other => Some(other),
    }
}

fn catalog(document: &Document) -> Option<&Dictionary> {
    let root = document.trailer.get(b"Root").ok()?;
    resolve(document, root)?.as_dict().ok()
}

/// `/MarkInfo << /Marked true >>` or a `/StructTreeRoot` in the catalog.
fn is_tagged(document: &Document) -> bool {
    let Some(root) = catalog(document) else {
        return false;
    };

    let marked = root
        .get(b"MarkInfo")
        .ok()
        .and_then(|info| resolve(document, info))
        .and_then(|info| info.as_dict().ok())
        .and_then(|info| info.get(b"Marked").ok())
        .and_then(|marked| marked.as_bool().ok())
        .unwrap_or(false);

    marked || root.has(b"StructTreeRoot")
}

fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(value) => Some(*value as f32),
        Object::Real(value) => Some(*value as f32),
        _ => None,
    }
}

fn push_string_bytes(object: &Object, out: &mut Vec<u8>) {
    match object {
        Object::String(bytes, _) => out.extend_from_slice(bytes),
        Object::Array(items) => {
            for item in items {
                if let Object::String(bytes, _) = item {
                    out.extend_from_slice(bytes);
                }
            }
        }
        _ => {}
    }
}

/// One span per text-showing operator; whitespace-only spans are dropped.
fn text_spans(content: &Content) -> Vec<TextSpan> {
    let mut spans = Vec::new();
    let mut font_size = 0.0_f32;
    let mut matrix_scale = 1.0_f32;

    for operation in &content.operations {
        let operands = &operation.operands;
        let shown = match operation.operator.as_str() {
            "BT" => {
                matrix_scale = 1.0;
                None
            }
            "Tf" => {
                if let Some(size) = operands.get(1).and_then(number) {
                    font_size = size;
                }
                None
            }
            "Tm" => {
                if let (Some(c), Some(d)) = (
                    operands.get(2).and_then(number),
                    operands.get(3).and_then(number),
                ) {
                    matrix_scale = (c * c + d * d).sqrt();
                }
                None
            }
            "Tj" | "TJ" | "'" => operands.first(),
            "\"" => operands.get(2),
            _ => None,
        };

        if let Some(object) = shown {
            let mut bytes = Vec::new();
            push_string_bytes(object, &mut bytes);
            let text = String::from_utf8_lossy(&bytes).into_owned();
            if !text.trim().is_empty() {
                spans.push(TextSpan {
                    size: (font_size * matrix_scale).abs(),
                    text,
                });
            }
        }
    }

    spans
}
