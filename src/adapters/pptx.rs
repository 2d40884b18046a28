//! Structural view over a PresentationML (`.pptx`) package.

use crate::adapters::ooxml::{self, OoxmlPackage};
use crate::utils::error::{AuditError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

const PRESENTATION_PART: &str = "ppt/presentation.xml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// `p:sp`, the only kind carrying a text frame.
    AutoShape,
    Picture,
    GraphicFrame,
    Connector,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    pub kind: ShapeKind,
    /// Placeholder type (`title`, `ctrTitle`, `pic`, ...). A placeholder
    /// without an explicit type is `obj`.
    pub placeholder: Option<String>,
    /// Text frame content, paragraphs separated by `\n`.
    pub text: Option<String>,
}

impl Shape {
    pub fn is_title(&self) -> bool {
        matches!(self.placeholder.as_deref(), Some("title" | "ctrTitle"))
    }

    pub fn is_image(&self) -> bool {
        self.kind == ShapeKind::Picture || self.placeholder.as_deref() == Some("pic")
    }

    pub fn has_visible_text(&self) -> bool {
        self.text.as_deref().is_some_and(|text| !text.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slide {
    pub shapes: Vec<Shape>,
}

impl Slide {
    pub fn has_title(&self) -> bool {
        self.shapes.iter().any(Shape::is_title)
    }

    pub fn has_visible_text(&self) -> bool {
        self.shapes.iter().any(Shape::has_visible_text)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Presentation {
    /// Slides in presentation order.
    pub slides: Vec<Slide>,
}

impl Presentation {
    pub fn from_bytes(filename: &str, bytes: &[u8]) -> Result<Self> {
        Self::parse(bytes).map_err(|e| AuditError::malformed(filename, e))
    }

    fn parse(bytes: &[u8]) -> Result<Self> {
        let mut package = OoxmlPackage::open(bytes)?;
        let presentation_xml = package.require_part(PRESENTATION_PART)?;

        let targets: HashMap<String, String> = package
            .relationships_of(PRESENTATION_PART)?
            .into_iter()
            .filter(|rel| !rel.external)
            .map(|rel| (rel.id, rel.target))
            .collect();

        let mut slides = Vec::new();
        for rel_id in slide_rel_ids(&presentation_xml)? {
            let part = targets.get(&rel_id).ok_or_else(|| AuditError::ProcessingError {
                message: format!("slide relationship '{}' has no target", rel_id),
            })?;
            let slide_xml = package.require_part(part)?;
            slides.push(parse_slide(&slide_xml)?);
        }

        Ok(Self { slides })
    }

    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.slides.iter().flat_map(|slide| slide.shapes.iter())
    }
}

/// Relationship ids of `p:sldId` entries, in presentation order.
fn slide_rel_ids(xml: &[u8]) -> Result<Vec<String>> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut ids = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) | Event::Empty(ref e) if e.local_name().as_ref() == b"sldId" => {
                if let Some(id) = ooxml::prefixed_attr(e, b"id")? {
                    ids.push(id);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(ids)
}

struct ShapeBuilder {
    kind: ShapeKind,
    placeholder: Option<String>,
    paragraphs: Vec<String>,
}

impl ShapeBuilder {
    fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            placeholder: None,
            paragraphs: Vec::new(),
        }
    }

    fn finish(self) -> Shape {
        let text = match self.kind {
            ShapeKind::AutoShape if !self.paragraphs.is_empty() => Some(self.paragraphs.join("\n")),
            _ => None,
        };
        Shape {
            kind: self.kind,
            placeholder: self.placeholder,
            text,
        }
    }
}

fn shape_kind(local_name: &[u8]) -> Option<ShapeKind> {
    match local_name {
        b"sp" => Some(ShapeKind::AutoShape),
        b"pic" => Some(ShapeKind::Picture),
        b"graphicFrame" => Some(ShapeKind::GraphicFrame),
        b"cxnSp" => Some(ShapeKind::Connector),
        _ => None,
    }
}

fn set_placeholder(stack: &mut [ShapeBuilder], element: &BytesStart<'_>) -> Result<()> {
    if let Some(shape) = stack.last_mut() {
        if shape.placeholder.is_none() {
            shape.placeholder = Some(ooxml::attr(element, b"type")?.unwrap_or_else(|| "obj".to_string()));
        }
    }
    Ok(())
}

/// Group shapes are descended; their members are listed flat.
fn parse_slide(xml: &[u8]) -> Result<Slide> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();

    let mut shapes = Vec::new();
    let mut stack: Vec<ShapeBuilder> = Vec::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let name = e.local_name();
                if let Some(kind) = shape_kind(name.as_ref()) {
                    stack.push(ShapeBuilder::new(kind));
                } else {
                    match name.as_ref() {
                        b"ph" => set_placeholder(&mut stack, e)?,
                        b"p" => {
                            if let Some(shape) = stack.last_mut() {
                                shape.paragraphs.push(String::new());
                            }
                        }
                        b"t" => in_text = true,
                        _ => {}
                    }
                }
            }
            Event::Empty(ref e) => match e.local_name().as_ref() {
                b"ph" => set_placeholder(&mut stack, e)?,
                b"p" => {
                    if let Some(shape) = stack.last_mut() {
                        shape.paragraphs.push(String::new());
                    }
                }
                _ => {}
            },
            Event::Text(ref t) if in_text => {
                if let Some(paragraph) = stack.last_mut().and_then(|s| s.paragraphs.last_mut()) {
                    paragraph.push_str(&t.unescape()?);
                }
            }
            Event::End(ref e) => {
                let name = e.local_name();
                if shape_kind(name.as_ref()).is_some() {
                    if let Some(shape) = stack.pop() {
                        shapes.push(shape.finish());
                    }
                } else if name.as_ref() == b"t" {
                    in_text = false;
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(Slide { shapes })
}
