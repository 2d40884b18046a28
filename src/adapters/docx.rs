//! Structural view over a WordprocessingML (`.docx`) package.

use crate::adapters::ooxml::{self, OoxmlPackage};
use crate::utils::error::{AuditError, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Run {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    /// Display name of the paragraph style, e.g. `Heading 1`.
    pub style_name: Option<String>,
    pub runs: Vec<Run>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocProperties {
    pub name: Option<String>,
    pub descr: Option<String>,
}

/// An inline or floating picture in the document body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawingImage {
    /// `None` when the drawing has no `wp:docPr`, so its descriptive
    /// text cannot be read structurally.
    pub doc_properties: Option<DocProperties>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordDocument {
    pub paragraphs: Vec<Paragraph>,
    pub images: Vec<DrawingImage>,
    /// Image relationships declared by the main document part.
    pub image_relationships: usize,
}

impl WordDocument {
    pub fn from_bytes(filename: &str, bytes: &[u8]) -> Result<Self> {
        Self::parse(bytes).map_err(|e| AuditError::malformed(filename, e))
    }

    fn parse(bytes: &[u8]) -> Result<Self> {
        let mut package = OoxmlPackage::open(bytes)?;
        let document_xml = package.require_part(DOCUMENT_PART)?;

        let styles = match package.read_part(STYLES_PART)? {
            Some(xml) => StyleTable::parse(&xml)?,
            None => StyleTable::default(),
        };

        let image_relationships = package
            .relationships_of(DOCUMENT_PART)?
            .iter()
            .filter(|rel| rel.is_image())
            .count();

        let (paragraphs, images) = parse_body(&document_xml, &styles)?;

        Ok(Self {
            paragraphs,
            images,
            image_relationships,
        })
    }

    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.paragraphs.iter().flat_map(|p| p.runs.iter())
    }

    /// Whether every image exposes a descriptive-text attribute slot.
    pub fn descriptive_text_available(&self) -> bool {
        self.images.iter().all(|image| image.doc_properties.is_some())
    }

    /// Descriptive text of one image, or `None` when it is absent or
    /// cannot be read.
    pub fn try_read_descriptive_text<'a>(&self, image: &'a DrawingImage) -> Option<&'a str> {
        image
            .doc_properties
            .as_ref()
            .and_then(|props| props.descr.as_deref())
    }
}

/// Paragraph style ids mapped to display names.
#[derive(Debug, Default)]
struct StyleTable {
    names: HashMap<String, String>,
    default_paragraph: Option<String>,
}

impl StyleTable {
    fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        let mut buf = Vec::new();
        let mut table = StyleTable::default();
        let mut current: Option<(String, bool)> = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) if e.local_name().as_ref() == b"style" => {
                    let is_paragraph = ooxml::attr(e, b"type")?.as_deref() == Some("paragraph");
                    let id = ooxml::attr(e, b"styleId")?;
                    let is_default = matches!(ooxml::attr(e, b"default")?.as_deref(), Some("1" | "true"));
                    current = match id {
                        Some(id) if is_paragraph => Some((id, is_default)),
                        _ => None,
                    };
                }
                Event::Start(ref e) | Event::Empty(ref e) if e.local_name().as_ref() == b"name" => {
                    if let (Some((id, is_default)), Some(name)) =
                        (current.as_ref(), ooxml::attr(e, b"val")?)
                    {
                        if *is_default && table.default_paragraph.is_none() {
                            table.default_paragraph = Some(id.clone());
                        }
                        table.names.insert(id.clone(), ui_style_name(&name));
                    }
                }
                Event::End(ref e) if e.local_name().as_ref() == b"style" => current = None,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(table)
    }

    /// Unknown ids fall back to the default paragraph style, or to the
    /// raw id when the package declares no default.
    fn resolve(&self, style_id: Option<&str>) -> Option<String> {
        let known = style_id.filter(|id| self.names.contains_key(*id));
        match known.or(self.default_paragraph.as_deref()) {
            Some(id) => self.names.get(id).cloned(),
            None => style_id.map(str::to_string),
        }
    }
}

/// Word stores built-in style names in lowercase (`heading 1`); the UI
/// and every consumer reading style names see `Heading 1`.
fn ui_style_name(name: &str) -> String {
    const BUILT_IN: &[&str] = &[
        "caption",
        "footer",
        "header",
        "normal",
        "subtitle",
        "title",
        "quote",
        "list bullet",
        "list number",
        "list paragraph",
        "toc heading",
    ];

    let is_heading = name
        .strip_prefix("heading ")
        .is_some_and(|level| level.chars().all(|c| c.is_ascii_digit()) && !level.is_empty());

    if is_heading || BUILT_IN.contains(&name) {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    } else {
        name.to_string()
    }
}

#[derive(Default)]
struct ParagraphBuilder {
    style_id: Option<String>,
    runs: Vec<Run>,
}

/// A drawing being read; it becomes an image only if it holds a picture.
#[derive(Default)]
struct DrawingBuilder {
    doc_properties: Option<DocProperties>,
    has_picture: bool,
}

fn parse_body(xml: &[u8], styles: &StyleTable) -> Result<(Vec<Paragraph>, Vec<DrawingImage>)> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();

    let mut paragraphs = Vec::new();
    let mut images = Vec::new();

    // Text boxes nest paragraphs inside runs, hence the stacks.
    let mut paragraph_stack: Vec<ParagraphBuilder> = Vec::new();
    let mut run_stack: Vec<String> = Vec::new();
    let mut drawing_stack: Vec<DrawingBuilder> = Vec::new();
    let mut in_paragraph_props = false;
    let mut in_text = false;
    // `mc:Fallback` repeats the `mc:Choice` content in legacy markup.
    let mut fallback_depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(_) if fallback_depth > 0 => fallback_depth += 1,
            Event::End(_) if fallback_depth > 0 => fallback_depth -= 1,
            _ if fallback_depth > 0 => {}
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"Fallback" => fallback_depth = 1,
                b"p" => paragraph_stack.push(ParagraphBuilder::default()),
                b"pPr" => in_paragraph_props = true,
                b"pStyle" => set_style(&mut paragraph_stack, in_paragraph_props, e)?,
                b"r" => run_stack.push(String::new()),
                b"t" if !run_stack.is_empty() => in_text = true,
                b"inline" | b"anchor" => drawing_stack.push(DrawingBuilder::default()),
                b"docPr" => set_doc_properties(&mut drawing_stack, e)?,
                b"pic" | b"blip" => mark_picture(&mut drawing_stack),
                _ => {}
            },
            Event::Empty(ref e) => match e.local_name().as_ref() {
                b"p" => paragraphs.push(finish_paragraph(ParagraphBuilder::default(), styles)),
                b"pStyle" => set_style(&mut paragraph_stack, in_paragraph_props, e)?,
                b"docPr" => set_doc_properties(&mut drawing_stack, e)?,
                b"pic" | b"blip" => mark_picture(&mut drawing_stack),
                _ => {}
            },
            Event::Text(ref t) if in_text => {
                if let Some(run) = run_stack.last_mut() {
                    run.push_str(&t.unescape()?);
                }
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"p" => {
                    if let Some(builder) = paragraph_stack.pop() {
                        paragraphs.push(finish_paragraph(builder, styles));
                    }
                }
                b"pPr" => in_paragraph_props = false,
                b"t" => in_text = false,
                b"r" => {
                    if let Some(text) = run_stack.pop() {
                        if let Some(paragraph) = paragraph_stack.last_mut() {
                            paragraph.runs.push(Run { text });
                        }
                    }
                }
                b"inline" | b"anchor" => {
                    // Text boxes, shapes and charts are drawings too.
                    if let Some(drawing) = drawing_stack.pop().filter(|d| d.has_picture) {
                        images.push(DrawingImage {
                            doc_properties: drawing.doc_properties,
                        });
                    }
                }
                _ => {}
            },
            _ => {}
        }
        buf.clear();
    }

    Ok((paragraphs, images))
}

fn set_style(
    paragraph_stack: &mut [ParagraphBuilder],
    in_paragraph_props: bool,
    element: &quick_xml::events::BytesStart<'_>,
) -> Result<()> {
    if !in_paragraph_props {
        return Ok(());
    }
    if let Some(paragraph) = paragraph_stack.last_mut() {
        // The first pStyle wins; a later one belongs to a tracked change.
        if paragraph.style_id.is_none() {
            paragraph.style_id = ooxml::attr(element, b"val")?;
        }
    }
    Ok(())
}

fn set_doc_properties(
    drawing_stack: &mut [DrawingBuilder],
    element: &quick_xml::events::BytesStart<'_>,
) -> Result<()> {
    if let Some(drawing) = drawing_stack.last_mut() {
        drawing.doc_properties = Some(DocProperties {
            name: ooxml::attr(element, b"name")?,
            descr: ooxml::attr(element, b"descr")?,
        });
    }
    Ok(())
}

fn mark_picture(drawing_stack: &mut [DrawingBuilder]) {
    if let Some(drawing) = drawing_stack.last_mut() {
        drawing.has_picture = true;
    }
}

fn finish_paragraph(builder: ParagraphBuilder, styles: &StyleTable) -> Paragraph {
    Paragraph {
        style_name: styles.resolve(builder.style_id.as_deref()),
        runs: builder.runs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::{FileOptions, ZipWriter};

    const STYLES: &str = r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style>
  <w:style w:type="character" w:styleId="Hyperlink"><w:name w:val="Hyperlink"/></w:style>
</w:styles>"#;

    const PICTURE_GRAPHIC: &str = r#"<a:graphic xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture"><pic:pic xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture"><pic:blipFill><a:blip r:embed="rId5" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"/></pic:blipFill></pic:pic></a:graphicData></a:graphic>"#;

    /// An anchored Word text box with its VML fallback, as Word writes it.
    fn text_box(inner: &str) -> String {
        format!(
            r#"<w:r><mc:AlternateContent xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006"><mc:Choice Requires="wps"><w:drawing><wp:anchor><wp:docPr id="3" name="Text Box 1"/><a:graphic xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"><a:graphicData uri="http://schemas.microsoft.com/office/word/2010/wordprocessingShape"><wps:wsp xmlns:wps="http://schemas.microsoft.com/office/word/2010/wordprocessingShape"><wps:txbx><w:txbxContent>{inner}</w:txbxContent></wps:txbx></wps:wsp></a:graphicData></a:graphic></wp:anchor></w:drawing></mc:Choice><mc:Fallback><w:pict><v:shape xmlns:v="urn:schemas-microsoft-com:vml"><v:textbox><w:txbxContent>{inner}</w:txbxContent></v:textbox></v:shape></w:pict></mc:Fallback></mc:AlternateContent></w:r>"#,
            inner = inner
        )
    }

    fn docx(body: &str, styles: Option<&str>) -> Vec<u8> {
        let document = format!(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing"><w:body>{}</w:body></w:document>"#,
            body
        );
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file::<_, ()>("word/document.xml", FileOptions::default()).unwrap();
        zip.write_all(document.as_bytes()).unwrap();
        if let Some(styles) = styles {
            zip.start_file::<_, ()>("word/styles.xml", FileOptions::default()).unwrap();
            zip.write_all(styles.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_style_names_are_resolved() {
        let bytes = docx(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Intro</w:t></w:r></w:p>
               <w:p><w:r><w:t>Body text</w:t></w:r></w:p>"#,
            Some(STYLES),
        );
        let doc = WordDocument::from_bytes("a.docx", &bytes).unwrap();

        assert_eq!(doc.paragraphs.len(), 2);
        assert_eq!(doc.paragraphs[0].style_name.as_deref(), Some("Heading 1"));
        assert_eq!(doc.paragraphs[1].style_name.as_deref(), Some("Normal"));
    }

    #[test]
    fn test_style_id_used_without_styles_part() {
        let bytes = docx(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading2"/></w:pPr><w:r><w:t>Intro</w:t></w:r></w:p>"#,
            None,
        );
        let doc = WordDocument::from_bytes("a.docx", &bytes).unwrap();
        assert_eq!(doc.paragraphs[0].style_name.as_deref(), Some("Heading2"));
    }

    #[test]
    fn test_runs_inside_hyperlinks_are_collected() {
        let bytes = docx(
            r#"<w:p><w:r><w:t xml:space="preserve">For details </w:t></w:r><w:hyperlink r:id="rId4" xmlns:r="r"><w:r><w:t>click </w:t><w:t>here</w:t></w:r></w:hyperlink></w:p>"#,
            None,
        );
        let doc = WordDocument::from_bytes("a.docx", &bytes).unwrap();
        let texts: Vec<&str> = doc.runs().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["For details ", "click here"]);
    }

    #[test]
    fn test_drawings_expose_descriptive_text() {
        let bytes = docx(
            &format!(
                r#"<w:p><w:r><w:drawing><wp:inline><wp:docPr id="1" name="Picture 1" descr="Bar chart of sales"/>{pic}</wp:inline></w:drawing></w:r></w:p>
                   <w:p><w:r><w:drawing><wp:anchor><wp:docPr id="2" name="Picture 2"/>{pic}</wp:anchor></w:drawing></w:r></w:p>"#,
                pic = PICTURE_GRAPHIC
            ),
            None,
        );
        let doc = WordDocument::from_bytes("a.docx", &bytes).unwrap();

        assert_eq!(doc.images.len(), 2);
        assert!(doc.descriptive_text_available());
        assert_eq!(
            doc.try_read_descriptive_text(&doc.images[0]),
            Some("Bar chart of sales")
        );
        assert_eq!(doc.try_read_descriptive_text(&doc.images[1]), None);
    }

    #[test]
    fn test_drawing_without_doc_pr_is_unavailable() {
        let bytes = docx(
            &format!(
                r#"<w:p><w:r><w:drawing><wp:inline>{}</wp:inline></w:drawing></w:r></w:p>"#,
                PICTURE_GRAPHIC
            ),
            None,
        );
        let doc = WordDocument::from_bytes("a.docx", &bytes).unwrap();
        assert_eq!(doc.images.len(), 1);
        assert!(!doc.descriptive_text_available());
    }

    #[test]
    fn test_missing_document_part_is_malformed() {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file::<_, ()>("ppt/presentation.xml", FileOptions::default()).unwrap();
        zip.write_all(b"<p:presentation/>").unwrap();
        let bytes = zip.finish().unwrap().into_inner();

        let err = WordDocument::from_bytes("wrong.docx", &bytes).unwrap_err();
        assert!(matches!(err, AuditError::MalformedDocument { ref filename, .. } if filename == "wrong.docx"));
    }

    #[test]
    fn test_text_box_is_not_an_image() {
        let body = format!(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Intro</w:t></w:r></w:p><w:p>{}</w:p>"#,
            text_box(r#"<w:p><w:r><w:t>Sidebar note</w:t></w:r></w:p>"#)
        );
        let doc = WordDocument::from_bytes("a.docx", &docx(&body, Some(STYLES))).unwrap();
        assert!(doc.images.is_empty());
        assert_eq!(doc.image_relationships, 0);
    }

    #[test]
    fn test_text_box_text_read_once() {
        let body = format!(
            r#"<w:p>{}</w:p>"#,
            text_box(
                r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>click here</w:t></w:r></w:p>"#
            )
        );
        let doc = WordDocument::from_bytes("a.docx", &docx(&body, Some(STYLES))).unwrap();

        let texts: Vec<&str> = doc
            .runs()
            .map(|r| r.text.as_str())
            .filter(|t| !t.is_empty())
            .collect();
        assert_eq!(texts, vec!["click here"]);
        let headings = doc
            .paragraphs
            .iter()
            .filter(|p| p.style_name.as_deref() == Some("Heading 1"))
            .count();
        assert_eq!(headings, 1);
    }

    #[test]
    fn test_unknown_style_id_falls_back_to_default() {
        let bytes = docx(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading2"/></w:pPr><w:r><w:t>Intro</w:t></w:r></w:p>"#,
            Some(STYLES),
        );
        let doc = WordDocument::from_bytes("a.docx", &bytes).unwrap();
        assert_eq!(doc.paragraphs[0].style_name.as_deref(), Some("Normal"));
    }

    #[test]
    fn test_ui_style_name() {
        assert_eq!(ui_style_name("heading 3"), "Heading 3");
        assert_eq!(ui_style_name("title"), "Title");
        assert_eq!(ui_style_name("heading notes"), "heading notes");
        assert_eq!(ui_style_name("My Custom"), "My Custom");
    }
}
