#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, StringFormat};
use std::io::{Cursor, Write};
use zip::write::{FileOptions, ZipWriter};

const W_NS: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing""#;
const P_NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships""#;
const REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const SLIDE_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";

pub const WORD_STYLES: &str = r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style>
</w:styles>"#;

pub fn package(parts: &[(&str, String)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in parts {
        zip.start_file::<_, ()>(*name, FileOptions::default()).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

/// A paragraph with an optional style id and one run per text.
pub fn word_paragraph(style_id: Option<&str>, runs: &[&str]) -> String {
    let props = style_id
        .map(|id| format!(r#"<w:pPr><w:pStyle w:val="{}"/></w:pPr>"#, id))
        .unwrap_or_default();
    let runs: String = runs
        .iter()
        .map(|text| format!(r#"<w:r><w:t xml:space="preserve">{}</w:t></w:r>"#, text))
        .collect();
    format!("<w:p>{}{}</w:p>", props, runs)
}

/// A paragraph holding one anchored text box, with the VML fallback Word
/// writes alongside it.
pub fn word_text_box(text: &str) -> String {
    let inner = format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", text);
    format!(
        r#"<w:p><w:r><mc:AlternateContent xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006"><mc:Choice Requires="wps"><w:drawing><wp:anchor distT="0" distB="0"><wp:extent cx="1828800" cy="914400"/><wp:docPr id="1" name="Text Box 1"/><a:graphic xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"><a:graphicData uri="http://schemas.microsoft.com/office/word/2010/wordprocessingShape"><wps:wsp xmlns:wps="http://schemas.microsoft.com/office/word/2010/wordprocessingShape"><wps:txbx><w:txbxContent>{inner}</w:txbxContent></wps:txbx></wps:wsp></a:graphicData></a:graphic></wp:anchor></w:drawing></mc:Choice><mc:Fallback><w:pict><v:shape xmlns:v="urn:schemas-microsoft-com:vml"><v:textbox><w:txbxContent>{inner}</w:txbxContent></v:textbox></v:shape></w:pict></mc:Fallback></mc:AlternateContent></w:r></w:p>"#,
        inner = inner
    )
}

pub fn docx(paragraphs: &[String]) -> Vec<u8> {
    let document = format!(
        "<w:document {}><w:body>{}</w:body></w:document>",
        W_NS,
        paragraphs.concat()
    );
    package(&[
        ("word/document.xml", document),
        ("word/styles.xml", WORD_STYLES.to_string()),
    ])
}

pub fn title_shape(text: &str) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:txBody><a:p><a:r><a:t>{}</a:t></a:r></a:p></p:txBody></p:sp>"#,
        text
    )
}

pub fn text_shape(text: &str) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="3" name="TextBox 2"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:txBody><a:p><a:r><a:t>{}</a:t></a:r></a:p></p:txBody></p:sp>"#,
        text
    )
}

pub fn picture_shape() -> String {
    r#"<p:pic><p:nvPicPr><p:cNvPr id="4" name="Picture 3"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr></p:pic>"#.to_string()
}

/// One slide per entry, each holding the given shape XML.
pub fn pptx(slides: &[Vec<String>]) -> Vec<u8> {
    let mut ids = String::new();
    let mut rels = String::new();
    let mut parts = Vec::new();

    for (index, shapes) in slides.iter().enumerate() {
        let n = index + 1;
        ids.push_str(&format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 255 + n, n + 1));
        rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="{}" Target="slides/slide{}.xml"/>"#,
            n + 1,
            SLIDE_REL,
            n
        ));
        parts.push((
            format!("ppt/slides/slide{}.xml", n),
            format!(
                "<p:sld {}><p:cSld><p:spTree>{}</p:spTree></p:cSld></p:sld>",
                P_NS,
                shapes.concat()
            ),
        ));
    }

    let mut all = vec![
        (
            "ppt/presentation.xml".to_string(),
            format!(
                "<p:presentation {}><p:sldIdLst>{}</p:sldIdLst></p:presentation>",
                P_NS, ids
            ),
        ),
        (
            "ppt/_rels/presentation.xml.rels".to_string(),
            format!(r#"<Relationships xmlns="{}">{}</Relationships>"#, REL_NS, rels),
        ),
    ];
    all.extend(parts);

    let borrowed: Vec<(&str, String)> = all
        .iter()
        .map(|(name, content)| (name.as_str(), content.clone()))
        .collect();
    package(&borrowed)
}

/// Text shown at each font size, one `Tj` per entry.
pub fn pdf(spans: &[(i64, &str)], tagged: bool) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut operations = vec![Operation::new("BT", vec![])];
    for (size, text) in spans {
        operations.push(Operation::new(
            "Tf",
            vec![Object::Name(b"F1".to_vec()), Object::Integer(*size)],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(text.as_bytes().to_vec(), StringFormat::Literal)],
        ));
    }
    operations.push(Operation::new("ET", vec![]));

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));
    let page_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(pages_id)),
        ("Contents", Object::Reference(content_id)),
    ]));
    doc.objects.insert(
        pages_id,
        Object::Dictionary(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(1)),
            ("Kids", Object::Array(vec![Object::Reference(page_id)])),
        ])),
    );

    let mut catalog = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]);
    if tagged {
        catalog.set(
            "MarkInfo",
            Object::Dictionary(Dictionary::from_iter(vec![("Marked", Object::Boolean(true))])),
        );
    }
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}
