//! Shared plumbing for zip-based Office Open XML packages.
//!
//! Parts are read fully into memory and streamed through `quick-xml`.
//! Element and attribute names are matched on their local name, so the
//! namespace prefixes chosen by the authoring tool do not matter.

use crate::utils::error::{AuditError, Result};
use quick_xml::events::BytesStart;
use std::io::{Cursor, Read};
use zip::result::ZipError;
use zip::ZipArchive;

/// An opened OOXML package.
pub struct OoxmlPackage<'a> {
    archive: ZipArchive<Cursor<&'a [u8]>>,
}

impl<'a> OoxmlPackage<'a> {
    pub fn open(bytes: &'a [u8]) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(bytes))?;
        Ok(Self { archive })
    }

    /// Reads a part by its package path. `None` when the part is absent.
    pub fn read_part(&mut self, name: &str) -> Result<Option<Vec<u8>>> {
        let mut file = match self.archive.by_name(name) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data)?;
        Ok(Some(data))
    }

    /// Like `read_part`, but a missing part means the package is not the
    /// document type it claims to be.
    pub fn require_part(&mut self, name: &str) -> Result<Vec<u8>> {
        self.read_part(name)?.ok_or_else(|| AuditError::ProcessingError {
            message: format!("required part '{}' is missing", name),
        })
    }

    /// Parses the relationships part that belongs to `part_name`
    /// (`word/document.xml` → `word/_rels/document.xml.rels`).
    pub fn relationships_of(&mut self, part_name: &str) -> Result<Vec<Relationship>> {
        let rels_name = rels_path_for(part_name);
        match self.read_part(&rels_name)? {
            Some(xml) => parse_relationships(&xml, part_dir(part_name)),
            None => Ok(Vec::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    /// Target resolved to a package path, e.g. `ppt/slides/slide1.xml`.
    pub target: String,
    pub external: bool,
}

impl Relationship {
    pub fn is_image(&self) -> bool {
        self.rel_type.contains("image")
    }
}

fn parse_relationships(xml: &[u8], base_dir: &str) -> Result<Vec<Relationship>> {
    use quick_xml::events::Event;
    use quick_xml::Reader;

    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut relationships = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) | Event::Empty(ref e) if e.local_name().as_ref() == b"Relationship" => {
                let id = attr(e, b"Id")?.unwrap_or_default();
                let rel_type = attr(e, b"Type")?.unwrap_or_default();
                let target = attr(e, b"Target")?.unwrap_or_default();
                let external = attr(e, b"TargetMode")?.as_deref() == Some("External");
                let target = if external {
                    target
                } else {
                    resolve_target(base_dir, &target)
                };

                relationships.push(Relationship {
                    id,
                    rel_type,
                    target,
                    external,
                });
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(relationships)
}

/// Unescaped value of the first attribute with the given local name.
pub fn attr(element: &BytesStart<'_>, local_name: &[u8]) -> Result<Option<String>> {
    for attribute in element.attributes() {
        let attribute = attribute?;
        if attribute.key.local_name().as_ref() == local_name {
            return Ok(Some(attribute.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Like `attr`, but only matches a namespace-prefixed attribute
/// (`r:id` rather than a plain `id`).
pub fn prefixed_attr(element: &BytesStart<'_>, local_name: &[u8]) -> Result<Option<String>> {
    for attribute in element.attributes() {
        let attribute = attribute?;
        if attribute.key.prefix().is_some() && attribute.key.local_name().as_ref() == local_name {
            return Ok(Some(attribute.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn rels_path_for(part_name: &str) -> String {
    match part_name.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part_name),
    }
}

fn part_dir(part_name: &str) -> &str {
    part_name.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

/// Resolves a relationship target against the source part's directory.
pub fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}
