//! PPTX file parser implementation.

use knowtree_core::{DocumentFormat, Error, ExtractConfig, ExtractionResult, Result, Section};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::io::{Read, Seek};
use zip::ZipArchive;

const PRESENTATION_PATH: &str = "ppt/presentation.xml";
const PRESENTATION_RELS_PATH: &str = "ppt/_rels/presentation.xml.rels";

/// Parser for PPTX (Office Open XML) files.
///
/// Produces one section per slide, in presentation order, up to the
/// configured slide cap.
pub struct PptxParser {
    config: ExtractConfig,
}

impl PptxParser {
    /// Create a PPTX parser with default settings.
    pub fn new() -> Self {
        Self::with_config(ExtractConfig::default())
    }

    /// Create a PPTX parser with the given settings.
    pub fn with_config(config: ExtractConfig) -> Self {
        Self { config }
    }

    /// Parse a PPTX file from a reader.
    pub fn parse<R: Read + Seek>(&self, reader: R, filename: &str) -> Result<ExtractionResult> {
        self.parse_limited(reader, filename, self.config.max_slides)
    }

    /// Parse at most `max_slides` slides.
    pub fn parse_limited<R: Read + Seek>(
        &self,
        reader: R,
        filename: &str,
        max_slides: usize,
    ) -> Result<ExtractionResult> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::extraction(DocumentFormat::Pptx, format!("Failed to open ZIP: {}", e)))?;

        let mut result = ExtractionResult::new(filename, DocumentFormat::Pptx);

        let slide_order = self.get_slide_order(&mut archive)?;
        result.metadata.pages = Some(slide_order.len());

        if slide_order.len() > max_slides {
            log::debug!(
                "{}: reading {} of {} slides",
                filename,
                max_slides,
                slide_order.len()
            );
        }

        for (idx, slide_path) in slide_order.iter().take(max_slides).enumerate() {
            let section = self.parse_slide(&mut archive, slide_path, idx + 1)?;
            result.add_section(section);
        }

        Ok(result)
    }

    /// Get the ordered list of slide paths.
    ///
    /// `sldIdLst` in presentation.xml is authoritative; relationship ids are
    /// only used to order slides when that list is missing.
    fn get_slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels_content = read_file_from_archive(archive, PRESENTATION_RELS_PATH)?;
        let relationships = parse_slide_relationships(&rels_content)?;

        let listed = match read_file_from_archive(archive, PRESENTATION_PATH) {
            Ok(content) => parse_slide_id_list(&content)?,
            Err(e) => {
                log::warn!("{} unreadable, ordering slides by relationship id: {}", PRESENTATION_PATH, e);
                Vec::new()
            }
        };

        if !listed.is_empty() {
            let by_id: HashMap<&str, &str> = relationships
                .iter()
                .map(|r| (r.id.as_str(), r.path.as_str()))
                .collect();

            return Ok(listed
                .iter()
                .filter_map(|rid| match by_id.get(rid.as_str()) {
                    Some(path) => Some(path.to_string()),
                    None => {
                        log::warn!("Slide relationship {} not found, skipping", rid);
                        None
                    }
                })
                .collect());
        }

        let mut slides: Vec<(String, Option<usize>)> = relationships
            .into_iter()
            .map(|r| {
                let order_num = extract_slide_number(&r.id).or_else(|| extract_slide_number(&r.path));
                (r.path, order_num)
            })
            .collect();

        slides.sort_by(|a, b| match (a.1, b.1) {
            (Some(na), Some(nb)) => na.cmp(&nb),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.0.cmp(&b.0),
        });

        Ok(slides.into_iter().map(|(path, _)| path).collect())
    }

    /// Parse a single slide from the archive.
    fn parse_slide<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
        slide_number: usize,
    ) -> Result<Section> {
        let content =
            read_file_from_archive(archive, slide_path).map_err(|e| e.at_index(slide_number))?;

        let mut shapes = extract_shapes_from_xml(&content)
            .map_err(|e| Error::extraction_at(DocumentFormat::Pptx, slide_number, e))?;

        let title = shapes
            .iter()
            .position(|s| s.is_title)
            .map(|i| shapes.remove(i))
            .map(|s| s.text.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| self.config.slide_title(slide_number));

        // Top-to-bottom, then left-to-right
        shapes.sort_by(|a, b| {
            a.y.partial_cmp(&b.y)
                .unwrap_or(Ordering::Equal)
                .then(a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
        });

        let mut section = Section::new(title);
        for shape in shapes {
            for line in shape.text.lines() {
                section.push_line(line);
            }
        }

        Ok(section)
    }
}

impl Default for PptxParser {
    fn default() -> Self {
        Self::new()
    }
}

/// A slide relationship from presentation.xml.rels.
#[derive(Debug)]
struct SlideRelationship {
    id: String,
    path: String,
}

/// Information about a text-bearing shape extracted from XML.
#[derive(Debug, Default)]
struct ShapeInfo {
    text: String,
    x: f64,
    y: f64,
    is_title: bool,
}

fn parse_slide_relationships(xml: &str) -> Result<Vec<SlideRelationship>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut slides = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"Relationship" =>
            {
                let rel_type = attr_value(e, b"Type").unwrap_or_default();
                let target = attr_value(e, b"Target").unwrap_or_default();
                let id = attr_value(e, b"Id").unwrap_or_default();

                // Slide layouts and masters share the "/slide" prefix
                if rel_type.ends_with("/slide") {
                    let path = match target.strip_prefix('/') {
                        Some(absolute) => absolute.to_string(),
                        None => format!("ppt/{}", target),
                    };
                    slides.push(SlideRelationship { id, path });
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::extraction(
                    DocumentFormat::Pptx,
                    format!("Error parsing relationships: {}", e),
                ));
            }
            _ => {}
        }
    }

    Ok(slides)
}

/// Relationship ids of the slides listed in presentation.xml, in order.
fn parse_slide_id_list(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut ids = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"sldId" =>
            {
                let rid = e.attributes().flatten().find_map(|attr| {
                    let key = attr.key.as_ref();
                    // r:id, not the numeric id
                    (key != b"id" && local_name(key) == b"id")
                        .then(|| String::from_utf8_lossy(&attr.value).to_string())
                });
                if let Some(rid) = rid {
                    ids.push(rid);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::extraction(
                    DocumentFormat::Pptx,
                    format!("Error parsing presentation.xml: {}", e),
                ));
            }
            _ => {}
        }
    }

    Ok(ids)
}

/// Extract shapes with text, position and title flag from slide XML.
fn extract_shapes_from_xml(xml_content: &str) -> std::result::Result<Vec<ShapeInfo>, String> {
    let mut shapes = Vec::new();
    let mut reader = Reader::from_str(xml_content);

    let mut current_shape: Option<ShapeInfo> = None;
    let mut in_text_body = false;
    let mut in_text_run = false;
    let mut current_text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" => {
                    current_shape = Some(ShapeInfo::default());
                    current_text.clear();
                }
                b"off" => read_offset(e, current_shape.as_mut()),
                b"ph" => mark_title_placeholder(e, current_shape.as_mut()),
                b"txBody" if current_shape.is_some() => {
                    in_text_body = true;
                }
                b"p" if in_text_body => {
                    if !current_text.is_empty() {
                        current_text.push('\n');
                    }
                }
                b"t" if in_text_body => {
                    in_text_run = true;
                }
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match local_name(e.name().as_ref()) {
                b"off" => read_offset(e, current_shape.as_mut()),
                b"ph" => mark_title_placeholder(e, current_shape.as_mut()),
                b"br" if in_text_body => current_text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if in_text_run {
                    let text = e.unescape().unwrap_or_default();
                    current_text.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" => {
                    if let Some(mut shape) = current_shape.take() {
                        shape.text = current_text.trim().to_string();
                        if !shape.text.is_empty() {
                            shapes.push(shape);
                        }
                    }
                    current_text.clear();
                    in_text_body = false;
                    in_text_run = false;
                }
                b"txBody" => in_text_body = false,
                b"t" => in_text_run = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!("XML parsing error at position {}: {}", reader.buffer_position(), e));
            }
            _ => {}
        }
    }

    Ok(shapes)
}

fn read_offset(e: &BytesStart, shape: Option<&mut ShapeInfo>) {
    let Some(shape) = shape else { return };
    // Only the first offset belongs to the shape itself
    if shape.x != 0.0 || shape.y != 0.0 {
        return;
    }
    if let Some(x) = attr_value(e, b"x").and_then(|v| v.parse::<f64>().ok()) {
        shape.x = x;
    }
    if let Some(y) = attr_value(e, b"y").and_then(|v| v.parse::<f64>().ok()) {
        shape.y = y;
    }
}

fn mark_title_placeholder(e: &BytesStart, shape: Option<&mut ShapeInfo>) {
    if let Some(shape) = shape {
        if matches!(attr_value(e, b"type").as_deref(), Some("title") | Some("ctrTitle")) {
            shape.is_title = true;
        }
    }
}

fn attr_value(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// Read a file from the ZIP archive.
fn read_file_from_archive<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
    let mut file = archive.by_name(path).map_err(|e| {
        Error::extraction(
            DocumentFormat::Pptx,
            format!("File not found in archive '{}': {}", path, e),
        )
    })?;

    let mut content = String::new();
    file.read_to_string(&mut content).map_err(|e| {
        Error::extraction(DocumentFormat::Pptx, format!("Failed to read '{}': {}", path, e))
    })?;

    Ok(content)
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Extract a slide number from a string like "rId2" or "slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}
