//! DOCX reading: paragraphs and heading-delimited sections.

use docx_rs::{DocumentChild, InsertChild, ParagraphChild, Run, RunChild};
use knowtree_core::{
    fallback_title, DocumentFormat, Error, ExtractConfig, ExtractionResult, Result, Section,
};
use std::collections::HashMap;

/// A body paragraph with its style id and, when the style sheet defines
/// it, the style's display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocxParagraph {
    pub style: Option<String>,
    pub style_name: Option<String>,
    pub text: String,
}

impl DocxParagraph {
    /// Localized Word writes ids like `1` for `heading 1`, so the name is
    /// checked as well as the id.
    fn is_heading(&self, config: &ExtractConfig) -> bool {
        [&self.style, &self.style_name]
            .into_iter()
            .flatten()
            .any(|s| config.is_heading_style(s))
    }
}

/// Reads Word documents into sections, starting a section at every heading.
pub struct DocxReader {
    config: ExtractConfig,
}

impl DocxReader {
    /// Create a reader with default settings.
    pub fn new() -> Self {
        Self::with_config(ExtractConfig::default())
    }

    /// Create a reader with the given settings.
    pub fn with_config(config: ExtractConfig) -> Self {
        Self { config }
    }

    /// Read a DOCX file into sections.
    ///
    /// A document without heading paragraphs yields exactly one section,
    /// titled after the file. Otherwise there is one section per heading and
    /// any text before the first heading opens the first section's content.
    pub fn read(&self, bytes: &[u8], filename: &str) -> Result<ExtractionResult> {
        let paragraphs = read_paragraphs(bytes)?;

        let mut preamble: Vec<String> = Vec::new();
        let mut sections: Vec<Section> = Vec::new();

        for paragraph in paragraphs {
            if paragraph.is_heading(&self.config) {
                sections.push(Section::new(paragraph.text.trim()));
            } else if let Some(section) = sections.last_mut() {
                section.push_line(paragraph.text);
            } else {
                preamble.push(paragraph.text);
            }
        }

        match sections.first_mut() {
            None => sections.push(Section::with_content(fallback_title(filename), preamble)),
            Some(first) if !preamble.is_empty() => {
                log::debug!(
                    "{}: {} paragraphs before the first heading",
                    filename,
                    preamble.len()
                );
                preamble.append(&mut first.content);
                first.content = preamble;
            }
            Some(_) => {}
        }

        let mut result = ExtractionResult::new(filename, DocumentFormat::Docx);
        result.sections = sections;
        Ok(result)
    }
}

impl Default for DocxReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Body paragraphs of a DOCX file, in document order. Tables are skipped.
pub fn read_paragraphs(bytes: &[u8]) -> Result<Vec<DocxParagraph>> {
    let docx = docx_rs::read_docx(bytes)
        .map_err(|e| Error::extraction(DocumentFormat::Docx, format!("DOCX parse error: {}", e)))?;

    let style_names: HashMap<&str, String> = docx
        .styles
        .styles
        .iter()
        .filter_map(|style| Some((style.style_id.as_str(), style_name(style)?)))
        .collect();

    let paragraphs = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(paragraph) => {
                let style = paragraph.property.style.as_ref().map(|s| s.val.clone());
                let style_name = style
                    .as_deref()
                    .and_then(|id| style_names.get(id))
                    .cloned();
                let mut text = String::new();
                collect_text(&paragraph.children, &mut text);
                Some(DocxParagraph {
                    style,
                    style_name,
                    text,
                })
            }
            _ => None,
        })
        .collect();

    Ok(paragraphs)
}

/// Display name of a style. `Name` keeps its text private; its serde form
/// is the plain string.
fn style_name(style: &docx_rs::Style) -> Option<String> {
    match serde_json::to_value(&style.name).ok()? {
        serde_json::Value::String(name) if !name.is_empty() => Some(name),
        _ => None,
    }
}

/// Append the text of runs, including runs inside hyperlinks and tracked
/// insertions.
fn collect_text(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => push_run_text(run, out),
            ParagraphChild::Hyperlink(link) => collect_text(&link.children, out),
            ParagraphChild::Insert(insert) => {
                for insert_child in &insert.children {
                    if let InsertChild::Run(run) = insert_child {
                        push_run_text(run, out);
                    }
                }
            }
            _ => {}
        }
    }
}

fn push_run_text(run: &Run, out: &mut String) {
    for run_child in &run.children {
        if let RunChild::Text(text) = run_child {
            out.push_str(&text.text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Hyperlink, HyperlinkType, Insert, Paragraph, Run, Style, StyleType};
    use std::io::Cursor;

    fn para(text: &str) -> Paragraph {
        Paragraph::new().add_run(Run::new().add_text(text))
    }

    fn heading(text: &str, style: &str) -> Paragraph {
        para(text).style(style)
    }

    fn pack(docx: Docx) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        docx.build().pack(&mut buf).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_sections_per_heading() {
        let bytes = pack(
            Docx::new()
                .add_paragraph(heading("Abstract", "Heading1"))
                .add_paragraph(para("text A"))
                .add_paragraph(heading("Methods", "Heading1"))
                .add_paragraph(para("text B")),
        );

        let result = DocxReader::new().read(&bytes, "paper.docx").unwrap();

        assert_eq!(
            result.sections,
            vec![
                Section::with_content("Abstract", ["text A"]),
                Section::with_content("Methods", ["text B"]),
            ]
        );
    }

    #[test]
    fn test_no_headings_yields_single_section_named_after_file() {
        let bytes = pack(Docx::new().add_paragraph(para("one")).add_paragraph(para("two")));

        let result = DocxReader::new().read(&bytes, "lecture notes.docx").unwrap();

        assert_eq!(result.sections.len(), 1);
        assert_eq!(result.sections[0].title, "lecture notes");
        assert_eq!(result.sections[0].content, vec!["one", "two"]);
    }

    #[test]
    fn test_empty_document_yields_one_empty_section() {
        let bytes = pack(Docx::new());
        let result = DocxReader::new().read(&bytes, "blank.docx").unwrap();

        assert_eq!(result.sections, vec![Section::new("blank")]);
    }

    #[test]
    fn test_section_count_equals_heading_count() {
        let bytes = pack(
            Docx::new()
                .add_paragraph(para("preface"))
                .add_paragraph(heading("One", "Heading1"))
                .add_paragraph(heading("Two", "Heading2"))
                .add_paragraph(para("two body"))
                .add_paragraph(heading("Three", "Heading1")),
        );

        let result = DocxReader::new().read(&bytes, "a.docx").unwrap();
        let titles: Vec<&str> = result.sections.iter().map(|s| s.title.as_str()).collect();

        assert_eq!(titles, vec!["One", "Two", "Three"]);
        assert_eq!(result.sections[0].content, vec!["preface"]);
        assert_eq!(result.sections[1].content, vec!["two body"]);
        assert!(result.sections[2].content.is_empty());
    }

    #[test]
    fn test_custom_heading_prefix() {
        let bytes = pack(
            Docx::new()
                .add_paragraph(heading("Chapter", "Title"))
                .add_paragraph(para("body")),
        );
        let config = ExtractConfig::new().with_heading_style_prefixes(["Title"]);

        let result = DocxReader::with_config(config).read(&bytes, "a.docx").unwrap();
        assert_eq!(result.sections, vec![Section::with_content("Chapter", ["body"])]);
    }

    #[test]
    fn test_garbage_is_extraction_error() {
        let err = DocxReader::new().read(b"not a zip", "bad.docx").unwrap_err();
        assert!(matches!(err, Error::Extraction { format: DocumentFormat::Docx, .. }));
    }

    #[test]
    fn test_localized_style_id_matched_by_name() {
        // Chinese Word: id "1", name "heading 1"
        let bytes = pack(
            Docx::new()
                .add_style(Style::new("1", StyleType::Paragraph).name("heading 1"))
                .add_style(Style::new("2", StyleType::Paragraph).name("heading 2"))
                .add_paragraph(heading("第一章 概述", "1"))
                .add_paragraph(para("概述内容"))
                .add_paragraph(heading("1.1 背景", "2"))
                .add_paragraph(para("背景内容")),
        );

        let paragraphs = read_paragraphs(&bytes).unwrap();
        assert_eq!(paragraphs[0].style.as_deref(), Some("1"));
        assert_eq!(paragraphs[0].style_name.as_deref(), Some("heading 1"));

        let result = DocxReader::new().read(&bytes, "zh.docx").unwrap();
        assert_eq!(
            result.sections,
            vec![
                Section::with_content("第一章 概述", ["概述内容"]),
                Section::with_content("1.1 背景", ["背景内容"]),
            ]
        );
    }

    #[test]
    fn test_hyperlink_and_inserted_text_are_kept() {
        let bytes = pack(
            Docx::new().add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text("see "))
                    .add_hyperlink(
                        Hyperlink::new("methods", HyperlinkType::Anchor)
                            .add_run(Run::new().add_text("the methods")),
                    )
                    .add_insert(Insert::new(Run::new().add_text(" section"))),
            ),
        );

        let paragraphs = read_paragraphs(&bytes).unwrap();
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].text, "see the methods section");
    }
}
