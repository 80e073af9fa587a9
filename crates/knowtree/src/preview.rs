//! Bounded plain-text previews of source files.

use crate::extract::{detect_format, file_name, Extractor};
use knowtree_core::{clean, DocumentFormat, ExtractConfig, Result};
use knowtree_docx::read_paragraphs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// How much of each format a preview shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewLimits {
    pub pdf_pages: usize,
    pub docx_paragraphs: usize,
    pub pptx_slides: usize,
}

impl Default for PreviewLimits {
    fn default() -> Self {
        Self {
            pdf_pages: 5,
            docx_paragraphs: 100,
            pptx_slides: 10,
        }
    }
}

impl PreviewLimits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pdf_pages(mut self, pages: usize) -> Self {
        self.pdf_pages = pages;
        self
    }

    pub fn with_docx_paragraphs(mut self, paragraphs: usize) -> Self {
        self.docx_paragraphs = paragraphs;
        self
    }

    pub fn with_pptx_slides(mut self, slides: usize) -> Self {
        self.pptx_slides = slides;
        self
    }
}

/// Renders the first pages, paragraphs or slides of a file as text.
pub struct Previewer {
    extractor: Extractor,
    limits: PreviewLimits,
}

impl Previewer {
    pub fn new(config: ExtractConfig, limits: PreviewLimits) -> Self {
        Self {
            extractor: Extractor::new(config),
            limits,
        }
    }

    /// Preview a file on disk.
    pub fn preview(&self, path: &Path) -> Result<String> {
        let format = detect_format(path, None)?;
        let bytes = fs::read(path)?;
        self.preview_bytes(&bytes, &file_name(path), format)
    }

    /// Preview in-memory file contents of a known format.
    pub fn preview_bytes(&self, bytes: &[u8], filename: &str, format: DocumentFormat) -> Result<String> {
        let mut out = String::new();

        match format {
            DocumentFormat::Pdf => {
                let pages = self.extractor.pdf().first_pages(bytes, self.limits.pdf_pages)?;
                for (i, page) in pages.pages.iter().enumerate() {
                    let text = page.trim();
                    let text = if text.is_empty() { "(no text)" } else { text };
                    out.push_str(&format!("=== Page {} ===\n{}\n\n", i + 1, text));
                }
            }
            DocumentFormat::Docx => {
                let paragraphs = read_paragraphs(bytes)?;
                let texts: Vec<&str> = paragraphs
                    .iter()
                    .take(self.limits.docx_paragraphs)
                    .map(|p| p.text.as_str())
                    .collect();
                out = texts.join("\n");
            }
            DocumentFormat::Pptx => {
                let result = self.extractor.pptx().parse_limited(
                    Cursor::new(bytes),
                    filename,
                    self.limits.pptx_slides,
                )?;
                for section in &result.sections {
                    out.push_str(&format!("=== {} ===\n", section.title));
                    for line in clean(&section.content) {
                        out.push_str(&line);
                        out.push('\n');
                    }
                    out.push('\n');
                }
            }
        }

        log::debug!("{}: preview of {} bytes", filename, out.len());
        Ok(out)
    }
}

impl Default for Previewer {
    fn default() -> Self {
        Self::new(ExtractConfig::default(), PreviewLimits::default())
    }
}
