//! PDF extraction with primary/secondary backend fallback.

use crate::backends::{LopdfBackend, PdfBackend, PdfExtractBackend, PdfPages};
use knowtree_core::{clean_text, DocumentFormat, ExtractConfig, ExtractionResult, Result, Section};

/// Extracts sections from a PDF, falling back to a second backend when the
/// first one yields nothing usable.
///
/// The primary result is accepted only when its first section has content.
/// Otherwise the secondary backend runs over the whole file and its result
/// replaces the primary one entirely.
pub struct PdfExtractor {
    config: ExtractConfig,
    primary: Box<dyn PdfBackend>,
    secondary: Box<dyn PdfBackend>,
}

impl PdfExtractor {
    /// Create an extractor with the `pdf-extract` primary and `lopdf`
    /// secondary backends.
    pub fn new(config: ExtractConfig) -> Self {
        Self::with_backends(config, Box::new(PdfExtractBackend), Box::new(LopdfBackend))
    }

    /// Create an extractor with explicit backends.
    pub fn with_backends(
        config: ExtractConfig,
        primary: Box<dyn PdfBackend>,
        secondary: Box<dyn PdfBackend>,
    ) -> Self {
        Self {
            config,
            primary,
            secondary,
        }
    }

    /// Extract sections from PDF bytes.
    pub fn extract(&self, pdf_bytes: &[u8], filename: &str) -> Result<ExtractionResult> {
        match self.run(self.primary.as_ref(), pdf_bytes, filename) {
            Ok(result) if result.first_section_has_content() => {
                log::debug!("{}: extracted with {}", filename, self.primary.name());
                return Ok(result);
            }
            Ok(_) => log::warn!(
                "{}: {} found no content, retrying with {}",
                filename,
                self.primary.name(),
                self.secondary.name()
            ),
            Err(e) => log::warn!(
                "{}: {} failed ({}), retrying with {}",
                filename,
                self.primary.name(),
                e,
                self.secondary.name()
            ),
        }

        self.run(self.secondary.as_ref(), pdf_bytes, filename)
    }

    /// Raw text of the first `max_pages` pages, from the primary backend or
    /// the secondary if the primary fails outright. Used for previews.
    pub fn first_pages(&self, pdf_bytes: &[u8], max_pages: usize) -> Result<PdfPages> {
        self.primary
            .extract_first_pages(pdf_bytes, max_pages)
            .or_else(|e| {
                log::warn!("{} failed ({}), retrying with {}", self.primary.name(), e, self.secondary.name());
                self.secondary.extract_first_pages(pdf_bytes, max_pages)
            })
    }

    fn run(&self, backend: &dyn PdfBackend, pdf_bytes: &[u8], filename: &str) -> Result<ExtractionResult> {
        let pages = backend.extract_pages(pdf_bytes)?;

        let mut result = ExtractionResult::new(filename, DocumentFormat::Pdf);
        result.metadata.pages = Some(pages.pages.len());
        result.metadata.author = pages.author;
        result.sections = self.sectionize(&pages.pages);

        Ok(result)
    }

    /// Split cleaned page text into sections.
    ///
    /// The first line opens a section and becomes its title; after that,
    /// every line the heading rules accept starts a new section. Sections
    /// that end up without content are dropped.
    pub fn sectionize<S: AsRef<str>>(&self, pages: &[S]) -> Vec<Section> {
        let mut sections = Vec::new();
        let mut current: Option<Section> = None;

        for page in pages {
            for line in clean_text(page.as_ref()) {
                if line.is_empty() {
                    continue;
                }

                if current.is_none() || self.config.is_heading_line(&line) {
                    if let Some(done) = current.take().filter(Section::has_content) {
                        sections.push(done);
                    }
                    current = Some(Section::new(line));
                } else if let Some(section) = current.as_mut() {
                    section.push_line(line);
                }
            }
        }

        if let Some(done) = current.filter(Section::has_content) {
            sections.push(done);
        }

        sections
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new(ExtractConfig::default())
    }
}
