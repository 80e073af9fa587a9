//! Format detection and dispatch to the per-format extractors.

use knowtree_core::{clean, DocumentFormat, Error, ExtractConfig, ExtractionResult, Result};
use knowtree_docx::DocxReader;
use knowtree_pdf::PdfExtractor;
use knowtree_pptx::PptxParser;
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// Reads PDF, DOCX and PPTX files into cleaned sections.
pub struct Extractor {
    pdf: PdfExtractor,
    docx: DocxReader,
    pptx: PptxParser,
}

impl Extractor {
    /// Create an extractor whose backends share one configuration.
    pub fn new(config: ExtractConfig) -> Self {
        Self {
            pdf: PdfExtractor::new(config.clone()),
            docx: DocxReader::with_config(config.clone()),
            pptx: PptxParser::with_config(config),
        }
    }

    /// Extract a file. The format is taken from `hint` or the file
    /// extension and is checked before the file is opened.
    pub fn extract(&self, path: &Path, hint: Option<DocumentFormat>) -> Result<ExtractionResult> {
        let format = detect_format(path, hint)?;
        let bytes = fs::read(path)?;
        self.extract_bytes(&bytes, &file_name(path), format)
    }

    /// Extract in-memory file contents of a known format.
    pub fn extract_bytes(
        &self,
        bytes: &[u8],
        filename: &str,
        format: DocumentFormat,
    ) -> Result<ExtractionResult> {
        log::debug!("{}: extracting as {}", filename, format);

        let mut result = match format {
            DocumentFormat::Pdf => self.pdf.extract(bytes, filename)?,
            DocumentFormat::Docx => self.docx.read(bytes, filename)?,
            DocumentFormat::Pptx => self.pptx.parse(Cursor::new(bytes), filename)?,
        };

        for section in &mut result.sections {
            section.content = clean(&section.content);
        }

        log::debug!("{}: {} sections", filename, result.sections.len());
        Ok(result)
    }

    pub(crate) fn pdf(&self) -> &PdfExtractor {
        &self.pdf
    }

    pub(crate) fn pptx(&self) -> &PptxParser {
        &self.pptx
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ExtractConfig::default())
    }
}

/// Format from the hint, else from the extension.
pub fn detect_format(path: &Path, hint: Option<DocumentFormat>) -> Result<DocumentFormat> {
    hint.or_else(|| DocumentFormat::from_path(path)).ok_or_else(|| {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| "(none)".to_string());
        Error::UnsupportedFormat(format!("{}: unsupported extension {}", path.display(), ext))
    })
}

/// File name without directories, falling back to the full path.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
