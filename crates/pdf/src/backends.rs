//! PDF text backends.
//!
//! Each backend turns a whole PDF into per-page text. Sectioning happens
//! afterwards in [`crate::PdfExtractor`], identically for every backend.

use knowtree_core::{DocumentFormat, Error, Result};
use lopdf::{Document, Object};
use std::panic::{self, UnwindSafe};

/// Per-page text of a PDF plus the author, when the backend can read it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdfPages {
    pub pages: Vec<String>,
    pub author: Option<String>,
}

/// Backend trait for PDF text extraction.
pub trait PdfBackend: Send + Sync {
    /// Extract the text of every page, in page order.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<PdfPages>;

    /// Extract only the first `max_pages` pages. Backends that can skip the
    /// remaining pages should override this.
    fn extract_first_pages(&self, pdf_bytes: &[u8], max_pages: usize) -> Result<PdfPages> {
        let mut pages = self.extract_pages(pdf_bytes)?;
        pages.pages.truncate(max_pages);
        Ok(pages)
    }

    /// Backend identifier for logging.
    fn name(&self) -> &str;
}

/// Primary backend built on `pdf-extract`, which follows the content stream
/// layout closely. The author is read from the document info with `lopdf`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractBackend;

impl PdfBackend for PdfExtractBackend {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<PdfPages> {
        guarded(self.name(), || {
            let pages = pdf_extract_pages(pdf_bytes)?;
            let author = Document::load_mem(pdf_bytes)
                .ok()
                .and_then(|doc| document_author(&doc));
            Ok(PdfPages { pages, author })
        })
    }

    /// Drops the pages past `max_pages` with `lopdf` before handing the
    /// document to `pdf-extract`.
    fn extract_first_pages(&self, pdf_bytes: &[u8], max_pages: usize) -> Result<PdfPages> {
        guarded(self.name(), || {
            let mut doc = load(pdf_bytes)?;
            let author = document_author(&doc);
            if max_pages == 0 {
                return Ok(PdfPages {
                    pages: Vec::new(),
                    author,
                });
            }

            let rest: Vec<u32> = doc.get_pages().keys().skip(max_pages).copied().collect();
            if rest.is_empty() {
                return Ok(PdfPages {
                    pages: pdf_extract_pages(pdf_bytes)?,
                    author,
                });
            }

            doc.delete_pages(&rest);
            let mut trimmed = Vec::new();
            doc.save_to(&mut trimmed)
                .map_err(|e| Error::extraction(DocumentFormat::Pdf, format!("lopdf: {}", e)))?;
            Ok(PdfPages {
                pages: pdf_extract_pages(&trimmed)?,
                author,
            })
        })
    }

    fn name(&self) -> &str {
        "pdf-extract"
    }
}

/// Secondary backend built on `lopdf`'s per-page text operator decoding.
///
/// Pages it cannot decode are logged and left empty instead of failing the
/// whole document.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfBackend;

impl PdfBackend for LopdfBackend {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<PdfPages> {
        self.extract_first_pages(pdf_bytes, usize::MAX)
    }

    fn extract_first_pages(&self, pdf_bytes: &[u8], max_pages: usize) -> Result<PdfPages> {
        guarded(self.name(), || {
            let doc = load(pdf_bytes)?;

            let page_numbers: Vec<u32> = doc.get_pages().keys().take(max_pages).copied().collect();
            let mut pages = Vec::with_capacity(page_numbers.len());

            for number in page_numbers {
                match doc.extract_text(&[number]) {
                    Ok(text) => pages.push(text),
                    Err(e) => {
                        log::warn!("lopdf: page {} unreadable, skipping: {}", number, e);
                        pages.push(String::new());
                    }
                }
            }

            Ok(PdfPages {
                pages,
                author: document_author(&doc),
            })
        })
    }

    fn name(&self) -> &str {
        "lopdf"
    }
}

fn load(pdf_bytes: &[u8]) -> Result<Document> {
    Document::load_mem(pdf_bytes)
        .map_err(|e| Error::extraction(DocumentFormat::Pdf, format!("lopdf: {}", e)))
}

fn pdf_extract_pages(pdf_bytes: &[u8]) -> Result<Vec<String>> {
    pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
        .map_err(|e| Error::extraction(DocumentFormat::Pdf, format!("pdf-extract: {}", e)))
}

/// Run a backend, turning a panic inside the PDF library into an error.
fn guarded<T, F>(backend: &str, f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + UnwindSafe,
{
    match panic::catch_unwind(f) {
        Ok(result) => result,
        Err(payload) => {
            let detail = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(Error::extraction(
                DocumentFormat::Pdf,
                format!("{} panicked: {}", backend, detail),
            ))
        }
    }
}

/// Author from the trailer's Info dictionary.
fn document_author(doc: &Document) -> Option<String> {
    let info = match doc.trailer.get(b"Info").ok()? {
        Object::Reference(id) => doc.get_dictionary(*id).ok()?,
        Object::Dictionary(dict) => dict,
        _ => return None,
    };
    let raw = info.get(b"Author").ok()?.as_str().ok()?;
    let author = decode_text_string(raw);
    let author = author.trim();
    (!author.is_empty()).then(|| author.to_string())
}

/// Decode a PDF text string: UTF-16BE with a byte order mark, otherwise
/// treated as single-byte text.
fn decode_text_string(raw: &[u8]) -> String {
    match raw.strip_prefix(&[0xFE, 0xFF]) {
        Some(utf16) => {
            let units: Vec<u16> = utf16
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        None => raw.iter().map(|&b| b as char).collect(),
    }
}
