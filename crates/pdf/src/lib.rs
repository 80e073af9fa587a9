//! PDF extraction backend for document knowledge trees.
//!
//! Text comes from one of two interchangeable backends; the extractor turns
//! page text into heading-delimited sections.

pub mod backends;
pub mod extractor;

#[cfg(test)]
mod fixtures;

pub use backends::{LopdfBackend, PdfBackend, PdfExtractBackend, PdfPages};
pub use extractor::PdfExtractor;
