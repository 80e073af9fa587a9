//! PPTX (Office Open XML) extraction backend.
//!
//! Parses .pptx files, which are ZIP archives containing XML documents, into
//! one section per slide.

pub mod parser;

pub use parser::PptxParser;
