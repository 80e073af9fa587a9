//! Document knowledge trees: extract PDF, DOCX and PPTX files into titled
//! sections, build a flat forest of nodes, and export it to Word or PDF.

pub mod config;
pub mod convert;
pub mod export;
pub mod extract;
pub mod preview;
pub mod session;

#[cfg(test)]
mod fixtures;

pub use config::{Config, ExportConfig};
pub use convert::{ConverterKind, DocumentConverter, SofficeConverter, WordAutomationConverter};
pub use export::{ExportFormat, Exporter};
pub use extract::Extractor;
pub use preview::{PreviewLimits, Previewer};
pub use session::{FileFailure, LoadReport, Session, Stage};

pub use knowtree_core::{
    DocumentFormat, Error, ExtractConfig, ExtractionResult, KnowledgeNode, Result, Section,
    Summarizer, TreeBuilder,
};
