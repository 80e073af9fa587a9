//! Core domain types, content cleaning, tree building and summarization
//! for document knowledge trees.

pub mod clean;
pub mod config;
pub mod error;
pub mod summarize;
pub mod tree;
pub mod types;

pub use clean::{clean, clean_text};
pub use config::ExtractConfig;
pub use error::{Error, Result};
pub use summarize::Summarizer;
pub use tree::{Nesting, TreeBuilder};
pub use types::{
    fallback_title, DocumentFormat, DocumentMetadata, ExtractionResult, KnowledgeNode, Section,
};
