//! Error types for document extraction and export.

use crate::types::DocumentFormat;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting, building or exporting a knowledge tree.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open, read or write a file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The file format is not one of pdf, docx or pptx.
    #[error("Unsupported or unrecognized file format: {0}")]
    UnsupportedFormat(String),

    /// A parser raised or returned unusable structure.
    #[error("{format} extraction error{}: {message}", location(.format, .index))]
    Extraction {
        format: DocumentFormat,
        /// 1-based page or slide index, where known.
        index: Option<usize>,
        message: String,
    },

    /// PDF conversion is not available on this host.
    #[error("PDF export is not supported on this platform: {0}")]
    PlatformUnsupported(String),

    /// The external converter ran but did not produce a PDF.
    #[error("Document conversion failed: {0}")]
    Conversion(String),

    /// Writing the output document failed.
    #[error("Export error: {0}")]
    Export(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Build an extraction error without a position.
    pub fn extraction(format: DocumentFormat, message: impl Into<String>) -> Self {
        Error::Extraction {
            format,
            index: None,
            message: message.into(),
        }
    }

    /// Build an extraction error pinned to a page or slide.
    pub fn extraction_at(format: DocumentFormat, index: usize, message: impl Into<String>) -> Self {
        Error::Extraction {
            format,
            index: Some(index),
            message: message.into(),
        }
    }

    /// Pin an extraction error to a page or slide; other errors pass through.
    pub fn at_index(self, index: usize) -> Self {
        match self {
            Error::Extraction { format, message, .. } => Error::Extraction {
                format,
                index: Some(index),
                message,
            },
            other => other,
        }
    }
}

fn location(format: &DocumentFormat, index: &Option<usize>) -> String {
    match index {
        Some(i) => format!(" at {} {}", format.unit_name(), i),
        None => String::new(),
    }
}
