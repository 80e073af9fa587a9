//! Top-level settings, loadable from a JSON file.

use crate::convert::ConverterKind;
use crate::preview::PreviewLimits;
use knowtree_core::{Error, ExtractConfig, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for Word and PDF export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Which converter turns the Word document into a PDF.
    pub converter: ConverterKind,

    /// LibreOffice executable used by the soffice converter.
    pub soffice_program: PathBuf,

    /// Parent directory for scratch files; the system temp dir when unset.
    pub scratch_dir: Option<PathBuf>,

    pub heading_size_pt: usize,
    pub body_size_pt: usize,

    /// Font family for every run, when set.
    pub font: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            converter: ConverterKind::Auto,
            soffice_program: PathBuf::from("soffice"),
            scratch_dir: None,
            heading_size_pt: 16,
            body_size_pt: 12,
            font: None,
        }
    }
}

impl ExportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_converter(mut self, converter: ConverterKind) -> Self {
        self.converter = converter;
        self
    }

    pub fn with_soffice_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.soffice_program = program.into();
        self
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = Some(font.into());
        self
    }
}

/// Everything configurable, grouped by concern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub extract: ExtractConfig,
    pub export: ExportConfig,
    pub preview: PreviewLimits,
}

impl Config {
    /// Load settings from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse settings from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }
}
