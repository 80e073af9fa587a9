//! In-memory working state: loaded documents, the generated tree, export.

use crate::config::Config;
use crate::export::{ExportFormat, Exporter};
use crate::extract::{detect_format, file_name, Extractor};
use knowtree_core::{ExtractionResult, KnowledgeNode, Result, Summarizer, TreeBuilder};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Where loading a file went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Format detection from the extension.
    Detect,
    /// Reading the file from disk.
    Read,
    /// Parsing the file contents.
    Extract,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Detect => "detect",
            Self::Read => "read",
            Self::Extract => "extract",
        })
    }
}

/// A file that could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub stage: Stage,
    pub message: String,
}

impl fmt::Display for FileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} failed: {}", self.path.display(), self.stage, self.message)
    }
}

/// Outcome of one [`Session::add_files`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Number of files added to the session.
    pub loaded: usize,
    pub failures: Vec<FileFailure>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Documents loaded so far and the tree generated from them.
///
/// A failure on one file never stops the others from loading, and a failed
/// export leaves the documents and the tree as they were.
pub struct Session {
    extractor: Extractor,
    builder: TreeBuilder,
    summarizer: Summarizer,
    exporter: Exporter,
    documents: Vec<ExtractionResult>,
    failures: Vec<FileFailure>,
    tree: Vec<KnowledgeNode>,
}

impl Session {
    pub fn new(extractor: Extractor, exporter: Exporter) -> Self {
        Self {
            extractor,
            builder: TreeBuilder::new(),
            summarizer: Summarizer::new(),
            exporter,
            documents: Vec::new(),
            failures: Vec::new(),
            tree: Vec::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Extractor::new(config.extract.clone()),
            Exporter::from_config(&config.export),
        )
    }

    /// Extract every file, recording failures and continuing with the rest.
    pub fn add_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> LoadReport {
        let mut report = LoadReport::default();

        for path in paths {
            let path = path.as_ref();
            match self.load(path) {
                Ok(result) => {
                    log::debug!("Loaded {} ({} sections)", path.display(), result.sections.len());
                    self.documents.push(result);
                    report.loaded += 1;
                }
                Err(failure) => {
                    log::warn!("{}", failure);
                    report.failures.push(failure);
                }
            }
        }

        self.failures.extend(report.failures.iter().cloned());
        report
    }

    fn load(&self, path: &Path) -> std::result::Result<ExtractionResult, FileFailure> {
        let fail = |stage, e: knowtree_core::Error| FileFailure {
            path: path.to_path_buf(),
            stage,
            message: e.to_string(),
        };

        let format = detect_format(path, None).map_err(|e| fail(Stage::Detect, e))?;
        let bytes = fs::read(path).map_err(|e| fail(Stage::Read, e.into()))?;
        self.extractor
            .extract_bytes(&bytes, &file_name(path), format)
            .map_err(|e| fail(Stage::Extract, e))
    }

    pub fn documents(&self) -> &[ExtractionResult] {
        &self.documents
    }

    /// Every load failure since the session started or was cleared.
    pub fn failures(&self) -> &[FileFailure] {
        &self.failures
    }

    pub fn remove_document(&mut self, index: usize) -> Option<ExtractionResult> {
        (index < self.documents.len()).then(|| self.documents.remove(index))
    }

    /// Drop all documents, failures and the tree.
    pub fn clear(&mut self) {
        self.documents.clear();
        self.failures.clear();
        self.tree.clear();
    }

    /// Rebuild the tree from the loaded documents, replacing any previous one.
    pub fn generate(&mut self) -> &[KnowledgeNode] {
        self.tree = self.builder.build(&self.documents);
        log::debug!("Generated {} nodes from {} documents", self.tree.len(), self.documents.len());
        &self.tree
    }

    /// Replace the tree with its key-point summary, generating it first if
    /// there is none yet.
    pub fn summarize(&mut self) -> &[KnowledgeNode] {
        if self.tree.is_empty() {
            self.generate();
        }
        self.tree = self.summarizer.summarize(&self.tree);
        &self.tree
    }

    pub fn tree(&self) -> &[KnowledgeNode] {
        &self.tree
    }

    /// Overwrite a node's title and content. Returns false if `index` is out
    /// of range.
    pub fn edit_node(&mut self, index: usize, title: impl Into<String>, content: impl Into<String>) -> bool {
        match self.tree.get_mut(index) {
            Some(node) => {
                node.title = title.into();
                node.content = content.into();
                true
            }
            None => false,
        }
    }

    pub fn remove_node(&mut self, index: usize) -> Option<KnowledgeNode> {
        (index < self.tree.len()).then(|| self.tree.remove(index))
    }

    /// Export the current tree, adding the format's extension to `path` if
    /// missing. Returns the path written.
    pub fn export(&self, format: ExportFormat, path: &Path) -> Result<PathBuf> {
        let path = format.ensure_extension(path);
        self.exporter.export(format, &self.tree, &path)?;
        Ok(path)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
