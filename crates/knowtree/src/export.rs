//! Word and PDF export of a knowledge tree.

use crate::config::ExportConfig;
use crate::convert::DocumentConverter;
use knowtree_core::{Error, KnowledgeNode, Result};
use knowtree_docx::DocxWriter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Output document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Word,
    Pdf,
}

impl ExportFormat {
    /// Parse a format name as given on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "word" | "docx" => Some(Self::Word),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Word => "docx",
            Self::Pdf => "pdf",
        }
    }

    /// Suggested file name when the user has not chosen one.
    pub fn default_filename(&self) -> &'static str {
        match self {
            Self::Word => "knowledge-summary.docx",
            Self::Pdf => "knowledge-summary.pdf",
        }
    }

    /// Label for a save dialog's file-type filter.
    pub fn filter_label(&self) -> &'static str {
        match self {
            Self::Word => "Word document (*.docx)",
            Self::Pdf => "PDF file (*.pdf)",
        }
    }

    /// Append this format's extension unless the path already ends with it.
    pub fn ensure_extension(&self, path: &Path) -> PathBuf {
        let has_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(self.extension()));
        if has_ext {
            return path.to_path_buf();
        }
        let mut name = path.as_os_str().to_os_string();
        name.push(".");
        name.push(self.extension());
        PathBuf::from(name)
    }
}

/// Writes knowledge trees as Word documents, and as PDFs by converting a
/// scratch Word document.
pub struct Exporter {
    writer: DocxWriter,
    converter: Box<dyn DocumentConverter>,
    scratch_dir: Option<PathBuf>,
}

impl Exporter {
    pub fn new(writer: DocxWriter, converter: Box<dyn DocumentConverter>) -> Self {
        Self {
            writer,
            converter,
            scratch_dir: None,
        }
    }

    /// Build an exporter from settings, resolving the converter for this host.
    pub fn from_config(config: &ExportConfig) -> Self {
        let writer = DocxWriter::new()
            .with_sizes(config.heading_size_pt, config.body_size_pt)
            .with_font(config.font.clone());
        let converter = config.converter.build(&config.soffice_program);
        let mut exporter = Self::new(writer, converter);
        exporter.scratch_dir = config.scratch_dir.clone();
        exporter
    }

    /// Create scratch directories under `dir` instead of the system temp dir.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    /// Export in the given format. An empty tree is rejected.
    pub fn export(&self, format: ExportFormat, nodes: &[KnowledgeNode], path: &Path) -> Result<()> {
        if nodes.is_empty() {
            return Err(Error::Export("Nothing to export: the knowledge tree is empty".into()));
        }
        match format {
            ExportFormat::Word => self.export_word(nodes, path),
            ExportFormat::Pdf => self.export_pdf(nodes, path),
        }
    }

    /// One level-1 heading per node, then one paragraph per content line.
    pub fn export_word(&self, nodes: &[KnowledgeNode], path: &Path) -> Result<()> {
        self.writer.write_to_path(nodes, path)?;
        log::info!("Exported {} nodes to {}", nodes.len(), path.display());
        Ok(())
    }

    /// Write a scratch Word document and convert it to `path`. The scratch
    /// directory is removed whether or not conversion succeeds.
    pub fn export_pdf(&self, nodes: &[KnowledgeNode], path: &Path) -> Result<()> {
        let scratch = self.scratch()?;
        let converted = self.convert_in(&scratch, nodes, path);

        let scratch_path = scratch.path().to_path_buf();
        if let Err(e) = scratch.close() {
            log::warn!("Failed to remove {}: {}", scratch_path.display(), e);
        }

        converted?;
        if !path.exists() {
            return Err(Error::Conversion(format!(
                "{} reported success but {} was not created",
                self.converter.name(),
                path.display()
            )));
        }

        log::info!("Exported {} nodes to {}", nodes.len(), path.display());
        Ok(())
    }

    fn scratch(&self) -> Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("knowtree-export-");
        let dir = match &self.scratch_dir {
            Some(parent) => builder.tempdir_in(parent)?,
            None => builder.tempdir()?,
        };
        Ok(dir)
    }

    fn convert_in(&self, scratch: &TempDir, nodes: &[KnowledgeNode], pdf: &Path) -> Result<()> {
        let docx = scratch.path().join(ExportFormat::Word.default_filename());
        self.writer.write_to_path(nodes, &docx)?;
        log::debug!("Converting {} with {}", docx.display(), self.converter.name());
        self.converter.convert(&docx, pdf)
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::from_config(&ExportConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Extractor;
    use std::fs;
    use std::sync::{Arc, Mutex};

    /// Converter that records the scratch file it was given.
    struct FakeConverter {
        output: Option<&'static [u8]>,
        fail: bool,
        seen: Arc<Mutex<Option<PathBuf>>>,
    }

    impl FakeConverter {
        fn new(output: Option<&'static [u8]>, fail: bool) -> (Self, Arc<Mutex<Option<PathBuf>>>) {
            let seen = Arc::new(Mutex::new(None));
            (
                Self {
                    output,
                    fail,
                    seen: Arc::clone(&seen),
                },
                seen,
            )
        }
    }

    impl DocumentConverter for FakeConverter {
        fn convert(&self, docx: &Path, pdf: &Path) -> Result<()> {
            assert!(docx.exists());
            *self.seen.lock().unwrap() = Some(docx.to_path_buf());
            if self.fail {
                return Err(Error::Conversion("fake failure".into()));
            }
            if let Some(bytes) = self.output {
                fs::write(pdf, bytes)?;
            }
            Ok(())
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    fn nodes(k: usize) -> Vec<KnowledgeNode> {
        (1..=k)
            .map(|i| KnowledgeNode::new(format!("Heading {}", i), format!("line {}a\nline {}b", i, i)))
            .collect()
    }

    fn is_empty_dir(dir: &Path) -> bool {
        fs::read_dir(dir).unwrap().next().is_none()
    }

    #[test]
    fn test_ensure_extension() {
        let word = ExportFormat::Word;
        assert_eq!(word.ensure_extension(Path::new("out")), PathBuf::from("out.docx"));
        assert_eq!(word.ensure_extension(Path::new("out.DOCX")), PathBuf::from("out.DOCX"));
        assert_eq!(
            ExportFormat::Pdf.ensure_extension(Path::new("notes.v2")),
            PathBuf::from("notes.v2.pdf")
        );
    }

    #[test]
    fn test_format_names() {
        assert_eq!(ExportFormat::from_name("DOCX"), Some(ExportFormat::Word));
        assert_eq!(ExportFormat::from_name("pdf"), Some(ExportFormat::Pdf));
        assert_eq!(ExportFormat::from_name("odt"), None);
        assert_eq!(ExportFormat::Pdf.default_filename(), "knowledge-summary.pdf");
        assert_eq!(ExportFormat::Word.filter_label(), "Word document (*.docx)");
        assert_eq!(ExportFormat::Pdf.filter_label(), "PDF file (*.pdf)");
    }

    #[test]
    fn test_word_export_round_trips_headings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.docx");
        let tree = nodes(4);

        Exporter::default().export(ExportFormat::Word, &tree, &path).unwrap();
        let result = Extractor::default().extract(&path, None).unwrap();

        let titles: Vec<&str> = result.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Heading 1", "Heading 2", "Heading 3", "Heading 4"]);
        assert_eq!(result.sections[2].content, vec!["line 3a", "line 3b"]);
    }

    #[test]
    fn test_empty_tree_is_export_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.docx");

        let err = Exporter::default().export(ExportFormat::Word, &[], &path).unwrap_err();
        assert!(matches!(err, Error::Export(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_pdf_export_removes_scratch_on_success() {
        let scratch = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let pdf = out.path().join("tree.pdf");
        let (converter, seen) = FakeConverter::new(Some(b"%PDF-1.7"), false);

        Exporter::new(DocxWriter::new(), Box::new(converter))
            .with_scratch_dir(scratch.path())
            .export(ExportFormat::Pdf, &nodes(2), &pdf)
            .unwrap();

        assert_eq!(fs::read(&pdf).unwrap(), b"%PDF-1.7");
        let used = seen.lock().unwrap().clone().unwrap();
        assert!(used.starts_with(scratch.path()));
        assert!(!used.exists());
        assert!(is_empty_dir(scratch.path()));
    }

    #[test]
    fn test_pdf_export_removes_scratch_on_failure() {
        let scratch = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let pdf = out.path().join("tree.pdf");
        let (converter, _) = FakeConverter::new(None, true);

        let err = Exporter::new(DocxWriter::new(), Box::new(converter))
            .with_scratch_dir(scratch.path())
            .export_pdf(&nodes(1), &pdf)
            .unwrap_err();

        assert!(matches!(err, Error::Conversion(_)));
        assert!(!pdf.exists());
        assert!(is_empty_dir(scratch.path()));
    }

    #[test]
    fn test_converter_producing_nothing_is_conversion_error() {
        let scratch = tempfile::tempdir().unwrap();
        let pdf = scratch.path().join("missing.pdf");
        let (converter, _) = FakeConverter::new(None, false);

        let err = Exporter::new(DocxWriter::new(), Box::new(converter))
            .export_pdf(&nodes(1), &pdf)
            .unwrap_err();
        assert!(matches!(err, Error::Conversion(_)));
    }

    #[cfg(not(windows))]
    #[test]
    fn test_word_automation_pdf_export_off_windows() {
        use crate::convert::WordAutomationConverter;

        let scratch = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let tree = nodes(3);

        let exporter = Exporter::new(DocxWriter::new(), Box::new(WordAutomationConverter))
            .with_scratch_dir(scratch.path());

        let word = out.path().join("summary.docx");
        exporter.export(ExportFormat::Word, &tree, &word).unwrap();
        let before = fs::read(&word).unwrap();

        let pdf = out.path().join("summary.pdf");
        let err = exporter.export(ExportFormat::Pdf, &tree, &pdf).unwrap_err();

        assert!(matches!(err, Error::PlatformUnsupported(_)));
        assert!(!pdf.exists());
        assert!(is_empty_dir(scratch.path()));
        assert_eq!(fs::read(&word).unwrap(), before);
    }
}
