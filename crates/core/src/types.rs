//! Domain types for extracted document content and the knowledge tree.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// The format of a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// Portable Document Format.
    Pdf,
    /// Word document (Office Open XML).
    Docx,
    /// PowerPoint presentation (Office Open XML).
    Pptx,
}

impl DocumentFormat {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "pptx" => Some(Self::Pptx),
            _ => None,
        }
    }

    /// Detect format from the extension of a path.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Canonical file extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Pptx => "pptx",
        }
    }

    /// Name of the positional unit used in error messages and previews.
    pub fn unit_name(&self) -> &'static str {
        match self {
            Self::Pdf => "page",
            Self::Docx => "paragraph",
            Self::Pptx => "slide",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
            Self::Pptx => "PPTX",
        };
        f.write_str(name)
    }
}

/// A titled run of content lines produced by a format extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub content: Vec<String>,
}

impl Section {
    /// Create an empty section with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: Vec::new(),
        }
    }

    /// Create a section with a title and content lines.
    pub fn with_content<I, S>(title: impl Into<String>, content: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            content: content.into_iter().map(Into::into).collect(),
        }
    }

    /// Append a content line.
    pub fn push_line(&mut self, line: impl Into<String>) {
        self.content.push(line.into());
    }

    /// Whether the section has any non-blank content line.
    pub fn has_content(&self) -> bool {
        self.content.iter().any(|l| !l.trim().is_empty())
    }
}

/// Document-level facts recorded alongside the sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Number of pages (PDF) or slides in the source.
    pub pages: Option<usize>,

    /// Author, when the document declares one.
    pub author: Option<String>,
}

/// Everything extracted from one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Original filename (without path).
    pub source: String,

    /// Format the file was parsed as.
    pub format: DocumentFormat,

    pub metadata: DocumentMetadata,

    /// Sections in document order.
    pub sections: Vec<Section>,
}

impl ExtractionResult {
    /// Create an empty result for the given file name and format.
    pub fn new(source: impl Into<String>, format: DocumentFormat) -> Self {
        Self {
            source: source.into(),
            format,
            metadata: DocumentMetadata::default(),
            sections: Vec::new(),
        }
    }

    /// Add a section to the result.
    pub fn add_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Whether the first section carries content.
    ///
    /// This is the structural success test used to decide on PDF fallback.
    pub fn first_section_has_content(&self) -> bool {
        self.sections.first().is_some_and(Section::has_content)
    }
}

/// One entry of the knowledge tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeNode {
    pub title: String,

    /// Content lines joined with `'\n'`.
    pub content: String,

    /// File name of the document the node came from, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Nested nodes. Empty under [`crate::Nesting::Flat`], the only strategy
    /// implemented so far.
    #[serde(default)]
    pub children: Vec<KnowledgeNode>,
}

impl KnowledgeNode {
    /// Create a leaf node.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            source: None,
            children: Vec::new(),
        }
    }

    /// Attach the originating file name.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Content split back into lines, skipping blank ones.
    pub fn content_lines(&self) -> impl Iterator<Item = &str> {
        self.content.lines().filter(|l| !l.trim().is_empty())
    }
}

/// Label used as a section title when a document has no detectable heading.
pub fn fallback_title(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(filename)
        .to_string()
}
