//! Extraction settings shared by the format backends.

use serde::{Deserialize, Serialize};

/// Keywords that mark a short PDF line as a heading.
const DEFAULT_HEADING_KEYWORDS: &[&str] = &["目录", "章节", "节", "第", "摘要", "引言", "结论", "参考"];

/// Lines at or above this many characters are never headings.
const DEFAULT_HEADING_MAX_CHARS: usize = 50;

/// Slides read from a presentation before the rest are ignored.
pub const DEFAULT_MAX_SLIDES: usize = 10;

/// Settings for heading detection and extraction caps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Keywords that make a short PDF line a heading.
    pub heading_keywords: Vec<String>,

    /// Headings must be shorter than this many characters.
    pub heading_max_chars: usize,

    /// DOCX paragraph style ids starting with one of these are headings.
    pub heading_style_prefixes: Vec<String>,

    /// Maximum number of slides read from a PPTX file.
    pub max_slides: usize,

    /// Title used for a slide without a title placeholder; `{n}` is the
    /// 1-based slide number.
    pub slide_title_label: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            heading_keywords: DEFAULT_HEADING_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            heading_max_chars: DEFAULT_HEADING_MAX_CHARS,
            heading_style_prefixes: vec!["Heading".to_string()],
            max_slides: DEFAULT_MAX_SLIDES,
            slide_title_label: "Slide {n}".to_string(),
        }
    }
}

impl ExtractConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the heading keyword list.
    pub fn with_heading_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.heading_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the DOCX heading style prefixes.
    pub fn with_heading_style_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.heading_style_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the slide cap.
    pub fn with_max_slides(mut self, max_slides: usize) -> Self {
        self.max_slides = max_slides;
        self
    }

    /// Whether a line of PDF text looks like a heading.
    ///
    /// Keyword matching only; documents without such keywords produce a
    /// single section per run of text.
    pub fn is_heading_line(&self, line: &str) -> bool {
        line.chars().count() < self.heading_max_chars
            && self
                .heading_keywords
                .iter()
                .any(|k| !k.is_empty() && line.contains(k.as_str()))
    }

    /// Whether a DOCX paragraph style id or style name denotes a heading.
    /// Prefixes match case-insensitively, so the built-in name `heading 1`
    /// counts as well as the id `Heading1`.
    pub fn is_heading_style(&self, style: &str) -> bool {
        let style = style.to_lowercase();
        self.heading_style_prefixes
            .iter()
            .any(|p| !p.is_empty() && style.starts_with(&p.to_lowercase()))
    }

    /// Title for a slide that has no title placeholder.
    pub fn slide_title(&self, number: usize) -> String {
        self.slide_title_label.replace("{n}", &number.to_string())
    }
}
