//! Key-point condensation of a knowledge tree.
//!
//! Each node's content is cut into sentences and reduced to a handful of
//! bullet points: sentences carrying an importance marker win, otherwise the
//! opening sentences stand in.

use crate::types::KnowledgeNode;
use regex::Regex;
use std::sync::LazyLock;

/// Sentence terminators, ASCII and full-width.
static SENTENCE_SPLIT_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.。!?！？;；]").unwrap());

static WHITESPACE_COLLAPSE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Filler clauses dropped from a key point.
static FILLER_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"在这个.*?中",
        r"通过.*?可以发现",
        r"从.*?可以看出",
        r"根据.*?得知",
        r"由于.*?所以",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Words that flag a sentence as a key point.
const IMPORTANCE_MARKERS: &[&str] = &[
    "重要", "关键", "核心", "主要", "首先", "其次", "最后", "总之", "因此", "所以", "特点", "优势",
    "定义", "概念",
];

/// Key points must be longer than this many characters.
const MIN_POINT_CHARS: usize = 10;

/// Opening sentences considered when no sentence carries a marker.
const LEAD_SENTENCES: usize = 3;

/// Points kept per node.
const MAX_POINTS: usize = 5;

/// Condenses node content into bullet points.
#[derive(Debug, Clone)]
pub struct Summarizer {
    /// Content used for nodes that yield no key point.
    empty_placeholder: String,
}

impl Default for Summarizer {
    fn default() -> Self {
        Self {
            empty_placeholder: "(no key points)".to_string(),
        }
    }
}

impl Summarizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the content used for nodes without key points.
    pub fn with_empty_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.empty_placeholder = placeholder.into();
        self
    }

    /// Summarize every node, keeping titles, sources and order.
    pub fn summarize(&self, nodes: &[KnowledgeNode]) -> Vec<KnowledgeNode> {
        nodes.iter().map(|node| self.summarize_node(node)).collect()
    }

    fn summarize_node(&self, node: &KnowledgeNode) -> KnowledgeNode {
        let lines: Vec<&str> = node.content.lines().collect();
        let points = key_points(&lines);

        let content = if points.is_empty() {
            self.empty_placeholder.clone()
        } else {
            points
                .iter()
                .map(|p| format!("- {}", p))
                .collect::<Vec<_>>()
                .join("\n")
        };

        KnowledgeNode {
            title: node.title.clone(),
            content,
            source: node.source.clone(),
            children: Vec::new(),
        }
    }
}

/// Pick up to five key points from content lines.
pub fn key_points(lines: &[&str]) -> Vec<String> {
    if lines.is_empty() {
        return Vec::new();
    }

    let full = lines.join(" ");
    let sentences: Vec<&str> = SENTENCE_SPLIT_REGEX.split(&full).collect();

    let mut points: Vec<String> = sentences
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && IMPORTANCE_MARKERS.iter().any(|m| s.contains(m)))
        .map(simplify_sentence)
        .filter(|s| s.chars().count() > MIN_POINT_CHARS)
        .collect();

    if points.is_empty() {
        points = sentences
            .iter()
            .take(LEAD_SENTENCES)
            .map(|s| s.trim())
            .filter(|s| s.chars().count() > MIN_POINT_CHARS)
            .map(simplify_sentence)
            .filter(|s| !s.is_empty())
            .collect();
    }

    points.truncate(MAX_POINTS);
    points
}

/// Collapse whitespace and drop filler clauses.
pub fn simplify_sentence(sentence: &str) -> String {
    let mut out = WHITESPACE_COLLAPSE_REGEX
        .replace_all(sentence, " ")
        .trim()
        .to_string();

    for filler in FILLER_REGEXES.iter() {
        out = filler.replace_all(&out, "").into_owned();
    }

    out.trim().to_string()
}
