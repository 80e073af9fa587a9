//! Content cleaning for extracted text.
//!
//! Strips page-number artifacts left behind by PDF and slide extraction,
//! trims every line and collapses runs of blank lines.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Stray page markers such as "P12" left over from text layers.
static PAGE_MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bP\d+\b").unwrap());

/// "Page 3", "p. 4", "pg: 5", "pagina 6" and similar footer tokens.
static PAGE_TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:page|p|pg|pag|pagina)\s*[\.:]*\s*\d+\b").unwrap()
});

/// A line holding nothing but a number.
static LONE_NUMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").unwrap());

/// Clean a sequence of raw lines.
///
/// Page markers are removed, each line is trimmed, lines that are a bare page
/// number become blank, consecutive blank lines collapse to one and blank
/// lines at either end are dropped. `clean(&clean(x)) == clean(x)`.
pub fn clean<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(lines.len());

    for raw in lines {
        let line = clean_line(raw.as_ref());
        if line.is_empty() && out.last().map_or(true, |prev| prev.is_empty()) {
            continue;
        }
        out.push(line);
    }

    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }

    out
}

/// Split a block of text into lines and clean them.
pub fn clean_text(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    clean(&lines)
}

/// Clean a single line. Returns an empty string for lines that carry only
/// page furniture.
pub fn clean_line(raw: &str) -> String {
    let mut line: String = raw.nfc().collect();

    // Removing one token can bring two fragments together into a new one.
    loop {
        let stripped = PAGE_MARKER_REGEX.replace_all(&line, "");
        let stripped = PAGE_TOKEN_REGEX.replace_all(&stripped, "").into_owned();
        if stripped == line {
            break;
        }
        line = stripped;
    }

    let line = line.trim();
    if LONE_NUMBER_REGEX.is_match(line) {
        return String::new();
    }

    line.to_string()
}
