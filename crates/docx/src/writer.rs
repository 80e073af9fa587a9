//! DOCX writing of a knowledge tree.

use docx_rs::{Docx, Paragraph, Run, RunFonts, Style, StyleType};
use knowtree_core::{Error, KnowledgeNode, Result};
use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

/// Style id given to node titles.
pub const HEADING_STYLE_ID: &str = "Heading1";

/// Writes one level-1 heading per node followed by its content lines.
#[derive(Debug, Clone)]
pub struct DocxWriter {
    heading_size_pt: usize,
    body_size_pt: usize,
    font: Option<String>,
}

impl Default for DocxWriter {
    fn default() -> Self {
        Self {
            heading_size_pt: 16,
            body_size_pt: 12,
            font: None,
        }
    }
}

impl DocxWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set heading and body font sizes, in points.
    pub fn with_sizes(mut self, heading_pt: usize, body_pt: usize) -> Self {
        self.heading_size_pt = heading_pt.max(1);
        self.body_size_pt = body_pt.max(1);
        self
    }

    /// Use one font family for every script.
    pub fn with_font(mut self, font: Option<String>) -> Self {
        self.font = font;
        self
    }

    /// Write the nodes to a seekable sink.
    pub fn write<W: Write + Seek>(&self, nodes: &[KnowledgeNode], out: W) -> Result<()> {
        let heading_style = Style::new(HEADING_STYLE_ID, StyleType::Paragraph)
            .name("Heading 1")
            .size(self.heading_size_pt * 2)
            .bold();

        let mut docx = Docx::new().add_style(heading_style);

        for node in nodes {
            docx = docx.add_paragraph(
                Paragraph::new()
                    .add_run(self.run(&node.title))
                    .style(HEADING_STYLE_ID),
            );
            for line in node.content_lines() {
                docx = docx.add_paragraph(
                    Paragraph::new().add_run(self.run(line).size(self.body_size_pt * 2)),
                );
            }
        }

        docx.build()
            .pack(out)
            .map_err(|e| Error::Export(format!("Failed to write DOCX: {}", e)))
    }

    /// Write the nodes to a file, replacing it if it exists.
    pub fn write_to_path(&self, nodes: &[KnowledgeNode], path: &Path) -> Result<()> {
        let file = File::create(path)
            .map_err(|e| Error::Export(format!("Failed to create {}: {}", path.display(), e)))?;
        self.write(nodes, file)?;
        log::debug!("Wrote {} nodes to {}", nodes.len(), path.display());
        Ok(())
    }

    fn run(&self, text: &str) -> Run {
        let run = Run::new().add_text(text);
        match &self.font {
            Some(font) => run.fonts(
                RunFonts::new()
                    .ascii(font)
                    .hi_ansi(font)
                    .east_asia(font),
            ),
            None => run,
        }
    }
}
