//! DOCX backend for document knowledge trees: reads Word documents into
//! heading-delimited sections and writes knowledge trees back out.

pub mod reader;
pub mod writer;

pub use reader::{read_paragraphs, DocxParagraph, DocxReader};
pub use writer::{DocxWriter, HEADING_STYLE_ID};
