//! Word-to-PDF conversion through external office software.

use knowtree_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Word's `wdFormatPDF` value for `SaveAs`.
const WD_FORMAT_PDF: u32 = 17;

/// Turns a `.docx` file into a `.pdf` file.
pub trait DocumentConverter: Send + Sync {
    /// Convert `docx` into a PDF written at `pdf`.
    fn convert(&self, docx: &Path, pdf: &Path) -> Result<()>;

    /// Converter identifier for logging.
    fn name(&self) -> &str;
}

/// Which converter to use for PDF export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConverterKind {
    /// Word automation on Windows, LibreOffice elsewhere.
    #[default]
    Auto,
    /// Microsoft Word through COM automation.
    Word,
    /// LibreOffice in headless mode.
    Soffice,
}

impl ConverterKind {
    /// Parse a converter name as given on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "word" => Some(Self::Word),
            "soffice" | "libreoffice" => Some(Self::Soffice),
            _ => None,
        }
    }

    /// The concrete kind for this host.
    pub fn resolve(self) -> Self {
        match self {
            Self::Auto if cfg!(windows) => Self::Word,
            Self::Auto => Self::Soffice,
            other => other,
        }
    }

    /// Build the converter.
    pub fn build(self, soffice_program: &Path) -> Box<dyn DocumentConverter> {
        match self.resolve() {
            Self::Word => Box::new(WordAutomationConverter),
            _ => Box::new(SofficeConverter::new(soffice_program)),
        }
    }
}

/// Drives Microsoft Word through PowerShell COM automation: open the
/// document, save it as PDF, close, quit. Windows only.
#[derive(Debug, Default, Clone, Copy)]
pub struct WordAutomationConverter;

impl DocumentConverter for WordAutomationConverter {
    fn convert(&self, docx: &Path, pdf: &Path) -> Result<()> {
        if !cfg!(windows) {
            return Err(Error::PlatformUnsupported(
                "Word automation is only available on Windows; use the soffice converter".into(),
            ));
        }

        let script = word_script(&std::path::absolute(docx)?, &std::path::absolute(pdf)?);
        let output = Command::new("powershell")
            .args(["-NoProfile", "-NonInteractive", "-Command", script.as_str()])
            .output()
            .map_err(|e| spawn_error("powershell", e))?;

        check_output("Word automation", &output)
    }

    fn name(&self) -> &str {
        "word"
    }
}

/// Converts with LibreOffice: `soffice --headless --convert-to pdf`.
#[derive(Debug, Clone)]
pub struct SofficeConverter {
    program: PathBuf,
}

impl SofficeConverter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for SofficeConverter {
    fn default() -> Self {
        Self::new("soffice")
    }
}

impl DocumentConverter for SofficeConverter {
    fn convert(&self, docx: &Path, pdf: &Path) -> Result<()> {
        // soffice names its output after the input; convert into a private
        // directory so nothing next to the input is overwritten.
        let out_dir = tempfile::Builder::new().prefix("knowtree-soffice-").tempdir()?;

        let output = Command::new(&self.program)
            .arg("--headless")
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(out_dir.path())
            .arg(docx)
            .output()
            .map_err(|e| spawn_error(&self.program.display().to_string(), e))?;

        check_output("soffice", &output)?;

        let stem = docx
            .file_stem()
            .ok_or_else(|| Error::Conversion(format!("{} has no file name", docx.display())))?;
        let mut produced_name = stem.to_os_string();
        produced_name.push(".pdf");
        let produced = out_dir.path().join(produced_name);
        if !produced.exists() {
            return Err(Error::Conversion(format!(
                "soffice finished but produced no {}",
                produced.display()
            )));
        }

        // rename fails across filesystems
        if fs::rename(&produced, pdf).is_err() {
            fs::copy(&produced, pdf)?;
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "soffice"
    }
}

/// PowerShell script that opens `docx` in Word and saves it as `pdf`.
fn word_script(docx: &Path, pdf: &Path) -> String {
    format!(
        "$ErrorActionPreference = 'Stop'; \
         $word = New-Object -ComObject Word.Application; \
         $word.Visible = $false; \
         try {{ \
           $doc = $word.Documents.Open({docx}); \
           try {{ $doc.SaveAs([ref] {pdf}, [ref] {format}) }} \
           finally {{ $doc.Close([ref] $false) }} \
         }} finally {{ $word.Quit() }}",
        docx = ps_quote(docx),
        pdf = ps_quote(pdf),
        format = WD_FORMAT_PDF,
    )
}

/// Single-quoted PowerShell string literal.
fn ps_quote(path: &Path) -> String {
    format!("'{}'", path.display().to_string().replace('\'', "''"))
}

fn spawn_error(program: &str, e: io::Error) -> Error {
    if e.kind() == io::ErrorKind::NotFound {
        Error::PlatformUnsupported(format!("{} is not installed or not on PATH", program))
    } else {
        Error::IoError(e)
    }
}

fn check_output(what: &str, output: &Output) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(Error::Conversion(format!(
        "{} exited with {}: {}",
        what,
        output.status,
        stderr.trim()
    )))
}
