//! CLI tool for turning PDF, DOCX and PPTX files into a knowledge tree.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use knowtree::{Config, ConverterKind, ExportFormat, KnowledgeNode, Previewer, Session};
use std::path::PathBuf;

/// Build a knowledge tree from documents and export it to Word or PDF.
#[derive(Parser, Debug)]
#[command(name = "knowtree")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON settings file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the sections extracted from each file
    Extract {
        /// Input file(s) (.pdf, .docx or .pptx)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the knowledge tree built from the files
    Tree {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// Print the key points of every tree node
    Summarize {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// Export the knowledge tree to a Word or PDF file
    Export {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output file (default: knowledge-summary.docx or .pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: word or pdf
        #[arg(short, long, default_value = "word", value_parser = parse_format)]
        format: ExportFormat,

        /// PDF converter: auto, word or soffice
        #[arg(long, value_parser = parse_converter)]
        converter: Option<ConverterKind>,

        /// Export key points instead of the full content
        #[arg(short, long)]
        summarize: bool,
    },

    /// Show the first pages, paragraphs or slides of a file
    Preview {
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let mut config = match &args.config {
        Some(path) => Config::from_json_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Config::default(),
    };

    match args.command {
        Command::Extract { files, json } => {
            let session = load(&config, &files)?;
            if json {
                println!("{}", serde_json::to_string_pretty(session.documents())?);
            } else {
                for doc in session.documents() {
                    println!("# {} ({}, {} sections)", doc.source, doc.format, doc.sections.len());
                    for section in &doc.sections {
                        println!("## {}", section.title);
                        for line in &section.content {
                            println!("{}", line);
                        }
                    }
                    println!();
                }
            }
        }
        Command::Tree { files, json } => {
            let mut session = load(&config, &files)?;
            print_tree(session.generate(), json)?;
        }
        Command::Summarize { files, json } => {
            let mut session = load(&config, &files)?;
            session.generate();
            print_tree(session.summarize(), json)?;
        }
        Command::Export {
            files,
            output,
            format,
            converter,
            summarize,
        } => {
            if let Some(converter) = converter {
                config.export = config.export.with_converter(converter);
            }
            let mut session = load(&config, &files)?;
            session.generate();
            if summarize {
                session.summarize();
            }

            let output = output.unwrap_or_else(|| PathBuf::from(format.default_filename()));
            let written = session
                .export(format, &output)
                .with_context(|| format!("Failed to export {}", output.display()))?;
            eprintln!("Written to: {}", written.display());
        }
        Command::Preview { file } => {
            let previewer = Previewer::new(config.extract.clone(), config.preview);
            let text = previewer
                .preview(&file)
                .with_context(|| format!("Failed to preview {}", file.display()))?;
            print!("{}", text);
        }
    }

    Ok(())
}

/// Load every file into a new session. Files that fail are reported and
/// skipped; it is an error only if none loads.
fn load(config: &Config, files: &[PathBuf]) -> Result<Session> {
    let mut session = Session::from_config(config);
    let report = session.add_files(files);

    for failure in &report.failures {
        eprintln!("Error processing {}", failure);
    }
    log::debug!("Loaded {} of {} files", report.loaded, files.len());

    if report.loaded == 0 {
        anyhow::bail!("No input file could be loaded");
    }
    Ok(session)
}

fn print_tree(nodes: &[KnowledgeNode], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(nodes)?);
        return Ok(());
    }

    for (i, node) in nodes.iter().enumerate() {
        println!("{}. {}", i + 1, node.title);
        for line in node.content_lines() {
            println!("   {}", line);
        }
    }
    Ok(())
}

fn parse_format(name: &str) -> std::result::Result<ExportFormat, String> {
    ExportFormat::from_name(name).ok_or_else(|| format!("unknown format '{}' (expected word or pdf)", name))
}

fn parse_converter(name: &str) -> std::result::Result<ConverterKind, String> {
    ConverterKind::from_name(name)
        .ok_or_else(|| format!("unknown converter '{}' (expected auto, word or soffice)", name))
}
