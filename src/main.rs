//! quire - EPUB package inspector

use std::io::Write;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use serde::Serialize;

use quire::{EpubContainer, ItemRegistry, Metadata, ReferenceRegistry, TableOfContents};

#[derive(Parser)]
#[command(name = "quire")]
#[command(version, about = "EPUB package inspector", long_about = None)]
#[command(after_help = "EXAMPLES:
    quire book.epub                          Show a summary of the package
    quire --json book.epub                   Dump the parsed model as JSON
    quire --extract OEBPS/ch1.xhtml book.epub   Write one archive entry to stdout")]
struct Cli {
    /// Input EPUB file
    #[arg(value_name = "INPUT")]
    input: String,

    /// Print the parsed package model as JSON
    #[arg(long, conflicts_with = "extract")]
    json: bool,

    /// Write the named archive entry to stdout
    #[arg(long, value_name = "PATH")]
    extract: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
struct Report<'a> {
    path: &'a str,
    package_path: Option<&'a str>,
    metadata: &'a Metadata,
    items: &'a ItemRegistry,
    references: &'a ReferenceRegistry,
    toc: &'a TableOfContents,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();
}

fn run(cli: &Cli) -> Result<(), String> {
    let mut container = EpubContainer::new();
    container.open(&cli.input).map_err(|e| e.to_string())?;

    if let Some(ref entry) = cli.extract {
        let bytes = container.read_entry(entry).map_err(|e| e.to_string())?;
        return std::io::stdout()
            .write_all(&bytes)
            .map_err(|e| e.to_string());
    }

    if cli.json {
        let report = Report {
            path: &cli.input,
            package_path: container.package_path(),
            metadata: container.all_metadata(),
            items: container.items(),
            references: container.references(),
            toc: container.toc(),
        };
        let json = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        println!("{json}");
        return Ok(());
    }

    show_info(&cli.input, &container);
    Ok(())
}

fn show_info(path: &str, container: &EpubContainer) {
    println!("File: {path}");
    if let Some(package_path) = container.package_path() {
        println!("Package: {package_path}");
    }
    for key in ["title", "creator", "language", "publisher"] {
        let value = container.metadata(key);
        if !value.is_empty() {
            println!("{}: {value}", capitalize(key));
        }
    }

    let items = container.items();
    println!("Items: {}", items.len());
    println!("Spine: {}", items.ordered_ids().len());
    if !items.unordered_ids().is_empty() {
        println!("Outside spine: {}", items.unordered_ids().len());
    }

    let references = container.references();
    for (ty, reference) in references.standard_references() {
        println!("Guide {ty}: {} ({})", reference.title, reference.target);
    }
    for (ty, reference) in references.other_references() {
        println!("Guide {ty}: {} ({})", reference.title, reference.target);
    }

    let toc = container.toc();
    println!("TOC entries: {}", toc.navmap.len());
    for (play_order, nav_point) in &toc.navmap {
        println!("  {play_order:>3}. {} -> {}", nav_point.label, nav_point.source);
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
