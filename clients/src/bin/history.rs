//! `owlgen-history`: reports how generated models changed across versions.
//!
//! Reads every `{name}_v{version}` folder written by the converters and
//! prints, per ontology, the classes and fields that changed between
//! consecutive versions.
//!
//! **Usage:**
//! ```text
//! owlgen-history [--output <dir>] [--ontology <name>]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use owlgen_clients::config::DEFAULT_OUTPUT;
use owlgen_clients::init_tracing;
use owlgen_codegen::history;

/// Compare generated model versions.
#[derive(Parser)]
#[command(name = "owlgen-history", about = "Report changes between generated model versions")]
struct Args {
    /// Directory holding the versioned artifact folders.
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Only report this ontology (folder prefix).
    #[arg(long)]
    ontology: Option<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    if !args.output.is_dir() {
        bail!("Output directory {} not found", args.output.display());
    }

    let histories = history::scan(&args.output)
        .with_context(|| format!("Failed to read {}", args.output.display()))?;
    let selected: Vec<_> = histories
        .iter()
        .filter(|h| args.ontology.as_deref().map_or(true, |name| h.name == name))
        .collect();
    if selected.is_empty() {
        println!("No generated ontologies found in: {}", args.output.display());
        return Ok(());
    }
    for history in selected {
        println!("{}", history.report());
    }
    Ok(())
}
