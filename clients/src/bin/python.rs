//! `owlgen-python`: generates Python dataclasses from an OWL ontology.
//!
//! **Usage:**
//! ```text
//! owlgen-python <ontology.owl> [--output <dir>] [--version <v>] [--previous <old.owl>] [--prefix <name>]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use anyhow::{Context, Result};
use clap::Parser;
use owlgen_clients::{convert, init_tracing, ConversionConfig, ConvertArgs};
use owlgen_codegen::Target;

/// Convert an OWL ontology into Python dataclasses.
#[derive(Parser)]
#[command(name = "owlgen-python", about = "Generate Python dataclasses from an OWL ontology")]
struct Args {
    #[command(flatten)]
    convert: ConvertArgs,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = ConversionConfig::from(&args.convert);

    let outcome = convert(&config, Target::Python)
        .with_context(|| format!("Failed to convert {}", config.ontology.display()))?;

    println!(
        "Successfully generated Python code in: {}",
        outcome.artifact_root().display()
    );
    Ok(())
}
