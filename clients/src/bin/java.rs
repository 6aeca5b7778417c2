//! `owlgen-java`: generates Java classes and a Maven `pom.xml` from an OWL
//! ontology.
//!
//! **Usage:**
//! ```text
//! owlgen-java <ontology.owl> [--output <dir>] [--package <pkg>] [--version <v>] [--previous <old.owl>] [--prefix <name>]
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
use owlgen_clients::config::DEFAULT_PACKAGE;
use owlgen_clients::{convert, init_tracing, ConversionConfig, ConvertArgs};
use owlgen_codegen::Target;

/// Convert an OWL ontology into Java classes.
#[derive(Parser)]
#[command(name = "owlgen-java", about = "Generate Java classes from an OWL ontology")]
struct Args {
    #[command(flatten)]
    convert: ConvertArgs,

    /// Java package for the generated classes.
    #[arg(long, default_value = DEFAULT_PACKAGE)]
    package: String,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = ConversionConfig::from(&args.convert);
    let target = Target::Java {
        package: args.package.clone(),
    };

    let outcome = convert(&config, target)
        .with_context(|| format!("Failed to convert {}", config.ontology.display()))?;

    println!(
        "Successfully generated Java code in: {}",
        outcome.artifact_root().display()
    );
    Ok(())
}
