//! Shared plumbing for the `owlgen-*` converter binaries.
//!
//! Each binary parses [`ConvertArgs`], turns them into a
//! [`ConversionConfig`] and calls [`convert`] with its [`Target`].
//!
//! [`Target`]: owlgen_codegen::Target

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod config;
pub mod error;
pub mod pipeline;

pub use config::{ConversionConfig, ConvertArgs};
pub use error::PipelineError;
pub use pipeline::{convert, validate, ConversionOutcome, MigrationStatus};

/// Installs the `tracing` subscriber used by every binary. `RUST_LOG`
/// overrides the default `info` level.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
